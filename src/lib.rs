//! fastgtools - FASTG assembly graph tools
//!
//! A library for parsing FASTG files, as written by the SPAdes and MEGAHIT
//! assemblers, into a directed graph: each declared sequence strand becomes a
//! node carrying its length, coverage and GC content, and each adjacency
//! becomes an edge.
//!
//! Parsing is strict. Malformed names, bad sequence characters, length
//! mismatches, conflicting re-declarations and duplicate adjacencies all abort
//! the parse with a [`FastgError`]; no partial graph is returned.
//!
//! # Example
//!
//! ```no_run
//! use fastgtools::{FastgGraph, GraphSummary};
//!
//! let graph = FastgGraph::from_file("assembly_graph.fastg").unwrap();
//! for (source, target) in graph.edges() {
//!     println!("{} -> {}", source, target);
//! }
//!
//! let summary = GraphSummary::from_graph(&graph);
//! println!("{}", summary.format_summary());
//! ```

pub mod adjacency;
pub mod cli;
pub mod edge_name;
pub mod error;
pub mod graph;
pub mod parser;
pub mod scanner;
pub mod sequence;
pub mod summary;

pub use edge_name::{DecodedEdgeName, EdgeName, NameDialect, Orientation};
pub use error::{FastgError, Result};
pub use graph::{FastgGraph, FastgNode, SequenceRecord};
pub use parser::{parse, parse_file, parse_with_options, ParseOptions};
pub use summary::GraphSummary;
