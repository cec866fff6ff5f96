//! FASTG parsing
//!
//! A single pass over the input: each declaration block is decoded,
//! validated and folded into the graph before the next one is read. The
//! first error aborts the parse.

use crate::adjacency::parse_adjacencies;
use crate::edge_name::DecodedEdgeName;
use crate::error::{FastgError, Result};
use crate::graph::{FastgGraph, GraphBuilder};
use crate::scanner::{Declaration, DeclarationScanner};
use crate::sequence::SequenceStats;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Parser configuration
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Fail if an adjacency target is never declared with its own header.
    /// Off by default: such targets are kept as nodes without attributes.
    pub require_declared: bool,
    /// Also hold adjacency mentions to the length and coverage their edge
    /// is declared (or first mentioned) with. Off by default: only two
    /// declarations of one edge are compared.
    pub check_references: bool,
}

/// Open a FASTG file for reading, decompressing `.gz` files on the fly
pub fn open_fastg_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FastgError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        return Ok(Box::new(BufReader::new(GzDecoder::new(file))));
    }

    Ok(Box::new(BufReader::new(file)))
}

/// Parse FASTG with default options
pub fn parse<R: BufRead>(reader: R) -> Result<FastgGraph> {
    parse_with_options(reader, &ParseOptions::default())
}

pub fn parse_with_options<R: BufRead>(reader: R, options: &ParseOptions) -> Result<FastgGraph> {
    let mut builder = GraphBuilder::with_options(options.clone());
    let mut declarations = 0usize;

    for declaration in DeclarationScanner::new(reader) {
        fold_declaration(&mut builder, &declaration?)?;
        declarations += 1;
    }

    let graph = builder.finish()?;

    let undeclared = graph.undeclared_nodes().count();
    if undeclared > 0 {
        warn!(
            undeclared,
            "referenced edges were never declared and carry no attributes"
        );
    }
    info!(
        declarations,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "parsed FASTG graph"
    );

    Ok(graph)
}

/// Parse a FASTG file from a path
pub fn parse_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<FastgGraph> {
    let reader = open_fastg_reader(path)?;
    parse_with_options(reader, options)
}

fn fold_declaration(builder: &mut GraphBuilder, declaration: &Declaration) -> Result<()> {
    let (primary_token, adjacency_region) = declaration.split_header();
    let primary = DecodedEdgeName::decode(primary_token, declaration.line)?;
    let targets = parse_adjacencies(adjacency_region, &primary.name, declaration.line)?;
    let sequence = SequenceStats::from_body(&declaration.body)?;

    builder.add_declaration(declaration.line, &primary, sequence, &targets)
}
