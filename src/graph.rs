//! Assembly graph built from a FASTG file
//!
//! Every declared strand (`id+` / `id-`) is a node carrying its length,
//! coverage and GC content; every adjacency is a directed edge. Nodes that are
//! only referenced from adjacency lists exist without attributes until their
//! own declaration is folded in.

use crate::edge_name::{DecodedEdgeName, EdgeName};
use crate::error::{FastgError, Result};
use crate::parser::{self, ParseOptions};
use crate::sequence::SequenceStats;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

/// Attributes of a declared sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceRecord {
    pub length: u64,
    pub coverage: f64,
    /// Fraction of G/C bases, in [0, 1]
    pub gc: f64,
}

/// Length and coverage as stated by one mention of an edge name
#[derive(Debug, Clone, Copy, PartialEq)]
struct Mention {
    line: usize,
    length: u64,
    coverage: f64,
}

impl Mention {
    fn of(decoded: &DecodedEdgeName, line: usize) -> Self {
        Self {
            line,
            length: decoded.length,
            coverage: decoded.coverage,
        }
    }

    fn agrees_with(&self, other: &Mention) -> bool {
        self.length == other.length && self.coverage == other.coverage
    }
}

/// A node of the assembly graph
#[derive(Debug, Clone)]
pub struct FastgNode {
    pub name: EdgeName,
    /// `None` until the node's own declaration is parsed
    pub record: Option<SequenceRecord>,
    first_mention: Mention,
    declaration: Option<Mention>,
}

impl FastgNode {
    pub fn is_declared(&self) -> bool {
        self.record.is_some()
    }

    /// Line on which this edge name first appeared
    pub fn first_line(&self) -> usize {
        self.first_mention.line
    }
}

/// Directed assembly graph without parallel edges
#[derive(Debug, Clone, Default)]
pub struct FastgGraph {
    graph: DiGraph<FastgNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl FastgGraph {
    /// Parse FASTG from a buffered reader with default options
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        parser::parse(reader)
    }

    /// Parse a FASTG (or gzipped FASTG) file with default options
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        parser::parse_file(path, &ParseOptions::default())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node keys in order of first appearance
    pub fn node_names(&self) -> impl Iterator<Item = &EdgeName> + '_ {
        self.graph.node_weights().map(|node| &node.name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FastgNode> + '_ {
        self.graph.node_weights()
    }

    /// Look up a node by its canonical key, e.g. `"3-"`
    pub fn node(&self, key: &str) -> Option<&FastgNode> {
        self.index.get(key).map(|&idx| &self.graph[idx])
    }

    /// Attributes of a declared node; `None` for unknown or undeclared keys
    pub fn attributes(&self, key: &str) -> Option<&SequenceRecord> {
        self.node(key).and_then(|node| node.record.as_ref())
    }

    pub fn contains_node(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        match (self.index.get(source), self.index.get(target)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// All adjacencies as `(source, target)` in declaration order
    pub fn edges(&self) -> impl Iterator<Item = (&EdgeName, &EdgeName)> + '_ {
        self.graph.edge_references().map(move |edge| {
            (
                &self.graph[edge.source()].name,
                &self.graph[edge.target()].name,
            )
        })
    }

    /// Targets of the adjacencies declared for `key`
    pub fn successors(&self, key: &str) -> Vec<&EdgeName> {
        let Some(&idx) = self.index.get(key) else {
            return Vec::new();
        };
        let mut targets: Vec<&EdgeName> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| &self.graph[n].name)
            .collect();
        // petgraph walks the adjacency list newest-first
        targets.reverse();
        targets
    }

    /// Nodes that were referenced but never declared
    pub fn undeclared_nodes(&self) -> impl Iterator<Item = &FastgNode> + '_ {
        self.graph.node_weights().filter(|node| !node.is_declared())
    }

    /// Components of the graph with edge direction ignored
    pub fn weakly_connected_components(&self) -> Vec<Vec<&EdgeName>> {
        let mut sets = UnionFind::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<&EdgeName>> = Vec::new();
        for idx in self.graph.node_indices() {
            let root = sets.find(idx.index());
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(&self.graph[idx].name);
        }
        components
    }

    pub fn strongly_connected_components(&self) -> Vec<Vec<&EdgeName>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .map(|scc| scc.into_iter().map(|idx| &self.graph[idx].name).collect())
            .collect()
    }

    /// The underlying petgraph graph, for algorithms not wrapped here
    pub fn as_digraph(&self) -> &DiGraph<FastgNode, ()> {
        &self.graph
    }

    /// Total length of all declared sequences
    pub fn total_sequence_length(&self) -> u64 {
        self.graph
            .node_weights()
            .filter_map(|node| node.record.map(|r| r.length))
            .sum()
    }
}

/// Folds parsed declarations into a [`FastgGraph`], enforcing consistency
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: FastgGraph,
    options: ParseOptions,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            graph: FastgGraph::default(),
            options,
        }
    }

    /// Fold in one declaration: its decoded primary name, the statistics of
    /// its sequence body and its adjacency targets, all from the header on
    /// `line`.
    pub fn add_declaration(
        &mut self,
        line: usize,
        primary: &DecodedEdgeName,
        sequence: SequenceStats,
        targets: &[DecodedEdgeName],
    ) -> Result<()> {
        if primary.length != sequence.length {
            return Err(FastgError::LengthMismatch {
                line,
                name: primary.name.to_string(),
                declared: primary.length,
                actual: sequence.length,
            });
        }

        let source = self.observe(primary, line, true)?;
        let node = &mut self.graph.graph[source];
        if node.record.is_none() {
            node.record = Some(SequenceRecord {
                length: sequence.length,
                coverage: primary.coverage,
                gc: sequence.gc_fraction(),
            });
            node.declaration = Some(Mention::of(primary, line));
        } else {
            debug!(name = %primary.name, line, "consistent re-declaration");
        }

        for target in targets {
            let target_idx = self.observe(target, line, false)?;
            if self.graph.graph.contains_edge(source, target_idx) {
                return Err(FastgError::DuplicateAdjacency {
                    line,
                    source_name: primary.name.to_string(),
                    target: target.name.to_string(),
                });
            }
            self.graph.graph.add_edge(source, target_idx, ());
        }

        debug!(
            name = %primary.name,
            line,
            length = sequence.length,
            targets = targets.len(),
            "folded declaration"
        );
        Ok(())
    }

    /// Find or create the node for a mention. A declaration must agree with
    /// an earlier declaration of the same edge; adjacency mentions are only
    /// compared when `check_references` is set.
    fn observe(
        &mut self,
        decoded: &DecodedEdgeName,
        line: usize,
        declaring: bool,
    ) -> Result<NodeIndex> {
        let mention = Mention::of(decoded, line);
        let key = decoded.name.key();

        if let Some(&idx) = self.graph.index.get(&key) {
            let node = &self.graph.graph[idx];
            let earlier = match node.declaration {
                Some(declared) if declaring || self.options.check_references => Some(declared),
                None if self.options.check_references => Some(node.first_mention),
                _ => None,
            };
            let Some(reference) = earlier else {
                return Ok(idx);
            };
            if !reference.agrees_with(&mention) {
                return Err(FastgError::InconsistentEdge {
                    name: key,
                    first_line: reference.line,
                    first_length: reference.length,
                    first_coverage: reference.coverage,
                    line,
                    length: mention.length,
                    coverage: mention.coverage,
                });
            }
            return Ok(idx);
        }

        let idx = self.graph.graph.add_node(FastgNode {
            name: decoded.name.clone(),
            record: None,
            first_mention: mention,
            declaration: None,
        });
        self.graph.index.insert(key, idx);
        Ok(idx)
    }

    /// Hand back the finished graph. With `require_declared`, any node that
    /// was referenced but never declared fails the parse.
    pub fn finish(self) -> Result<FastgGraph> {
        if self.options.require_declared {
            if let Some(node) = self.graph.undeclared_nodes().next() {
                return Err(FastgError::UndeclaredEdge {
                    name: node.name.to_string(),
                    line: node.first_line(),
                });
            }
        }
        Ok(self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(token: &str) -> DecodedEdgeName {
        DecodedEdgeName::decode(token, 0).unwrap()
    }

    fn seq(length: u64, gc_count: u64) -> SequenceStats {
        SequenceStats { length, gc_count }
    }

    #[test]
    fn test_forward_references_become_stubs() {
        let mut builder = GraphBuilder::new();
        builder
            .add_declaration(
                1,
                &decoded("EDGE_1_length_6_cov_5.2"),
                seq(6, 4),
                &[
                    decoded("EDGE_2_length_3_cov_100"),
                    decoded("EDGE_3_length_4_cov_33.3'"),
                ],
            )
            .unwrap();

        let graph = builder.finish().unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains_edge("1+", "2+"));
        assert!(graph.contains_edge("1+", "3-"));
        assert!(!graph.contains_node("3+"));
        assert!(!graph.contains_node("1-"));

        let record = graph.attributes("1+").unwrap();
        assert_eq!(record.length, 6);
        assert_eq!(record.coverage, 5.2);
        assert_eq!(record.gc, 4.0 / 6.0);

        assert!(graph.node("2+").is_some());
        assert!(graph.attributes("2+").is_none());
        assert_eq!(graph.undeclared_nodes().count(), 2);
    }

    #[test]
    fn test_stub_is_completed_in_place() {
        let mut builder = GraphBuilder::new();
        builder
            .add_declaration(
                1,
                &decoded("EDGE_1_length_3_cov_100"),
                seq(3, 1),
                &[decoded("EDGE_2_length_4_cov_33.3")],
            )
            .unwrap();
        builder
            .add_declaration(3, &decoded("EDGE_2_length_4_cov_33.3"), seq(4, 0), &[])
            .unwrap();

        let graph = builder.finish().unwrap();
        assert_eq!(graph.node_count(), 2);
        let record = graph.attributes("2+").unwrap();
        assert_eq!(record.length, 4);
        assert_eq!(record.coverage, 33.3);
        assert_eq!(record.gc, 0.0);
        assert!(graph.contains_edge("1+", "2+"));
    }

    #[test]
    fn test_length_mismatch() {
        let mut builder = GraphBuilder::new();
        let result =
            builder.add_declaration(5, &decoded("EDGE_1_length_6_cov_5.2"), seq(1, 0), &[]);
        match result {
            Err(FastgError::LengthMismatch {
                line,
                name,
                declared,
                actual,
            }) => {
                assert_eq!(line, 5);
                assert_eq!(name, "1+");
                assert_eq!(declared, 6);
                assert_eq!(actual, 1);
            }
            other => panic!("expected LengthMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_redeclaration_is_accepted() {
        let mut builder = GraphBuilder::new();
        builder
            .add_declaration(1, &decoded("EDGE_1_length_2_cov_7"), seq(2, 1), &[])
            .unwrap();
        builder
            .add_declaration(3, &decoded("EDGE_1_length_2_cov_7"), seq(2, 2), &[])
            .unwrap();

        let graph = builder.finish().unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.attributes("1+").unwrap().gc, 0.5);
    }

    #[test]
    fn test_conflicting_redeclaration() {
        let mut builder = GraphBuilder::new();
        builder
            .add_declaration(1, &decoded("EDGE_1_length_2_cov_7"), seq(2, 1), &[])
            .unwrap();
        let result =
            builder.add_declaration(4, &decoded("EDGE_1_length_2_cov_8"), seq(2, 1), &[]);
        match result {
            Err(FastgError::InconsistentEdge {
                name,
                first_line,
                first_coverage,
                line,
                coverage,
                ..
            }) => {
                assert_eq!(name, "1+");
                assert_eq!(first_line, 1);
                assert_eq!(first_coverage, 7.0);
                assert_eq!(line, 4);
                assert_eq!(coverage, 8.0);
            }
            other => panic!("expected InconsistentEdge, got {:?}", other),
        }
    }

    #[test]
    fn test_declaration_overrides_reference() {
        let mut builder = GraphBuilder::new();
        builder
            .add_declaration(
                1,
                &decoded("EDGE_1_length_2_cov_7"),
                seq(2, 1),
                &[decoded("EDGE_2_length_5_cov_1")],
            )
            .unwrap();
        builder
            .add_declaration(3, &decoded("EDGE_2_length_6_cov_1"), seq(6, 1), &[])
            .unwrap();
        builder
            .add_declaration(
                5,
                &decoded("EDGE_3_length_1_cov_1"),
                seq(1, 0),
                &[decoded("EDGE_2_length_9_cov_4")],
            )
            .unwrap();

        let graph = builder.finish().unwrap();
        assert_eq!(graph.attributes("2+").unwrap().length, 6);
        assert_eq!(graph.node("2+").unwrap().first_line(), 1);
        assert!(graph.contains_edge("3+", "2+"));
    }

    #[test]
    fn test_check_references() {
        let options = ParseOptions {
            check_references: true,
            ..ParseOptions::default()
        };

        let mut builder = GraphBuilder::with_options(options.clone());
        builder
            .add_declaration(
                1,
                &decoded("EDGE_1_length_2_cov_7"),
                seq(2, 1),
                &[decoded("EDGE_2_length_5_cov_1")],
            )
            .unwrap();
        let result =
            builder.add_declaration(3, &decoded("EDGE_2_length_6_cov_1"), seq(6, 1), &[]);
        assert!(matches!(
            result,
            Err(FastgError::InconsistentEdge { first_line: 1, line: 3, .. })
        ));

        let mut builder = GraphBuilder::with_options(options);
        builder
            .add_declaration(1, &decoded("EDGE_1_length_2_cov_7"), seq(2, 1), &[])
            .unwrap();
        let result = builder.add_declaration(
            3,
            &decoded("EDGE_2_length_1_cov_1"),
            seq(1, 0),
            &[decoded("EDGE_1_length_2_cov_8")],
        );
        assert!(matches!(
            result,
            Err(FastgError::InconsistentEdge { first_line: 1, line: 3, .. })
        ));
    }

    #[test]
    fn test_duplicate_adjacency_across_declarations() {
        let mut builder = GraphBuilder::new();
        builder
            .add_declaration(
                1,
                &decoded("EDGE_1_length_2_cov_7"),
                seq(2, 1),
                &[decoded("EDGE_2_length_5_cov_1")],
            )
            .unwrap();
        let result = builder.add_declaration(
            3,
            &decoded("EDGE_1_length_2_cov_7"),
            seq(2, 1),
            &[decoded("EDGE_2_length_5_cov_1")],
        );
        assert!(matches!(
            result,
            Err(FastgError::DuplicateAdjacency { line: 3, .. })
        ));
    }

    #[test]
    fn test_self_loop_is_an_ordinary_edge() {
        let mut builder = GraphBuilder::new();
        builder
            .add_declaration(
                1,
                &decoded("EDGE_1_length_2_cov_7"),
                seq(2, 1),
                &[decoded("EDGE_1_length_2_cov_7")],
            )
            .unwrap();
        let graph = builder.finish().unwrap();
        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains_edge("1+", "1+"));
        assert_eq!(graph.strongly_connected_components().len(), 1);
    }

    #[test]
    fn test_require_declared() {
        let mut builder = GraphBuilder::with_options(ParseOptions {
            require_declared: true,
            ..ParseOptions::default()
        });
        builder
            .add_declaration(
                2,
                &decoded("EDGE_1_length_2_cov_7"),
                seq(2, 1),
                &[decoded("EDGE_9_length_5_cov_1'")],
            )
            .unwrap();
        match builder.finish() {
            Err(FastgError::UndeclaredEdge { name, line }) => {
                assert_eq!(name, "9-");
                assert_eq!(line, 2);
            }
            other => panic!("expected UndeclaredEdge, got {:?}", other),
        }
    }

    #[test]
    fn test_components() {
        let mut builder = GraphBuilder::new();
        builder
            .add_declaration(
                1,
                &decoded("EDGE_1_length_1_cov_1"),
                seq(1, 0),
                &[decoded("EDGE_2_length_1_cov_1")],
            )
            .unwrap();
        builder
            .add_declaration(
                3,
                &decoded("EDGE_2_length_1_cov_1"),
                seq(1, 0),
                &[decoded("EDGE_1_length_1_cov_1")],
            )
            .unwrap();
        builder
            .add_declaration(
                5,
                &decoded("EDGE_3_length_1_cov_1"),
                seq(1, 1),
                &[decoded("EDGE_4_length_1_cov_1")],
            )
            .unwrap();
        let graph = builder.finish().unwrap();

        let weak = graph.weakly_connected_components();
        assert_eq!(weak.len(), 2);
        let names: Vec<String> = weak[0].iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["1+", "2+"]);

        let strong = graph.strongly_connected_components();
        assert_eq!(strong.len(), 3);
        assert!(strong.iter().any(|scc| scc.len() == 2));
    }

    #[test]
    fn test_successors_keep_declaration_order() {
        let mut builder = GraphBuilder::new();
        builder
            .add_declaration(
                1,
                &decoded("EDGE_1_length_1_cov_1"),
                seq(1, 0),
                &[
                    decoded("EDGE_2_length_1_cov_1"),
                    decoded("EDGE_3_length_1_cov_1'"),
                    decoded("EDGE_4_length_1_cov_1"),
                ],
            )
            .unwrap();
        let graph = builder.finish().unwrap();
        let names: Vec<String> = graph.successors("1+").iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["2+", "3-", "4+"]);
        assert!(graph.successors("7+").is_empty());
    }
}
