//! Summary of a parsed FASTG graph

use crate::error::Result;
use crate::graph::FastgGraph;
use serde::{Deserialize, Serialize};

/// Counts describing a parsed graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Total number of nodes (strands)
    pub node_count: usize,
    /// Total number of adjacencies
    pub edge_count: usize,
    /// Nodes with their own declaration
    pub declared_nodes: usize,
    /// Nodes only seen as adjacency targets
    pub undeclared_nodes: usize,
    /// Sum of declared sequence lengths
    pub total_sequence_length: u64,
    /// GC fraction over all declared sequences, weighted by length
    pub gc_content: f64,
    pub weakly_connected_components: usize,
    pub strongly_connected_components: usize,
}

impl GraphSummary {
    pub fn from_graph(graph: &FastgGraph) -> Self {
        let undeclared_nodes = graph.undeclared_nodes().count();
        let total_sequence_length = graph.total_sequence_length();

        let gc_bases: f64 = graph
            .nodes()
            .filter_map(|node| node.record)
            .map(|record| record.gc * record.length as f64)
            .sum();
        let gc_content = if total_sequence_length == 0 {
            0.0
        } else {
            gc_bases / total_sequence_length as f64
        };

        GraphSummary {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            declared_nodes: graph.node_count() - undeclared_nodes,
            undeclared_nodes,
            total_sequence_length,
            gc_content,
            weakly_connected_components: graph.weakly_connected_components().len(),
            strongly_connected_components: graph.strongly_connected_components().len(),
        }
    }

    /// Format the summary as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        output.push_str("=== FASTG Graph Summary ===\n\n");

        output.push_str(&format!(
            "Nodes:                   {:>12}\n",
            self.node_count
        ));
        output.push_str(&format!(
            "  declared:              {:>12}\n",
            self.declared_nodes
        ));
        output.push_str(&format!(
            "  referenced only:       {:>12}\n",
            self.undeclared_nodes
        ));
        output.push_str(&format!(
            "Edges:                   {:>12}\n",
            self.edge_count
        ));
        output.push_str(&format!(
            "Weak components:         {:>12}\n",
            self.weakly_connected_components
        ));
        output.push_str(&format!(
            "Strong components:       {:>12}\n",
            self.strongly_connected_components
        ));
        output.push('\n');

        output.push_str("--- Sequence Statistics ---\n");
        output.push_str(&format!(
            "Total sequence length:   {:>12} bp\n",
            self.total_sequence_length
        ));
        output.push_str(&format!(
            "GC content:              {:>12.2}%\n",
            self.gc_content * 100.0
        ));

        output
    }

    /// Export the summary as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
