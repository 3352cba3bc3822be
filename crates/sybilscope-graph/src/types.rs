//! Graph types and data structures.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use sybilscope_core::intern::Interner;

// ============================================================================
// Visualization elements
// ============================================================================

/// Node record for graph visualization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeElement {
    /// Node identifier (the actor/target identifier verbatim).
    pub id: String,
    /// Display label; equals the identifier.
    pub label: String,
}

/// Edge record for graph visualization; one per positive-action event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeElement {
    /// Acting endpoint.
    pub source: String,
    /// Acted-upon endpoint.
    pub target: String,
    /// The positive action that materialized the edge.
    pub action: String,
}

/// Nodes and edges handed to visualization consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphElements {
    /// Unique actors and targets, in first-sighting order.
    pub nodes: Vec<NodeElement>,
    /// One record per positive-action event, in log order.
    pub edges: Vec<EdgeElement>,
}

// ============================================================================
// Interaction graph
// ============================================================================

/// The positive-action graph over interned node indices.
///
/// Directed adjacency keeps multigraph multiplicity (one entry per event);
/// the undirected projection is simple - each pair contributes once and
/// self-loops are excluded - which is what the structural algorithms use.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    /// Identifier/index table, in first-sighting order.
    pub interner: Interner,
    /// Directed out-adjacency (multigraph).
    pub positive_out: Vec<Vec<u32>>,
    /// Directed in-adjacency (multigraph).
    pub positive_in: Vec<Vec<u32>>,
    /// Simple undirected adjacency.
    pub undirected: Vec<Vec<u32>>,
    /// Visualization elements.
    pub elements: GraphElements,
}

impl InteractionGraph {
    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.interner.len()
    }

    /// Directed out-degree counting multi-edges.
    #[must_use]
    pub fn out_degree(&self, node: u32) -> usize {
        self.positive_out
            .get(node as usize)
            .map_or(0, Vec::len)
    }

    /// Simple undirected degree.
    #[must_use]
    pub fn undirected_degree(&self, node: u32) -> usize {
        self.undirected.get(node as usize).map_or(0, Vec::len)
    }

    /// Simple undirected neighbors of a node.
    #[must_use]
    pub fn neighbors(&self, node: u32) -> &[u32] {
        self.undirected
            .get(node as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Distinct positive-action targets of a node.
    #[must_use]
    pub fn unique_positive_out(&self, node: u32) -> HashSet<u32> {
        self.positive_out
            .get(node as usize)
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// Clusters
// ============================================================================

/// A reported connected component of the undirected projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Monotonically increasing id in discovery order.
    pub cluster_id: u32,
    /// Member identifiers, in node order.
    pub members: Vec<String>,
    /// `internal_edges / (|C| * (|C| - 1) / 2)`; 0 when undefined.
    pub density: f64,
    /// `external_edges / (internal_edges + external_edges)`; 0 when undefined.
    pub conductance: f64,
    /// Count of member adjacencies leaving the component.
    pub external_edges: usize,
}
