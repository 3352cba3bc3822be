//! Connected components and structural metrics.

use crate::types::{Cluster, InteractionGraph};

/// Result of component discovery.
#[derive(Debug, Clone, Default)]
pub struct ComponentResult {
    /// Reported clusters (components of size >= the configured minimum),
    /// ids assigned in discovery order.
    pub clusters: Vec<Cluster>,
    /// Per node: the reported cluster it belongs to, if any.
    pub membership: Vec<Option<u32>>,
    /// Per reported cluster: member count.
    pub sizes: Vec<usize>,
}

/// Component discovery and density/conductance metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentAnalyzer;

impl ComponentAnalyzer {
    /// Discover undirected connected components by iterative DFS and compute
    /// structural metrics for those meeting the size floor.
    #[must_use]
    pub fn compute(graph: &InteractionGraph, min_cluster_size: usize) -> ComponentResult {
        let n = graph.node_count();
        let mut visited = vec![false; n];
        let mut membership: Vec<Option<u32>> = vec![None; n];
        let mut clusters = Vec::new();
        let mut sizes = Vec::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }

            // Iterative DFS to collect the component.
            let mut component: Vec<u32> = Vec::new();
            let mut stack = vec![start as u32];
            visited[start] = true;
            while let Some(node) = stack.pop() {
                component.push(node);
                for &next in graph.neighbors(node) {
                    if !visited[next as usize] {
                        visited[next as usize] = true;
                        stack.push(next);
                    }
                }
            }

            if component.len() < min_cluster_size {
                continue;
            }
            component.sort_unstable();

            let cluster_id = clusters.len() as u32;
            let in_component = |v: u32| component.binary_search(&v).is_ok();

            let mut internal_doubled = 0usize;
            let mut external_edges = 0usize;
            for &member in &component {
                for &neighbor in graph.neighbors(member) {
                    if in_component(neighbor) {
                        internal_doubled += 1;
                    } else {
                        external_edges += 1;
                    }
                }
                membership[member as usize] = Some(cluster_id);
            }
            let internal_edges = internal_doubled / 2;

            let k = component.len();
            let possible = k * (k - 1) / 2;
            let density = if possible == 0 {
                0.0
            } else {
                internal_edges as f64 / possible as f64
            };
            let boundary = internal_edges + external_edges;
            let conductance = if boundary == 0 {
                0.0
            } else {
                external_edges as f64 / boundary as f64
            };

            sizes.push(k);
            clusters.push(Cluster {
                cluster_id,
                members: component
                    .iter()
                    .map(|&v| graph.interner.name(v).to_string())
                    .collect(),
                density,
                conductance,
                external_edges,
            });
        }

        ComponentResult {
            clusters,
            membership,
            sizes,
        }
    }
}
