//! Graph materialization from the event log.

use crate::types::{EdgeElement, GraphElements, InteractionGraph, NodeElement};
use std::collections::HashSet;
use sybilscope_core::event::Event;
use sybilscope_core::intern::Interner;

/// Single-pass graph builder.
///
/// Every event contributes both endpoints to the node set; events whose
/// action is in the positive set additionally emit a directed
/// `actor -> target` edge. Node order is first-sighting order, which keeps
/// the downstream pipeline deterministic given input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    /// Build the interaction graph.
    #[must_use]
    pub fn compute(logs: &[Event], positive_actions: &HashSet<&str>) -> InteractionGraph {
        /// Intern a name and grow the adjacency vectors alongside the table.
        fn touch(
            interner: &mut Interner,
            positive_out: &mut Vec<Vec<u32>>,
            positive_in: &mut Vec<Vec<u32>>,
            undirected: &mut Vec<Vec<u32>>,
            name: &str,
        ) -> u32 {
            let id = interner.intern(name);
            if id as usize >= positive_out.len() {
                positive_out.push(Vec::new());
                positive_in.push(Vec::new());
                undirected.push(Vec::new());
            }
            id
        }

        let mut interner = Interner::new();
        let mut positive_out: Vec<Vec<u32>> = Vec::new();
        let mut positive_in: Vec<Vec<u32>> = Vec::new();
        let mut undirected: Vec<Vec<u32>> = Vec::new();
        let mut seen_pairs: HashSet<(u32, u32)> = HashSet::new();
        let mut edges = Vec::new();

        for event in logs {
            let actor = touch(
                &mut interner,
                &mut positive_out,
                &mut positive_in,
                &mut undirected,
                &event.actor,
            );
            let target = touch(
                &mut interner,
                &mut positive_out,
                &mut positive_in,
                &mut undirected,
                &event.target,
            );

            if !positive_actions.contains(event.action.as_str()) {
                continue;
            }

            positive_out[actor as usize].push(target);
            positive_in[target as usize].push(actor);
            edges.push(EdgeElement {
                source: event.actor.clone(),
                target: event.target.clone(),
                action: event.action.clone(),
            });

            // Undirected projection: each pair once, no self-loops.
            if actor != target {
                let pair = (actor.min(target), actor.max(target));
                if seen_pairs.insert(pair) {
                    undirected[actor as usize].push(target);
                    undirected[target as usize].push(actor);
                }
            }
        }

        let nodes = interner
            .names()
            .iter()
            .map(|name| NodeElement {
                id: name.clone(),
                label: name.clone(),
            })
            .collect();

        InteractionGraph {
            interner,
            positive_out,
            positive_in,
            undirected,
            elements: GraphElements { nodes, edges },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(action: &str, actor: &str, target: &str) -> Event {
        Event::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            "farcaster",
            action,
            actor,
            target,
        )
    }

    fn positive() -> HashSet<&'static str> {
        ["follow", "like"].into_iter().collect()
    }

    #[test]
    fn test_first_sighting_node_order() {
        let logs = vec![
            event("follow", "b", "a"),
            event("follow", "c", "a"),
            event("view", "d", "b"),
        ];
        let graph = GraphBuilder::compute(&logs, &positive());
        let ids: Vec<&str> = graph
            .elements
            .nodes
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_one_edge_record_per_positive_event() {
        let logs = vec![
            event("follow", "a", "b"),
            event("follow", "a", "b"),
            event("view", "a", "b"),
        ];
        let graph = GraphBuilder::compute(&logs, &positive());
        assert_eq!(graph.elements.edges.len(), 2);
        // Multigraph directed adjacency keeps both edges...
        assert_eq!(graph.out_degree(0), 2);
        // ...while the undirected projection is simple.
        assert_eq!(graph.undirected_degree(0), 1);
        assert_eq!(graph.undirected_degree(1), 1);
    }

    #[test]
    fn test_non_positive_actions_only_add_nodes() {
        let logs = vec![event("view", "a", "b")];
        let graph = GraphBuilder::compute(&logs, &positive());
        assert_eq!(graph.node_count(), 2);
        assert!(graph.elements.edges.is_empty());
        assert_eq!(graph.undirected_degree(0), 0);
    }

    #[test]
    fn test_self_loop_kept_in_elements_not_adjacency() {
        let logs = vec![event("follow", "a", "a")];
        let graph = GraphBuilder::compute(&logs, &positive());
        assert_eq!(graph.elements.edges.len(), 1);
        assert_eq!(graph.undirected_degree(0), 0);
    }
}
