//! The analysis result handed back to callers.

use serde::{Deserialize, Serialize};
use sybilscope_graph::types::{Cluster, GraphElements};
use sybilscope_score::types::Scorecard;
use sybilscope_temporal::types::Wave;

/// Everything one `analyze` call produces.
///
/// Owned by the caller after return; the engine keeps no references and no
/// state between calls. The whole structure serde-round-trips to canonical
/// JSON for persistence, review UIs, and evidence packaging downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Nodes and edges for graph visualization.
    pub elements: GraphElements,
    /// Connected components meeting the size floor, with structure metrics.
    pub clusters: Vec<Cluster>,
    /// Bin waves and window bursts, bin waves first.
    pub waves: Vec<Wave>,
    /// One scorecard per actor, in first-sighting order.
    pub scorecards: Vec<Scorecard>,
}

impl AnalysisResult {
    /// Look up an actor's scorecard.
    #[must_use]
    pub fn scorecard(&self, actor: &str) -> Option<&Scorecard> {
        self.scorecards.iter().find(|card| card.actor == actor)
    }

    /// Scorecards whose composite exceeded the threshold.
    #[must_use]
    pub fn flagged(&self) -> Vec<&Scorecard> {
        self.scorecards.iter().filter(|card| card.flagged).collect()
    }
}
