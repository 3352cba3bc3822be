//! Pipeline progress stages.
//!
//! The engine optionally reports staged progress between pipeline phases.
//! Callbacks run in-thread and must not block; the engine does not suspend.

use serde::{Deserialize, Serialize};

/// A pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Analysis accepted; nothing computed yet.
    Start,
    /// Per-actor profile aggregation finished.
    Profiles,
    /// Interaction graph materialized.
    Graph,
    /// Components and centrality computed.
    Clusters,
    /// Temporal waves and bursts detected.
    Waves,
    /// Scorecards assembled.
    Scorecards,
    /// Result ready.
    Done,
}

impl Stage {
    /// All stages, in execution order.
    pub const ALL: [Stage; 7] = [
        Stage::Start,
        Stage::Profiles,
        Stage::Graph,
        Stage::Clusters,
        Stage::Waves,
        Stage::Scorecards,
        Stage::Done,
    ];

    /// Nominal completion percentage reported for this stage.
    #[must_use]
    pub fn percent(self) -> u8 {
        match self {
            Stage::Start => 0,
            Stage::Profiles => 15,
            Stage::Graph => 30,
            Stage::Clusters => 45,
            Stage::Waves => 65,
            Stage::Scorecards => 90,
            Stage::Done => 100,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Profiles => "profiles",
            Stage::Graph => "graph",
            Stage::Clusters => "clusters",
            Stage::Waves => "waves",
            Stage::Scorecards => "scorecards",
            Stage::Done => "done",
        };
        write!(f, "{name}")
    }
}
