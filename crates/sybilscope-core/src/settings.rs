//! Engine settings.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for a single `analyze` call.
///
/// Field names follow the wire (camelCase) spelling of the ingestion
/// contract. All options are plain data; `validate` is called by the engine
/// before any work happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Flagging threshold over the composite sybil score, in `[0, 1]`.
    pub threshold: f64,
    /// Connected components smaller than this are not reported as clusters.
    pub min_cluster_size: usize,
    /// Fixed-bin width for wave detection, in minutes.
    pub time_bin_minutes: u32,
    /// Minimum event count for a fixed-bin wave.
    pub wave_min_count: u32,
    /// Minimum unique actor count for a fixed-bin wave.
    pub wave_min_actors: u32,
    /// Actions that materialize graph edges.
    pub positive_actions: Vec<String>,
    /// Actions counted as reversal/attack churn.
    pub churn_actions: Vec<String>,
    /// Actions-per-minute cutoff for the rapid-action flag.
    pub rapid_actions_per_minute_threshold: u32,
    /// Minimum actions before entropy contributes to scoring.
    pub entropy_min_total_actions: u32,
    /// Sliding-window width for burst detection, in seconds.
    pub burst_window_seconds: u32,
    /// Minimum event count inside a burst window.
    pub burst_min_count: u32,
    /// Minimum unique actor count inside a burst window.
    pub burst_min_actors: u32,
    /// Sliding-window width for per-actor velocity, in seconds.
    pub velocity_window_seconds: u32,
    /// Window population above which the velocity flag scales.
    pub velocity_max_actions_in_window: u32,
    /// Gap exceeding this splits an actor's timeline into sessions, minutes.
    pub session_gap_minutes: u32,
    /// N-gram length for the action-sequence repetition score, in `2..=5`.
    pub action_ngram_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            min_cluster_size: 3,
            time_bin_minutes: 5,
            wave_min_count: 3,
            wave_min_actors: 3,
            positive_actions: [
                "follow", "like", "recast", "quote", "comment", "boost", "mint", "tap", "transfer",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            churn_actions: ["unfollow", "unlike", "block", "mute", "report"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rapid_actions_per_minute_threshold: 30,
            entropy_min_total_actions: 20,
            burst_window_seconds: 300,
            burst_min_count: 8,
            burst_min_actors: 3,
            velocity_window_seconds: 60,
            velocity_max_actions_in_window: 30,
            session_gap_minutes: 30,
            action_ngram_size: 3,
        }
    }
}

impl Settings {
    /// Validate option ranges, naming the offending option on failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(EngineError::invalid_setting(
                "threshold",
                format!("must be within [0, 1], got {}", self.threshold),
            ));
        }
        if self.min_cluster_size < 2 {
            return Err(EngineError::invalid_setting(
                "minClusterSize",
                format!("must be >= 2, got {}", self.min_cluster_size),
            ));
        }
        if self.time_bin_minutes < 1 {
            return Err(EngineError::invalid_setting(
                "timeBinMinutes",
                "must be >= 1",
            ));
        }
        if self.positive_actions.is_empty() {
            return Err(EngineError::invalid_setting(
                "positiveActions",
                "must name at least one action",
            ));
        }
        if !(2..=5).contains(&self.action_ngram_size) {
            return Err(EngineError::invalid_setting(
                "actionNgramSize",
                format!("must be within 2..=5, got {}", self.action_ngram_size),
            ));
        }
        for (option, value) in [
            ("waveMinCount", self.wave_min_count),
            ("waveMinActors", self.wave_min_actors),
            (
                "rapidActionsPerMinuteThreshold",
                self.rapid_actions_per_minute_threshold,
            ),
            ("entropyMinTotalActions", self.entropy_min_total_actions),
            ("burstWindowSeconds", self.burst_window_seconds),
            ("burstMinCount", self.burst_min_count),
            ("burstMinActors", self.burst_min_actors),
            ("velocityWindowSeconds", self.velocity_window_seconds),
            (
                "velocityMaxActionsInWindow",
                self.velocity_max_actions_in_window,
            ),
            ("sessionGapMinutes", self.session_gap_minutes),
        ] {
            if value < 1 {
                return Err(EngineError::invalid_setting(option, "must be >= 1"));
            }
        }
        Ok(())
    }

    /// The positive-action set, for edge materialization.
    #[must_use]
    pub fn positive_action_set(&self) -> HashSet<&str> {
        self.positive_actions.iter().map(String::as_str).collect()
    }

    /// The churn-action set.
    #[must_use]
    pub fn churn_action_set(&self) -> HashSet<&str> {
        self.churn_actions.iter().map(String::as_str).collect()
    }

    /// Fixed-bin width in milliseconds.
    #[must_use]
    pub fn bin_width_ms(&self) -> i64 {
        i64::from(self.time_bin_minutes) * 60_000
    }

    /// Burst window width in milliseconds.
    #[must_use]
    pub fn burst_window_ms(&self) -> i64 {
        i64::from(self.burst_window_seconds) * 1_000
    }

    /// Velocity window width in milliseconds.
    #[must_use]
    pub fn velocity_window_ms(&self) -> i64 {
        i64::from(self.velocity_window_seconds) * 1_000
    }

    /// Session gap in milliseconds.
    #[must_use]
    pub fn session_gap_ms(&self) -> i64 {
        i64::from(self.session_gap_minutes) * 60_000
    }
}
