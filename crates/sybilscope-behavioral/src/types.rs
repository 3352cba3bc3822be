//! Behavioral detector result types.

use serde::{Deserialize, Serialize};

/// Target dispersion of one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntropyStats {
    /// Distinct targets.
    pub unique_targets: u32,
    /// Normalized Shannon entropy of the target distribution, `[0, 1]`.
    pub target_entropy: f64,
    /// `1 - target_entropy`.
    pub low_entropy_score: f64,
}

/// Hourly activity pattern of one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircadianProfile {
    /// UTC hours with at least one event.
    pub active_hours: u32,
    /// Normalized Shannon entropy of the hour histogram, `[0, 1]`.
    pub hour_entropy: f64,
    /// 1.0 for wide automation (>= 20 active hours over >= 200 events),
    /// 0.8 for narrow coordination (<= 2 active hours over >= 100 events),
    /// 0 otherwise; the two cases take the maximum.
    pub circadian_score: f64,
}

/// Action n-gram repetition of one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceStats {
    /// Occurrences of the most frequent n-gram.
    pub top_ngram_count: u32,
    /// Number of n-grams in the stream.
    pub total_ngrams: u32,
    /// `top / total`, clamped to `[0, 1]`.
    pub repeat_score: f64,
}

/// Session structure of one actor's timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    /// Number of sessions after gap splitting.
    pub session_count: u32,
    /// Mean session duration in minutes.
    pub avg_session_minutes: f64,
    /// Mean gap between consecutive events, minutes.
    pub avg_gap_minutes: f64,
    /// Largest gap between consecutive events, minutes.
    pub max_gap_minutes: f64,
    /// Short-and-many composite: session brevity times session count.
    pub botty_score: f64,
}
