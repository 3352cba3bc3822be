//! Per-actor scorecard.

use serde::{Deserialize, Serialize};

/// Per-actor report of all scalar scores, set-valued signals, and reasons.
///
/// Scalar score fields live in `[0, 1]` except the raw counters
/// (`churn_score`, `session_count`, `max_actions_per_minute`,
/// `top_action_ngram_count`, and friends). Field names keep the wire
/// (camelCase) spelling of the original reporting format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scorecard {
    /// Actor identifier.
    pub actor: String,

    // --- activity counters -------------------------------------------------
    /// Total events with this actor as the acting endpoint.
    pub total_actions: u32,
    /// Distinct targets across the actor's events.
    pub unique_targets: u32,
    /// Raw count of churn (reversal) actions.
    pub churn_score: u32,

    // --- structural signals ------------------------------------------------
    /// Distinct wave/burst keys the actor contributed to.
    pub burst_actions: u32,
    /// `min(burst_actions / total_actions, 1)`.
    pub coordination_score: f64,
    /// Reported cluster the actor belongs to, if any.
    pub cluster_id: Option<u32>,
    /// Member count of that cluster; 0 when unclustered.
    pub cluster_size: u32,
    /// `1 - degree / |cluster|` when clustered, else 0.
    pub cluster_isolation_score: f64,
    /// Distinct mutual positive-action partners.
    pub mutual_positive: u32,
    /// `mutual_positive / |distinct positive targets|`.
    pub reciprocal_rate: f64,
    /// PageRank over the directed positive-action graph.
    pub pagerank: f64,
    /// Eigenvector centrality over the undirected projection.
    pub eigen_centrality: f64,
    /// Sampled Brandes betweenness, max-normalized.
    pub betweenness: f64,

    // --- profile signals ---------------------------------------------------
    /// Normalized profile links, explicit plus bio-extracted.
    pub links: Vec<String>,
    /// Sublist of `links` on suspicious domains, order preserved.
    pub suspicious_links: Vec<String>,
    /// Sublist of `links` judged likely phishing, order preserved.
    pub phishing_links: Vec<String>,
    /// Sublist of `links` shared with at least one other actor.
    pub shared_links: Vec<String>,
    /// Unique-host ratio of the link list.
    pub link_diversity: f64,
    /// `clamp(|phishing links| / 2, 0, 1)`.
    pub phishing_link_score: f64,
    /// Follower-ratio / suspicious-link / low-diversity composite.
    pub profile_anomaly_score: f64,
    /// How many other actors share this actor's normalized bio.
    pub bio_shared_count: u32,
    /// `clamp((duplicates - 1) / 5, 0, 1)`.
    pub bio_similarity_score: f64,
    /// Stem/shape/numeric-suffix handle templating composite.
    pub handle_pattern_score: f64,
    /// Account age at first observed activity, days.
    pub account_age_days: Option<f64>,
    /// 1 when the account was younger than a week at first activity.
    pub new_account_score: f64,

    // --- temporal signals --------------------------------------------------
    /// Peak events in any integer-minute bucket.
    pub max_actions_per_minute: u32,
    /// `clamp((peak - threshold) / threshold, 0, 1)`.
    pub rapid_action_score: f64,
    /// Peak events in any velocity window.
    pub max_actions_per_velocity_window: u32,
    /// Peak window population per second.
    pub max_per_second: f64,
    /// `clamp((peak - cap) / cap, 0, 1)`.
    pub velocity_score: f64,

    // --- behavioral signals ------------------------------------------------
    /// Normalized target-distribution entropy.
    pub target_entropy: f64,
    /// `1 - target_entropy`.
    pub low_entropy_score: f64,
    /// `1 - unique_targets / total_actions`.
    pub low_diversity_score: f64,
    /// Normalized hour-histogram entropy.
    pub hour_entropy: f64,
    /// UTC hours with at least one event.
    pub active_hours: u32,
    /// Wide/narrow automation flag.
    pub circadian_score: f64,
    /// Share of the most frequent action n-gram.
    pub action_sequence_repeat_score: f64,
    /// Occurrences of that n-gram.
    pub top_action_ngram_count: u32,
    /// Sessions after gap splitting.
    pub session_count: u32,
    /// Mean session duration, minutes.
    pub avg_session_minutes: f64,
    /// Mean gap between consecutive events, minutes.
    pub avg_gap_minutes: f64,
    /// Largest gap between consecutive events, minutes.
    pub max_gap_minutes: f64,
    /// Short-and-many session composite.
    pub botty_session_score: f64,

    // --- on-chain / cross-platform signals ---------------------------------
    /// Funders that also funded other recipients. The field name is legacy
    /// wire vocabulary: the semantics are shared *funders* (senders whose
    /// recipient set has two or more members), not same-wallet identity.
    pub shared_wallets: Vec<String>,
    /// 1 when `shared_wallets` is non-empty.
    pub shared_wallet_score: f64,
    /// Distinct platforms, listed when two or more.
    pub cross_app_platforms: Vec<String>,
    /// 0.5 when active on more than one platform.
    pub cross_app_score: f64,
    /// Transaction-amount variance coefficient, clamped.
    pub fraud_tx_score: f64,

    // --- verdict -----------------------------------------------------------
    /// The clamped weighted composite.
    pub sybil_score: f64,
    /// Whether `sybil_score` exceeds the configured threshold.
    pub flagged: bool,
    /// Human-readable clauses that fired, in fixed order.
    pub reasons: Vec<String>,
}

impl Scorecard {
    /// Create an empty scorecard for an actor.
    #[must_use]
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let card = Scorecard::new("alice");
        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("sybilScore").is_some());
        assert!(json.get("sharedWallets").is_some());
        assert!(json.get("maxActionsPerMinute").is_some());
        assert!(json.get("crossAppPlatforms").is_some());
    }

    #[test]
    fn test_round_trip() {
        let mut card = Scorecard::new("alice");
        card.sybil_score = 0.42;
        card.reasons.push("Rapid actions (120/min)".into());
        let json = serde_json::to_string(&card).unwrap();
        let back: Scorecard = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
