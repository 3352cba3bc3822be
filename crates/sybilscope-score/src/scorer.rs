//! Composite scoring and reason attribution.

use crate::types::Scorecard;
use sybilscope_core::settings::Settings;

/// Fuses a scorecard's signals into the composite score and reasons.
///
/// The card arrives with every signal field filled by the pipeline; this
/// pass derives the weighted composite, clamps it, and appends one
/// human-readable reason per fired clause, always in the same order with the
/// threshold clause first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer;

impl Scorer {
    /// Compute `sybil_score`, `flagged`, and `reasons` in place.
    pub fn compute(card: &mut Scorecard, settings: &Settings) {
        card.sybil_score = Self::composite(card, settings);
        card.flagged = card.sybil_score > settings.threshold;
        card.reasons = Self::reasons(card, settings);
    }

    /// The clamped weighted composite.
    #[must_use]
    pub fn composite(card: &Scorecard, settings: &Settings) -> f64 {
        let churn_component = (f64::from(card.churn_score) / 10.0).min(1.0);
        let base = 0.30 * card.coordination_score
            + 0.20 * churn_component
            + 0.15 * card.cluster_isolation_score
            + 0.10 * card.new_account_score
            + 0.10 * card.low_diversity_score
            + 0.15 * card.profile_anomaly_score;

        let entropy_component = if card.total_actions >= settings.entropy_min_total_actions {
            card.low_entropy_score
        } else {
            0.0
        };

        (base
            + 0.10 * card.rapid_action_score
            + 0.05 * entropy_component
            + 0.05 * card.velocity_score
            + 0.03 * card.action_sequence_repeat_score
            + 0.03 * card.circadian_score
            + 0.05 * card.shared_wallet_score
            + 0.05 * card.cross_app_score
            + 0.05 * card.botty_session_score
            + 0.05 * card.fraud_tx_score)
            .clamp(0.0, 1.0)
    }

    /// Reason clauses, in fixed order. Non-empty exactly when something fired.
    #[must_use]
    pub fn reasons(card: &Scorecard, settings: &Settings) -> Vec<String> {
        let mut reasons = Vec::new();

        if card.sybil_score > settings.threshold {
            reasons.push(format!(
                "Sybil score {:.2} exceeds threshold",
                card.sybil_score
            ));
        }
        if card.coordination_score >= 0.5 {
            reasons.push(format!(
                "High coordination ({} burst keys over {} actions)",
                card.burst_actions, card.total_actions
            ));
        }
        if card.churn_score >= 5 {
            reasons.push(format!("High churn ({} reversal actions)", card.churn_score));
        }
        if card.cluster_isolation_score >= 0.5 {
            if let Some(cluster_id) = card.cluster_id {
                reasons.push(format!(
                    "Isolated cluster member (cluster {cluster_id}, size {})",
                    card.cluster_size
                ));
            }
        }
        if card.low_diversity_score >= 0.7 {
            reasons.push(format!(
                "Low target diversity ({} targets over {} actions)",
                card.unique_targets, card.total_actions
            ));
        }
        if !card.suspicious_links.is_empty() {
            reasons.push(format!(
                "Suspicious link domains ({})",
                card.suspicious_links.len()
            ));
        }
        if !card.phishing_links.is_empty() {
            reasons.push(format!("Likely phishing links ({})", card.phishing_links.len()));
        }
        if !card.shared_links.is_empty() {
            reasons.push(format!("Shared links with others ({})", card.shared_links.len()));
        }
        if card.bio_similarity_score >= 0.4 {
            reasons.push(format!(
                "Bio shared with {} other accounts",
                card.bio_shared_count
            ));
        }
        if card.handle_pattern_score >= 0.4 {
            reasons.push("Templated handle pattern".to_string());
        }
        if card.new_account_score >= 1.0 {
            let age = card.account_age_days.unwrap_or(0.0);
            reasons.push(format!(
                "New account (created {age:.1} days before first activity)"
            ));
        }
        if card.pagerank > 0.01 {
            reasons.push(format!("High PageRank ({:.4})", card.pagerank));
        }
        if card.betweenness > 0.05 {
            reasons.push(format!("High betweenness ({:.4})", card.betweenness));
        }
        if card.max_actions_per_minute >= settings.rapid_actions_per_minute_threshold {
            reasons.push(format!("Rapid actions ({}/min)", card.max_actions_per_minute));
        }
        if card.velocity_score >= 0.7 {
            reasons.push(format!(
                "Velocity spike ({} actions in window)",
                card.max_actions_per_velocity_window
            ));
        }
        if card.action_sequence_repeat_score >= 0.7 {
            reasons.push("Repetitive action sequences".to_string());
        }
        if card.circadian_score >= 0.8 {
            reasons.push(format!(
                "Abnormal circadian pattern ({} active hours)",
                card.active_hours
            ));
        }
        if card.low_entropy_score >= 0.7
            && card.total_actions >= settings.entropy_min_total_actions
        {
            reasons.push("Low target entropy".to_string());
        }
        if !card.shared_wallets.is_empty() {
            reasons.push(format!("Shared funder wallets ({})", card.shared_wallets.len()));
        }
        if !card.cross_app_platforms.is_empty() {
            reasons.push(format!("Active on {} platforms", card.cross_app_platforms.len()));
        }
        if card.session_count > 5 {
            reasons.push(format!("Fragmented sessions ({})", card.session_count));
        }
        if card.fraud_tx_score > 0.5 {
            reasons.push("Anomalous transaction amounts".to_string());
        }

        reasons
    }
}
