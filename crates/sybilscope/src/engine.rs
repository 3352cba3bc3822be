//! The analysis pipeline.
//!
//! `analyze` is a single-threaded, synchronous pure transformation: one pass
//! over the event log builds profiles, the positive-action graph, clusters
//! with centrality, temporal waves and bursts, and the per-actor behavioral
//! folds, then fuses everything into scorecards. It performs no I/O, keeps
//! no state across calls, and is deterministic given `(logs, settings)`.

use crate::report::AnalysisResult;
use std::collections::HashMap;
use sybilscope_behavioral::entropy::{Circadian, TargetEntropy};
use sybilscope_behavioral::sequences::ActionSequences;
use sybilscope_behavioral::sessions::Sessions;
use sybilscope_behavioral::wallets::{
    detect_cross_app_linking, detect_fraudulent_transactions, detect_shared_wallets,
};
use sybilscope_core::error::Result;
use sybilscope_core::event::Event;
use sybilscope_core::progress::Stage;
use sybilscope_core::settings::Settings;
use sybilscope_graph::builder::GraphBuilder;
use sybilscope_graph::centrality::{BetweennessCentrality, EigenvectorCentrality, PageRank};
use sybilscope_graph::components::ComponentAnalyzer;
use sybilscope_profile::aggregate::ProfileAggregator;
use sybilscope_profile::handles::{handle_pattern_score, normalize_handle, HandleNorm};
use sybilscope_profile::links::{is_likely_phishing, is_suspicious_domain, link_diversity};
use sybilscope_score::scorer::Scorer;
use sybilscope_score::types::Scorecard;
use sybilscope_temporal::bursts::BurstDetection;
use sybilscope_temporal::types::Wave;
use sybilscope_temporal::velocity::{RapidRate, VelocityScan};
use sybilscope_temporal::waves::WaveDetection;

/// Accounts younger than this at first activity count as new.
const NEW_ACCOUNT_MAX_AGE_DAYS: f64 = 7.0;
/// Follower/following ratio below which the profile ratio flag fires.
const FOLLOWER_RATIO_CUTOFF: f64 = 0.1;
/// Link diversity below which the low-diversity profile flag fires.
const LOW_LINK_DIVERSITY_CUTOFF: f64 = 0.5;

/// Per-actor accumulator over one log pass.
#[derive(Default)]
struct ActorFold<'a> {
    total: u32,
    churn: u32,
    targets: Vec<&'a str>,
    /// Time-valid `(timestamp, action)` pairs, sorted after the pass.
    timeline: Vec<(i64, &'a str)>,
}

/// Analyze an event log. See the crate docs for the full contract.
///
/// # Errors
/// Only settings validation can fail; the analysis itself is total on any
/// well-typed input and returns empty result sets for empty input.
pub fn analyze(logs: &[Event], settings: &Settings) -> Result<AnalysisResult> {
    analyze_with_progress(logs, settings, |_, _| {})
}

/// Analyze with staged progress reporting.
///
/// The callback runs in-thread between pipeline stages with
/// `(stage, percent)` and must not block. Panics inside the callback
/// propagate to the caller unwrapped.
///
/// # Errors
/// Only settings validation can fail.
pub fn analyze_with_progress(
    logs: &[Event],
    settings: &Settings,
    mut on_progress: impl FnMut(Stage, u8),
) -> Result<AnalysisResult> {
    settings.validate()?;
    let mut report = |stage: Stage| {
        tracing::debug!(stage = %stage, pct = stage.percent(), "pipeline stage");
        on_progress(stage, stage.percent());
    };

    tracing::info!(events = logs.len(), "analysis started");
    report(Stage::Start);

    let profiles = ProfileAggregator::compute(logs);
    report(Stage::Profiles);

    let positive = settings.positive_action_set();
    let graph = GraphBuilder::compute(logs, &positive);
    report(Stage::Graph);

    let components = ComponentAnalyzer::compute(&graph, settings.min_cluster_size);
    let pagerank = PageRank::compute(&graph);
    let eigen = EigenvectorCentrality::compute(&graph);
    let betweenness = BetweennessCentrality::compute(&graph);
    report(Stage::Clusters);

    let bin_waves = WaveDetection::compute(logs, settings);
    let bursts = BurstDetection::compute(logs, settings);

    // Bin and window keys share one namespace; an actor's burst
    // participation counts distinct keys across both detectors.
    let mut keys_by_actor: HashMap<&str, std::collections::HashSet<&str>> = HashMap::new();
    for detected in bin_waves.iter().chain(bursts.iter()) {
        for actor in &detected.wave.actors {
            keys_by_actor
                .entry(actor.as_str())
                .or_default()
                .insert(detected.key.as_str());
        }
    }
    report(Stage::Waves);

    // Per-actor fold, actors in first-sighting order.
    let churn_actions = settings.churn_action_set();
    let mut actors: Vec<&str> = Vec::new();
    let mut folds: HashMap<&str, ActorFold> = HashMap::new();
    for event in logs {
        let fold = folds.entry(event.actor.as_str()).or_insert_with(|| {
            actors.push(event.actor.as_str());
            ActorFold::default()
        });
        fold.total += 1;
        if churn_actions.contains(event.action.as_str()) {
            fold.churn += 1;
        }
        fold.targets.push(event.target.as_str());
        if let Some(ts) = event.ts_millis() {
            fold.timeline.push((ts, event.action.as_str()));
        }
    }
    for fold in folds.values_mut() {
        fold.timeline.sort_by_key(|(ts, _)| *ts);
    }

    // Handle template populations across actors.
    let norms: HashMap<&str, HandleNorm> = actors
        .iter()
        .map(|&actor| (actor, normalize_handle(actor)))
        .collect();
    let mut stem_counts: HashMap<&str, usize> = HashMap::new();
    let mut shape_counts: HashMap<&str, usize> = HashMap::new();
    for norm in norms.values() {
        *stem_counts.entry(norm.stem.as_str()).or_default() += 1;
        *shape_counts.entry(norm.shape.as_str()).or_default() += 1;
    }

    let shared_wallets = detect_shared_wallets(logs);
    let cross_app = detect_cross_app_linking(logs);
    let fraud = detect_fraudulent_transactions(logs);

    let mut scorecards = Vec::with_capacity(actors.len());
    for actor in &actors {
        let fold = &folds[actor];
        let mut card = Scorecard::new(*actor);
        card.total_actions = fold.total;
        card.churn_score = fold.churn;

        card.burst_actions = keys_by_actor.get(actor).map_or(0, |keys| keys.len() as u32);
        card.coordination_score = if fold.total > 0 {
            (f64::from(card.burst_actions) / f64::from(fold.total)).min(1.0)
        } else {
            0.0
        };

        // Graph position.
        let node = graph.interner.get(actor).expect("actor was interned");
        card.pagerank = pagerank[node as usize];
        card.eigen_centrality = eigen[node as usize];
        card.betweenness = betweenness[node as usize];
        if let Some(cluster_id) = components.membership[node as usize] {
            let size = components.sizes[cluster_id as usize];
            card.cluster_id = Some(cluster_id);
            card.cluster_size = size as u32;
            card.cluster_isolation_score = 1.0 - graph.undirected_degree(node) as f64 / size as f64;
        }
        let unique_out = graph.unique_positive_out(node);
        card.mutual_positive = unique_out
            .iter()
            .filter(|&&t| graph.unique_positive_out(t).contains(&node))
            .count() as u32;
        card.reciprocal_rate = if unique_out.is_empty() {
            0.0
        } else {
            f64::from(card.mutual_positive) / unique_out.len() as f64
        };

        // Target dispersion.
        let entropy = TargetEntropy::compute(&fold.targets);
        card.unique_targets = entropy.unique_targets;
        card.target_entropy = entropy.target_entropy;
        card.low_entropy_score = entropy.low_entropy_score;
        card.low_diversity_score = if fold.total > 0 {
            1.0 - f64::from(card.unique_targets) / f64::from(fold.total)
        } else {
            0.0
        };

        // Temporal signals over the time-valid timeline.
        let timestamps: Vec<i64> = fold.timeline.iter().map(|(ts, _)| *ts).collect();
        card.max_actions_per_minute = RapidRate::max_per_minute(&timestamps);
        card.rapid_action_score = RapidRate::score(
            card.max_actions_per_minute,
            settings.rapid_actions_per_minute_threshold,
        );
        let velocity = VelocityScan::compute(
            &timestamps,
            settings.velocity_window_ms(),
            settings.velocity_max_actions_in_window,
        );
        card.max_actions_per_velocity_window = velocity.max_actions_in_window;
        card.max_per_second = velocity.max_per_second;
        card.velocity_score = velocity.velocity_score;

        let circadian = Circadian::compute(&timestamps);
        card.active_hours = circadian.active_hours;
        card.hour_entropy = circadian.hour_entropy;
        card.circadian_score = circadian.circadian_score;

        let actions: Vec<&str> = fold.timeline.iter().map(|(_, action)| *action).collect();
        let sequence = ActionSequences::compute(&actions, settings.action_ngram_size);
        card.top_action_ngram_count = sequence.top_ngram_count;
        card.action_sequence_repeat_score = sequence.repeat_score;

        let sessions = Sessions::compute(&timestamps, settings.session_gap_ms());
        card.session_count = sessions.session_count;
        card.avg_session_minutes = sessions.avg_session_minutes;
        card.avg_gap_minutes = sessions.avg_gap_minutes;
        card.max_gap_minutes = sessions.max_gap_minutes;
        card.botty_session_score = sessions.botty_score;

        // Profile signals.
        if let Some(profile) = profiles.profile(actor) {
            card.links = profile.links.clone();
            card.suspicious_links = profile
                .links
                .iter()
                .filter(|link| is_suspicious_domain(link))
                .cloned()
                .collect();
            card.phishing_links = profile
                .links
                .iter()
                .filter(|link| is_likely_phishing(link))
                .cloned()
                .collect();
            card.link_diversity = link_diversity(&profile.links);
            card.phishing_link_score = (card.phishing_links.len() as f64 / 2.0).clamp(0.0, 1.0);

            let ratio_flag: f64 = match (profile.follower_count, profile.following_count) {
                (Some(followers), Some(following)) if following > 0 => {
                    if (followers as f64 / following as f64) < FOLLOWER_RATIO_CUTOFF {
                        1.0
                    } else {
                        0.0
                    }
                }
                _ => 0.0,
            };
            let any_suspicious = if card.suspicious_links.is_empty() { 0.0 } else { 1.0 };
            let low_diversity = if profile.links.len() >= 2
                && card.link_diversity < LOW_LINK_DIVERSITY_CUTOFF
            {
                1.0
            } else {
                0.0
            };
            card.profile_anomaly_score =
                (0.5 * any_suspicious + 0.3 * ratio_flag + 0.2 * low_diversity).min(1.0);

            if let (Some(created), Some(first_seen)) = (profile.created_at_ms, profile.first_seen_ms)
            {
                let age_days = (first_seen - created) as f64 / 86_400_000.0;
                card.account_age_days = Some(age_days);
                if (0.0..NEW_ACCOUNT_MAX_AGE_DAYS).contains(&age_days) {
                    card.new_account_score = 1.0;
                }
            }
        } else {
            card.link_diversity = 1.0;
        }
        card.shared_links = profiles.shared_links.get(*actor).cloned().unwrap_or_default();

        let duplicates = profiles.bio_duplicates(actor);
        card.bio_shared_count = duplicates.saturating_sub(1) as u32;
        card.bio_similarity_score = (duplicates.saturating_sub(1) as f64 / 5.0).clamp(0.0, 1.0);

        let norm = &norms[actor];
        card.handle_pattern_score = handle_pattern_score(
            stem_counts[norm.stem.as_str()],
            shape_counts[norm.shape.as_str()],
            norm.numeric_suffix,
        );

        // On-chain and cross-platform signals.
        card.shared_wallets = shared_wallets.get(*actor).cloned().unwrap_or_default();
        card.shared_wallet_score = if card.shared_wallets.is_empty() { 0.0 } else { 1.0 };
        card.cross_app_platforms = cross_app.get(*actor).cloned().unwrap_or_default();
        card.cross_app_score = if card.cross_app_platforms.len() > 1 {
            0.5
        } else {
            0.0
        };
        card.fraud_tx_score = fraud.get(*actor).copied().unwrap_or(0.0);

        Scorer::compute(&mut card, settings);
        scorecards.push(card);
    }
    report(Stage::Scorecards);

    let mut waves: Vec<Wave> = bin_waves.into_iter().map(|d| d.wave).collect();
    waves.extend(bursts.into_iter().map(|d| d.wave));

    let result = AnalysisResult {
        elements: graph.elements,
        clusters: components.clusters,
        waves,
        scorecards,
    };
    tracing::info!(
        clusters = result.clusters.len(),
        waves = result.waves.len(),
        scorecards = result.scorecards.len(),
        "analysis finished"
    );
    report(Stage::Done);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_result() {
        let result = analyze(&[], &Settings::default()).unwrap();
        assert!(result.elements.nodes.is_empty());
        assert!(result.clusters.is_empty());
        assert!(result.waves.is_empty());
        assert!(result.scorecards.is_empty());
    }

    #[test]
    fn test_invalid_settings_rejected_before_work() {
        let settings = Settings {
            threshold: 1.5,
            ..Settings::default()
        };
        assert!(analyze(&[], &settings).is_err());
    }

    #[test]
    fn test_progress_stages_in_order() {
        let mut stages = Vec::new();
        analyze_with_progress(&[], &Settings::default(), |stage, pct| {
            stages.push((stage, pct));
        })
        .unwrap();
        let expected: Vec<(Stage, u8)> = Stage::ALL.iter().map(|&s| (s, s.percent())).collect();
        assert_eq!(stages, expected);
    }
}
