//! Integration tests for the analysis engine.
//!
//! Covers the canonical scenarios (farm + burst, pure isolation, shared
//! phishing bio, rapid tap farm, circadian automation, shared funders) and
//! the universal result invariants.

use chrono::{Duration, TimeZone, Utc};
use std::collections::{BTreeSet, HashMap};
use sybilscope::dataset::FarmScenario;
use sybilscope::prelude::*;
use sybilscope::{detect_shared_wallets, detect_session_metrics};

fn base_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

// ============================================================================
// Scenario: internal farm + unfollow burst (the generator default)
// ============================================================================

#[test]
fn test_farm_scenario_clusters() {
    let result = analyze(&FarmScenario::default().generate(), &Settings::default()).unwrap();

    let farm_clusters: Vec<&Cluster> = result
        .clusters
        .iter()
        .filter(|c| c.members.len() == 12)
        .collect();
    assert!(
        farm_clusters.len() >= 2,
        "expected both farm clusters, got {}",
        farm_clusters.len()
    );
    for cluster in farm_clusters {
        assert!(cluster.density > 0.0);
        assert!(cluster.members.iter().all(|m| m.starts_with("farm")));
    }
}

#[test]
fn test_farm_scenario_unfollow_burst_wave() {
    let result = analyze(&FarmScenario::default().generate(), &Settings::default()).unwrap();

    let burst = result
        .waves
        .iter()
        .find(|w| w.method == WaveMethod::Window && w.action == "unfollow" && w.target == "target1")
        .expect("coordinated unfollow burst should surface as a window wave");
    assert!(
        burst.actors.len() >= 10,
        "burst should capture the farm actors, got {}",
        burst.actors.len()
    );
    assert!(burst.z_score > 2.5);
}

#[test]
fn test_farm_scenario_scores_separate_farm_from_organic() {
    let scenario = FarmScenario::default();
    let result = analyze(&scenario.generate(), &Settings::default()).unwrap();

    let farm_names = scenario.farm_actor_names();
    let hot_farm = farm_names
        .iter()
        .filter_map(|name| result.scorecard(name))
        .filter(|card| card.sybil_score > 0.6)
        .count();
    assert!(
        hot_farm >= 20,
        "expected at least 20 of 24 farm actors above 0.6, got {hot_farm}"
    );

    for name in scenario.organic_actor_names() {
        if let Some(card) = result.scorecard(&name) {
            assert!(
                card.sybil_score <= 0.6,
                "organic user {name} scored {}",
                card.sybil_score
            );
        }
    }
}

#[test]
fn test_farm_scenario_explanations() {
    let scenario = FarmScenario::default();
    let result = analyze(&scenario.generate(), &Settings::default()).unwrap();

    // Burst members carry the shared farm bio and its shortener link.
    let card = result.scorecard("farm0_user00").unwrap();
    assert!(!card.reasons.is_empty());
    assert_eq!(card.suspicious_links.len(), 1);
    assert!(!card.shared_links.is_empty());
    assert!(card.bio_similarity_score >= 0.4);
    assert!(card.handle_pattern_score >= 0.4);
    assert!(card.new_account_score == 1.0);
    assert!(card.churn_score >= 3);
    assert!(card.coordination_score > 0.5);
}

// ============================================================================
// Scenario: pure isolation
// ============================================================================

fn mutual_clique() -> Vec<Event> {
    let names = ["a1", "a2", "a3", "a4", "a5"];
    let mut logs = Vec::new();
    let mut step = 0i64;
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            logs.push(Event::new(
                base_time() + Duration::minutes(step * 10),
                "farcaster",
                "follow",
                names[i],
                names[j],
            ));
            step += 1;
        }
    }
    logs
}

#[test]
fn test_isolated_clique_metrics() {
    let result = analyze(&mutual_clique(), &Settings::default()).unwrap();

    assert_eq!(result.clusters.len(), 1);
    let cluster = &result.clusters[0];
    assert_eq!(cluster.members.len(), 5);
    assert!((cluster.density - 1.0).abs() < 1e-9);
    assert_eq!(cluster.conductance, 0.0);
    assert_eq!(cluster.external_edges, 0);

    assert!(result.waves.is_empty());

    for card in &result.scorecards {
        assert!((card.cluster_isolation_score - 0.2).abs() < 1e-9);
        assert_eq!(card.cluster_size, 5);
    }
}

// ============================================================================
// Scenario: shared shortener bio
// ============================================================================

fn shared_bio_logs() -> Vec<Event> {
    let actors = ["p1", "p2", "p3"];
    let mut logs = Vec::new();
    for i in 0..50u32 {
        let actor = actors[i as usize % actors.len()];
        logs.push(
            Event::new(
                base_time() + Duration::minutes(i64::from(i) * 17),
                "farcaster",
                "like",
                actor,
                format!("cast{i}"),
            )
            .with_bio("hi join https://bit.ly/x"),
        );
    }
    logs
}

#[test]
fn test_shared_shortener_bio_is_flagged_in_profile_signals() {
    let result = analyze(&shared_bio_logs(), &Settings::default()).unwrap();

    for actor in ["p1", "p2", "p3"] {
        let card = result.scorecard(actor).unwrap();
        assert_eq!(card.suspicious_links, vec!["https://bit.ly/x".to_string()]);
        assert_eq!(card.shared_links, vec!["https://bit.ly/x".to_string()]);
        assert!(
            card.profile_anomaly_score >= 0.5,
            "{actor} anomaly {}",
            card.profile_anomaly_score
        );
        assert!(card
            .reasons
            .contains(&"Suspicious link domains (1)".to_string()));
        assert!(card
            .reasons
            .contains(&"Shared links with others (1)".to_string()));
    }
}

// ============================================================================
// Scenario: rapid tap farm
// ============================================================================

fn tap_farm_logs() -> Vec<Event> {
    (0..120)
        .map(|i| {
            Event::new(
                base_time() + Duration::milliseconds(i64::from(i) * 490),
                "miniapp",
                "tap",
                "tapper",
                "gameA",
            )
        })
        .collect()
}

#[test]
fn test_rapid_tap_farm() {
    let settings = Settings {
        positive_actions: vec!["tap".to_string()],
        ..Settings::default()
    };
    let result = analyze(&tap_farm_logs(), &settings).unwrap();

    let card = result.scorecard("tapper").unwrap();
    assert_eq!(card.max_actions_per_minute, 120);
    assert_eq!(card.rapid_action_score, 1.0);
    assert_eq!(card.velocity_score, 1.0);
    assert_eq!(card.max_actions_per_velocity_window, 120);
    assert!(card.flagged, "tap farm should cross the threshold");
    assert!(card.sybil_score > settings.threshold);
    assert!(card.reasons.contains(&"Rapid actions (120/min)".to_string()));
    assert!(card.reasons[0].contains("exceeds threshold"));
}

// ============================================================================
// Scenario: circadian automation with a single target
// ============================================================================

#[test]
fn test_wide_circadian_low_entropy() {
    // 300 events evenly covering 24 hours, all on one target.
    let logs: Vec<Event> = (0..300)
        .map(|i| {
            Event::new(
                base_time() + Duration::seconds(i64::from(i) * 288),
                "farcaster",
                "like",
                "clock",
                "targetX",
            )
        })
        .collect();
    let result = analyze(&logs, &Settings::default()).unwrap();

    let card = result.scorecard("clock").unwrap();
    assert_eq!(card.active_hours, 24);
    assert_eq!(card.circadian_score, 1.0);
    assert_eq!(card.low_entropy_score, 1.0);
    assert!(card
        .reasons
        .contains(&"Abnormal circadian pattern (24 active hours)".to_string()));
    assert!(card.reasons.contains(&"Low target entropy".to_string()));
    // Both contributions land in the composite.
    assert!(card.sybil_score > 0.2);
}

// ============================================================================
// Scenario: shared funder grouping
// ============================================================================

fn hex_addr(n: u64) -> String {
    format!("0x{n:040x}")
}

#[test]
fn test_shared_funder_grouping() {
    let funder = hex_addr(0xa);
    let recipients = [hex_addr(1), hex_addr(2), hex_addr(3)];
    let logs: Vec<Event> = recipients
        .iter()
        .enumerate()
        .map(|(i, recipient)| {
            Event::new(
                base_time() + Duration::minutes(i as i64),
                "base",
                "transfer",
                &funder,
                recipient,
            )
            .with_amount(10.0)
        })
        .collect();

    let shared = detect_shared_wallets(&logs);
    for recipient in &recipients {
        assert_eq!(shared[recipient], vec![funder.clone()]);
    }
    assert!(!shared.contains_key(&funder));

    // Through the engine, the funder's own card has no shared funders.
    let result = analyze(&logs, &Settings::default()).unwrap();
    let card = result.scorecard(&funder).unwrap();
    assert!(card.shared_wallets.is_empty());
    assert_eq!(card.shared_wallet_score, 0.0);
}

// ============================================================================
// Universal invariants
// ============================================================================

#[test]
fn test_result_invariants_on_generated_data() {
    let settings = Settings::default();
    let logs = FarmScenario::default().generate();
    let result = analyze(&logs, &settings).unwrap();

    // Clusters.
    for cluster in &result.clusters {
        assert!(cluster.members.len() >= settings.min_cluster_size);
        assert!((0.0..=1.0).contains(&cluster.density));
        assert!((0.0..=1.0).contains(&cluster.conductance));
    }

    // Waves.
    let mut window_count = 0usize;
    for wave in &result.waves {
        match wave.method {
            WaveMethod::Bin => {
                assert!(wave.actors.len() >= settings.wave_min_actors as usize);
                assert_eq!(wave.window_end - wave.window_start, settings.bin_width_ms());
            }
            WaveMethod::Window => {
                window_count += 1;
                assert!(wave.actors.len() >= settings.burst_min_actors as usize);
                assert!(wave.z_score >= 2.5);
                assert_eq!(
                    wave.window_end - wave.window_start,
                    settings.burst_window_ms()
                );
            }
        }
    }
    assert!(window_count <= 250);

    // Edge count equals positive-action event count.
    let positive = settings.positive_action_set();
    let positive_events = logs
        .iter()
        .filter(|e| positive.contains(e.action.as_str()))
        .count();
    assert_eq!(result.elements.edges.len(), positive_events);

    // Every edge endpoint is in the node set.
    let node_ids: BTreeSet<&str> = result.elements.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &result.elements.edges {
        assert!(node_ids.contains(edge.source.as_str()));
        assert!(node_ids.contains(edge.target.as_str()));
    }

    // Scorecards.
    for card in &result.scorecards {
        assert!((0.0..=1.0).contains(&card.sybil_score), "{}", card.actor);
        assert!(card.links.len() >= card.suspicious_links.len());
        assert!(card.links.len() >= card.shared_links.len());
        if card.flagged {
            assert!(!card.reasons.is_empty());
            assert!(card.reasons[0].contains("exceeds threshold"));
        }
    }
}

#[test]
fn test_idempotence() {
    let settings = Settings::default();
    let logs = FarmScenario::default().generate();
    let first = analyze(&logs, &settings).unwrap();
    let second = analyze(&logs, &settings).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_permutation_stability() {
    let settings = Settings::default();
    let logs = FarmScenario::default().generate();
    let mut reversed = logs.clone();
    reversed.reverse();

    let forward = analyze(&logs, &settings).unwrap();
    let backward = analyze(&reversed, &settings).unwrap();

    // Component membership sets are identical.
    let forward_members: BTreeSet<BTreeSet<String>> = forward
        .clusters
        .iter()
        .map(|c| c.members.iter().cloned().collect())
        .collect();
    let backward_members: BTreeSet<BTreeSet<String>> = backward
        .clusters
        .iter()
        .map(|c| c.members.iter().cloned().collect())
        .collect();
    assert_eq!(forward_members, backward_members);

    // Set-based scorecard fields are set-equal per actor.
    for card in &forward.scorecards {
        let twin = backward.scorecard(&card.actor).unwrap();
        let as_set = |v: &Vec<String>| v.iter().cloned().collect::<BTreeSet<_>>();
        assert_eq!(as_set(&card.suspicious_links), as_set(&twin.suspicious_links));
        assert_eq!(as_set(&card.shared_links), as_set(&twin.shared_links));
        assert_eq!(
            as_set(&card.cross_app_platforms),
            as_set(&twin.cross_app_platforms)
        );
        assert_eq!(as_set(&card.shared_wallets), as_set(&twin.shared_wallets));
    }
}

#[test]
fn test_threshold_monotonicity() {
    let logs = FarmScenario::default().generate();
    let lenient = Settings {
        threshold: 0.3,
        ..Settings::default()
    };
    let strict = Settings {
        threshold: 0.6,
        ..Settings::default()
    };

    let flagged = |settings: &Settings| -> BTreeSet<String> {
        analyze(&logs, settings)
            .unwrap()
            .flagged()
            .iter()
            .map(|c| c.actor.clone())
            .collect()
    };

    let lenient_set = flagged(&lenient);
    let strict_set = flagged(&strict);
    assert!(strict_set.is_subset(&lenient_set));
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_result_json_round_trip() {
    let result = analyze(&FarmScenario::default().generate(), &Settings::default()).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: AnalysisResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, back);
}

#[test]
fn test_self_concatenation_doubles_churn() {
    let settings = Settings::default();
    let logs = FarmScenario::default().generate();

    // Shift well beyond the burst window plus a bin so the two copies cannot
    // interact temporally.
    let shift = Duration::hours(12);
    let mut doubled = logs.clone();
    doubled.extend(logs.iter().cloned().map(|mut event| {
        event.timestamp = event.timestamp.map(|t| t + shift);
        event
    }));

    let single = analyze(&logs, &settings).unwrap();
    let double = analyze(&doubled, &settings).unwrap();

    // Component memberships unchanged.
    let members = |result: &AnalysisResult| -> BTreeSet<BTreeSet<String>> {
        result
            .clusters
            .iter()
            .map(|c| c.members.iter().cloned().collect())
            .collect()
    };
    assert_eq!(members(&single), members(&double));

    // Per-actor churn doubles exactly.
    let churn: HashMap<&str, u32> = single
        .scorecards
        .iter()
        .map(|c| (c.actor.as_str(), c.churn_score))
        .collect();
    for card in &double.scorecards {
        assert_eq!(card.churn_score, churn[card.actor.as_str()] * 2, "{}", card.actor);
    }
}

// ============================================================================
// Degradation
// ============================================================================

#[test]
fn test_time_invalid_events_count_structurally() {
    // Malformed timestamps keep their structural contribution: nodes, edges,
    // and totals exist, temporal detectors see nothing.
    let logs = vec![
        Event::untimed("farcaster", "follow", "a", "b"),
        Event::untimed("farcaster", "follow", "b", "c"),
        Event::untimed("farcaster", "follow", "c", "a"),
    ];
    let result = analyze(&logs, &Settings::default()).unwrap();

    assert_eq!(result.elements.edges.len(), 3);
    assert_eq!(result.clusters.len(), 1);
    assert!(result.waves.is_empty());
    let card = result.scorecard("a").unwrap();
    assert_eq!(card.total_actions, 1);
    assert_eq!(card.max_actions_per_minute, 0);
    assert_eq!(card.session_count, 0);
}

#[test]
fn test_session_helper_matches_engine() {
    let settings = Settings::default();
    let logs = FarmScenario::default().generate();
    let sessions = detect_session_metrics(&logs, settings.session_gap_ms());
    let result = analyze(&logs, &settings).unwrap();

    for card in &result.scorecards {
        if let Some(metrics) = sessions.get(&card.actor) {
            assert_eq!(card.session_count, metrics.session_count, "{}", card.actor);
        }
    }
}
