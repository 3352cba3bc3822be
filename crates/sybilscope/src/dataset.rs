//! Deterministic synthetic dataset generation.
//!
//! The default scenario is the canonical regression workload: two internal
//! Sybil farm clusters wired by follow edges, a coordinated unfollow burst
//! against an organic target, and a background of organic engagement. Every
//! knob is public so tests can dial the shape; generation is seeded, so the
//! same scenario always yields the same log.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sybilscope_core::event::Event;

/// Adjectives for organic handle synthesis.
const ADJECTIVES: &[&str] = &[
    "quiet", "bold", "amber", "mellow", "brisk", "wry", "vivid", "plain", "keen", "dusky",
];
/// Nouns for organic handle synthesis.
const NOUNS: &[&str] = &[
    "heron", "fjord", "ember", "lark", "moss", "cairn", "wren", "dune", "sable", "frost",
];
/// Organic action mix.
const ORGANIC_ACTIONS: &[&str] = &["like", "recast", "comment"];

/// Knobs for the farm-plus-burst scenario.
#[derive(Debug, Clone)]
pub struct FarmScenario {
    /// RNG seed; same seed, same log.
    pub seed: u64,
    /// Scenario epoch; farm activity starts here. Bin-aligned by default.
    pub start: DateTime<Utc>,
    /// Number of farm clusters.
    pub farm_clusters: usize,
    /// Members per farm cluster.
    pub farm_cluster_size: usize,
    /// Internal follow edges contributed by each member.
    pub follows_per_member: usize,
    /// Organic user population.
    pub organic_users: usize,
    /// Total organic actions.
    pub organic_actions: usize,
    /// Organic target population.
    pub organic_targets: usize,
    /// Time span the organic actions spread over, seconds.
    pub organic_span_seconds: i64,
    /// Members per cluster that join the unfollow burst.
    pub burst_members: usize,
    /// Unfollow actions each burst member emits.
    pub burst_actions_per_member: usize,
    /// Burst offset from the scenario start, minutes.
    pub burst_offset_minutes: i64,
    /// Burst spread, seconds.
    pub burst_spread_seconds: i64,
}

impl Default for FarmScenario {
    fn default() -> Self {
        Self {
            seed: 7,
            start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            farm_clusters: 2,
            farm_cluster_size: 12,
            follows_per_member: 3,
            organic_users: 80,
            organic_actions: 800,
            organic_targets: 8,
            organic_span_seconds: 6 * 3600,
            burst_members: 10,
            burst_actions_per_member: 3,
            burst_offset_minutes: 30,
            burst_spread_seconds: 120,
        }
    }
}

impl FarmScenario {
    /// Farm member identifiers, cluster-major.
    #[must_use]
    pub fn farm_actor_names(&self) -> Vec<String> {
        (0..self.farm_clusters)
            .flat_map(|c| {
                (0..self.farm_cluster_size).map(move |m| format!("farm{c}_user{m:02}"))
            })
            .collect()
    }

    /// Organic user identifiers.
    #[must_use]
    pub fn organic_actor_names(&self) -> Vec<String> {
        let combos = ADJECTIVES.len() * NOUNS.len();
        (0..self.organic_users)
            .map(|i| {
                let adjective = ADJECTIVES[i % ADJECTIVES.len()];
                let noun = NOUNS[(i / ADJECTIVES.len()) % NOUNS.len()];
                if i < combos {
                    format!("{adjective}_{noun}")
                } else {
                    format!("{adjective}_{noun}{}", i / combos)
                }
            })
            .collect()
    }

    /// Generate the scenario log, sorted by timestamp.
    #[must_use]
    pub fn generate(&self) -> Vec<Event> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut logs = Vec::new();

        let farm_bio = "web3 degen | follow for follow https://bit.ly/fdrop";
        let farm_created = self.start - Duration::days(2);

        // Farm clusters: each member follows the next few members in a ring.
        for c in 0..self.farm_clusters {
            for m in 0..self.farm_cluster_size {
                let actor = format!("farm{c}_user{m:02}");
                for j in 1..=self.follows_per_member {
                    let target =
                        format!("farm{c}_user{:02}", (m + j) % self.farm_cluster_size);
                    let at = self.start
                        + Duration::seconds((m * 7 + j * 23) as i64);
                    logs.push(
                        Event::new(at, "farcaster", "follow", actor.as_str(), target)
                            .with_bio(farm_bio)
                            .with_created_at(farm_created)
                            .with_counts(5, 500),
                    );
                }
            }
        }

        // Coordinated unfollow burst against an organic target.
        let burst_start = self.start + Duration::minutes(self.burst_offset_minutes);
        for c in 0..self.farm_clusters {
            for m in 0..self.burst_members.min(self.farm_cluster_size) {
                let actor = format!("farm{c}_user{m:02}");
                for _ in 0..self.burst_actions_per_member {
                    let at = burst_start
                        + Duration::seconds(rng.random_range(0..self.burst_spread_seconds.max(1)));
                    logs.push(Event::new(at, "base", "unfollow", actor.as_str(), "target1"));
                }
            }
        }

        // Organic background engagement.
        let organic_names = self.organic_actor_names();
        let organic_actions = if organic_names.is_empty() || self.organic_targets == 0 {
            0
        } else {
            self.organic_actions
        };
        for _ in 0..organic_actions {
            let actor = &organic_names[rng.random_range(0..organic_names.len())];
            let target = format!("target{}", rng.random_range(0..self.organic_targets.max(1)) + 1);
            let action = ORGANIC_ACTIONS[rng.random_range(0..ORGANIC_ACTIONS.len())];
            let at = self.start
                + Duration::seconds(rng.random_range(0..self.organic_span_seconds.max(1)));
            logs.push(
                Event::new(at, "farcaster", action, actor.as_str(), target)
                    .with_created_at(self.start - Duration::days(400))
                    .with_counts(200, 180),
            );
        }

        logs.sort_by(|a, b| {
            (a.ts_millis(), &a.actor, &a.action).cmp(&(b.ts_millis(), &b.actor, &b.action))
        });
        logs
    }
}
