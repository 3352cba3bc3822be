//! Sliding-window burst detection.

use crate::types::{DetectedWave, Wave, WaveMethod};
use std::collections::{BTreeSet, HashMap};
use sybilscope_core::event::Event;
use sybilscope_core::settings::Settings;

/// Variance floor for the Poisson z denominator.
const EXPECTED_EPSILON: f64 = 1e-6;
/// Poisson z a candidate must clear.
const Z_CUTOFF: f64 = 2.5;
/// Global cap on emitted bursts.
const MAX_BURSTS: usize = 250;

/// Sliding-window burst detector.
///
/// For each `(action, target)` key with enough events, a monotonic window of
/// the configured width sweeps the key's sorted timeline keeping the densest
/// candidate that satisfies the count and unique-actor floors. The candidate
/// survives only if its Poisson z against the key's dataset-wide rate clears
/// the cutoff, each key contributes at most one burst, and the global list
/// keeps the top bursts by z.
#[derive(Debug, Clone, Copy, Default)]
pub struct BurstDetection;

impl BurstDetection {
    /// Detect window bursts over the log.
    #[must_use]
    pub fn compute(logs: &[Event], settings: &Settings) -> Vec<DetectedWave> {
        let window_ms = settings.burst_window_ms();

        let mut span_min = i64::MAX;
        let mut span_max = i64::MIN;
        let mut keyed: HashMap<(&str, &str), Vec<(i64, &str)>> = HashMap::new();
        for event in logs {
            let Some(ts) = event.ts_millis() else {
                continue;
            };
            span_min = span_min.min(ts);
            span_max = span_max.max(ts);
            keyed
                .entry((event.action.as_str(), event.target.as_str()))
                .or_default()
                .push((ts, event.actor.as_str()));
        }

        let span_ms = span_max.saturating_sub(span_min);
        if span_ms <= 0 {
            return Vec::new();
        }

        let mut bursts: Vec<DetectedWave> = Vec::new();
        for ((action, target), mut events) in keyed {
            if events.len() < settings.burst_min_count as usize {
                continue;
            }
            events.sort_by_key(|(ts, _)| *ts);

            let Some((best_left, best_right)) = Self::best_window(&events, window_ms, settings)
            else {
                continue;
            };
            let count = best_right - best_left + 1;

            // Poisson z against the key's dataset-wide rate.
            let rate = events.len() as f64 / span_ms as f64;
            let expected = rate * window_ms as f64;
            let z = (count as f64 - expected) / expected.max(EXPECTED_EPSILON).sqrt();
            if z <= Z_CUTOFF {
                continue;
            }

            let window_start = events[best_left].0;
            let actors: BTreeSet<&str> = events[best_left..=best_right]
                .iter()
                .map(|(_, actor)| *actor)
                .collect();

            bursts.push(DetectedWave {
                wave: Wave {
                    window_start,
                    window_end: window_start + window_ms,
                    action: action.to_string(),
                    target: target.to_string(),
                    actors: actors.iter().map(|a| a.to_string()).collect(),
                    z_score: z,
                    method: WaveMethod::Window,
                },
                key: format!("{window_start}:{action}:{target}:window"),
            });
        }

        bursts.sort_by(|a, b| {
            b.wave
                .z_score
                .partial_cmp(&a.wave.z_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (&a.wave.action, &a.wave.target).cmp(&(&b.wave.action, &b.wave.target)))
        });
        bursts.truncate(MAX_BURSTS);
        bursts
    }

    /// Sweep the sorted timeline, returning the `[left, right]` index span of
    /// the densest window meeting both floors.
    fn best_window(
        events: &[(i64, &str)],
        window_ms: i64,
        settings: &Settings,
    ) -> Option<(usize, usize)> {
        let mut actor_counts: HashMap<&str, u32> = HashMap::new();
        let mut unique = 0usize;
        let mut left = 0usize;
        let mut best: Option<(usize, usize, usize)> = None; // (count, left, right)

        for right in 0..events.len() {
            let (ts, actor) = events[right];
            let slot = actor_counts.entry(actor).or_insert(0);
            if *slot == 0 {
                unique += 1;
            }
            *slot += 1;

            while ts - events[left].0 >= window_ms {
                let departing = events[left].1;
                let slot = actor_counts.get_mut(departing).expect("actor in window");
                *slot -= 1;
                if *slot == 0 {
                    unique -= 1;
                }
                left += 1;
            }

            let count = right - left + 1;
            if count >= settings.burst_min_count as usize
                && unique >= settings.burst_min_actors as usize
                && best.is_none_or(|(best_count, _, _)| count > best_count)
            {
                best = Some((count, left, right));
            }
        }

        best.map(|(_, l, r)| (l, r))
    }
}
