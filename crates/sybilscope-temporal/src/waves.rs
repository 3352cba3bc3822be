//! Fixed-bin wave detection.

use crate::types::{DetectedWave, Wave, WaveMethod};
use std::collections::{BTreeSet, HashMap};
use sybilscope_core::event::Event;
use sybilscope_core::settings::Settings;

/// Epoch-aligned fixed-bin coordination waves.
///
/// Every time-valid event lands in the bin `floor(t / W) * W` for bin width
/// `W = timeBinMinutes * 60s`; the triple `(bin, action, target)` keys a
/// count and an actor set, and a wave is emitted when both the count and the
/// unique-actor floors are met.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveDetection;

impl WaveDetection {
    /// Detect bin waves over the log.
    #[must_use]
    pub fn compute(logs: &[Event], settings: &Settings) -> Vec<DetectedWave> {
        let width_ms = settings.bin_width_ms();
        let mut bins: HashMap<(i64, &str, &str), (u32, BTreeSet<&str>)> = HashMap::new();

        for event in logs {
            let Some(ts) = event.ts_millis() else {
                continue;
            };
            let bin_start = ts.div_euclid(width_ms) * width_ms;
            let entry = bins
                .entry((bin_start, event.action.as_str(), event.target.as_str()))
                .or_default();
            entry.0 += 1;
            entry.1.insert(event.actor.as_str());
        }

        let mut waves: Vec<DetectedWave> = bins
            .into_iter()
            .filter(|(_, (count, actors))| {
                *count >= settings.wave_min_count && actors.len() >= settings.wave_min_actors as usize
            })
            .map(|((bin_start, action, target), (count, actors))| {
                // Ratio against the count floor, not a true z. Downstream
                // consumers key on this exact formula.
                let z_score = f64::from(count) / f64::from(settings.wave_min_count.max(1));
                DetectedWave {
                    wave: Wave {
                        window_start: bin_start,
                        window_end: bin_start + width_ms,
                        action: action.to_string(),
                        target: target.to_string(),
                        actors: actors.iter().map(|a| a.to_string()).collect(),
                        z_score,
                        method: WaveMethod::Bin,
                    },
                    key: format!("{bin_start}:{action}:{target}"),
                }
            })
            .collect();

        waves.sort_by(|a, b| {
            (a.wave.window_start, &a.wave.action, &a.wave.target).cmp(&(
                b.wave.window_start,
                &b.wave.action,
                &b.wave.target,
            ))
        });
        waves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(seconds: u32, action: &str, actor: &str, target: &str) -> Event {
        Event::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
                + chrono::Duration::seconds(i64::from(seconds)),
            "farcaster",
            action,
            actor,
            target,
        )
    }

    #[test]
    fn test_wave_fires_at_both_floors() {
        let settings = Settings::default();
        let logs = vec![
            at(10, "unfollow", "a", "t1"),
            at(20, "unfollow", "b", "t1"),
            at(30, "unfollow", "c", "t1"),
        ];
        let waves = WaveDetection::compute(&logs, &settings);
        assert_eq!(waves.len(), 1);

        let wave = &waves[0].wave;
        assert_eq!(wave.method, WaveMethod::Bin);
        assert_eq!(wave.actors, vec!["a", "b", "c"]);
        assert_eq!(wave.window_end - wave.window_start, 5 * 60_000);
        assert!((wave.z_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_actor_floor_blocks_single_actor_spam() {
        let settings = Settings::default();
        let logs = vec![
            at(10, "tap", "solo", "game"),
            at(11, "tap", "solo", "game"),
            at(12, "tap", "solo", "game"),
            at(13, "tap", "solo", "game"),
        ];
        assert!(WaveDetection::compute(&logs, &settings).is_empty());
    }

    #[test]
    fn test_bins_are_epoch_aligned() {
        let settings = Settings::default();
        // Same key, but straddling the 5-minute bin boundary.
        let logs = vec![
            at(295, "unfollow", "a", "t1"),
            at(296, "unfollow", "b", "t1"),
            at(305, "unfollow", "c", "t1"),
            at(306, "unfollow", "d", "t1"),
        ];
        assert!(WaveDetection::compute(&logs, &settings).is_empty());
    }

    #[test]
    fn test_time_invalid_events_skipped() {
        let settings = Settings::default();
        let logs = vec![
            Event::untimed("farcaster", "unfollow", "a", "t1"),
            Event::untimed("farcaster", "unfollow", "b", "t1"),
            Event::untimed("farcaster", "unfollow", "c", "t1"),
        ];
        assert!(WaveDetection::compute(&logs, &settings).is_empty());
    }
}
