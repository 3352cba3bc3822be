//! Per-actor velocity and rapid-rate detection.

use crate::types::VelocityStats;
use std::collections::HashMap;

/// Sliding-window velocity over one actor's sorted timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityScan;

impl VelocityScan {
    /// Find the peak window population and derive the velocity score.
    ///
    /// `timestamps` must be sorted ascending (epoch milliseconds).
    #[must_use]
    pub fn compute(timestamps: &[i64], window_ms: i64, max_actions_in_window: u32) -> VelocityStats {
        if timestamps.is_empty() || window_ms <= 0 {
            return VelocityStats::default();
        }

        let mut left = 0usize;
        let mut peak = 0usize;
        for right in 0..timestamps.len() {
            while timestamps[right] - timestamps[left] >= window_ms {
                left += 1;
            }
            peak = peak.max(right - left + 1);
        }

        let cap = f64::from(max_actions_in_window.max(1));
        let peak_f = peak as f64;
        VelocityStats {
            max_actions_in_window: peak as u32,
            max_per_second: peak_f / (window_ms as f64 / 1_000.0),
            velocity_score: ((peak_f - cap) / cap).clamp(0.0, 1.0),
        }
    }
}

/// Per-minute action-rate peak over one actor's timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct RapidRate;

impl RapidRate {
    /// Maximum event count in any integer-minute bucket.
    #[must_use]
    pub fn max_per_minute(timestamps: &[i64]) -> u32 {
        let mut buckets: HashMap<i64, u32> = HashMap::new();
        for &ts in timestamps {
            *buckets.entry(ts.div_euclid(60_000)).or_default() += 1;
        }
        buckets.values().copied().max().unwrap_or(0)
    }

    /// `clamp((peak - threshold) / threshold, 0, 1)`.
    #[must_use]
    pub fn score(max_per_minute: u32, threshold: u32) -> f64 {
        let threshold = f64::from(threshold.max(1));
        ((f64::from(max_per_minute) - threshold) / threshold).clamp(0.0, 1.0)
    }
}
