//! Target and circadian entropy.

use crate::types::{CircadianProfile, EntropyStats};
use std::collections::HashMap;

/// Shannon entropy of a count distribution, in nats.
fn shannon_entropy(counts: impl Iterator<Item = u32>, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = f64::from(total);
    counts
        .filter(|&c| c > 0)
        .map(|c| {
            let p = f64::from(c) / total;
            -p * p.ln()
        })
        .sum()
}

// ============================================================================
// Target entropy
// ============================================================================

/// Target-distribution entropy of one actor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetEntropy;

impl TargetEntropy {
    /// Entropy over the actor's action-to-target distribution, normalized by
    /// `ln k` for `k` unique targets. Fewer than two unique targets score
    /// zero entropy (and thus maximal low-entropy).
    #[must_use]
    pub fn compute(targets: &[&str]) -> EntropyStats {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for target in targets {
            *counts.entry(target).or_default() += 1;
        }
        let unique = counts.len() as u32;
        let total = targets.len() as u32;

        let target_entropy = if unique >= 2 {
            let h = shannon_entropy(counts.values().copied(), total);
            (h / f64::from(unique).ln()).clamp(0.0, 1.0)
        } else {
            0.0
        };

        EntropyStats {
            unique_targets: unique,
            target_entropy,
            low_entropy_score: 1.0 - target_entropy,
        }
    }
}

// ============================================================================
// Circadian pattern
// ============================================================================

/// Hourly activity pattern of one actor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Circadian;

impl Circadian {
    /// Fold the actor's time-valid timestamps into a UTC hour histogram and
    /// flag the two automation shapes: round-the-clock activity and
    /// tight narrow-window coordination.
    #[must_use]
    pub fn compute(timestamps_ms: &[i64]) -> CircadianProfile {
        let mut hours = [0u32; 24];
        for &ts in timestamps_ms {
            let hour = ts.div_euclid(3_600_000).rem_euclid(24) as usize;
            hours[hour] += 1;
        }

        let total = timestamps_ms.len() as u32;
        let active_hours = hours.iter().filter(|&&c| c > 0).count() as u32;
        let hour_entropy = shannon_entropy(hours.iter().copied(), total) / 24.0f64.ln();

        let wide: f64 = if active_hours >= 20 && total >= 200 {
            1.0
        } else {
            0.0
        };
        let narrow: f64 = if active_hours <= 2 && total >= 100 {
            0.8
        } else {
            0.0
        };

        CircadianProfile {
            active_hours,
            hour_entropy,
            circadian_score: wide.max(narrow),
        }
    }
}
