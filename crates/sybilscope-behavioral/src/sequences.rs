//! Action n-gram repetition.

use crate::types::SequenceStats;
use std::collections::HashMap;

/// N-gram repetition over one actor's time-ordered action stream.
///
/// Scripted actors replay the same short action program; the most frequent
/// n-gram's share of all n-grams exposes that. Actors with fewer than
/// `n + 2` actions score zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionSequences;

impl ActionSequences {
    /// Compute the repetition stats for a time-ordered action stream.
    #[must_use]
    pub fn compute(actions: &[&str], ngram_size: usize) -> SequenceStats {
        if ngram_size == 0 || actions.len() < ngram_size + 2 {
            return SequenceStats::default();
        }

        let mut counts: HashMap<&[&str], u32> = HashMap::new();
        for gram in actions.windows(ngram_size) {
            *counts.entry(gram).or_default() += 1;
        }

        let total = (actions.len() - ngram_size + 1) as u32;
        let top = counts.values().copied().max().unwrap_or(0);

        SequenceStats {
            top_ngram_count: top,
            total_ngrams: total,
            repeat_score: (f64::from(top) / f64::from(total)).clamp(0.0, 1.0),
        }
    }
}
