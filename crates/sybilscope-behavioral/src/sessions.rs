//! Gap-based session segmentation.

use crate::types::SessionMetrics;
use std::collections::HashMap;
use sybilscope_core::event::Event;

/// Session segmentation over one actor's sorted timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sessions;

impl Sessions {
    /// Split a sorted timeline at gaps exceeding `gap_ms` and summarize.
    ///
    /// Gap metrics cover consecutive events of the whole timeline; session
    /// duration is last-minus-first inside each segment (a single-event
    /// session has duration zero).
    #[must_use]
    pub fn compute(timestamps_ms: &[i64], gap_ms: i64) -> SessionMetrics {
        if timestamps_ms.is_empty() {
            return SessionMetrics::default();
        }

        let mut session_count = 0u32;
        let mut session_minutes_total = 0.0f64;
        let mut session_start = timestamps_ms[0];
        let mut previous = timestamps_ms[0];
        let mut gap_total_ms = 0i64;
        let mut max_gap_ms = 0i64;

        for &ts in &timestamps_ms[1..] {
            let gap = ts - previous;
            gap_total_ms += gap;
            max_gap_ms = max_gap_ms.max(gap);
            if gap > gap_ms {
                session_count += 1;
                session_minutes_total += (previous - session_start) as f64 / 60_000.0;
                session_start = ts;
            }
            previous = ts;
        }
        session_count += 1;
        session_minutes_total += (previous - session_start) as f64 / 60_000.0;

        let gap_count = timestamps_ms.len() - 1;
        let avg_gap_minutes = if gap_count > 0 {
            gap_total_ms as f64 / gap_count as f64 / 60_000.0
        } else {
            0.0
        };
        let avg_session_minutes = session_minutes_total / f64::from(session_count);

        let short_sessions = if avg_session_minutes <= 1.0 {
            1.0
        } else if avg_session_minutes <= 5.0 {
            0.5
        } else {
            0.0
        };
        let many_sessions = (f64::from(session_count) / 10.0).min(1.0);

        SessionMetrics {
            session_count,
            avg_session_minutes,
            avg_gap_minutes,
            max_gap_minutes: max_gap_ms as f64 / 60_000.0,
            botty_score: short_sessions * many_sessions,
        }
    }
}

/// Session metrics per actor, over time-valid events only.
///
/// Pure helper exposed for ingestion collaborators.
#[must_use]
pub fn detect_session_metrics(logs: &[Event], session_gap_ms: i64) -> HashMap<String, SessionMetrics> {
    let mut timelines: HashMap<&str, Vec<i64>> = HashMap::new();
    for event in logs {
        if let Some(ts) = event.ts_millis() {
            timelines.entry(event.actor.as_str()).or_default().push(ts);
        }
    }

    timelines
        .into_iter()
        .map(|(actor, mut timestamps)| {
            timestamps.sort_unstable();
            (actor.to_string(), Sessions::compute(&timestamps, session_gap_ms))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const MIN: i64 = 60_000;

    #[test]
    fn test_single_session() {
        let timestamps = vec![0, MIN, 2 * MIN, 3 * MIN];
        let metrics = Sessions::compute(&timestamps, 30 * MIN);
        assert_eq!(metrics.session_count, 1);
        assert!((metrics.avg_session_minutes - 3.0).abs() < 1e-9);
        assert!((metrics.avg_gap_minutes - 1.0).abs() < 1e-9);
        assert!((metrics.max_gap_minutes - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_gap_splits_sessions() {
        let timestamps = vec![0, MIN, 60 * MIN, 61 * MIN];
        let metrics = Sessions::compute(&timestamps, 30 * MIN);
        assert_eq!(metrics.session_count, 2);
        assert!((metrics.avg_session_minutes - 1.0).abs() < 1e-9);
        assert!((metrics.max_gap_minutes - 59.0).abs() < 1e-9);
    }

    #[test]
    fn test_botty_composite() {
        // 12 one-shot sessions an hour apart: short and many.
        let timestamps: Vec<i64> = (0..12).map(|i| i * 60 * MIN).collect();
        let metrics = Sessions::compute(&timestamps, 30 * MIN);
        assert_eq!(metrics.session_count, 12);
        assert!((metrics.botty_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_sessions_not_botty() {
        // Two 40-minute sessions.
        let mut timestamps: Vec<i64> = (0..41).map(|i| i * MIN).collect();
        timestamps.extend((0..41).map(|i| 200 * MIN + i * MIN));
        let metrics = Sessions::compute(&timestamps, 30 * MIN);
        assert_eq!(metrics.session_count, 2);
        assert_eq!(metrics.botty_score, 0.0);
    }

    #[test]
    fn test_detect_session_metrics_groups_by_actor() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let logs = vec![
            Event::new(base, "farcaster", "like", "a", "t"),
            Event::new(base + chrono::Duration::minutes(1), "farcaster", "like", "a", "t"),
            Event::new(base, "farcaster", "like", "b", "t"),
            Event::untimed("farcaster", "like", "b", "t"),
        ];
        let metrics = detect_session_metrics(&logs, 30 * MIN);
        assert_eq!(metrics["a"].session_count, 1);
        assert_eq!(metrics["b"].session_count, 1);
    }
}
