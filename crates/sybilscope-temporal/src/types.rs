//! Temporal detection types.

use serde::{Deserialize, Serialize};

/// How a wave was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveMethod {
    /// Epoch-aligned fixed bin.
    Bin,
    /// Sliding window with Poisson guard.
    Window,
}

/// A coordinated activity wave against one `(action, target)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wave {
    /// Window start, epoch milliseconds.
    pub window_start: i64,
    /// Window end, epoch milliseconds. A bin wave spans exactly one bin; a
    /// window burst spans exactly the burst window.
    pub window_end: i64,
    /// Action shared by the wave's events.
    pub action: String,
    /// Target shared by the wave's events.
    pub target: String,
    /// Distinct contributing actors, sorted.
    pub actors: Vec<String>,
    /// Bin waves carry the ratio `count / max(1, waveMinCount)`; window
    /// bursts carry the Poisson z against the key's global rate.
    pub z_score: f64,
    /// Detection method.
    pub method: WaveMethod,
}

/// A wave paired with its coordination key.
///
/// Bin and window keys share one namespace
/// (`"{bin}:{action}:{target}"` / `"{start}:{action}:{target}:window"`) so
/// per-actor burst participation counts distinct keys across both detectors.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedWave {
    /// The reportable wave.
    pub wave: Wave,
    /// Namespaced coordination key.
    pub key: String,
}

/// Per-actor velocity summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityStats {
    /// Peak event count in any velocity window.
    pub max_actions_in_window: u32,
    /// Peak window population divided by the window length in seconds.
    pub max_per_second: f64,
    /// `clamp((peak - cap) / cap, 0, 1)` against the configured cap.
    pub velocity_score: f64,
}
