//! # Sybilscope Temporal Detectors
//!
//! Coordination-in-time detection over the event log:
//!
//! - `WaveDetection` - epoch-aligned fixed-bin `(bin, action, target)` waves
//! - `BurstDetection` - per-key sliding windows guarded by a Poisson z-score
//!   against the key's dataset-wide rate
//! - `VelocityScan` / `RapidRate` - per-actor window population and
//!   per-minute peaks

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bursts;
pub mod types;
pub mod velocity;
pub mod waves;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::bursts::BurstDetection;
    pub use crate::types::{DetectedWave, VelocityStats, Wave, WaveMethod};
    pub use crate::velocity::{RapidRate, VelocityScan};
    pub use crate::waves::WaveDetection;
}
