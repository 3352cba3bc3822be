//! # Sybilscope
//!
//! A local-first analytics engine that ingests a stream of social/on-chain
//! interaction events and produces an explainable risk report identifying
//! coordinated abuse: Sybil farms, bursty ranking manipulation,
//! link-farming, and mini-app/bot patterns.
//!
//! The core is one pure transformation:
//!
//! ```rust
//! use sybilscope::prelude::*;
//!
//! let logs: Vec<Event> = vec![];
//! let report = analyze(&logs, &Settings::default()).unwrap();
//! assert!(report.scorecards.is_empty());
//! ```
//!
//! For each actor the report carries a composite score, the structural
//! clusters it participates in, the temporal waves it contributes to, and a
//! list of human-readable reasons. The engine is single-threaded,
//! synchronous, and stateless across calls; it performs no I/O and its
//! output is a pure function of `(logs, settings)`.
//!
//! ## Domain organization
//!
//! - `profile` - per-actor profile aggregation, link risk, handle patterns
//! - `graph` - positive-action graph, components, centrality pack
//! - `temporal` - fixed-bin waves, sliding-window bursts, velocity
//! - `behavioral` - entropy, circadian, sequences, sessions, funders
//! - `score` - composite scoring and reason attribution

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod engine;
pub mod report;

// Re-export the domain crates.
pub use sybilscope_behavioral as behavioral;
pub use sybilscope_core as core;
pub use sybilscope_graph as graph;
pub use sybilscope_profile as profile;
pub use sybilscope_score as score;
pub use sybilscope_temporal as temporal;

// The engine API and the pure helpers exposed for ingestion collaborators.
pub use engine::{analyze, analyze_with_progress};
pub use sybilscope_behavioral::sessions::detect_session_metrics;
pub use sybilscope_behavioral::wallets::{
    detect_cross_app_linking, detect_fraudulent_transactions, detect_shared_wallets,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::{analyze, analyze_with_progress};
    pub use crate::report::AnalysisResult;
    pub use sybilscope_core::prelude::*;
    pub use sybilscope_graph::types::{Cluster, GraphElements};
    pub use sybilscope_score::types::Scorecard;
    pub use sybilscope_temporal::types::{Wave, WaveMethod};
}

/// Version information.
pub mod version {
    /// Crate version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
