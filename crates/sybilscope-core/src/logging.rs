//! Logging configuration.
//!
//! The engine itself only emits `tracing` events; hosts that want output call
//! `LogConfig::init` once at startup. `RUST_LOG` overrides the configured
//! level via the standard env filter.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose).
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("invalid log level: {s}")),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default log level.
    pub level: LogLevel,
    /// Emit structured JSON output instead of human-readable lines.
    pub structured: bool,
    /// Include caller file/line in output.
    pub include_location: bool,
}

impl LogConfig {
    /// Development configuration: debug level, human-readable, with location.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            structured: false,
            include_location: true,
        }
    }

    /// Production configuration: info level, JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            structured: true,
            include_location: false,
        }
    }

    /// Initialize the global subscriber. Safe to call more than once; later
    /// calls are no-ops.
    pub fn init(&self) -> Result<()> {
        use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string()));
        let subscriber = tracing_subscriber::registry().with(filter);

        if self.structured {
            let layer = fmt::layer()
                .json()
                .with_file(self.include_location)
                .with_line_number(self.include_location);
            subscriber.with(layer).try_init().ok();
        } else {
            let layer = fmt::layer()
                .with_file(self.include_location)
                .with_line_number(self.include_location);
            subscriber.with(layer).try_init().ok();
        }

        Ok(())
    }
}
