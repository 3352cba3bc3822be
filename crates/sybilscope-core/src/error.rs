//! Error types for the analysis engine.

use thiserror::Error;

/// Result type alias using `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can surface across the engine API boundary.
///
/// The analysis itself is total on well-typed input: malformed records
/// degrade per-detector instead of erroring. Errors are reserved for
/// settings validation and for (de)serialization done on behalf of callers.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A settings option is out of its accepted range.
    #[error("invalid setting `{option}`: {reason}")]
    InvalidSetting {
        /// The offending option, in wire (camelCase) spelling.
        option: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl EngineError {
    /// Create an invalid-setting error.
    #[must_use]
    pub fn invalid_setting(option: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidSetting {
            option,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
