//! Error types for the forecast pipeline
//!
//! Unit failures (one resort/elevation fetch or parse going wrong) are
//! ordinary values the pipeline logs and skips; only a cycle with zero
//! successful units surfaces as fatal.

use thiserror::Error;

/// Errors raised while fetching, parsing, combining or persisting forecasts
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Network-level failure: connect, timeout, non-success status
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The fetched markup lacked an expected structural element
    #[error("Structure error: {message}")]
    Structure { message: String },

    /// Invalid or unusable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Snapshot file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A whole refresh cycle produced no usable unit at all
    #[error("No forecast data could be retrieved from any source")]
    NoData,
}

impl ForecastError {
    pub fn transport(message: impl Into<String>) -> Self {
        ForecastError::Transport {
            message: message.into(),
        }
    }

    pub fn structure(message: impl Into<String>) -> Self {
        ForecastError::Structure {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ForecastError::Config {
            message: message.into(),
        }
    }

    /// Whether this error is scoped to a single resort/elevation unit,
    /// meaning sibling units should still proceed
    #[must_use]
    pub fn is_unit_failure(&self) -> bool {
        matches!(
            self,
            ForecastError::Transport { .. } | ForecastError::Structure { .. }
        )
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(e: reqwest::Error) -> Self {
        ForecastError::transport(e.to_string())
    }
}
