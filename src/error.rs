//! Error types for PAC rule generation.

use thiserror::Error;

/// Result type alias for the rule-generation engine.
pub type Result<T> = std::result::Result<T, PacError>;

/// Errors raised by the rule-generation engine and its configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacError {
    /// Malformed CIDR or prefix length outside 0-32.
    #[error("cannot parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// Template does not contain the marker.
    #[error("marker not found in template: {marker}")]
    MarkerNotFound { marker: String },

    /// Missing or invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PacError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        PacError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
