//! Scrubber error types

use thiserror::Error;

/// Configuration errors
///
/// Runtime operations never fail; only building a scrubber from bad settings
/// does.
#[derive(Error, Debug)]
pub enum ScrubberError {
    /// A setting is out of range
    #[error("Invalid scrubber config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// Config text could not be parsed
    #[error("Failed to parse scrubber config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for scrubber operations
pub type Result<T> = std::result::Result<T, ScrubberError>;
