//! Replay error types

use std::path::PathBuf;

use scrubber_core::ScrubberError;
use thiserror::Error;

/// Errors loading or starting a scenario
///
/// A failed assertion is not an error; it is reported in the
/// [`ReplayReport`](crate::ReplayReport).
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML scenario: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown scenario format for {0} (expected .json or .toml)")]
    UnknownFormat(PathBuf),

    #[error("Scenario list has no sections")]
    EmptyList,

    #[error(transparent)]
    Config(#[from] ScrubberError),
}

/// Result type for replay operations
pub type Result<T> = std::result::Result<T, ReplayError>;
