use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving or loading state snapshots.
#[derive(Debug, Error)]
pub enum SavedStateError {
    #[error("Failed to encode saved item '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to access saved state file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse saved state file '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize saved state file '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Saved state file '{path}' has unsupported version {version}")]
    UnsupportedVersion { path: PathBuf, version: u32 },

    #[error("Failed to lock saved state file '{path}': {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
