//! Error taxonomy for hook operations.

use std::path::PathBuf;

/// Errors produced by hook operations.
///
/// None of these reach the host: `Hook::execute` folds them into a
/// `HookOutcome::Failed` after logging.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {secs} seconds")]
    Timeout { program: String, secs: u64 },

    #[error("invalid event context: {0}")]
    InvalidContext(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid file pattern: {0}")]
    Pattern(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for hook operations.
pub type Result<T> = std::result::Result<T, HookError>;
