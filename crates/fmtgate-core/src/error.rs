//! Error types for fmtgate.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single pipeline step failed.
///
/// These never abort the runner; they are recorded against the step and
/// folded into the final [`Outcome`](crate::Outcome).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckFailure {
    #[error("formatter exited with code {exit_code}")]
    Formatter { exit_code: i32 },

    #[error(
        "formatter changed files with uncommitted edits; review and stage the reformatted files"
    )]
    FormatDrift,

    #[error("could not snapshot working tree changes: {detail}")]
    Snapshot { detail: String },

    #[error("build failed with exit code {exit_code}")]
    Build { exit_code: i32 },

    #[error("documentation build failed with exit code {exit_code}")]
    Doc { exit_code: i32 },

    #[error("tests failed with exit code {exit_code}")]
    Test { exit_code: i32 },
}

#[derive(Error, Debug)]
pub enum FmtgateError {
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid step: {0}")]
    InvalidStep(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fmtgate configuration and reporting operations
pub type Result<T> = std::result::Result<T, FmtgateError>;
