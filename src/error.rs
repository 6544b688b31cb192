use std::path::PathBuf;

use thiserror::Error;

/// Failures of the privileged write helper.
#[derive(Debug, Error)]
pub enum ElevateError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to pass value to helper: {0}")]
    Stdin(#[source] std::io::Error),
    #[error("helper exited with {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },
    #[error("helper did not finish within {0:?}")]
    Timeout(std::time::Duration),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
    #[error("'{value}' is not a legal value for {key} (expected one of: {expected})")]
    IllegalValue {
        key: String,
        value: String,
        expected: String,
    },
    #[error("{key} is not available at {path:?}")]
    Unavailable { key: String, path: PathBuf },
    #[error("writing {value} to {path:?} failed")]
    WriteFailed { path: PathBuf, value: String },
    #[error("failed to encode status: {0}")]
    Encode(#[from] serde_json::Error),
}
