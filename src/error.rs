use std::path::PathBuf;
use thiserror::Error;

/// Failures scoped to a single file or episode. Callers log these and move on.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{tool} not found. Please install it and ensure it's in your PATH")]
    ToolNotFound { tool: String },

    #[error("failed to execute {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("probe failed for {path:?}: {stderr}")]
    ProbeFailed { path: PathBuf, stderr: String },

    #[error("could not parse probe output for {path:?}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no streams found in {0:?}")]
    NoStreams(PathBuf),

    #[error("no {what} found in {path:?}")]
    NoMatchingStream { path: PathBuf, what: String },

    #[error("remux failed ({}): {command}\n{stderr}", describe_exit(.code))]
    RemuxToolFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("remux produced an empty file at {0:?}")]
    EmptyOutput(PathBuf),

    #[error("{0} streams cannot be addressed by the remux tool")]
    UnsupportedStreamKind(String),

    #[error("{path:?} has no parent directory or file name")]
    InvalidTarget { path: PathBuf },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type MediaResult<T> = std::result::Result<T, MediaError>;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
