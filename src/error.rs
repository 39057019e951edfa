// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Malformed link record: {line:?}")]
    MalformedRecord { line: String },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Score store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("{evaluation} is undefined: {reason}")]
    UndefinedMetric {
        evaluation: &'static str,
        reason: String,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown {kind} identifier: {value:?}")]
    UnknownIdentifier { kind: &'static str, value: String },

    #[error("Split policy not supported: {0}")]
    UnsupportedPolicy(String),
}

pub type Result<T> = std::result::Result<T, LinkError>;

impl LinkError {
    /// Wraps an I/O error together with the path it occurred on.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        LinkError::Io {
            source,
            path: path.into(),
        }
    }
}

// Allow `?` on std::io::Error by converting to LinkError::Io with unknown path.
impl From<std::io::Error> for LinkError {
    fn from(source: std::io::Error) -> Self {
        LinkError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(e: serde_json::Error) -> Self {
        LinkError::StoreUnavailable(e.to_string())
    }
}
