//! Structured error types for a report run.
//!
//! Every stage returns `ReportError`; nothing is handled locally. The pipeline
//! boundary logs the message once and hands the error back to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a `ReportError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout, non-2xx status, or undecodable body.
    Transport,
    /// A required field is missing from a provider record.
    Schema,
    /// A field is present but cannot be coerced (bad timestamp, wrong type).
    Format,
    /// An artifact encoder failed.
    Render,
    /// Filesystem failure while writing an artifact or the run log.
    Io,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("HTTP {status} from market data provider: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("request to market data provider failed: {0}")]
    Transport(String),

    #[error("response body is not a market record list: {0}")]
    Decode(String),

    #[error("record {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("record {index} field '{field}': {reason}")]
    InvalidValue {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("failed to render {artifact}: {reason}")]
    Render {
        artifact: &'static str,
        reason: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HttpStatus { .. } | Self::Transport(_) | Self::Decode(_) => ErrorKind::Transport,
            Self::MissingField { .. } => ErrorKind::Schema,
            Self::InvalidValue { .. } => ErrorKind::Format,
            Self::Render { .. } => ErrorKind::Render,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn render(artifact: &'static str, reason: impl ToString) -> Self {
        Self::Render {
            artifact,
            reason: reason.to_string(),
        }
    }
}
