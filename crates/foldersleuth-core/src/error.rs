/// Error types shared across the core crate.
///
/// Only problems with the entry point (or an explicit stop request) are
/// fatal. Per-entry I/O failures below the root never surface here; they are
/// counted in the report instead.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal traversal failures. No partial report accompanies any of these.
#[derive(Debug, Error)]
pub enum TraversalError {
    #[error("invalid root {}: {reason}", path.display())]
    InvalidRoot {
        path: PathBuf,
        reason: &'static str,
        #[source]
        source: Option<io::Error>,
    },

    #[error("traversal cancelled")]
    Cancelled,

    #[error("traversal deadline exceeded")]
    DeadlineExceeded,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("scanner thread panicked")]
    WorkerPanicked,
}

impl TraversalError {
    pub(crate) fn invalid_root(path: &Path, reason: &'static str, source: Option<io::Error>) -> Self {
        Self::InvalidRoot {
            path: path.to_path_buf(),
            reason,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TraversalError>;

/// Failure to pull text out of a single document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document type: {}", path.display())]
    Unsupported { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure reported by a [`Summarizer`](crate::summary::Summarizer) backend.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("document contains no text")]
    EmptyText,

    #[error("summariser backend failed: {0}")]
    Backend(String),
}

/// Failure while writing a report through an export sink.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_root_message_names_path_and_reason() {
        let err = TraversalError::invalid_root(Path::new("/nope"), "does not exist", None);
        assert_eq!(err.to_string(), "invalid root /nope: does not exist");
    }

    #[test]
    fn invalid_root_keeps_io_source() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = TraversalError::invalid_root(Path::new("/root"), "cannot be read", Some(io_err));
        let source = std::error::Error::source(&err).expect("source must be kept");
        assert_eq!(source.to_string(), "denied");
    }
}
