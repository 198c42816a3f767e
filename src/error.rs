use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, warn};

/// Coarse classification of a [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Engine or filesystem failure, fatal to the operation
    Io,
    /// Point lookup miss, caller substitutes a default or no-ops
    NotFound,
    /// A multi-op transaction failed and was rolled back
    TransactionAborted,
    /// Record rejected before it reached the engine
    Invalid,
}

/// Errors surfaced by the datastore
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{domain} store I/O failed: {source}")]
    StoreIo {
        domain: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to prepare data directory '{}': {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{domain} record not found: {key}")]
    NotFound { domain: &'static str, key: String },

    #[error("{domain} transaction aborted: {source}")]
    TransactionAborted {
        domain: &'static str,
        #[source]
        source: Box<StoreError>,
    },

    #[error("Invalid {domain} record: {reason}")]
    InvalidRecord { domain: &'static str, reason: String },
}

impl StoreError {
    pub(crate) fn io(domain: &'static str, source: rusqlite::Error) -> Self {
        Self::StoreIo { domain, source }
    }

    pub(crate) fn not_found(domain: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            domain,
            key: key.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StoreIo { .. } | Self::DataDir { .. } => ErrorKind::Io,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::TransactionAborted { .. } => ErrorKind::TransactionAborted,
            Self::InvalidRecord { .. } => ErrorKind::Invalid,
        }
    }

    /// True for a lookup miss, including one that aborted a transaction.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::TransactionAborted { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is best-effort and the caller should carry on.
///
/// # Examples
///
/// ```ignore
/// use hotclip::error::ResultExt;
///
/// // Eviction of one stale record must not fail the insert that triggered it
/// store.delete(&key).warn_on_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = %error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = %error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_seen_through_aborted_transaction() {
        let err = StoreError::TransactionAborted {
            domain: "apps",
            source: Box::new(StoreError::not_found("apps", "firefox")),
        };
        assert_eq!(err.kind(), ErrorKind::TransactionAborted);
        assert!(err.is_not_found());
    }

    #[test]
    fn io_errors_classify_as_io() {
        let err = StoreError::io("shell", rusqlite::Error::InvalidQuery);
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("shell store I/O failed"));
    }

    #[test]
    fn result_ext_converts_errors_to_none() {
        let ok: std::result::Result<u32, String> = Ok(3);
        assert_eq!(ok.log_err(), Some(3));

        let err: std::result::Result<u32, String> = Err("boom".to_string());
        assert_eq!(err.warn_on_err(), None);
    }
}
