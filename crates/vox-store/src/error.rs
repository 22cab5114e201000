//! Error types for the feedback store
//!
//! Three failure classes cross the store boundary:
//! - invalid caller input, rejected before any I/O
//! - I/O failures during the temp-write / rename commit sequence
//! - container (de)serialization failures
//!
//! A corrupted backing file is deliberately *not* an error: the store
//! self-heals by quarantining the file and starting from an empty
//! container, logging a warning. Refusing to start would take the whole
//! dashboard down over one bad file.

use std::path::PathBuf;

/// Errors surfaced by [`FeedbackStore`](crate::FeedbackStore) operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Caller-supplied feedback rejected before any I/O
    #[error("invalid feedback: {0}")]
    Validation(String),

    /// I/O failure during a read or a temp-write/rename commit; prior
    /// on-disk state is left intact
    #[error("persistence failure at '{path}': {source}")]
    Persistence {
        /// Path the failing operation touched
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Container could not be serialized for commit
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Build a persistence error for `path`
    #[inline]
    #[must_use]
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Check whether this error is a pre-I/O validation rejection
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
