// Store-specific error types

use thiserror::Error;

use crate::{BoxError, CodecError, ErrorDomain, PlansyncError};

/// Errors surfaced by the record store.
///
/// A rejected write is not an error: insufficient priority is reported as
/// an ordinary outcome. These variants cover input that can never be stored
/// and side effects that failed after the store was updated.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A field would corrupt the line-oriented persisted form.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The record was created in memory but the backup snapshot failed.
    /// The in-memory store is consistent; retrying the snapshot is safe.
    #[error("record {record_id} created but backup failed: {source}")]
    BackupFailed {
        record_id: String,
        #[source]
        source: CodecError,
    },
}

impl StoreError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl PlansyncError for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            StoreError::InvalidField { .. } => "STORE_INVALID_FIELD",
            StoreError::BackupFailed { .. } => "STORE_BACKUP_FAILED",
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Store
    }

    fn is_transient(&self) -> bool {
        match self {
            StoreError::InvalidField { .. } => false,
            StoreError::BackupFailed { source, .. } => source.is_transient(),
        }
    }
}

impl From<StoreError> for BoxError {
    fn from(err: StoreError) -> Self {
        Box::new(err)
    }
}

/// Convenient Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
