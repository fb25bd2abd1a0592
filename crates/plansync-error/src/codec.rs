// Codec-specific error types
// Raised by the line-oriented persistence format and its file helpers

use std::io;
use thiserror::Error;

use crate::{BoxError, ErrorDomain, PlansyncError};

/// Errors produced while encoding or decoding the persisted store.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The sink or source could not be opened, read, or written.
    #[error("failed to {operation} {target}: {source}")]
    Io {
        operation: &'static str,
        target: String,
        #[source]
        source: io::Error,
    },

    /// A persisted line could not be parsed. The decoder skips such lines,
    /// so this value is only ever logged or counted.
    #[error("malformed line {line_number}: {reason}")]
    MalformedLine { line_number: usize, reason: String },
}

impl CodecError {
    /// Wrap an I/O failure with the operation and target it happened on.
    pub fn io(operation: &'static str, target: impl Into<String>, source: io::Error) -> Self {
        CodecError::Io {
            operation,
            target: target.into(),
            source,
        }
    }

    pub fn malformed(line_number: usize, reason: impl Into<String>) -> Self {
        CodecError::MalformedLine {
            line_number,
            reason: reason.into(),
        }
    }

    /// True when the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CodecError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl PlansyncError for CodecError {
    fn error_code(&self) -> &'static str {
        match self {
            CodecError::Io { .. } => "CODEC_IO_FAILURE",
            CodecError::MalformedLine { .. } => "CODEC_MALFORMED_LINE",
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Codec
    }

    fn is_transient(&self) -> bool {
        matches!(self, CodecError::Io { .. })
    }
}

impl From<CodecError> for BoxError {
    fn from(err: CodecError) -> Self {
        Box::new(err)
    }
}

/// Convenient Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
