// plansync Error Handling Framework
// Central location for error types, traits, and handling utilities

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

// Re-export for crates that derive their own errors
pub use thiserror;

mod codec;
mod config;
mod store;

pub use codec::{CodecError, CodecResult};
pub use config::{ConfigError, ConfigResult};
pub use store::{StoreError, StoreResult};

/// Error domains representing different components of the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorDomain {
    Directory,
    Store,
    Codec,
    Config,
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDomain::Directory => write!(f, "directory"),
            ErrorDomain::Store => write!(f, "store"),
            ErrorDomain::Codec => write!(f, "codec"),
            ErrorDomain::Config => write!(f, "config"),
        }
    }
}

/// Base trait for all errors in the plansync system.
pub trait PlansyncError: StdError + Send + Sync + Any + 'static {
    /// Returns a unique static string code for this error type.
    fn error_code(&self) -> &'static str;

    /// The component that raised the error.
    fn domain(&self) -> ErrorDomain;

    /// Indicates if the error is temporary and retrying might succeed.
    ///
    /// Callers use this to choose between retrying a persistence operation,
    /// aborting, or carrying on with a partial store.
    fn is_transient(&self) -> bool {
        false
    }
}

/// Shorthand for a boxed PlansyncError
pub type BoxError = Box<dyn PlansyncError>;

/// Top-level error for operations that cross component boundaries.
#[derive(Debug, Error)]
pub enum Error {
    #[error("authentication failed for {0}")]
    AuthenticationFailed(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PlansyncError for Error {
    fn error_code(&self) -> &'static str {
        match self {
            Error::AuthenticationFailed(_) => "RUNTIME_AUTHENTICATION_FAILED",
            Error::Store(e) => e.error_code(),
            Error::Codec(e) => e.error_code(),
            Error::Config(e) => e.error_code(),
        }
    }

    fn domain(&self) -> ErrorDomain {
        match self {
            Error::AuthenticationFailed(_) => ErrorDomain::Directory,
            Error::Store(e) => e.domain(),
            Error::Codec(e) => e.domain(),
            Error::Config(e) => e.domain(),
        }
    }

    fn is_transient(&self) -> bool {
        match self {
            Error::AuthenticationFailed(_) => false,
            Error::Store(e) => e.is_transient(),
            Error::Codec(e) => e.is_transient(),
            Error::Config(e) => e.is_transient(),
        }
    }
}

/// Standard Result type for the workspace
pub type Result<T> = std::result::Result<T, Error>;
