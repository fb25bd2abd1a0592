// Configuration error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::{BoxError, ErrorDomain, PlansyncError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl PlansyncError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "CONFIG_READ_FAILED",
            ConfigError::Parse(_) => "CONFIG_PARSE_FAILED",
            ConfigError::Invalid(_) => "CONFIG_INVALID",
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Config
    }

    fn is_transient(&self) -> bool {
        matches!(self, ConfigError::Read { .. })
    }
}

impl From<ConfigError> for BoxError {
    fn from(err: ConfigError) -> Self {
        Box::new(err)
    }
}

/// Convenient Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
