use std::path::PathBuf;
use thiserror::Error;

use crate::models::ConfigError;

/// Main error type for autofix
#[derive(Error, Debug)]
pub enum AutofixError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No diagnostic output found at {0}")]
    MissingInput(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Errors raised by the remote repair oracle
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),
}

impl OracleError {
    /// Transport, timeout and status failures all mean the service could not be used
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, OracleError::MalformedResponse(_))
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        // Timeouts fall through to Unavailable; only the caller knows the configured duration
        if let Some(status) = err.status() {
            OracleError::HttpError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            OracleError::MalformedResponse(err.to_string())
        } else {
            OracleError::Unavailable(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AutofixError>;
