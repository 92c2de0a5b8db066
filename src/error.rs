use std::io;
use thiserror::Error;

/// Custom error type for the LPM engine
#[derive(Error, Debug)]
pub enum LpmError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Malformed process data: {0}")]
    Parse(String),

    #[error("System counters unavailable: {0}")]
    SystemCounters(String),
}

/// Result type alias for the LPM engine
pub type Result<T> = std::result::Result<T, LpmError>;

impl LpmError {
    /// Create a permission denied error
    pub fn permission_denied<S: Into<String>>(msg: S) -> Self {
        LpmError::PermissionDenied(msg.into())
    }

    /// Create a parse error for malformed kernel data
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        LpmError::Parse(msg.into())
    }

    pub fn system_counters<S: Into<String>>(msg: S) -> Self {
        LpmError::SystemCounters(msg.into())
    }
}
