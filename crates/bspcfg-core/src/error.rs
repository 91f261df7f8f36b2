//! Error types for config access and edits

use std::path::PathBuf;
use thiserror::Error;

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while reading or editing config files
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Resolved path escapes the config root
    #[error("Path '{path}' is outside the config root")]
    OutOfScope { path: String },

    /// Path is inside the config root but nothing exists there
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// A required parameter was absent or empty
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// Config root could not be opened
    #[error("Invalid config root {path}: {message}")]
    InvalidRoot { path: PathBuf, message: String },

    /// File I/O error
    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Backup creation failed
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),

    /// Plan document could not be understood
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
}

impl ConfigError {
    /// Get the error code for CLI/API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfScope { .. } => "OUT_OF_SCOPE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::InvalidRoot { .. } => "INVALID_ROOT",
            Self::Io { .. } => "IO_ERROR",
            Self::BackupFailed(_) => "BACKUP_FAILED",
            Self::InvalidPlan(_) => "INVALID_PLAN",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::io(PathBuf::new(), &err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPlan(err.to_string())
    }
}
