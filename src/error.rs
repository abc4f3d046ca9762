//! Error types for focal
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, unknown user/task, no session)
//! - 3: Contention (per-user lock could not be acquired in time)
//! - 4: Operation failed (storage or serialization error)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the focal CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const CONTENTION: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for focal operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("No user is logged in on this device")]
    NoSession,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Contention (exit code 3)
    #[error("Lock acquisition timed out: {0}")]
    LockTimeout(PathBuf),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::UserNotFound(_)
            | Error::TaskNotFound(_)
            | Error::NoSession
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::LockTimeout(_) => exit_codes::CONTENTION,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for focal operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
        }
    }
}
