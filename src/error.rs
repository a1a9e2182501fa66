//! Error types for tick
//!
//! Exit codes:
//! - 2: User error (bad args, bad or malformed config, no data directory)
//! - 3: Operation failed (I/O, serialization, lock contention, unreadable list)
//!
//! Domain no-ops (empty task text, unknown ids, out-of-range positions) are
//! not errors; they are reported as "unchanged" by the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tick CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 3;
}

/// Main error type for tick operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No data directory available; pass --data-dir or set storage.dir")]
    DataDirUnavailable,

    #[error("Malformed config file: {0}")]
    TomlParse(#[from] toml::de::Error),

    // Operation failures (exit code 3)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    /// The slot existed but could not be read, so writing would clobber it
    #[error("Task list '{0}' could not be read at startup; not overwriting it")]
    SlotUnreadable(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::DataDirUnavailable
            | Error::TomlParse(_) => exit_codes::USER_ERROR,

            Error::Io(_)
            | Error::Json(_)
            | Error::LockFailed(_)
            | Error::SlotUnreadable(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable machine-readable name, used as `error.kind` in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidConfig(_) | Error::TomlParse(_) => "invalid_config",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::DataDirUnavailable => "no_data_dir",
            Error::Io(_) => "io",
            Error::Json(_) => "serialization",
            Error::LockFailed(_) => "lock_timeout",
            Error::SlotUnreadable(_) => "slot_unreadable",
            Error::OperationFailed(_) => "operation_failed",
        }
    }

    /// Structured context for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::LockFailed(path) => Some(serde_json::json!({ "path": path })),
            Error::SlotUnreadable(slot) => Some(serde_json::json!({ "slot": slot })),
            _ => None,
        }
    }
}

/// Result type alias for tick operations
pub type Result<T> = std::result::Result<T, Error>;
