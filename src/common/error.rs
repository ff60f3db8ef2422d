//! Error types for the account harness
//!
//! Errors raised while talking to the backend never abort a suite run; the
//! runner folds them into the failing test's error payload. Errors outside
//! the suite (bad configuration, unreachable socket for `ping`) surface on
//! the command line.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the account harness
#[derive(Error, Debug)]
pub enum Error {
    // === Connection Errors ===
    #[error("Backend not running. Start the application (or mock_backend) and try again")]
    BackendNotRunning,

    #[error("Failed to connect to backend: {0}")]
    BackendConnectionFailed(#[source] io::Error),

    #[error("Backend communication error: {0}")]
    BackendCommunication(String),

    // === Command Errors ===
    #[error("Command '{command}' failed: {}", .error.message)]
    CommandFailed { command: String, error: IpcError },

    #[error("Invalid arguments for '{command}': {reason}")]
    InvalidArguments { command: String, reason: String },

    #[error("Account {0} not found")]
    AccountNotFound(String),

    // === Timeout Errors ===
    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a command failed error from a backend error payload
    pub fn command_failed(command: &str, error: IpcError) -> Self {
        Self::CommandFailed {
            command: command.to_string(),
            error,
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments(command: &str, reason: &str) -> Self {
        Self::InvalidArguments {
            command: command.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Opaque JSON payload recorded on a failing test.
    ///
    /// When the backend answered with a failure its own `{code, message}` is
    /// kept untouched; anything else is classified locally.
    pub fn to_payload(&self) -> serde_json::Value {
        let ipc = match self {
            Error::CommandFailed { error, .. } => error.clone(),
            other => IpcError::from(other),
        };
        serde_json::to_value(&ipc).unwrap_or(serde_json::Value::Null)
    }
}

/// IPC-serializable error for backend responses
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IpcError {
    pub code: String,
    pub message: String,
}

impl IpcError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<&Error> for IpcError {
    fn from(e: &Error) -> Self {
        if let Error::CommandFailed { error, .. } = e {
            return error.clone();
        }

        let code = match e {
            Error::BackendNotRunning => "BACKEND_NOT_RUNNING",
            Error::BackendConnectionFailed(_) | Error::BackendCommunication(_) => {
                "COMMUNICATION_ERROR"
            }
            Error::InvalidArguments { .. } => "INVALID_ARGUMENTS",
            Error::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Error::Timeout(_) => "TIMEOUT",
            Error::Json(_) => "INVALID_RESPONSE",
            _ => "INTERNAL_ERROR",
        }
        .to_string();

        Self {
            code,
            message: e.to_string(),
        }
    }
}
