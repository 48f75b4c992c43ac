use std::error::Error;
use std::fmt;

/// The primary error type for the application.
///
/// This enum consolidates all possible errors that can occur within the
/// application, providing a unified way to handle and report failures.
#[derive(Debug)]
pub enum AppError {
    /// For internal errors that carry an arbitrary cause chain.
    Internal(anyhow::Error),
    /// For failures on the HTTP transport to the scan server.
    Http(String),
    /// For a control command the server refused.
    ControlRejected {
        /// The command that was sent.
        command: String,
        /// The HTTP status the server answered with.
        status: u16,
    },
    /// For payloads that could not be decoded.
    Decode(String),
    /// For failures while driving the terminal.
    Terminal(String),
    /// For errors related to I/O operations.
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::Http(msg) => write!(f, "HTTP error: {}", msg),
            AppError::ControlRejected { command, status } => {
                write!(f, "Control '{}' rejected with status {}", command, status)
            }
            AppError::Decode(msg) => write!(f, "Decode error: {}", msg),
            AppError::Terminal(msg) => write!(f, "Terminal error: {}", msg),
            AppError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Http(format!("request timed out: {}", err))
        } else if err.is_connect() {
            AppError::Http(format!("connection failed: {}", err))
        } else {
            AppError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(format!("{}: {}", err.kind(), err))
    }
}

impl From<crate::ui::TuiError> for AppError {
    fn from(err: crate::ui::TuiError) -> Self {
        AppError::Terminal(err.to_string())
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;
