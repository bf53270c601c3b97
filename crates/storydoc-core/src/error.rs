//! Error types for the StoryDoc workflow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the StoryDoc crates.
///
/// Upload and generation failures are recovered locally and are reported
/// through [`GatewayError`] and [`GenerationError`] instead.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum StorydocError {
    /// Configuration error (e.g. missing service base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Input rejected before reaching a gateway (e.g. disallowed file type)
    #[error("Validation error: {0}")]
    Validation(String),
}

impl StorydocError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for StorydocError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

/// Failure of a single gateway call.
///
/// The two sub-kinds the workflow distinguishes are transport-level
/// (`Unreachable`) and service-level (`Status`). `Malformed` covers a
/// response that arrived but could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayError {
    /// Connectivity failure, timeout or any other transport error
    #[error("could not reach service: {message}")]
    Unreachable { message: String },

    /// The service answered with a non-success status code
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response could not be read or decoded
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl GatewayError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

/// User-facing failure of a generate request.
///
/// Each variant renders a different message so the presentation layer can
/// tell "could not reach the service" apart from a processing problem.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationError {
    #[error("Issue in generating the document. Could not connect to the API: {message}")]
    Unreachable { message: String },

    #[error("Issue in generating the document. API returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("An unexpected error occurred during generation: {message}")]
    Unexpected { message: String },
}

impl From<GatewayError> for GenerationError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unreachable { message } => Self::Unreachable { message },
            GatewayError::Status { status, body } => Self::Rejected { status, body },
            GatewayError::Malformed(message) => Self::Unexpected { message },
        }
    }
}

/// A type alias for `Result<T, StorydocError>`.
pub type Result<T> = std::result::Result<T, StorydocError>;
