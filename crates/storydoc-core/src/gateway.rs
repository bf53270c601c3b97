//! Gateway interfaces to the remote generation service.
//!
//! The controller depends only on these traits; the HTTP implementations
//! live in `storydoc-interaction`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::file::{FileRef, UploadChannel};

/// Accepts a named binary blob on one of the upload channels.
///
/// Implementations must tolerate any number of calls per session, including
/// repeated uploads of identical content.
#[async_trait]
pub trait UploadGateway: Send + Sync {
    /// Uploads `file` to `channel`.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the service acknowledged the file with a success status
    /// - `Err(GatewayError)`: transport failure or non-success status
    async fn upload(&self, channel: UploadChannel, file: &FileRef) -> Result<(), GatewayError>;
}

/// Raw answer of the generate endpoint.
///
/// The gateway does not judge the status; the controller does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub status: u16,
    pub body: String,
    /// Value of the `content-disposition` header, if sent.
    pub content_disposition: Option<String>,
}

impl GenerationResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_disposition: None,
        }
    }

    pub fn with_disposition(mut self, value: impl Into<String>) -> Self {
        self.content_disposition = Some(value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Requests generation of the derived document.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Sends a generate request carrying `user_name`.
    ///
    /// Returns `Err` only when no response could be obtained or read; a
    /// non-success status is still `Ok`.
    async fn generate(&self, user_name: &str) -> Result<GenerationResponse, GatewayError>;
}
