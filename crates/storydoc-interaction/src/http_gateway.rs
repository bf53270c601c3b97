//! HttpGateway - REST implementation of the upload and generation gateways.
//!
//! Uploads are multipart POSTs with the file under a fixed field name. The
//! generate call is a GET carrying `{"user_name": ...}` as its JSON body.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, header::CONTENT_DISPOSITION};
use serde::Serialize;
use std::time::Duration;
use storydoc_core::{
    FileRef, GatewayError, GenerationGateway, GenerationResponse, ServiceEndpoints, StorydocError,
    UploadChannel, UploadGateway,
};

/// Multipart field name the upload endpoints read the file from.
pub const UPLOAD_FIELD_NAME: &str = "file";

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Gateway implementation that talks to the generation service over HTTP.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    endpoints: ServiceEndpoints,
}

impl HttpGateway {
    /// Creates a gateway with the transport's default timeout behaviour.
    pub fn new(endpoints: ServiceEndpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
        }
    }

    /// Creates a gateway whose requests fail after `timeout`.
    pub fn with_timeout(
        endpoints: ServiceEndpoints,
        timeout: Option<Duration>,
    ) -> storydoc_core::Result<Self> {
        let Some(timeout) = timeout else {
            return Ok(Self::new(endpoints));
        };
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| StorydocError::config(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    async fn send_upload(&self, url: &str, file: &FileRef) -> Result<Response, GatewayError> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.content_type())
            .map_err(|err| {
                GatewayError::Malformed(format!(
                    "invalid content type '{}' for {}: {err}",
                    file.content_type(),
                    file.name()
                ))
            })?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        self.client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)
    }
}

#[async_trait]
impl UploadGateway for HttpGateway {
    async fn upload(&self, channel: UploadChannel, file: &FileRef) -> Result<(), GatewayError> {
        let url = self.endpoints.upload(channel);
        tracing::debug!(%url, file = file.name(), bytes = file.len(), "uploading file");

        let response = self.send_upload(&url, file).await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(GatewayError::status(status.as_u16(), truncate(&body)));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    user_name: &'a str,
}

#[async_trait]
impl GenerationGateway for HttpGateway {
    async fn generate(&self, user_name: &str) -> Result<GenerationResponse, GatewayError> {
        let url = self.endpoints.generate();
        tracing::debug!(%url, "requesting generation");

        let response = self
            .client
            .get(&url)
            .json(&GenerateRequest { user_name })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        // Non-visible-ASCII values are dropped and the filename falls back.
        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(map_body_error)?;

        Ok(GenerationResponse {
            status: status.as_u16(),
            body: if status.is_success() { body } else { truncate(&body) },
            content_disposition,
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::unreachable(format!("request timed out: {err}"))
    } else if err.is_connect() {
        GatewayError::unreachable(format!("connection failed: {err}"))
    } else if err.is_builder() {
        GatewayError::unreachable(format!("invalid request: {err}"))
    } else {
        GatewayError::unreachable(err.to_string())
    }
}

// No content-encoding features are enabled and `text()` decodes lossily, so a
// failed read is a connection dropped mid-body, even when reqwest reports it
// as a decode error.
fn map_body_error(err: reqwest::Error) -> GatewayError {
    GatewayError::unreachable(format!("connection lost while reading response: {err}"))
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
