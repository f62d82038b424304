//! HTTP transport for the photo gallery backend.
//!
//! Provides a minimal client with generic GET/POST/DELETE helpers against the
//! backend API, a multipart POST for direct-to-storage transfers, and the
//! [`PhotoApi`] implementation the gallery client drives.

pub mod api;
pub mod transport;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub use api::PhotoListResponse;
pub use transport::{PhotoApi, TransportError, TransportResult};

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP client for the gallery backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from configuration (base URL and request timeout).
    pub fn from_config(config: &gallery_core::GalleryConfig) -> Result<Self> {
        Self::new(config.api_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> TransportResult<T> {
        let url = self.build_url(path);
        let response = self.client.get(&url).send().await?;

        let response = check_status(response, true).await?;
        Ok(response.json().await?)
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> TransportResult<T> {
        let url = self.build_url(path);
        let response = self.client.post(&url).json(body).send().await?;

        let response = check_status(response, true).await?;
        Ok(response.json().await?)
    }

    /// POST a multipart form to an absolute URL. The response body is ignored.
    ///
    /// Used for storage endpoints, which do not return structured errors.
    pub async fn post_multipart_to(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
    ) -> TransportResult<()> {
        let response = self.client.post(url).multipart(form).send().await?;

        check_status(response, false).await?;
        Ok(())
    }

    /// DELETE request. Returns Ok(()) on success; the body is ignored.
    pub async fn delete(&self, path: &str) -> TransportResult<()> {
        let url = self.build_url(path);
        let response = self.client.delete(&url).send().await?;

        check_status(response, true).await?;
        Ok(())
    }
}

/// Pass through 2xx responses; turn anything else into `TransportError::Status`.
///
/// With `parse_error_body`, the `error` field of a JSON body becomes the message.
async fn check_status(
    response: reqwest::Response,
    parse_error_body: bool,
) -> TransportResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if parse_error_body {
        serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
    } else {
        None
    };

    tracing::debug!(
        status = status.as_u16(),
        body_len = body.len(),
        backend_message = ?message,
        "Request returned non-success status"
    );

    Err(TransportError::Status {
        status: status.as_u16(),
        message,
    })
}
