//! Transport abstraction
//!
//! [`PhotoApi`] is the seam between the client state machine and the network.
//! It exposes raw request/response primitives and carries no business logic:
//! mapping failures onto upload, load and delete errors is the caller's job.

use async_trait::async_trait;
use gallery_core::models::{FilePayload, PhotoRecord, UploadCredential, UploadRequest};
use thiserror::Error;

/// Transport-level failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Non-2xx response. `message` is the backend's `error` field when the body had one.
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// Backend-provided error message, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Backend API and storage endpoint as seen by the client.
#[async_trait]
pub trait PhotoApi: Send + Sync {
    /// `POST /upload`: obtain a delegated write credential.
    async fn request_upload(&self, request: &UploadRequest) -> TransportResult<UploadCredential>;

    /// Submit `fields` followed by the file to the credential's `upload_url`.
    ///
    /// Storage endpoints return no structured error body, so failures never
    /// carry a backend message.
    async fn transfer(
        &self,
        credential: &UploadCredential,
        file: FilePayload,
    ) -> TransportResult<()>;

    /// `GET /photos`: the full photo list, in backend order.
    async fn list_photos(&self) -> TransportResult<Vec<PhotoRecord>>;

    /// `DELETE /photos/{photo_id}`
    async fn delete_photo(&self, photo_id: &str) -> TransportResult<()>;
}
