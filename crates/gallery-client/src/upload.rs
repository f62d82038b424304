//! Two-phase upload orchestration
//!
//! 1. Ask the backend for a delegated write credential (`POST /upload`).
//! 2. Send the returned form fields plus the file straight to storage.
//!
//! A phase-1 failure aborts before any storage request is made. A phase-2
//! failure is reported generically, since storage endpoints do not return
//! error bodies worth parsing. Neither phase is retried.
//!
//! Transfer success only means the bytes reached storage; the thumbnail and
//! metadata are produced asynchronously by the backend. The catalog reload is
//! therefore scheduled after a fixed settle delay, which is a heuristic: the
//! new record may still be missing or incomplete when it runs.

use crate::catalog::CatalogStore;
use crate::events::{EventBus, GalleryEvent};
use gallery_api_client::{PhotoApi, TransportError};
use gallery_core::error::{
    log_error, ErrorMetadata, LoadError, UploadError, GENERIC_CREDENTIAL_FAILURE,
    GENERIC_TRANSFER_FAILURE, TIMEOUT_MESSAGE,
};
use gallery_core::models::{Catalog, FilePayload, UploadRequest};
use gallery_core::GalleryConfig;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Upload status as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UploadStatus {
    Idle,
    RequestingCredential,
    Transferring,
    Succeeded,
    Failed { message: String },
}

/// Pre-check limits and timing for uploads.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub settle_delay: Duration,
}

impl UploadPolicy {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            max_bytes: config.max_upload_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
            settle_delay: config.settle_delay(),
        }
    }

    /// Settle delay in whole milliseconds, saturating at `u64::MAX`.
    pub fn settle_delay_ms(&self) -> u64 {
        u64::try_from(self.settle_delay.as_millis()).unwrap_or(u64::MAX)
    }

    fn check(&self, file: &FilePayload) -> Result<(), UploadError> {
        if file.filename.trim().is_empty() {
            return Err(UploadError::Rejected("Filename is required.".to_string()));
        }

        let content_type = file.content_type.trim().to_lowercase();
        if !self.allowed_content_types.iter().any(|t| *t == content_type) {
            return Err(UploadError::Rejected(format!(
                "Invalid file type '{}'. Allowed types: {}",
                file.content_type,
                self.allowed_content_types.join(", ")
            )));
        }

        if file.is_empty() {
            return Err(UploadError::Rejected("File is empty.".to_string()));
        }

        if file.len() > self.max_bytes {
            return Err(UploadError::Rejected(format!(
                "File is {} bytes; the maximum is {} bytes.",
                file.len(),
                self.max_bytes
            )));
        }

        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default())
    }
}

/// Catalog reload scheduled to run after the settle delay.
#[derive(Debug)]
pub struct ScheduledReload {
    handle: JoinHandle<Result<Catalog, LoadError>>,
}

impl ScheduledReload {
    /// Wait for the delayed reload to finish.
    pub async fn join(self) -> Result<Catalog, LoadError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(LoadError::Failed(format!("Reload task did not complete: {}", e))),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the reload if it has not run yet.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Result of a successful upload.
#[derive(Debug)]
pub struct UploadReceipt {
    /// Photo ID the backend reserved, when the credential response carried one
    pub photo_id: Option<String>,
    /// Storage key, when the credential response carried one
    pub key: Option<String>,
    pub settle_reload: ScheduledReload,
}

pub struct UploadOrchestrator {
    api: Arc<dyn PhotoApi>,
    catalog: Arc<CatalogStore>,
    events: EventBus,
    policy: UploadPolicy,
    status: watch::Sender<UploadStatus>,
}

impl UploadOrchestrator {
    pub fn new(
        api: Arc<dyn PhotoApi>,
        catalog: Arc<CatalogStore>,
        events: EventBus,
        policy: UploadPolicy,
    ) -> Self {
        let (status, _) = watch::channel(UploadStatus::Idle);
        Self {
            api,
            catalog,
            events,
            policy,
            status,
        }
    }

    /// Current upload status.
    pub fn status(&self) -> UploadStatus {
        self.status.borrow().clone()
    }

    /// Watch status transitions without going through the event bus.
    pub fn watch_status(&self) -> watch::Receiver<UploadStatus> {
        self.status.subscribe()
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Upload one file using the two-phase protocol.
    ///
    /// On success the catalog reload is already scheduled; the receipt's
    /// `settle_reload` can be awaited to observe it. On failure the catalog is
    /// untouched.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadReceipt, UploadError> {
        let file = FilePayload::new(bytes, filename, content_type);
        let start = Instant::now();

        let result = self.run(file).await;
        match &result {
            Ok(receipt) => {
                self.set_status(UploadStatus::Succeeded);
                tracing::info!(
                    filename = %filename,
                    photo_id = ?receipt.photo_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    settle_delay_ms = self.policy.settle_delay_ms(),
                    "Upload succeeded, catalog reload scheduled"
                );
            }
            Err(err) => {
                self.set_status(UploadStatus::Failed {
                    message: err.user_message(),
                });
                log_error(err, "upload");
            }
        }

        result
    }

    async fn run(&self, file: FilePayload) -> Result<UploadReceipt, UploadError> {
        self.policy.check(&file)?;

        self.set_status(UploadStatus::RequestingCredential);
        let request = UploadRequest {
            filename: file.filename.clone(),
            content_type: file.content_type.clone(),
        };
        let credential = self
            .api
            .request_upload(&request)
            .await
            .map_err(credential_error)?;

        tracing::debug!(
            filename = %file.filename,
            photo_id = ?credential.photo_id,
            field_count = credential.fields.len(),
            "Upload credential issued"
        );

        self.set_status(UploadStatus::Transferring);
        self.api
            .transfer(&credential, file)
            .await
            .map_err(transfer_error)?;

        Ok(UploadReceipt {
            photo_id: credential.photo_id,
            key: credential.key,
            settle_reload: self.schedule_reload(),
        })
    }

    fn schedule_reload(&self) -> ScheduledReload {
        let catalog = Arc::clone(&self.catalog);
        let delay = self.policy.settle_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            catalog.reload().await
        });

        ScheduledReload { handle }
    }

    fn set_status(&self, status: UploadStatus) {
        self.status.send_replace(status.clone());
        self.events.emit(GalleryEvent::UploadStatusChanged(status));
    }
}

fn credential_error(err: TransportError) -> UploadError {
    let message = match err {
        TransportError::Timeout => TIMEOUT_MESSAGE.to_string(),
        TransportError::Status {
            message: Some(message),
            ..
        } => message,
        other => {
            tracing::debug!(error = %other, "Credential request failed");
            GENERIC_CREDENTIAL_FAILURE.to_string()
        }
    };
    UploadError::CredentialRequest(message)
}

fn transfer_error(err: TransportError) -> UploadError {
    tracing::debug!(error = %err, "Storage transfer failed");
    UploadError::Transfer(GENERIC_TRANSFER_FAILURE.to_string())
}
