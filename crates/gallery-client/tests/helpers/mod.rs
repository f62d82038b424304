//! Shared test helpers: a scripted in-memory backend and record fixtures.
//!
//! `MockPhotoApi` behaves like the real backend (deletes remove records,
//! transfers can materialise a new record) and records every call. List
//! requests can be held open to reproduce overlapping operations.

#![allow(dead_code)]

use async_trait::async_trait;
use gallery_api_client::{PhotoApi, TransportError, TransportResult};
use gallery_client::Gallery;
use gallery_core::models::{FilePayload, PhotoRecord, UploadCredential, UploadRequest};
use gallery_core::GalleryConfig;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// A request the client made against the mock backend
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RequestUpload(UploadRequest),
    Transfer {
        upload_url: String,
        fields: Vec<(String, String)>,
        filename: String,
        content_type: String,
        size_bytes: usize,
    },
    List,
    Delete(String),
}

struct ListGate {
    started: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

/// Handle to a list request that will block until released.
pub struct HeldList {
    started: Option<oneshot::Receiver<()>>,
    release: oneshot::Sender<()>,
}

impl HeldList {
    /// Wait until the held request has been issued (its payload is then fixed).
    pub async fn started(&mut self) {
        if let Some(started) = self.started.take() {
            started.await.expect("held list request was never issued");
        }
    }

    /// Let the held request complete.
    pub fn release(self) {
        let _ = self.release.send(());
    }
}

pub struct MockPhotoApi {
    photos: Mutex<Vec<PhotoRecord>>,
    credential: Mutex<Result<UploadCredential, TransportError>>,
    transfer_failure: Mutex<Option<TransportError>>,
    list_failure: Mutex<Option<TransportError>>,
    delete_failure: Mutex<Option<TransportError>>,
    uploaded_record: Mutex<Option<PhotoRecord>>,
    list_gates: Mutex<VecDeque<ListGate>>,
    calls: Mutex<Vec<Call>>,
}

impl MockPhotoApi {
    pub fn new(photos: Vec<PhotoRecord>) -> Self {
        Self {
            photos: Mutex::new(photos),
            credential: Mutex::new(Ok(default_credential())),
            transfer_failure: Mutex::new(None),
            list_failure: Mutex::new(None),
            delete_failure: Mutex::new(None),
            uploaded_record: Mutex::new(None),
            list_gates: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replace the backend's photo list.
    pub fn set_photos(&self, photos: Vec<PhotoRecord>) {
        *self.photos.lock().unwrap() = photos;
    }

    pub fn set_credential_response(&self, response: Result<UploadCredential, TransportError>) {
        *self.credential.lock().unwrap() = response;
    }

    pub fn fail_transfer(&self, err: TransportError) {
        *self.transfer_failure.lock().unwrap() = Some(err);
    }

    pub fn fail_list(&self, err: Option<TransportError>) {
        *self.list_failure.lock().unwrap() = err;
    }

    pub fn fail_delete(&self, err: Option<TransportError>) {
        *self.delete_failure.lock().unwrap() = err;
    }

    /// Record the backend lists once a transfer succeeds.
    pub fn on_transfer_add(&self, record: PhotoRecord) {
        *self.uploaded_record.lock().unwrap() = Some(record);
    }

    /// Hold the next list request open until the returned handle is released.
    pub fn hold_next_list(&self) -> HeldList {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(ListGate {
            started: started_tx,
            release: release_rx,
        });
        HeldList {
            started: Some(started_rx),
            release: release_tx,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::List))
            .count()
    }

    pub fn transfer_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Transfer { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PhotoApi for MockPhotoApi {
    async fn request_upload(&self, request: &UploadRequest) -> TransportResult<UploadCredential> {
        self.record(Call::RequestUpload(request.clone()));
        self.credential.lock().unwrap().clone()
    }

    async fn transfer(
        &self,
        credential: &UploadCredential,
        file: FilePayload,
    ) -> TransportResult<()> {
        self.record(Call::Transfer {
            upload_url: credential.upload_url.clone(),
            fields: credential
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            filename: file.filename.clone(),
            content_type: file.content_type.clone(),
            size_bytes: file.len(),
        });

        if let Some(err) = self.transfer_failure.lock().unwrap().clone() {
            return Err(err);
        }

        if let Some(record) = self.uploaded_record.lock().unwrap().take() {
            // Backend lists newest first.
            self.photos.lock().unwrap().insert(0, record);
        }
        Ok(())
    }

    async fn list_photos(&self) -> TransportResult<Vec<PhotoRecord>> {
        self.record(Call::List);

        // Payload is fixed when the request is issued, like a real round trip.
        let snapshot = self.photos.lock().unwrap().clone();
        let failure = self.list_failure.lock().unwrap().clone();
        let gate = self.list_gates.lock().unwrap().pop_front();

        if let Some(gate) = gate {
            let _ = gate.started.send(());
            let _ = gate.release.await;
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(snapshot),
        }
    }

    async fn delete_photo(&self, photo_id: &str) -> TransportResult<()> {
        self.record(Call::Delete(photo_id.to_string()));

        if let Some(err) = self.delete_failure.lock().unwrap().clone() {
            return Err(err);
        }

        self.photos
            .lock()
            .unwrap()
            .retain(|p| p.photo_id != photo_id);
        Ok(())
    }
}

pub fn default_credential() -> UploadCredential {
    UploadCredential {
        upload_url: "https://photo-gallery-photos.s3.amazonaws.com/".to_string(),
        fields: [
            ("Content-Type".to_string(), "image/png".to_string()),
            ("key".to_string(), "photos/new-1/cat.png".to_string()),
            ("policy".to_string(), "eyJleHBpcmF0aW9uIjoi".to_string()),
        ]
        .into_iter()
        .collect(),
        photo_id: Some("new-1".to_string()),
        key: Some("photos/new-1/cat.png".to_string()),
    }
}

pub fn photo(id: &str, tags: &[&str], upload_date: &str) -> PhotoRecord {
    PhotoRecord {
        photo_id: id.to_string(),
        filename: format!("{}.jpg", id),
        upload_date: upload_date.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        thumbnail_url: format!("https://thumbs.example.com/thumbnails/{}", id),
        photo_url: format!("https://photos.example.com/photos/{}", id),
        dimensions: None,
        thumbnail_dimensions: None,
        file_size: None,
    }
}

/// The two-record catalog used across scenarios.
pub fn sample_photos() -> Vec<PhotoRecord> {
    vec![
        photo("1", &["cat", "beach"], "2024-01-05T09:30:00Z"),
        photo("2", &["dog"], "2024-02-10T17:45:00Z"),
    ]
}

pub fn server_error(message: &str) -> TransportError {
    TransportError::Status {
        status: 500,
        message: Some(message.to_string()),
    }
}

/// A gallery session over a mock backend with default configuration.
pub fn setup_gallery(photos: Vec<PhotoRecord>) -> (Arc<MockPhotoApi>, Gallery) {
    let api = Arc::new(MockPhotoApi::new(photos));
    let gallery = Gallery::new(api.clone(), &GalleryConfig::default());
    (api, gallery)
}

pub fn ids(records: &[PhotoRecord]) -> Vec<&str> {
    records.iter().map(|r| r.photo_id.as_str()).collect()
}
