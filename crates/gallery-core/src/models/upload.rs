use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request for a delegated write credential (`POST /upload`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Original filename
    pub filename: String,
    /// Content type (MIME type)
    pub content_type: String,
}

/// Delegated write credential returned by `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCredential {
    /// Storage endpoint that accepts the multipart form
    pub upload_url: String,
    /// Form fields to replay verbatim ahead of the file part
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Photo ID the backend reserved for this upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_id: Option<String>,
    /// Storage key the object will be written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// File bytes plus the metadata the storage form needs.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Payloads can be megabytes; print the size instead of the bytes.
impl std::fmt::Debug for FilePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePayload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}
