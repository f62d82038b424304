//! Error types module
//!
//! Domain errors for the three catalog-affecting operations: uploading,
//! reloading and deleting. Every error is terminal for the operation that
//! raised it; nothing in the client retries automatically.
//!
//! Errors self-describe how they should be presented through [`ErrorMetadata`].

/// Generic message when the credential endpoint gave no usable error body.
pub const GENERIC_CREDENTIAL_FAILURE: &str = "Failed to get upload URL. Please try again.";
/// Storage endpoints return no structured error bodies; this is all the user sees.
pub const GENERIC_TRANSFER_FAILURE: &str = "Failed to upload photo to storage. Please try again.";
pub const GENERIC_LOAD_FAILURE: &str = "Failed to load photos. Please try again.";
pub const GENERIC_DELETE_FAILURE: &str = "Failed to delete photo. Please try again.";
pub const TIMEOUT_MESSAGE: &str = "The request timed out.";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like rejected input
    Debug,
    /// Warning level - for failures the user can retry
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "CREDENTIAL_REQUEST_FAILED")
    fn error_code(&self) -> &'static str;

    /// Message suitable for display in the gallery
    fn user_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Failure of a two-phase upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// The file failed a pre-check before any request was made.
    #[error("Upload rejected: {0}")]
    Rejected(String),

    /// Phase 1: the backend refused or failed to issue a write credential.
    #[error("Credential request failed: {0}")]
    CredentialRequest(String),

    /// Phase 2: the storage endpoint did not accept the transfer.
    #[error("Transfer failed: {0}")]
    Transfer(String),
}

/// Failure of a catalog reload. The catalog is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to load photos: {0}")]
    Failed(String),

    #[error("Timed out loading photos")]
    Timeout,
}

/// Failure of a deletion. The record stays in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeleteError {
    #[error("Failed to delete photo {photo_id}: {message}")]
    Failed { photo_id: String, message: String },

    #[error("No photo is selected")]
    NothingSelected,
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::Rejected(_) => "UPLOAD_REJECTED",
            UploadError::CredentialRequest(_) => "CREDENTIAL_REQUEST_FAILED",
            UploadError::Transfer(_) => "TRANSFER_FAILED",
        }
    }

    fn user_message(&self) -> String {
        match self {
            UploadError::Rejected(msg)
            | UploadError::CredentialRequest(msg)
            | UploadError::Transfer(msg) => msg.clone(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Rejected(_) => LogLevel::Debug,
            UploadError::CredentialRequest(_) => LogLevel::Warn,
            UploadError::Transfer(_) => LogLevel::Error,
        }
    }
}

impl ErrorMetadata for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            LoadError::Failed(_) => "LOAD_FAILED",
            LoadError::Timeout => "LOAD_TIMEOUT",
        }
    }

    fn user_message(&self) -> String {
        match self {
            LoadError::Failed(msg) => msg.clone(),
            LoadError::Timeout => TIMEOUT_MESSAGE.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            LoadError::Failed(_) => LogLevel::Error,
            LoadError::Timeout => LogLevel::Warn,
        }
    }
}

impl ErrorMetadata for DeleteError {
    fn error_code(&self) -> &'static str {
        match self {
            DeleteError::Failed { .. } => "DELETE_FAILED",
            DeleteError::NothingSelected => "NOTHING_SELECTED",
        }
    }

    fn user_message(&self) -> String {
        match self {
            DeleteError::Failed { message, .. } => message.clone(),
            DeleteError::NothingSelected => "Select a photo first.".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            DeleteError::Failed { .. } => LogLevel::Warn,
            DeleteError::NothingSelected => LogLevel::Debug,
        }
    }
}

/// Log an error at the level its metadata asks for.
pub fn log_error<E>(err: &E, operation: &'static str)
where
    E: ErrorMetadata + std::fmt::Display,
{
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(
            error = %err,
            error_code = err.error_code(),
            operation,
            "Operation failed"
        ),
        LogLevel::Warn => tracing::warn!(
            error = %err,
            error_code = err.error_code(),
            operation,
            "Operation failed"
        ),
        LogLevel::Error => tracing::error!(
            error = %err,
            error_code = err.error_code(),
            operation,
            "Operation failed"
        ),
    }
}
