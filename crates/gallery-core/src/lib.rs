//! Gallery Core Library
//!
//! Domain models, the filter engine, error types and configuration shared by
//! the transport, the client state machine and the command-line front end.

pub mod config;
pub mod error;
pub mod filter;
pub mod models;

// Re-export commonly used types
pub use config::GalleryConfig;
pub use error::{DeleteError, ErrorMetadata, LoadError, LogLevel, UploadError};
pub use filter::compute_view;
pub use models::{
    Catalog, Dimensions, FilePayload, FilterCriteria, FilteredView, PhotoRecord, UploadCredential,
    UploadRequest,
};
