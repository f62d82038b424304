//! Gallery client core
//!
//! State and orchestration for a photo gallery backed by a remote object
//! store:
//!
//! - [`CatalogStore`]: the authoritative in-memory catalog and its filtered view
//! - [`UploadOrchestrator`]: the two-phase, direct-to-storage upload
//! - [`SelectionController`]: the photo open in the detail view and its deletion
//!
//! Components share one [`CatalogStore`] through an `Arc` and publish every
//! change on an [`EventBus`]. [`Gallery`] wires them together for one session.

pub mod catalog;
pub mod events;
pub mod selection;
pub mod upload;

pub use catalog::CatalogStore;
pub use events::{EventBus, GalleryEvent};
pub use selection::{Selection, SelectionController};
pub use upload::{ScheduledReload, UploadOrchestrator, UploadPolicy, UploadReceipt, UploadStatus};

use anyhow::Result;
use gallery_api_client::{ApiClient, PhotoApi};
use gallery_core::GalleryConfig;
use std::sync::Arc;
use tokio::sync::broadcast;

/// One gallery session: catalog, uploads and selection over a shared transport.
pub struct Gallery {
    events: EventBus,
    catalog: Arc<CatalogStore>,
    uploads: UploadOrchestrator,
    selection: SelectionController,
}

impl Gallery {
    pub fn new(api: Arc<dyn PhotoApi>, config: &GalleryConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        let catalog = Arc::new(CatalogStore::new(Arc::clone(&api), events.clone()));
        let uploads = UploadOrchestrator::new(
            api,
            Arc::clone(&catalog),
            events.clone(),
            UploadPolicy::from_config(config),
        );
        let selection = SelectionController::new(Arc::clone(&catalog), events.clone());

        Self {
            events,
            catalog,
            uploads,
            selection,
        }
    }

    /// Build a session talking HTTP to the configured backend.
    pub fn from_config(config: &GalleryConfig) -> Result<Self> {
        let api = ApiClient::from_config(config)?;
        tracing::debug!(api_url = %api.base_url(), "Gallery client configured");
        Ok(Self::new(Arc::new(api), config))
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    pub fn uploads(&self) -> &UploadOrchestrator {
        &self.uploads
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GalleryEvent> {
        self.events.subscribe()
    }
}
