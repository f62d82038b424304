//! Change notifications for the view layer
//!
//! Every state change in the client is published as a [`GalleryEvent`]
//! carrying the new value. Subscribers that fall behind the channel capacity
//! miss intermediate events; the latest state is always readable from the
//! components themselves.

use crate::upload::UploadStatus;
use gallery_core::models::{Catalog, FilteredView};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    CatalogChanged(Catalog),
    FilteredViewChanged(FilteredView),
    /// The selected photo id, or `None` after dismissal/deletion
    SelectionChanged(Option<String>),
    UploadStatusChanged(UploadStatus),
}

/// Broadcast channel shared by the catalog, upload and selection components.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<GalleryEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GalleryEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn emit(&self, event: GalleryEvent) {
        // No subscribers is normal (e.g. one-shot CLI commands).
        if self.sender.send(event).is_err() {
            tracing::trace!("No subscribers for gallery event");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
