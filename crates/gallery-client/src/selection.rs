//! Detail/selection controller
//!
//! Tracks the single photo open in the detail view, if any, and routes
//! deletions through the catalog store so the selection never points at a
//! record the backend has confirmed gone.

use crate::catalog::CatalogStore;
use crate::events::{EventBus, GalleryEvent};
use gallery_core::error::{log_error, DeleteError};
use gallery_core::models::PhotoRecord;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "photo_id", rename_all = "snake_case")]
pub enum Selection {
    NoSelection,
    Selected(String),
}

impl Selection {
    pub fn photo_id(&self) -> Option<&str> {
        match self {
            Selection::NoSelection => None,
            Selection::Selected(id) => Some(id),
        }
    }
}

pub struct SelectionController {
    catalog: Arc<CatalogStore>,
    events: EventBus,
    current: Mutex<Option<String>>,
}

impl SelectionController {
    pub fn new(catalog: Arc<CatalogStore>, events: EventBus) -> Self {
        Self {
            catalog,
            events,
            current: Mutex::new(None),
        }
    }

    pub async fn current(&self) -> Selection {
        match self.current.lock().await.clone() {
            Some(id) => Selection::Selected(id),
            None => Selection::NoSelection,
        }
    }

    /// Select a photo for the detail view.
    ///
    /// Ids not present in the catalog are ignored (the record may have been
    /// deleted between render and click). Returns whether the selection changed
    /// to `photo_id`.
    pub async fn select(&self, photo_id: &str) -> bool {
        // Held across the catalog check so a concurrent `delete` of this id
        // clears the selection after we set it, never before.
        let mut current = self.current.lock().await;
        if !self.catalog.contains(photo_id).await {
            tracing::debug!(photo_id = %photo_id, "Ignoring selection of unknown photo");
            return false;
        }

        if current.as_deref() != Some(photo_id) {
            *current = Some(photo_id.to_string());
            self.events
                .emit(GalleryEvent::SelectionChanged(current.clone()));
        }
        true
    }

    /// Close the detail view.
    pub async fn dismiss(&self) {
        let mut current = self.current.lock().await;
        if current.take().is_some() {
            self.events.emit(GalleryEvent::SelectionChanged(None));
        }
    }

    /// Full record of the selected photo, including its full-size URL.
    ///
    /// `None` when nothing is selected or the record has left the catalog.
    pub async fn selected_record(&self) -> Option<PhotoRecord> {
        let id = self.current.lock().await.clone()?;
        self.catalog.get(&id).await
    }

    /// Delete the selected photo.
    ///
    /// On success the selection is cleared and the deleted id returned. On
    /// failure the photo stays selected and in the catalog.
    pub async fn delete_selected(&self) -> Result<String, DeleteError> {
        let Some(photo_id) = self.current.lock().await.clone() else {
            let err = DeleteError::NothingSelected;
            log_error(&err, "delete_selected");
            return Err(err);
        };

        self.delete(&photo_id).await?;
        Ok(photo_id)
    }

    /// Delete any photo by id, clearing the selection if it was the one selected.
    pub async fn delete(&self, photo_id: &str) -> Result<(), DeleteError> {
        self.catalog.remove(photo_id).await?;

        // The user may have selected something else while the request was in flight.
        let mut current = self.current.lock().await;
        if current.as_deref() == Some(photo_id) {
            *current = None;
            self.events.emit(GalleryEvent::SelectionChanged(None));
        }
        Ok(())
    }
}
