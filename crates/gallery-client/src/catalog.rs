//! Catalog store
//!
//! Owns the authoritative in-memory catalog and the filtered view derived
//! from it. The catalog changes in exactly two ways: a reload replaces it
//! wholesale, and a confirmed deletion removes one record.
//!
//! # Ordering
//!
//! Reloads and deletions may overlap. Each reload takes a ticket from a
//! monotonically increasing sequence when it is issued; each deletion takes a
//! fresh number when it takes effect. A reload response is applied only if its
//! ticket is newer than the last applied number, so a reload issued before a
//! deletion completed can never bring the deleted record back, and an older
//! reload never overwrites a newer one.
//!
//! No lock is held while a request is in flight.

use crate::events::{EventBus, GalleryEvent};
use gallery_api_client::{PhotoApi, TransportError};
use gallery_core::error::{
    log_error, DeleteError, LoadError, GENERIC_DELETE_FAILURE, GENERIC_LOAD_FAILURE,
    TIMEOUT_MESSAGE,
};
use gallery_core::filter::compute_view;
use gallery_core::models::{Catalog, FilterCriteria, FilteredView, PhotoRecord};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct CatalogState {
    catalog: Catalog,
    criteria: FilterCriteria,
    view: FilteredView,
    /// Last sequence number handed out
    issued_seq: u64,
    /// Sequence number of the last reload or deletion applied
    applied_seq: u64,
}

impl CatalogState {
    fn next_seq(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    fn recompute_view(&mut self) {
        self.view = compute_view(&self.catalog, &self.criteria);
    }
}

pub struct CatalogStore {
    api: Arc<dyn PhotoApi>,
    events: EventBus,
    state: RwLock<CatalogState>,
}

impl CatalogStore {
    pub fn new(api: Arc<dyn PhotoApi>, events: EventBus) -> Self {
        Self {
            api,
            events,
            state: RwLock::new(CatalogState::default()),
        }
    }

    /// Fetch the full photo list and replace the catalog with it.
    ///
    /// Returns the catalog as it stands afterwards. If a newer reload or a
    /// deletion was applied while this request was in flight, the response is
    /// discarded and the current catalog is returned unchanged. On error the
    /// catalog and filtered view are left exactly as they were.
    pub async fn reload(&self) -> Result<Catalog, LoadError> {
        let ticket = self.state.write().await.next_seq();
        let start = Instant::now();

        let records = self.api.list_photos().await.map_err(|e| {
            let err = load_error(e);
            log_error(&err, "reload");
            err
        })?;

        let mut state = self.state.write().await;
        if ticket <= state.applied_seq {
            tracing::debug!(
                ticket,
                applied_seq = state.applied_seq,
                "Discarding superseded catalog reload"
            );
            return Ok(state.catalog.clone());
        }

        state.catalog = Catalog::from_records(records);
        state.applied_seq = ticket;
        state.recompute_view();

        self.events
            .emit(GalleryEvent::CatalogChanged(state.catalog.clone()));
        self.events
            .emit(GalleryEvent::FilteredViewChanged(state.view.clone()));

        tracing::info!(
            count = state.catalog.len(),
            visible = state.view.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Catalog reloaded"
        );

        Ok(state.catalog.clone())
    }

    /// Delete a photo on the backend, then drop it from the catalog.
    ///
    /// The record is only removed once the backend confirms; on failure it
    /// stays in place.
    pub async fn remove(&self, photo_id: &str) -> Result<(), DeleteError> {
        let start = Instant::now();

        self.api.delete_photo(photo_id).await.map_err(|e| {
            let err = delete_error(photo_id, e);
            log_error(&err, "remove");
            err
        })?;

        let mut state = self.state.write().await;
        let seq = state.next_seq();
        state.applied_seq = seq;

        if state.catalog.remove(photo_id).is_some() {
            state.recompute_view();
            self.events
                .emit(GalleryEvent::CatalogChanged(state.catalog.clone()));
            self.events
                .emit(GalleryEvent::FilteredViewChanged(state.view.clone()));
        }

        tracing::info!(
            photo_id = %photo_id,
            remaining = state.catalog.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Photo deleted"
        );

        Ok(())
    }

    /// Replace the active filter criteria and return the recomputed view.
    pub async fn set_criteria(&self, criteria: FilterCriteria) -> FilteredView {
        let mut state = self.state.write().await;
        state.criteria = criteria;
        state.recompute_view();

        tracing::debug!(
            tag_query = %state.criteria.tag_query,
            date_start = ?state.criteria.date_start,
            date_end = ?state.criteria.date_end,
            visible = state.view.len(),
            "Filter criteria updated"
        );

        self.events
            .emit(GalleryEvent::FilteredViewChanged(state.view.clone()));
        state.view.clone()
    }

    pub async fn catalog(&self) -> Catalog {
        self.state.read().await.catalog.clone()
    }

    pub async fn filtered_view(&self) -> FilteredView {
        self.state.read().await.view.clone()
    }

    pub async fn criteria(&self) -> FilterCriteria {
        self.state.read().await.criteria.clone()
    }

    pub async fn get(&self, photo_id: &str) -> Option<PhotoRecord> {
        self.state.read().await.catalog.get(photo_id).cloned()
    }

    pub async fn contains(&self, photo_id: &str) -> bool {
        self.state.read().await.catalog.contains(photo_id)
    }
}

fn load_error(err: TransportError) -> LoadError {
    match err {
        TransportError::Timeout => LoadError::Timeout,
        TransportError::Status {
            message: Some(message),
            ..
        } => LoadError::Failed(message),
        other => {
            tracing::debug!(error = %other, "Photo list request failed");
            LoadError::Failed(GENERIC_LOAD_FAILURE.to_string())
        }
    }
}

fn delete_error(photo_id: &str, err: TransportError) -> DeleteError {
    let message = match err {
        TransportError::Timeout => TIMEOUT_MESSAGE.to_string(),
        TransportError::Status {
            message: Some(message),
            ..
        } => message,
        other => {
            tracing::debug!(error = %other, photo_id = %photo_id, "Delete request failed");
            GENERIC_DELETE_FAILURE.to_string()
        }
    };

    DeleteError::Failed {
        photo_id: photo_id.to_string(),
        message,
    }
}
