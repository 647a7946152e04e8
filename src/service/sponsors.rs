//! Sponsor roster management.

use std::sync::Arc;

use crate::domain::{EventId, Sponsor, SponsorId, SponsorPatch};
use crate::error::ServerError;
use crate::store::JsonStore;

/// Service for managing sponsors and their reported metrics.
#[derive(Debug, Clone)]
pub struct SponsorService {
    store: Arc<JsonStore>,
}

impl SponsorService {
    /// Creates a new `SponsorService`.
    #[must_use]
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// Adds a sponsor to an existing event.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::EventNotFound`] if the referenced event
    /// does not exist, or [`ServerError::PersistenceError`] if the
    /// store rewrite fails.
    pub async fn create(&self, sponsor: Sponsor) -> Result<Sponsor, ServerError> {
        let event_id = sponsor.event_id;
        if self.store.events.find(|e| e.id == event_id).await.is_none() {
            return Err(ServerError::EventNotFound(event_id.into()));
        }
        self.store.sponsors.insert(sponsor.clone()).await?;
        tracing::info!(sponsor_id = %sponsor.id, event_id = %event_id, "sponsor added");
        Ok(sponsor)
    }

    /// Lists sponsors, optionally narrowed to one event.
    pub async fn list(&self, event_id: Option<EventId>) -> Vec<Sponsor> {
        match event_id {
            Some(id) => self.store.sponsors.filter(|s| s.event_id == id).await,
            None => self.store.sponsors.all().await,
        }
    }

    /// Looks up one sponsor by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::SponsorNotFound`] if no sponsor has this
    /// id.
    pub async fn get(&self, id: SponsorId) -> Result<Sponsor, ServerError> {
        self.store
            .sponsors
            .find(|s| s.id == id)
            .await
            .ok_or(ServerError::SponsorNotFound(id.into()))
    }

    /// Applies a partial update, typically new engagement figures.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::SponsorNotFound`] if no sponsor has this
    /// id, or [`ServerError::PersistenceError`] if the store rewrite
    /// fails.
    pub async fn update(&self, id: SponsorId, patch: SponsorPatch) -> Result<Sponsor, ServerError> {
        let updated = self
            .store
            .sponsors
            .update_where(|s| s.id == id, |s| patch.apply_to(s))
            .await?
            .ok_or(ServerError::SponsorNotFound(id.into()))?;
        tracing::info!(sponsor_id = %id, "sponsor updated");
        Ok(updated)
    }

    /// Removes a sponsor.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::SponsorNotFound`] if no sponsor has this
    /// id, or [`ServerError::PersistenceError`] if the store rewrite
    /// fails.
    pub async fn remove(&self, id: SponsorId) -> Result<(), ServerError> {
        let removed = self.store.sponsors.remove_where(|s| s.id == id).await?;
        if removed == 0 {
            return Err(ServerError::SponsorNotFound(id.into()));
        }
        tracing::info!(sponsor_id = %id, "sponsor removed");
        Ok(())
    }
}
