//! Event lifecycle service.
//!
//! Covers event CRUD, the cascading delete, and the sponsor analytics
//! password gate. Creation generates the sponsor password server-side;
//! it is never accepted from a request.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Event, EventBus, EventId, EventPatch, FeedEvent, Sponsor};
use crate::error::ServerError;
use crate::store::JsonStore;

/// Service for managing events.
#[derive(Debug, Clone)]
pub struct EventService {
    store: Arc<JsonStore>,
    event_bus: EventBus,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(store: Arc<JsonStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns a handle to the live feed bus.
    #[must_use]
    pub fn event_bus(&self) -> EventBus {
        self.event_bus.clone()
    }

    /// Creates an event and broadcasts it.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PersistenceError`] if the store rewrite
    /// fails.
    pub async fn create(&self, event: Event) -> Result<Event, ServerError> {
        self.store.events.insert(event.clone()).await?;

        let _ = self.event_bus.publish(FeedEvent::EventCreated {
            event_id: event.id,
            title: event.title.clone(),
            date: event.date,
            timestamp: Utc::now(),
        });
        tracing::info!(event_id = %event.id, title = %event.title, "event created");
        Ok(event)
    }

    /// Lists all events.
    pub async fn list(&self) -> Vec<Event> {
        self.store.events.all().await
    }

    /// Looks up one event by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::EventNotFound`] if no event has this id.
    pub async fn get(&self, id: EventId) -> Result<Event, ServerError> {
        self.store
            .events
            .find(|e| e.id == id)
            .await
            .ok_or(ServerError::EventNotFound(id.into()))
    }

    /// Applies a partial update to an event.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::EventNotFound`] if no event has this id,
    /// or [`ServerError::PersistenceError`] if the store rewrite fails.
    pub async fn update(&self, id: EventId, patch: EventPatch) -> Result<Event, ServerError> {
        let updated = self
            .store
            .events
            .update_where(|e| e.id == id, |e| patch.apply_to(e))
            .await?
            .ok_or(ServerError::EventNotFound(id.into()))?;

        let _ = self.event_bus.publish(FeedEvent::EventUpdated {
            event_id: id,
            timestamp: Utc::now(),
        });
        tracing::info!(event_id = %id, "event updated");
        Ok(updated)
    }

    /// Deletes an event together with its attendees and sponsors.
    ///
    /// Budget lines, tasks, and notifications referencing the event are
    /// left in place.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::EventNotFound`] if no event has this id,
    /// or [`ServerError::PersistenceError`] if a store rewrite fails.
    pub async fn delete(&self, id: EventId) -> Result<(), ServerError> {
        let removed = self.store.delete_event_cascade(id).await?;
        if !removed {
            return Err(ServerError::EventNotFound(id.into()));
        }

        let _ = self.event_bus.publish(FeedEvent::EventRemoved {
            event_id: id,
            timestamp: Utc::now(),
        });
        tracing::info!(event_id = %id, "event removed");
        Ok(())
    }

    /// Checks a sponsor password and, when it matches, returns the
    /// event's sponsors with their engagement metrics.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::EventNotFound`] if no event has this id,
    /// or [`ServerError::SponsorAccessDenied`] if the password does not
    /// match (or the event has no password at all).
    pub async fn sponsor_access(
        &self,
        id: EventId,
        password: &str,
    ) -> Result<Vec<Sponsor>, ServerError> {
        let event = self.get(id).await?;
        if event.sponsor_password.as_deref() != Some(password) {
            tracing::warn!(event_id = %id, "sponsor access denied");
            return Err(ServerError::SponsorAccessDenied(id.into()));
        }
        Ok(self.store.sponsors.filter(|s| s.event_id == id).await)
    }
}
