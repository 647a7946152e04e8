//! Attendee registration and ticket issuance.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Attendee, AttendeeId, AttendeePatch, EventBus, EventId, FeedEvent, NotificationPreferences,
};
use crate::error::ServerError;
use crate::store::JsonStore;
use crate::ticket::TicketCodec;

/// Service for managing attendees.
///
/// Ticket issuance signs the attendee and event ids into the token, so
/// later renames never invalidate a printed ticket.
#[derive(Debug, Clone)]
pub struct AttendeeService {
    store: Arc<JsonStore>,
    codec: TicketCodec,
    event_bus: EventBus,
}

impl AttendeeService {
    /// Creates a new `AttendeeService`.
    #[must_use]
    pub fn new(store: Arc<JsonStore>, codec: TicketCodec, event_bus: EventBus) -> Self {
        Self {
            store,
            codec,
            event_bus,
        }
    }

    /// Returns a handle to the live feed bus.
    #[must_use]
    pub fn event_bus(&self) -> EventBus {
        self.event_bus.clone()
    }

    /// Registers an attendee for an existing event.
    ///
    /// A registration that is already paid is issued its ticket token
    /// immediately; an unpaid one gets its token once payment is
    /// confirmed through [`AttendeeService::update`].
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::EventNotFound`] if the referenced event
    /// does not exist, [`ServerError::Internal`] if token signing
    /// fails, or [`ServerError::PersistenceError`] if the store
    /// rewrite fails.
    pub async fn register(&self, mut attendee: Attendee) -> Result<Attendee, ServerError> {
        let event_id = attendee.event_id;
        if self.store.events.find(|e| e.id == event_id).await.is_none() {
            return Err(ServerError::EventNotFound(event_id.into()));
        }
        if attendee.paid && attendee.ticket_token.is_none() {
            attendee.ticket_token = Some(self.codec.issue(attendee.id, event_id, Utc::now())?);
        }
        self.store.attendees.insert(attendee.clone()).await?;

        let _ = self.event_bus.publish(FeedEvent::AttendeeRegistered {
            event_id,
            attendee_id: attendee.id,
            name: attendee.name.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!(
            attendee_id = %attendee.id,
            event_id = %event_id,
            "attendee registered"
        );
        Ok(attendee)
    }

    /// Lists attendees, optionally narrowed to one event.
    pub async fn list(&self, event_id: Option<EventId>) -> Vec<Attendee> {
        match event_id {
            Some(id) => self.store.attendees.filter(|a| a.event_id == id).await,
            None => self.store.attendees.all().await,
        }
    }

    /// Looks up one attendee by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AttendeeNotFound`] if no attendee has
    /// this id.
    pub async fn get(&self, id: AttendeeId) -> Result<Attendee, ServerError> {
        self.store
            .attendees
            .find(|a| a.id == id)
            .await
            .ok_or(ServerError::AttendeeNotFound(id.into()))
    }

    /// Applies a partial update to an attendee.
    ///
    /// Confirming payment here issues the ticket token if none is
    /// stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AttendeeNotFound`] if no attendee has
    /// this id, [`ServerError::Internal`] if token signing fails, or
    /// [`ServerError::PersistenceError`] if the store rewrite fails.
    pub async fn update(
        &self,
        id: AttendeeId,
        patch: AttendeePatch,
    ) -> Result<Attendee, ServerError> {
        let updated = self
            .store
            .attendees
            .update_where(|a| a.id == id, |a| patch.apply_to(a))
            .await?
            .ok_or(ServerError::AttendeeNotFound(id.into()))?;
        tracing::info!(attendee_id = %id, "attendee updated");

        if updated.paid && updated.ticket_token.is_none() {
            return self.issue_ticket(id).await;
        }
        Ok(updated)
    }

    /// Issues a signed ticket token and stores it on the attendee.
    ///
    /// Re-issuing replaces the stored token; previously printed tokens
    /// keep verifying because they carry the same ids.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AttendeeNotFound`] if no attendee has
    /// this id, [`ServerError::Internal`] if signing fails, or
    /// [`ServerError::PersistenceError`] if the store rewrite fails.
    pub async fn issue_ticket(&self, id: AttendeeId) -> Result<Attendee, ServerError> {
        let attendee = self.get(id).await?;
        let token = self.codec.issue(attendee.id, attendee.event_id, Utc::now())?;

        let updated = self
            .store
            .attendees
            .update_where(
                |a| a.id == id,
                |a| {
                    a.ticket_token = Some(token.clone());
                    a.updated_at = Utc::now();
                },
            )
            .await?
            .ok_or(ServerError::AttendeeNotFound(id.into()))?;

        let _ = self.event_bus.publish(FeedEvent::TicketIssued {
            event_id: updated.event_id,
            attendee_id: updated.id,
            timestamp: Utc::now(),
        });
        tracing::info!(
            attendee_id = %id,
            event_id = %updated.event_id,
            "ticket issued"
        );
        Ok(updated)
    }

    /// Returns an attendee's notification preferences.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AttendeeNotFound`] if no attendee has
    /// this id.
    pub async fn preferences(&self, id: AttendeeId) -> Result<NotificationPreferences, ServerError> {
        Ok(self.get(id).await?.notification_preferences)
    }

    /// Replaces an attendee's notification preferences.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AttendeeNotFound`] if no attendee has
    /// this id, or [`ServerError::PersistenceError`] if the store
    /// rewrite fails.
    pub async fn update_preferences(
        &self,
        id: AttendeeId,
        preferences: NotificationPreferences,
    ) -> Result<Attendee, ServerError> {
        let updated = self
            .store
            .attendees
            .update_where(
                |a| a.id == id,
                |a| {
                    a.notification_preferences = preferences.clone();
                    a.updated_at = Utc::now();
                },
            )
            .await?
            .ok_or(ServerError::AttendeeNotFound(id.into()))?;
        tracing::info!(attendee_id = %id, "notification preferences updated");
        Ok(updated)
    }

    /// Removes an attendee.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AttendeeNotFound`] if no attendee has
    /// this id, or [`ServerError::PersistenceError`] if the store
    /// rewrite fails.
    pub async fn remove(&self, id: AttendeeId) -> Result<(), ServerError> {
        let removed = self.store.attendees.remove_where(|a| a.id == id).await?;
        if removed == 0 {
            return Err(ServerError::AttendeeNotFound(id.into()));
        }
        tracing::info!(attendee_id = %id, "attendee removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Event;
    use crate::ticket::{SIGNED_PREFIX, TicketToken};

    struct Fixture {
        service: AttendeeService,
        store: Arc<JsonStore>,
        codec: TicketCodec,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let Ok(store) = JsonStore::open(dir.path()) else {
            panic!("store open failed");
        };
        let store = Arc::new(store);
        let codec = TicketCodec::new("test-signing-key");
        let service = AttendeeService::new(Arc::clone(&store), codec.clone(), EventBus::new(100));
        Fixture {
            service,
            store,
            codec,
            _dir: dir,
        }
    }

    async fn seed_event(store: &JsonStore) -> Event {
        let event = Event::new(
            "TechConf".to_string(),
            Utc::now(),
            "Convention Center".to_string(),
            1500.0,
            "desc".to_string(),
            None,
        );
        let Ok(()) = store.events.insert(event.clone()).await else {
            panic!("event insert failed");
        };
        event
    }

    #[tokio::test]
    async fn register_requires_existing_event() {
        let fx = fixture().await;
        let attendee = Attendee::new(
            "John".to_string(),
            "john@example.com".to_string(),
            EventId::new(),
            false,
        );
        let result = fx.service.register(attendee).await;
        assert!(matches!(result, Err(ServerError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn register_and_list_by_event() {
        let fx = fixture().await;
        let event = seed_event(&fx.store).await;
        let other = seed_event(&fx.store).await;

        let john = Attendee::new(
            "John".to_string(),
            "john@example.com".to_string(),
            event.id,
            true,
        );
        let jane = Attendee::new(
            "Jane".to_string(),
            "jane@example.com".to_string(),
            other.id,
            true,
        );
        let Ok(_) = fx.service.register(john).await else {
            panic!("register failed");
        };
        let Ok(_) = fx.service.register(jane).await else {
            panic!("register failed");
        };

        assert_eq!(fx.service.list(None).await.len(), 2);
        let only = fx.service.list(Some(event.id)).await;
        assert_eq!(only.len(), 1);
        assert!(only.iter().all(|a| a.event_id == event.id));
    }

    #[tokio::test]
    async fn paid_registration_is_issued_a_ticket() {
        let fx = fixture().await;
        let event = seed_event(&fx.store).await;
        let attendee = Attendee::new(
            "John".to_string(),
            "john@example.com".to_string(),
            event.id,
            true,
        );
        let Ok(registered) = fx.service.register(attendee).await else {
            panic!("register failed");
        };
        let Some(token) = registered.ticket_token else {
            panic!("expected token at registration");
        };
        assert!(token.starts_with(SIGNED_PREFIX));
    }

    #[tokio::test]
    async fn confirming_payment_issues_ticket() {
        let fx = fixture().await;
        let event = seed_event(&fx.store).await;
        let attendee = Attendee::new(
            "John".to_string(),
            "john@example.com".to_string(),
            event.id,
            false,
        );
        let Ok(registered) = fx.service.register(attendee).await else {
            panic!("register failed");
        };
        assert!(registered.ticket_token.is_none());

        let patch = AttendeePatch {
            paid: Some(true),
            ..AttendeePatch::default()
        };
        let Ok(updated) = fx.service.update(registered.id, patch).await else {
            panic!("update failed");
        };
        assert!(updated.paid);
        assert!(updated.ticket_token.is_some());
    }

    #[tokio::test]
    async fn issued_ticket_is_signed_and_stored() {
        let fx = fixture().await;
        let event = seed_event(&fx.store).await;
        let attendee = Attendee::new(
            "John".to_string(),
            "john@example.com".to_string(),
            event.id,
            true,
        );
        let Ok(registered) = fx.service.register(attendee).await else {
            panic!("register failed");
        };

        let Ok(with_ticket) = fx.service.issue_ticket(registered.id).await else {
            panic!("issue failed");
        };
        let Some(token) = with_ticket.ticket_token else {
            panic!("expected stored token");
        };
        assert!(token.starts_with(SIGNED_PREFIX));

        let Ok(TicketToken::Signed(payload)) = fx.codec.parse(&token) else {
            panic!("expected signed token");
        };
        assert_eq!(payload.attendee_id, registered.id);
        assert_eq!(payload.event_id, event.id);
    }

    #[tokio::test]
    async fn preferences_update_persists() {
        let fx = fixture().await;
        let event = seed_event(&fx.store).await;
        let attendee = Attendee::new(
            "John".to_string(),
            "john@example.com".to_string(),
            event.id,
            true,
        );
        let Ok(registered) = fx.service.register(attendee).await else {
            panic!("register failed");
        };

        let prefs = NotificationPreferences {
            event_reminders: false,
            reminder_days_before: 3,
            ..NotificationPreferences::default()
        };
        let Ok(_) = fx.service.update_preferences(registered.id, prefs).await else {
            panic!("update failed");
        };

        let Ok(read_back) = fx.service.preferences(registered.id).await else {
            panic!("preferences failed");
        };
        assert!(!read_back.event_reminders);
        assert_eq!(read_back.reminder_days_before, 3);
    }

    #[tokio::test]
    async fn remove_unknown_attendee_is_not_found() {
        let fx = fixture().await;
        let result = fx.service.remove(AttendeeId::new()).await;
        assert!(matches!(result, Err(ServerError::AttendeeNotFound(_))));
    }

    #[tokio::test]
    async fn registration_and_issuance_are_broadcast() {
        let fx = fixture().await;
        let event = seed_event(&fx.store).await;
        let mut rx = fx.service.event_bus().subscribe();

        let attendee = Attendee::new(
            "John".to_string(),
            "john@example.com".to_string(),
            event.id,
            true,
        );
        let Ok(registered) = fx.service.register(attendee).await else {
            panic!("register failed");
        };
        let Ok(_) = fx.service.issue_ticket(registered.id).await else {
            panic!("issue failed");
        };

        let Ok(first) = rx.recv().await else {
            panic!("expected feed event");
        };
        assert_eq!(first.event_type_str(), "attendee_registered");
        let Ok(second) = rx.recv().await else {
            panic!("expected feed event");
        };
        assert_eq!(second.event_type_str(), "ticket_issued");
    }
}
