//! Notification scheduling and delivery bookkeeping.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    AttendeeId, EventBus, EventId, FeedEvent, Notification, NotificationId, NotificationStatus,
};
use crate::error::ServerError;
use crate::store::JsonStore;

/// Hour of day (UTC) at which pre-event reminders fire.
const REMINDER_HOUR: u32 = 9;

/// Service for scheduled notifications.
///
/// Scheduling only queues records; the scheduler turns due records into
/// `sent` ones via [`NotificationService::deliver_due`].
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<JsonStore>,
    event_bus: EventBus,
}

impl NotificationService {
    /// Creates a new `NotificationService`.
    #[must_use]
    pub fn new(store: Arc<JsonStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns a handle to the live feed bus.
    #[must_use]
    pub fn event_bus(&self) -> EventBus {
        self.event_bus.clone()
    }

    /// Queues a single notification for an existing event.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::EventNotFound`] if the referenced event
    /// does not exist, or [`ServerError::PersistenceError`] if the
    /// store rewrite fails.
    pub async fn schedule(&self, notification: Notification) -> Result<Notification, ServerError> {
        let event_id = notification.event_id;
        if self.store.events.find(|e| e.id == event_id).await.is_none() {
            return Err(ServerError::EventNotFound(event_id.into()));
        }
        self.store.notifications.insert(notification.clone()).await?;
        self.broadcast_scheduled(&notification);
        tracing::info!(
            notification_id = %notification.id,
            event_id = %event_id,
            scheduled_time = %notification.scheduled_time,
            "notification scheduled"
        );
        Ok(notification)
    }

    /// Schedules the standard pre-event reminder for every opted-in
    /// attendee of an event.
    ///
    /// The reminder fires at 09:00 UTC, `days_before` days ahead of the
    /// event date. If that moment has already passed nothing is queued
    /// and an empty batch is returned. Attendees who switched off
    /// `event_reminders` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::EventNotFound`] if the event does not
    /// exist, or [`ServerError::PersistenceError`] if the store rewrite
    /// fails.
    pub async fn schedule_event_reminders(
        &self,
        event_id: EventId,
        days_before: u32,
    ) -> Result<Vec<Notification>, ServerError> {
        let Some(event) = self.store.events.find(|e| e.id == event_id).await else {
            return Err(ServerError::EventNotFound(event_id.into()));
        };

        let scheduled_time = reminder_time(event.date, days_before);
        if scheduled_time <= Utc::now() {
            tracing::debug!(
                event_id = %event_id,
                %scheduled_time,
                "reminder time already passed, nothing scheduled"
            );
            return Ok(Vec::new());
        }

        let recipients = self
            .store
            .attendees
            .filter(|a| a.event_id == event_id && a.notification_preferences.event_reminders)
            .await;
        let batch: Vec<Notification> = recipients
            .iter()
            .map(|a| Notification::reminder(event_id, &event.title, a.id, days_before, scheduled_time))
            .collect();

        if !batch.is_empty() {
            self.store.notifications.insert_many(batch.clone()).await?;
            for reminder in &batch {
                self.broadcast_scheduled(reminder);
            }
        }
        tracing::info!(
            event_id = %event_id,
            scheduled = batch.len(),
            %scheduled_time,
            "event reminders scheduled"
        );
        Ok(batch)
    }

    /// Broadcasts a freshly queued notification to the live feed.
    fn broadcast_scheduled(&self, notification: &Notification) {
        let _ = self.event_bus.publish(FeedEvent::NotificationScheduled {
            event_id: notification.event_id,
            notification_id: notification.id,
            attendee_id: notification.attendee_id,
            scheduled_time: notification.scheduled_time,
            timestamp: Utc::now(),
        });
    }

    /// Lists notifications, optionally narrowed by event, attendee,
    /// and status.
    ///
    /// The attendee filter keeps event-wide records: an attendee's view
    /// is their own notifications plus every broadcast.
    pub async fn list(
        &self,
        event_id: Option<EventId>,
        attendee_id: Option<AttendeeId>,
        status: Option<NotificationStatus>,
    ) -> Vec<Notification> {
        self.store
            .notifications
            .filter(|n| {
                event_id.is_none_or(|id| n.event_id == id)
                    && attendee_id
                        .is_none_or(|id| n.attendee_id.is_none() || n.attendee_id == Some(id))
                    && status.is_none_or(|s| n.status == s)
            })
            .await
    }

    /// Looks up one notification by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NotificationNotFound`] if no notification
    /// has this id.
    pub async fn get(&self, id: NotificationId) -> Result<Notification, ServerError> {
        self.store
            .notifications
            .find(|n| n.id == id)
            .await
            .ok_or(ServerError::NotificationNotFound(id.into()))
    }

    /// Sets a notification's delivery status.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NotificationNotFound`] if no notification
    /// has this id, or [`ServerError::PersistenceError`] if the store
    /// rewrite fails.
    pub async fn update_status(
        &self,
        id: NotificationId,
        status: NotificationStatus,
    ) -> Result<Notification, ServerError> {
        let updated = self
            .store
            .notifications
            .update_where(|n| n.id == id, |n| n.status = status)
            .await?
            .ok_or(ServerError::NotificationNotFound(id.into()))?;
        tracing::info!(notification_id = %id, status = ?status, "notification status updated");
        Ok(updated)
    }

    /// Removes a notification.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NotificationNotFound`] if no notification
    /// has this id, or [`ServerError::PersistenceError`] if the store
    /// rewrite fails.
    pub async fn remove(&self, id: NotificationId) -> Result<(), ServerError> {
        let removed = self
            .store
            .notifications
            .remove_where(|n| n.id == id)
            .await?;
        if removed == 0 {
            return Err(ServerError::NotificationNotFound(id.into()));
        }
        tracing::info!(notification_id = %id, "notification removed");
        Ok(())
    }

    /// Marks every due `scheduled` notification as `sent` and broadcasts
    /// each delivery. Returns how many were delivered.
    ///
    /// The status flips and the file rewrite happen under one write
    /// lock; on a failed rewrite the statuses roll back and the batch is
    /// picked up again on the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PersistenceError`] if the store rewrite
    /// fails.
    pub async fn deliver_due(&self, now: DateTime<Utc>) -> Result<usize, ServerError> {
        let delivered = self
            .store
            .notifications
            .write(|items| {
                let mut delivered = Vec::new();
                for n in items.iter_mut() {
                    if n.status == NotificationStatus::Scheduled && n.scheduled_time <= now {
                        n.status = NotificationStatus::Sent;
                        delivered.push((n.id, n.event_id, n.attendee_id));
                    }
                }
                (!delivered.is_empty(), delivered)
            })
            .await?;

        for (notification_id, event_id, attendee_id) in &delivered {
            let _ = self.event_bus.publish(FeedEvent::ReminderDue {
                event_id: *event_id,
                notification_id: *notification_id,
                attendee_id: *attendee_id,
                timestamp: Utc::now(),
            });
        }
        if !delivered.is_empty() {
            tracing::info!(count = delivered.len(), "due notifications delivered");
        }
        Ok(delivered.len())
    }
}

/// Computes the reminder delivery moment: 09:00 UTC, `days_before` days
/// ahead of the event date.
fn reminder_time(event_date: DateTime<Utc>, days_before: u32) -> DateTime<Utc> {
    let day = event_date - Duration::days(i64::from(days_before));
    day.date_naive()
        .and_hms_opt(REMINDER_HOUR, 0, 0)
        .map_or(day, |naive| naive.and_utc())
}
