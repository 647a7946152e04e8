//! Scheduled notifications and reminder construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AttendeeId, EventId, NotificationId};

/// What kind of notification this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Reminder sent ahead of an event.
    EventReminder,
    /// Sent after event details change.
    EventUpdate,
    /// General announcement.
    General,
}

/// Delivery state of a scheduled notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Waiting for its scheduled time.
    Scheduled,
    /// Delivered.
    Sent,
    /// Delivery failed.
    Failed,
}

/// A notification queued for delivery at a scheduled time.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,

    /// The event this notification concerns.
    pub event_id: EventId,

    /// Target attendee. `None` means the notification is event-wide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_id: Option<AttendeeId>,

    /// Short headline.
    pub title: String,

    /// Body text.
    pub message: String,

    /// When the notification should be delivered.
    pub scheduled_time: DateTime<Utc>,

    /// Notification kind.
    #[serde(rename = "type")]
    pub kind: NotificationKind,

    /// Delivery state.
    pub status: NotificationStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification in the `scheduled` state.
    #[must_use]
    pub fn new(
        event_id: EventId,
        attendee_id: Option<AttendeeId>,
        title: String,
        message: String,
        scheduled_time: DateTime<Utc>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            event_id,
            attendee_id,
            title,
            message,
            scheduled_time,
            kind,
            status: NotificationStatus::Scheduled,
            created_at: Utc::now(),
        }
    }

    /// Builds the standard pre-event reminder for one attendee.
    #[must_use]
    pub fn reminder(
        event_id: EventId,
        event_title: &str,
        attendee_id: AttendeeId,
        days_before: u32,
        scheduled_time: DateTime<Utc>,
    ) -> Self {
        let when = if days_before == 1 {
            "tomorrow".to_string()
        } else {
            format!("in {days_before} days")
        };
        Self::new(
            event_id,
            Some(attendee_id),
            format!("Event Reminder: {event_title}"),
            format!("Don't forget! {event_title} is {when}. Make sure you're ready!"),
            scheduled_time,
            NotificationKind::EventReminder,
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn reminder_one_day_says_tomorrow() {
        let n = Notification::reminder(
            EventId::new(),
            "Tech Conference 2026",
            AttendeeId::new(),
            1,
            Utc::now(),
        );
        assert_eq!(n.title, "Event Reminder: Tech Conference 2026");
        assert!(n.message.contains("is tomorrow"));
        assert_eq!(n.status, NotificationStatus::Scheduled);
        assert_eq!(n.kind, NotificationKind::EventReminder);
    }

    #[test]
    fn reminder_multiple_days_counts_them() {
        let n = Notification::reminder(
            EventId::new(),
            "Startup Pitch Day",
            AttendeeId::new(),
            3,
            Utc::now(),
        );
        assert!(n.message.contains("is in 3 days"));
    }

    #[test]
    fn kind_serializes_as_type_field() {
        let n = Notification::new(
            EventId::new(),
            None,
            "t".to_string(),
            "m".to_string(),
            Utc::now(),
            NotificationKind::General,
        );
        let Ok(json) = serde_json::to_value(&n) else {
            panic!("serialization failed");
        };
        assert_eq!(
            json.get("type").and_then(|v| v.as_str()),
            Some("general")
        );
        assert!(json.get("attendee_id").is_none());
    }
}
