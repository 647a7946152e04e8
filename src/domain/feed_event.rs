//! Domain events reflecting state mutations.
//!
//! Every state change emits a [`FeedEvent`] through the [`super::EventBus`].
//! Events are broadcast to WebSocket subscribers, filtered per event id.
//!
//! Check-in rejections are only broadcast once the scanned token resolved
//! to an event; a malformed or unknown token has no event to route the
//! rejection to.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    AttendeeId, BudgetItemId, BudgetStatus, EventId, NotificationId, TaskId, TaskStatus,
};

/// Domain event emitted after a state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum FeedEvent {
    /// Emitted when a new event is created.
    EventCreated {
        /// Event identifier.
        event_id: EventId,
        /// Event title at creation time.
        title: String,
        /// When the event takes place.
        date: DateTime<Utc>,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when event details change.
    EventUpdated {
        /// Event identifier.
        event_id: EventId,
        /// Update timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an event is removed along with its attendees and
    /// sponsors.
    EventRemoved {
        /// Event identifier.
        event_id: EventId,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an attendee registers for an event.
    AttendeeRegistered {
        /// Event identifier.
        event_id: EventId,
        /// Attendee identifier.
        attendee_id: AttendeeId,
        /// Attendee display name at registration time.
        name: String,
        /// Registration timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a ticket token is issued to an attendee.
    TicketIssued {
        /// Event identifier.
        event_id: EventId,
        /// Attendee identifier.
        attendee_id: AttendeeId,
        /// Issuance timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a successful check-in.
    AttendeeVerified {
        /// Event identifier.
        event_id: EventId,
        /// Attendee identifier.
        attendee_id: AttendeeId,
        /// Attendee display name at scan time.
        name: String,
        /// When the check-in was recorded.
        verified_at: DateTime<Utc>,
        /// Broadcast timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a scan is rejected at the door of a known event.
    CheckInRejected {
        /// Event identifier.
        event_id: EventId,
        /// Human-readable rejection reason.
        reason: String,
        /// Rejection timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a budget line is added or its figures change.
    BudgetUpdated {
        /// Event identifier.
        event_id: EventId,
        /// Budget line identifier.
        budget_item_id: BudgetItemId,
        /// Spend category label.
        category: String,
        /// Derived status after the change.
        status: BudgetStatus,
        /// Update timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a task lands in a different kanban column.
    TaskMoved {
        /// Event identifier.
        event_id: EventId,
        /// Task identifier.
        task_id: TaskId,
        /// Column the task now sits in.
        status: TaskStatus,
        /// Move timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a notification is queued for later delivery.
    NotificationScheduled {
        /// Event identifier.
        event_id: EventId,
        /// Notification identifier.
        notification_id: NotificationId,
        /// Target attendee, if attendee-specific.
        attendee_id: Option<AttendeeId>,
        /// When the notification should be delivered.
        scheduled_time: DateTime<Utc>,
        /// Queueing timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when the scheduler delivers a due reminder.
    ReminderDue {
        /// Event identifier.
        event_id: EventId,
        /// Notification identifier.
        notification_id: NotificationId,
        /// Target attendee, if the reminder is attendee-specific.
        attendee_id: Option<AttendeeId>,
        /// Delivery timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl FeedEvent {
    /// Returns the event ID associated with this feed event.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        match self {
            Self::EventCreated { event_id, .. }
            | Self::EventUpdated { event_id, .. }
            | Self::EventRemoved { event_id, .. }
            | Self::AttendeeRegistered { event_id, .. }
            | Self::TicketIssued { event_id, .. }
            | Self::AttendeeVerified { event_id, .. }
            | Self::CheckInRejected { event_id, .. }
            | Self::BudgetUpdated { event_id, .. }
            | Self::TaskMoved { event_id, .. }
            | Self::NotificationScheduled { event_id, .. }
            | Self::ReminderDue { event_id, .. } => *event_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "event_created",
            Self::EventUpdated { .. } => "event_updated",
            Self::EventRemoved { .. } => "event_removed",
            Self::AttendeeRegistered { .. } => "attendee_registered",
            Self::TicketIssued { .. } => "ticket_issued",
            Self::AttendeeVerified { .. } => "attendee_verified",
            Self::CheckInRejected { .. } => "check_in_rejected",
            Self::BudgetUpdated { .. } => "budget_updated",
            Self::TaskMoved { .. } => "task_moved",
            Self::NotificationScheduled { .. } => "notification_scheduled",
            Self::ReminderDue { .. } => "reminder_due",
        }
    }
}
