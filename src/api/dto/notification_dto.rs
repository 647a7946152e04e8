//! Notification DTOs for scheduling and the reminder fan-out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common_dto::PaginationMeta;
use crate::domain::{
    AttendeeId, EventId, Notification, NotificationKind, NotificationStatus,
};

/// Request body for `POST /notifications`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ScheduleNotificationRequest {
    /// The event this notification concerns.
    pub event_id: EventId,
    /// Target attendee, if attendee-specific.
    #[serde(default)]
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
}

impl ScheduleNotificationRequest {
    /// Builds the domain record in the `scheduled` state.
    #[must_use]
    pub fn into_notification(self) -> Notification {
        Notification::new(
            self.event_id,
            self.attendee_id,
            self.title,
            self.message,
            self.scheduled_time,
            self.kind,
        )
    }
}

/// Request body for `POST /events/{id}/reminders`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ScheduleRemindersRequest {
    /// How many days before the event the reminder should fire.
    /// Defaults to 1.
    #[serde(default = "default_days_before")]
    pub days_before: u32,
}

fn default_days_before() -> u32 {
    1
}

impl Default for ScheduleRemindersRequest {
    fn default() -> Self {
        Self {
            days_before: default_days_before(),
        }
    }
}

/// Response body for the reminder fan-out.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ScheduleRemindersResponse {
    /// Whether the fan-out ran (an empty batch is still a success).
    pub success: bool,
    /// How many reminders were queued.
    pub scheduled: usize,
    /// The queued reminder records.
    pub notifications: Vec<Notification>,
}

/// Request body for `PATCH /notifications/{id}`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateNotificationStatusRequest {
    /// New delivery status.
    pub status: NotificationStatus,
}

/// Paginated list response for `GET /notifications`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct NotificationListResponse {
    /// Notifications on this page.
    pub data: Vec<Notification>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Filters for `GET /notifications`.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct NotificationFilterParams {
    /// Restrict to notifications of one event.
    #[serde(default)]
    pub event_id: Option<uuid::Uuid>,
    /// Restrict to one attendee's view: their own notifications plus
    /// every event-wide broadcast.
    #[serde(default)]
    pub attendee_id: Option<uuid::Uuid>,
    /// Restrict to one delivery status.
    #[serde(default)]
    pub status: Option<NotificationStatus>,
}
