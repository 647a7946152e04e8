//! Attendee DTOs for registration and listing.

use serde::{Deserialize, Serialize};

use super::common_dto::PaginationMeta;
use crate::domain::{Attendee, EventId};

/// Request body for `POST /attendees`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterAttendeeRequest {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// The event to register for.
    pub event_id: EventId,
    /// Whether payment is already confirmed (defaults to false).
    #[serde(default)]
    pub paid: bool,
}

impl RegisterAttendeeRequest {
    /// Builds the domain record with a fresh id.
    #[must_use]
    pub fn into_attendee(self) -> Attendee {
        Attendee::new(self.name, self.email, self.event_id, self.paid)
    }
}

/// Paginated list response for `GET /attendees`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AttendeeListResponse {
    /// Attendees on this page.
    pub data: Vec<Attendee>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Event filter for `GET /attendees`, combined with [`super::PaginationParams`].
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct EventFilterParams {
    /// Restrict to records belonging to one event.
    #[serde(default)]
    pub event_id: Option<uuid::Uuid>,
}
