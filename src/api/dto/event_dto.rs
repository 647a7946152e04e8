//! Event DTOs for create, list, and sponsor access operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common_dto::PaginationMeta;
use crate::domain::{Event, EventId, Sponsor};

/// Request body for `POST /events`.
///
/// The sponsor password is not part of the request; the server
/// generates one at creation time.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    /// Display title.
    pub title: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Venue description.
    pub venue: String,
    /// Ticket price in the organizer's currency.
    pub ticket_price: f64,
    /// Free-form event description.
    #[serde(default)]
    pub description: String,
    /// Optional overall budget cap.
    #[serde(default)]
    pub budget_limit: Option<f64>,
}

impl CreateEventRequest {
    /// Builds the domain record, generating id and sponsor password.
    #[must_use]
    pub fn into_event(self) -> Event {
        Event::new(
            self.title,
            self.date,
            self.venue,
            self.ticket_price,
            self.description,
            self.budget_limit,
        )
    }
}

/// Paginated list response for `GET /events`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EventListResponse {
    /// Events on this page.
    pub data: Vec<Event>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Request body for `POST /events/{id}/sponsor-access`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SponsorAccessRequest {
    /// The event's sponsor password.
    pub password: String,
}

/// Response body for a successful sponsor access check.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SponsorAccessResponse {
    /// The event the password unlocked.
    pub event_id: EventId,
    /// Sponsors of that event with their engagement metrics.
    pub sponsors: Vec<Sponsor>,
}
