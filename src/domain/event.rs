//! Event record and sponsor password generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EventId;

/// Characters allowed in generated sponsor passwords.
const PASSWORD_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated sponsor passwords.
const PASSWORD_LEN: usize = 8;

/// A managed event.
///
/// The `sponsor_password` is generated server-side at creation time and
/// gates the sponsor analytics endpoint. `title` is display data only;
/// signed ticket tokens reference the event by `id`, so retitling an
/// event does not invalidate issued tickets.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Event {
    /// Unique event identifier (immutable after creation).
    pub id: EventId,

    /// Display title.
    pub title: String,

    /// When the event takes place.
    pub date: DateTime<Utc>,

    /// Venue description.
    pub venue: String,

    /// Ticket price in the organizer's currency.
    pub ticket_price: f64,

    /// Free-form event description.
    pub description: String,

    /// Password gating the sponsor analytics view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor_password: Option<String>,

    /// Optional overall budget cap for the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_limit: Option<f64>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event with a fresh id and generated sponsor password.
    #[must_use]
    pub fn new(
        title: String,
        date: DateTime<Utc>,
        venue: String,
        ticket_price: f64,
        description: String,
        budget_limit: Option<f64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            title,
            date,
            venue,
            ticket_price,
            description,
            sponsor_password: Some(generate_sponsor_password()),
            budget_limit,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update to an [`Event`].
///
/// Absent fields keep their current value. The sponsor password is
/// deliberately not patchable; it stays server-managed for the whole
/// life of the event.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct EventPatch {
    /// New display title.
    pub title: Option<String>,
    /// New date.
    pub date: Option<DateTime<Utc>>,
    /// New venue.
    pub venue: Option<String>,
    /// New ticket price.
    pub ticket_price: Option<f64>,
    /// New description.
    pub description: Option<String>,
    /// New overall budget cap.
    pub budget_limit: Option<f64>,
}

impl EventPatch {
    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title.clone_from(title);
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(venue) = &self.venue {
            event.venue.clone_from(venue);
        }
        if let Some(price) = self.ticket_price {
            event.ticket_price = price;
        }
        if let Some(description) = &self.description {
            event.description.clone_from(description);
        }
        if let Some(limit) = self.budget_limit {
            event.budget_limit = Some(limit);
        }
        event.updated_at = Utc::now();
    }
}

/// Generates an 8-character uppercase alphanumeric sponsor password.
#[must_use]
pub fn generate_sponsor_password() -> String {
    use rand::seq::SliceRandom;

    let mut rng = rand::thread_rng();
    (0..PASSWORD_LEN)
        .filter_map(|_| PASSWORD_CHARS.choose(&mut rng))
        .map(|&b| char::from(b))
        .collect()
}
