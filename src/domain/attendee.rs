//! Attendee record and notification preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AttendeeId, EventId};

/// Per-attendee notification opt-ins.
///
/// Stored inline on the attendee record. Absent fields default to
/// opted-in so that records written before this feature existed keep
/// receiving reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NotificationPreferences {
    /// Receive reminders ahead of events.
    #[serde(default = "default_true")]
    pub event_reminders: bool,

    /// Receive notifications when event details change.
    #[serde(default = "default_true")]
    pub event_updates: bool,

    /// Receive general announcements.
    #[serde(default = "default_true")]
    pub general_notifications: bool,

    /// How many days before an event the reminder should fire.
    #[serde(default = "default_reminder_days")]
    pub reminder_days_before: u32,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            event_reminders: true,
            event_updates: true,
            general_notifications: true,
            reminder_days_before: 1,
        }
    }
}

fn default_true() -> bool {
    true
}

const fn default_reminder_days() -> u32 {
    1
}

/// A registered attendee of a single event.
///
/// `verified` is monotonic: it transitions false to true exactly once via
/// [`Attendee::mark_verified`] and nothing in this codebase resets it.
/// `paid` must be true before verification can succeed.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Attendee {
    /// Unique attendee identifier (immutable after creation).
    pub id: AttendeeId,

    /// Display name. May change after ticket issuance.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// The event this attendee registered for.
    pub event_id: EventId,

    /// Whether payment has been confirmed.
    pub paid: bool,

    /// Payment reference from the external payment collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,

    /// Issued ticket token, rendered client-side as a QR code.
    /// Serialized as `qr_code`, the name the data files have always
    /// used.
    #[serde(rename = "qr_code", skip_serializing_if = "Option::is_none")]
    pub ticket_token: Option<String>,

    /// Whether this attendee has been checked in.
    #[serde(default)]
    pub verified: bool,

    /// When the check-in happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,

    /// Notification opt-ins.
    #[serde(default)]
    pub notification_preferences: NotificationPreferences,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

impl Attendee {
    /// Creates a new unverified attendee for the given event.
    #[must_use]
    pub fn new(name: String, email: String, event_id: EventId, paid: bool) -> Self {
        let now = Utc::now();
        Self {
            id: AttendeeId::new(),
            name,
            email,
            event_id,
            paid,
            payment_id: None,
            ticket_token: None,
            verified: false,
            verified_at: None,
            notification_preferences: NotificationPreferences::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks this attendee as checked in at `at`.
    ///
    /// Only ever sets `verified` to true. A repeated call cannot reset
    /// the flag and keeps the original `verified_at`.
    pub fn mark_verified(&mut self, at: DateTime<Utc>) {
        if !self.verified {
            self.verified = true;
            self.verified_at = Some(at);
        }
        self.updated_at = at;
    }
}

/// Partial update to an [`Attendee`].
///
/// Absent fields keep their current value. Verification state and the
/// issued token are not patchable; they only move through check-in and
/// ticket issuance.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct AttendeePatch {
    /// New display name.
    pub name: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// New payment state.
    pub paid: Option<bool>,
    /// New payment reference.
    pub payment_id: Option<String>,
}

impl AttendeePatch {
    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply_to(&self, attendee: &mut Attendee) {
        if let Some(name) = &self.name {
            attendee.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            attendee.email.clone_from(email);
        }
        if let Some(paid) = self.paid {
            attendee.paid = paid;
        }
        if let Some(payment_id) = &self.payment_id {
            attendee.payment_id = Some(payment_id.clone());
        }
        attendee.updated_at = Utc::now();
    }
}
