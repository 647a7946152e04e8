//! Type-safe resource identifiers.
//!
//! Every stored entity gets its own newtype wrapper around [`uuid::Uuid`]
//! (v4) so identifiers for different resources cannot be confused. Signed
//! ticket tokens embed these ids, which is what lets a scan resolve an
//! attendee without consulting display names.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Creates an identifier from an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an event.
    ///
    /// Generated once at event creation time and immutable thereafter.
    /// Embedded in signed ticket tokens and used as the WebSocket
    /// subscription target.
    EventId
}

define_id! {
    /// Unique identifier for an attendee.
    ///
    /// Embedded in signed ticket tokens so verification is keyed on
    /// identity rather than on the attendee's current display name.
    AttendeeId
}

define_id! {
    /// Unique identifier for a sponsor.
    SponsorId
}

define_id! {
    /// Unique identifier for a budget line.
    BudgetItemId
}

define_id! {
    /// Unique identifier for a task.
    TaskId
}

define_id! {
    /// Unique identifier for a scheduled notification.
    NotificationId
}
