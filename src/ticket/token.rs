//! Ticket token representations and the legacy wire format.
//!
//! Two formats circulate:
//!
//! - **Legacy**: `<EventTitle>_<AttendeeName>_<Timestamp>`, a plain
//!   unsigned string. Consumers split on `_` and take exactly the first
//!   three fields; a title or name containing the delimiter silently
//!   corrupts parsing, which is why this format is parse-only here.
//! - **Signed** (`PLV2.`-prefixed): a versioned, HMAC-signed record
//!   embedding stable ids. See [`super::TicketCodec`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AttendeeId, EventId};

/// Why a raw token string could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Legacy token with fewer than three `_`-separated fields.
    #[error("expected at least three underscore-separated fields")]
    TooFewFields,

    /// Signed token whose structure is invalid.
    #[error("invalid signed token: {0}")]
    InvalidStructure(String),

    /// Signed token whose signature does not verify.
    #[error("ticket signature mismatch")]
    SignatureMismatch,
}

/// Payload of a signed ticket token.
///
/// Identity lives in the ids: verification resolves the attendee by
/// `attendee_id`, so display-name changes and duplicate names cannot
/// misdirect a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPayload {
    /// The ticket holder.
    pub attendee_id: AttendeeId,
    /// The event this ticket admits to.
    pub event_id: EventId,
    /// When the ticket was issued.
    pub issued_at: DateTime<Utc>,
}

/// A successfully parsed ticket token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketToken {
    /// Legacy unsigned token, resolved by title and name matching.
    Legacy {
        /// First field, treated as an event title.
        event_title: String,
        /// Second field, treated as an attendee display name.
        attendee_name: String,
        /// Third field, an opaque issuance timestamp.
        timestamp: String,
    },
    /// Signed token, resolved by the embedded ids.
    Signed(SignedPayload),
}

/// Encodes a legacy token the way tickets were historically issued.
///
/// Kept for compatibility with QR codes already in the wild; new tickets
/// are issued signed.
#[must_use]
pub fn encode_legacy(event_title: &str, attendee_name: &str, issued_at: DateTime<Utc>) -> String {
    format!(
        "{event_title}_{attendee_name}_{}",
        issued_at.timestamp_millis()
    )
}

/// Parses a legacy token.
///
/// Takes exactly the first three `_`-separated fields and ignores any
/// remainder, mirroring every existing consumer of the format.
///
/// # Errors
///
/// Returns [`TokenError::TooFewFields`] when fewer than three fields are
/// present.
pub fn parse_legacy(raw: &str) -> Result<TicketToken, TokenError> {
    let mut parts = raw.split('_');
    let (Some(event_title), Some(attendee_name), Some(timestamp)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::TooFewFields);
    };
    Ok(TicketToken::Legacy {
        event_title: event_title.to_string(),
        attendee_name: attendee_name.to_string(),
        timestamp: timestamp.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_parse_legacy() {
        let issued = Utc::now();
        let raw = encode_legacy("TechConf", "John", issued);
        let Ok(TicketToken::Legacy {
            event_title,
            attendee_name,
            timestamp,
        }) = parse_legacy(&raw)
        else {
            panic!("expected legacy token");
        };
        assert_eq!(event_title, "TechConf");
        assert_eq!(attendee_name, "John");
        assert_eq!(timestamp, issued.timestamp_millis().to_string());
    }

    #[test]
    fn too_few_fields_rejected() {
        assert_eq!(parse_legacy("onlyonepart"), Err(TokenError::TooFewFields));
        assert_eq!(parse_legacy("two_parts"), Err(TokenError::TooFewFields));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let Ok(TicketToken::Legacy {
            event_title,
            attendee_name,
            timestamp,
        }) = parse_legacy("TechConf_John_1700000000000_extra_tail")
        else {
            panic!("expected legacy token");
        };
        assert_eq!(event_title, "TechConf");
        assert_eq!(attendee_name, "John");
        assert_eq!(timestamp, "1700000000000");
    }

    #[test]
    fn underscore_in_name_shears_the_fields() {
        // The documented legacy weakness: the second field is only the
        // first segment of an underscored name.
        let Ok(TicketToken::Legacy { attendee_name, .. }) =
            parse_legacy("TechConf_Mary_Jane_1700000000000")
        else {
            panic!("expected legacy token");
        };
        assert_eq!(attendee_name, "Mary");
    }
}
