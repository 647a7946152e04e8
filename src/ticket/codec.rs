//! Signed ticket issuance and parsing.
//!
//! Signed tokens look like `PLV2.<payload>.<tag>` where both segments
//! are unpadded base64url: the payload is a JSON [`SignedPayload`] and
//! the tag is an HMAC-SHA256 over the payload segment's transmitted
//! bytes. Signing the encoded segment (rather than the decoded JSON)
//! sidesteps canonicalization entirely.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::{AttendeeId, EventId};
use crate::error::ServerError;

use super::token::{SignedPayload, TicketToken, TokenError, parse_legacy};

type HmacSha256 = Hmac<Sha256>;

/// Version prefix of signed tokens.
pub const SIGNED_PREFIX: &str = "PLV2";

/// Issues and parses ticket tokens with one shared signing key.
///
/// Parsing dispatches on the version prefix: a `PLV2.` token is verified
/// strictly (no fallback to the legacy format on failure), anything else
/// goes through the legacy parser.
#[derive(Clone)]
pub struct TicketCodec {
    key: Vec<u8>,
}

impl TicketCodec {
    /// Creates a codec signing with `key`.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Issues a signed token for one attendee of one event.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Internal`] if the HMAC rejects the signing
    /// key, which cannot happen for HMAC-SHA256 with any key length.
    pub fn issue(
        &self,
        attendee_id: AttendeeId,
        event_id: EventId,
        issued_at: DateTime<Utc>,
    ) -> Result<String, ServerError> {
        let payload = SignedPayload {
            attendee_id,
            event_id,
            issued_at,
        };
        let json = serde_json::to_vec(&payload)
            .map_err(|e| ServerError::Internal(format!("encode ticket payload: {e}")))?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(json);
        let tag_b64 = URL_SAFE_NO_PAD.encode(self.tag_for(payload_b64.as_bytes())?);
        Ok(format!("{SIGNED_PREFIX}.{payload_b64}.{tag_b64}"))
    }

    /// Parses a raw scanned string into a [`TicketToken`].
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing why the token was not
    /// accepted: too few legacy fields, an invalid signed structure, or
    /// a signature that does not verify.
    pub fn parse(&self, raw: &str) -> Result<TicketToken, TokenError> {
        let signed_rest = raw
            .strip_prefix(SIGNED_PREFIX)
            .and_then(|r| r.strip_prefix('.'));
        match signed_rest {
            Some(rest) => self.parse_signed(rest).map(TicketToken::Signed),
            None => parse_legacy(raw),
        }
    }

    /// Verifies and decodes the two segments after the version prefix.
    fn parse_signed(&self, rest: &str) -> Result<SignedPayload, TokenError> {
        let mut segments = rest.split('.');
        let (Some(payload_b64), Some(tag_b64), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(TokenError::InvalidStructure(
                "expected exactly two segments after the version prefix".to_string(),
            ));
        };

        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|e| TokenError::InvalidStructure(format!("tag encoding: {e}")))?;

        // Verify before decoding the payload; only authenticated bytes
        // get parsed.
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|_| TokenError::SignatureMismatch)?;
        mac.update(payload_b64.as_bytes());
        if mac.verify_slice(&tag).is_err() {
            return Err(TokenError::SignatureMismatch);
        }

        let json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|e| TokenError::InvalidStructure(format!("payload encoding: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| TokenError::InvalidStructure(format!("payload: {e}")))
    }

    /// Computes the HMAC tag over `bytes`.
    fn tag_for(&self, bytes: &[u8]) -> Result<Vec<u8>, ServerError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| ServerError::Internal(format!("hmac key: {e}")))?;
        mac.update(bytes);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl fmt::Debug for TicketCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the signing key.
        f.debug_struct("TicketCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn codec() -> TicketCodec {
        TicketCodec::new("test-signing-key")
    }

    #[test]
    fn issue_then_parse_round_trips() {
        let attendee_id = AttendeeId::new();
        let event_id = EventId::new();
        let issued_at = Utc::now();

        let Ok(raw) = codec().issue(attendee_id, event_id, issued_at) else {
            panic!("issue failed");
        };
        assert!(raw.starts_with("PLV2."));

        let Ok(TicketToken::Signed(payload)) = codec().parse(&raw) else {
            panic!("expected signed token");
        };
        assert_eq!(payload.attendee_id, attendee_id);
        assert_eq!(payload.event_id, event_id);
    }

    #[test]
    fn underscores_in_names_cannot_corrupt_signed_tokens() {
        // Signed tokens carry ids, not display names, and the parser
        // never splits them on underscores, so the legacy delimiter
        // problem cannot occur by construction.
        let Ok(raw) = codec().issue(AttendeeId::new(), EventId::new(), Utc::now()) else {
            panic!("issue failed");
        };
        let Ok(TicketToken::Signed(_)) = codec().parse(&raw) else {
            panic!("expected signed token");
        };
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let Ok(raw) = codec().issue(AttendeeId::new(), EventId::new(), Utc::now()) else {
            panic!("issue failed");
        };
        // The payload segment of a JSON object always starts with "ey".
        let tampered = raw.replacen("PLV2.ey", "PLV2.fy", 1);
        assert_ne!(raw, tampered);
        assert_eq!(codec().parse(&tampered), Err(TokenError::SignatureMismatch));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let Ok(raw) = codec().issue(AttendeeId::new(), EventId::new(), Utc::now()) else {
            panic!("issue failed");
        };
        let other = TicketCodec::new("another-key");
        assert_eq!(other.parse(&raw), Err(TokenError::SignatureMismatch));
    }

    #[test]
    fn wrong_segment_count_is_invalid() {
        let result = codec().parse("PLV2.onlypayload");
        assert!(matches!(result, Err(TokenError::InvalidStructure(_))));
        let result = codec().parse("PLV2.a.b.c");
        assert!(matches!(result, Err(TokenError::InvalidStructure(_))));
    }

    #[test]
    fn prefixed_garbage_never_falls_back_to_legacy() {
        // A PLV2 token must verify or fail; it is never reinterpreted
        // as a legacy title/name/timestamp triple.
        let result = codec().parse("PLV2.not_base64__but_has_underscores.x");
        assert!(result.is_err());
    }

    #[test]
    fn unprefixed_tokens_use_the_legacy_parser() {
        let Ok(TicketToken::Legacy { event_title, .. }) =
            codec().parse("TechConf_John_1700000000000")
        else {
            panic!("expected legacy token");
        };
        assert_eq!(event_title, "TechConf");
    }
}
