//! Ticket tokens: the legacy unsigned format and the signed `PLV2`
//! format.
//!
//! New tickets are issued signed; the legacy format stays parseable so
//! QR codes printed before the cutover keep working at the door.

pub mod codec;
pub mod token;

pub use codec::{SIGNED_PREFIX, TicketCodec};
pub use token::{SignedPayload, TicketToken, TokenError, encode_legacy, parse_legacy};
