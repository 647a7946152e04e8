//! Check-in DTOs for the verification endpoint.

use serde::Deserialize;

/// Request body for `POST /checkin/verify`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct VerifyRequest {
    /// The scanned ticket token, exactly as read from the QR code.
    pub token: String,
}
