//! Server error types with HTTP status code mapping.
//!
//! [`ServerError`] is the central error type for the backend. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//!
//! Check-in rejections (malformed token, unknown event or attendee, unpaid
//! ticket, duplicate scan) are not errors. They travel as negative
//! verification outcomes inside a 200 response; only infrastructure faults
//! surface here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "event not found: 0a8b...",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ServerError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status                |
/// |-----------|------------|----------------------------|
/// | 1000–1999 | Validation | 400 Bad Request            |
/// | 2000–2999 | Not Found  | 404 Not Found              |
/// | 3000–3999 | Server     | 500 Internal Server Error  |
/// | 4000–4999 | Access     | 401 Unauthorized           |
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Event with the given ID was not found.
    #[error("event not found: {0}")]
    EventNotFound(uuid::Uuid),

    /// Attendee with the given ID was not found.
    #[error("attendee not found: {0}")]
    AttendeeNotFound(uuid::Uuid),

    /// Sponsor with the given ID was not found.
    #[error("sponsor not found: {0}")]
    SponsorNotFound(uuid::Uuid),

    /// Budget item with the given ID was not found.
    #[error("budget item not found: {0}")]
    BudgetNotFound(uuid::Uuid),

    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    TaskNotFound(uuid::Uuid),

    /// Notification with the given ID was not found.
    #[error("notification not found: {0}")]
    NotificationNotFound(uuid::Uuid),

    /// Sponsor portal password did not match the event's password.
    #[error("sponsor access denied for event {0}")]
    SponsorAccessDenied(uuid::Uuid),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::EventNotFound(_) => 2001,
            Self::AttendeeNotFound(_) => 2002,
            Self::SponsorNotFound(_) => 2003,
            Self::BudgetNotFound(_) => 2004,
            Self::TaskNotFound(_) => 2005,
            Self::NotificationNotFound(_) => 2006,
            Self::SponsorAccessDenied(_) => 4001,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_)
            | Self::AttendeeNotFound(_)
            | Self::SponsorNotFound(_)
            | Self::BudgetNotFound(_)
            | Self::TaskNotFound(_)
            | Self::NotificationNotFound(_) => StatusCode::NOT_FOUND,
            Self::SponsorAccessDenied(_) => StatusCode::UNAUTHORIZED,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
