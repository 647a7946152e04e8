//! Check-in handlers: token verification and the scan history.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::VerifyRequest;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ServerError};
use crate::service::VerificationOutcome;

/// `POST /checkin/verify` — Verify a scanned ticket token.
///
/// Rejections are not errors: a malformed token, an unknown event or
/// attendee, an unpaid registration, and a duplicate scan all return
/// `200` with `success: false` and a descriptive message. Only a store
/// failure produces an error status.
///
/// # Errors
///
/// Returns [`ServerError::PersistenceError`] if marking the attendee
/// verified cannot be persisted; no verification is recorded in that
/// case and the scan can be retried.
#[utoipa::path(
    post,
    path = "/api/v1/checkin/verify",
    tag = "Check-in",
    summary = "Verify a ticket token",
    description = "Runs the door check for one scanned token: resolve the event, resolve the attendee, require confirmed payment, reject duplicates, and mark the attendee verified exactly once.",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification outcome, successful or not", body = VerificationOutcome),
        (status = 500, description = "Store rewrite failed", body = ErrorResponse),
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let outcome = state.checkin.verify(&req.token).await?;
    Ok(Json(outcome))
}

/// `GET /checkin/history` — Recent verification outcomes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/checkin/history",
    tag = "Check-in",
    summary = "Recent scan history",
    description = "Returns the last ten verification outcomes, newest first. The history is in-memory and resets on restart.",
    responses(
        (status = 200, description = "Recent outcomes", body = Vec<VerificationOutcome>),
    )
)]
pub async fn history(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.checkin.history().await)
}

/// Check-in routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/checkin/verify", post(verify))
        .route("/checkin/history", get(history))
}
