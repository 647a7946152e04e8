//! Attendee handlers: registration, listing, ticket issuance, and
//! notification preferences.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AttendeeListResponse, EventFilterParams, PaginationParams, RegisterAttendeeRequest,
};
use crate::app_state::AppState;
use crate::domain::{Attendee, AttendeeId, AttendeePatch, EventId, NotificationPreferences};
use crate::error::{ErrorResponse, ServerError};

/// `POST /attendees` — Register an attendee for an event.
///
/// # Errors
///
/// Returns [`ServerError::EventNotFound`] if the referenced event does
/// not exist.
#[utoipa::path(
    post,
    path = "/api/v1/attendees",
    tag = "Attendees",
    summary = "Register an attendee",
    description = "Registers an attendee for an existing event. The attendee starts unverified; a paid registration is issued its ticket token immediately, an unpaid one on payment confirmation.",
    request_body = RegisterAttendeeRequest,
    responses(
        (status = 201, description = "Attendee registered", body = Attendee),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn register_attendee(
    State(state): State<AppState>,
    Json(req): Json<RegisterAttendeeRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let attendee = state.attendees.register(req.into_attendee()).await?;
    Ok((StatusCode::CREATED, Json(attendee)))
}

/// `GET /attendees` — List attendees with pagination and optional
/// event filter.
#[utoipa::path(
    get,
    path = "/api/v1/attendees",
    tag = "Attendees",
    summary = "List attendees",
    description = "Returns a paginated list of attendees, optionally narrowed to one event.",
    params(PaginationParams, EventFilterParams),
    responses(
        (status = 200, description = "Paginated attendee list", body = AttendeeListResponse),
    )
)]
pub async fn list_attendees(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<EventFilterParams>,
) -> impl IntoResponse {
    let attendees = state
        .attendees
        .list(filter.event_id.map(EventId::from_uuid))
        .await;
    let (data, pagination) = params.paginate(attendees);
    Json(AttendeeListResponse { data, pagination })
}

/// `GET /attendees/:id` — Get a single attendee.
///
/// # Errors
///
/// Returns [`ServerError::AttendeeNotFound`] if the attendee does not
/// exist.
#[utoipa::path(
    get,
    path = "/api/v1/attendees/{id}",
    tag = "Attendees",
    summary = "Get attendee details",
    description = "Returns the full attendee record, including the stored ticket token when one has been issued.",
    params(
        ("id" = uuid::Uuid, Path, description = "Attendee UUID"),
    ),
    responses(
        (status = 200, description = "Attendee details", body = Attendee),
        (status = 404, description = "Attendee not found", body = ErrorResponse),
    )
)]
pub async fn get_attendee(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let attendee = state.attendees.get(AttendeeId::from_uuid(id)).await?;
    Ok(Json(attendee))
}

/// `PATCH /attendees/:id` — Partially update an attendee.
///
/// # Errors
///
/// Returns [`ServerError::AttendeeNotFound`] if the attendee does not
/// exist.
#[utoipa::path(
    patch,
    path = "/api/v1/attendees/{id}",
    tag = "Attendees",
    summary = "Update an attendee",
    description = "Applies a partial update to name, email, or payment state. Confirming payment issues the ticket token if absent. Verification state moves only through check-in.",
    params(
        ("id" = uuid::Uuid, Path, description = "Attendee UUID"),
    ),
    request_body = AttendeePatch,
    responses(
        (status = 200, description = "Updated attendee", body = Attendee),
        (status = 404, description = "Attendee not found", body = ErrorResponse),
    )
)]
pub async fn update_attendee(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(patch): Json<AttendeePatch>,
) -> Result<impl IntoResponse, ServerError> {
    let attendee = state
        .attendees
        .update(AttendeeId::from_uuid(id), patch)
        .await?;
    Ok(Json(attendee))
}

/// `DELETE /attendees/:id` — Remove an attendee.
///
/// # Errors
///
/// Returns [`ServerError::AttendeeNotFound`] if the attendee does not
/// exist.
#[utoipa::path(
    delete,
    path = "/api/v1/attendees/{id}",
    tag = "Attendees",
    summary = "Remove an attendee",
    params(
        ("id" = uuid::Uuid, Path, description = "Attendee UUID"),
    ),
    responses(
        (status = 204, description = "Attendee removed"),
        (status = 404, description = "Attendee not found", body = ErrorResponse),
    )
)]
pub async fn delete_attendee(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    state.attendees.remove(AttendeeId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /attendees/:id/ticket` — Issue a signed ticket token.
///
/// # Errors
///
/// Returns [`ServerError::AttendeeNotFound`] if the attendee does not
/// exist.
#[utoipa::path(
    post,
    path = "/api/v1/attendees/{id}/ticket",
    tag = "Attendees",
    summary = "Issue a ticket token",
    description = "Signs the attendee and event ids into a ticket token and stores it on the record. The client renders the token as a QR code.",
    params(
        ("id" = uuid::Uuid, Path, description = "Attendee UUID"),
    ),
    responses(
        (status = 200, description = "Attendee with stored ticket token", body = Attendee),
        (status = 404, description = "Attendee not found", body = ErrorResponse),
    )
)]
pub async fn issue_ticket(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let attendee = state.attendees.issue_ticket(AttendeeId::from_uuid(id)).await?;
    Ok(Json(attendee))
}

/// `GET /attendees/:id/preferences` — Get notification preferences.
///
/// # Errors
///
/// Returns [`ServerError::AttendeeNotFound`] if the attendee does not
/// exist.
#[utoipa::path(
    get,
    path = "/api/v1/attendees/{id}/preferences",
    tag = "Attendees",
    summary = "Get notification preferences",
    params(
        ("id" = uuid::Uuid, Path, description = "Attendee UUID"),
    ),
    responses(
        (status = 200, description = "Notification preferences", body = NotificationPreferences),
        (status = 404, description = "Attendee not found", body = ErrorResponse),
    )
)]
pub async fn get_preferences(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let prefs = state.attendees.preferences(AttendeeId::from_uuid(id)).await?;
    Ok(Json(prefs))
}

/// `PUT /attendees/:id/preferences` — Replace notification preferences.
///
/// # Errors
///
/// Returns [`ServerError::AttendeeNotFound`] if the attendee does not
/// exist.
#[utoipa::path(
    put,
    path = "/api/v1/attendees/{id}/preferences",
    tag = "Attendees",
    summary = "Replace notification preferences",
    description = "Replaces the attendee's notification opt-ins. Fields left out of the body fall back to opted-in defaults.",
    params(
        ("id" = uuid::Uuid, Path, description = "Attendee UUID"),
    ),
    request_body = NotificationPreferences,
    responses(
        (status = 200, description = "Updated attendee", body = Attendee),
        (status = 404, description = "Attendee not found", body = ErrorResponse),
    )
)]
pub async fn put_preferences(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(preferences): Json<NotificationPreferences>,
) -> Result<impl IntoResponse, ServerError> {
    let attendee = state
        .attendees
        .update_preferences(AttendeeId::from_uuid(id), preferences)
        .await?;
    Ok(Json(attendee))
}

/// Attendee management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/attendees",
            post(register_attendee).get(list_attendees),
        )
        .route(
            "/attendees/{id}",
            get(get_attendee)
                .patch(update_attendee)
                .delete(delete_attendee),
        )
        .route("/attendees/{id}/ticket", post(issue_ticket))
        .route(
            "/attendees/{id}/preferences",
            get(get_preferences).put(put_preferences),
        )
}
