//! Sponsor handlers: roster CRUD and the password-gated analytics view.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CreateSponsorRequest, EventFilterParams, SponsorAccessRequest, SponsorAccessResponse,
};
use crate::app_state::AppState;
use crate::domain::{EventId, Sponsor, SponsorId, SponsorPatch};
use crate::error::{ErrorResponse, ServerError};

/// `POST /sponsors` — Add a sponsor to an event.
///
/// # Errors
///
/// Returns [`ServerError::EventNotFound`] if the referenced event does
/// not exist.
#[utoipa::path(
    post,
    path = "/api/v1/sponsors",
    tag = "Sponsors",
    summary = "Add a sponsor",
    request_body = CreateSponsorRequest,
    responses(
        (status = 201, description = "Sponsor added", body = Sponsor),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn create_sponsor(
    State(state): State<AppState>,
    Json(req): Json<CreateSponsorRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let sponsor = state.sponsors.create(req.into_sponsor()).await?;
    Ok((StatusCode::CREATED, Json(sponsor)))
}

/// `GET /sponsors` — List sponsors, optionally for one event.
#[utoipa::path(
    get,
    path = "/api/v1/sponsors",
    tag = "Sponsors",
    summary = "List sponsors",
    params(EventFilterParams),
    responses(
        (status = 200, description = "Sponsor list", body = Vec<Sponsor>),
    )
)]
pub async fn list_sponsors(
    State(state): State<AppState>,
    Query(filter): Query<EventFilterParams>,
) -> impl IntoResponse {
    let sponsors = state
        .sponsors
        .list(filter.event_id.map(EventId::from_uuid))
        .await;
    Json(sponsors)
}

/// `GET /sponsors/:id` — Get a single sponsor.
///
/// # Errors
///
/// Returns [`ServerError::SponsorNotFound`] if the sponsor does not
/// exist.
#[utoipa::path(
    get,
    path = "/api/v1/sponsors/{id}",
    tag = "Sponsors",
    summary = "Get sponsor details",
    params(
        ("id" = uuid::Uuid, Path, description = "Sponsor UUID"),
    ),
    responses(
        (status = 200, description = "Sponsor details", body = Sponsor),
        (status = 404, description = "Sponsor not found", body = ErrorResponse),
    )
)]
pub async fn get_sponsor(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let sponsor = state.sponsors.get(SponsorId::from_uuid(id)).await?;
    Ok(Json(sponsor))
}

/// `PATCH /sponsors/:id` — Update a sponsor's metrics or name.
///
/// # Errors
///
/// Returns [`ServerError::SponsorNotFound`] if the sponsor does not
/// exist.
#[utoipa::path(
    patch,
    path = "/api/v1/sponsors/{id}",
    tag = "Sponsors",
    summary = "Update a sponsor",
    params(
        ("id" = uuid::Uuid, Path, description = "Sponsor UUID"),
    ),
    request_body = SponsorPatch,
    responses(
        (status = 200, description = "Updated sponsor", body = Sponsor),
        (status = 404, description = "Sponsor not found", body = ErrorResponse),
    )
)]
pub async fn update_sponsor(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(patch): Json<SponsorPatch>,
) -> Result<impl IntoResponse, ServerError> {
    let sponsor = state.sponsors.update(SponsorId::from_uuid(id), patch).await?;
    Ok(Json(sponsor))
}

/// `DELETE /sponsors/:id` — Remove a sponsor.
///
/// # Errors
///
/// Returns [`ServerError::SponsorNotFound`] if the sponsor does not
/// exist.
#[utoipa::path(
    delete,
    path = "/api/v1/sponsors/{id}",
    tag = "Sponsors",
    summary = "Remove a sponsor",
    params(
        ("id" = uuid::Uuid, Path, description = "Sponsor UUID"),
    ),
    responses(
        (status = 204, description = "Sponsor removed"),
        (status = 404, description = "Sponsor not found", body = ErrorResponse),
    )
)]
pub async fn delete_sponsor(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    state.sponsors.remove(SponsorId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /events/:id/sponsor-access` — Unlock the sponsor analytics
/// view with the event's sponsor password.
///
/// # Errors
///
/// Returns [`ServerError::EventNotFound`] if the event does not exist,
/// or [`ServerError::SponsorAccessDenied`] on a wrong password.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/sponsor-access",
    tag = "Sponsors",
    summary = "Unlock sponsor analytics",
    description = "Checks the event's sponsor password and returns the event's sponsors with their engagement metrics when it matches.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = SponsorAccessRequest,
    responses(
        (status = 200, description = "Password accepted", body = SponsorAccessResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn sponsor_access(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<SponsorAccessRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let event_id = EventId::from_uuid(id);
    let sponsors = state.events.sponsor_access(event_id, &req.password).await?;
    Ok(Json(SponsorAccessResponse { event_id, sponsors }))
}

/// Sponsor routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sponsors", post(create_sponsor).get(list_sponsors))
        .route(
            "/sponsors/{id}",
            get(get_sponsor).patch(update_sponsor).delete(delete_sponsor),
        )
        .route("/events/{id}/sponsor-access", post(sponsor_access))
}
