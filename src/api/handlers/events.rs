//! Event CRUD handlers: create, list, get, patch, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateEventRequest, EventListResponse, PaginationParams};
use crate::app_state::AppState;
use crate::domain::{Event, EventId, EventPatch};
use crate::error::{ErrorResponse, ServerError};

/// `POST /events` — Create a new event.
///
/// # Errors
///
/// Returns [`ServerError::PersistenceError`] if the store rewrite fails.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create a new event",
    description = "Creates an event with a server-generated id and sponsor password. The password gates the sponsor analytics endpoint and is only returned here and on direct event reads.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 500, description = "Store rewrite failed", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let event = state.events.create(req.into_event()).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /events` — List all events with pagination.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns a paginated list of all events.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated event list", body = EventListResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> impl IntoResponse {
    let events = state.events.list().await;
    let (data, pagination) = params.paginate(events);
    Json(EventListResponse { data, pagination })
}

/// `GET /events/:id` — Get a single event.
///
/// # Errors
///
/// Returns [`ServerError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get event details",
    description = "Returns the full event record, including the sponsor password for organizer use.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event details", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let event = state.events.get(EventId::from_uuid(id)).await?;
    Ok(Json(event))
}

/// `PATCH /events/:id` — Partially update an event.
///
/// # Errors
///
/// Returns [`ServerError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Update an event",
    description = "Applies a partial update. Absent fields keep their value; the sponsor password cannot be changed through this endpoint.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = EventPatch,
    responses(
        (status = 200, description = "Updated event", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(patch): Json<EventPatch>,
) -> Result<impl IntoResponse, ServerError> {
    let event = state.events.update(EventId::from_uuid(id), patch).await?;
    Ok(Json(event))
}

/// `DELETE /events/:id` — Remove an event and its attendees and sponsors.
///
/// # Errors
///
/// Returns [`ServerError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Removes the event together with its attendees and sponsors. Budget lines, tasks, and notifications are kept.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    state.events.delete(EventId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Event management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/{id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
}
