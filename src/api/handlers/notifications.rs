//! Notification handlers: scheduling, the reminder fan-out, and
//! delivery status updates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    NotificationFilterParams, NotificationListResponse, PaginationParams,
    ScheduleNotificationRequest, ScheduleRemindersRequest, ScheduleRemindersResponse,
    UpdateNotificationStatusRequest,
};
use crate::app_state::AppState;
use crate::domain::{AttendeeId, EventId, Notification, NotificationId};
use crate::error::{ErrorResponse, ServerError};

/// `POST /notifications` — Queue a notification.
///
/// # Errors
///
/// Returns [`ServerError::EventNotFound`] if the referenced event does
/// not exist.
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    tag = "Notifications",
    summary = "Schedule a notification",
    description = "Queues a notification in the scheduled state. The background scheduler delivers it once its time arrives.",
    request_body = ScheduleNotificationRequest,
    responses(
        (status = 201, description = "Notification scheduled", body = Notification),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn schedule_notification(
    State(state): State<AppState>,
    Json(req): Json<ScheduleNotificationRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let notification = state.notifications.schedule(req.into_notification()).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// `POST /events/:id/reminders` — Schedule the standard pre-event
/// reminder for every opted-in attendee.
///
/// # Errors
///
/// Returns [`ServerError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/reminders",
    tag = "Notifications",
    summary = "Schedule event reminders",
    description = "Queues one reminder per opted-in attendee, firing at 09:00 UTC the given number of days before the event (1 when the body is omitted). If that moment already passed, the batch is empty.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = ScheduleRemindersRequest,
    responses(
        (status = 200, description = "Fan-out result", body = ScheduleRemindersResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn schedule_reminders(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    body: Option<Json<ScheduleRemindersRequest>>,
) -> Result<impl IntoResponse, ServerError> {
    let req = body.map_or_else(ScheduleRemindersRequest::default, |Json(r)| r);
    let notifications = state
        .notifications
        .schedule_event_reminders(EventId::from_uuid(id), req.days_before)
        .await?;
    Ok(Json(ScheduleRemindersResponse {
        success: true,
        scheduled: notifications.len(),
        notifications,
    }))
}

/// `GET /notifications` — List notifications with filters and
/// pagination.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "Notifications",
    summary = "List notifications",
    params(PaginationParams, NotificationFilterParams),
    responses(
        (status = 200, description = "Paginated notification list", body = NotificationListResponse),
    )
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<NotificationFilterParams>,
) -> impl IntoResponse {
    let notifications = state
        .notifications
        .list(
            filter.event_id.map(EventId::from_uuid),
            filter.attendee_id.map(AttendeeId::from_uuid),
            filter.status,
        )
        .await;
    let (data, pagination) = params.paginate(notifications);
    Json(NotificationListResponse { data, pagination })
}

/// `GET /notifications/:id` — Get a single notification.
///
/// # Errors
///
/// Returns [`ServerError::NotificationNotFound`] if the notification
/// does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/{id}",
    tag = "Notifications",
    summary = "Get notification details",
    params(
        ("id" = uuid::Uuid, Path, description = "Notification UUID"),
    ),
    responses(
        (status = 200, description = "Notification details", body = Notification),
        (status = 404, description = "Notification not found", body = ErrorResponse),
    )
)]
pub async fn get_notification(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let notification = state
        .notifications
        .get(NotificationId::from_uuid(id))
        .await?;
    Ok(Json(notification))
}

/// `PATCH /notifications/:id` — Set a notification's delivery status.
///
/// # Errors
///
/// Returns [`ServerError::NotificationNotFound`] if the notification
/// does not exist.
#[utoipa::path(
    patch,
    path = "/api/v1/notifications/{id}",
    tag = "Notifications",
    summary = "Update delivery status",
    params(
        ("id" = uuid::Uuid, Path, description = "Notification UUID"),
    ),
    request_body = UpdateNotificationStatusRequest,
    responses(
        (status = 200, description = "Updated notification", body = Notification),
        (status = 404, description = "Notification not found", body = ErrorResponse),
    )
)]
pub async fn update_notification(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateNotificationStatusRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let notification = state
        .notifications
        .update_status(NotificationId::from_uuid(id), req.status)
        .await?;
    Ok(Json(notification))
}

/// `DELETE /notifications/:id` — Remove a notification.
///
/// # Errors
///
/// Returns [`ServerError::NotificationNotFound`] if the notification
/// does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    tag = "Notifications",
    summary = "Remove a notification",
    params(
        ("id" = uuid::Uuid, Path, description = "Notification UUID"),
    ),
    responses(
        (status = 204, description = "Notification removed"),
        (status = 404, description = "Notification not found", body = ErrorResponse),
    )
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    state
        .notifications
        .remove(NotificationId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Notification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            post(schedule_notification).get(list_notifications),
        )
        .route(
            "/notifications/{id}",
            get(get_notification)
                .patch(update_notification)
                .delete(delete_notification),
        )
        .route("/events/{id}/reminders", post(schedule_reminders))
}
