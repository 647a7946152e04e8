//! Task handlers for the per-event kanban board.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateTaskRequest, TaskFilterParams};
use crate::app_state::AppState;
use crate::domain::{EventId, Task, TaskId, TaskPatch};
use crate::error::{ErrorResponse, ServerError};

/// `POST /tasks` — Add a task to an event's board.
///
/// # Errors
///
/// Returns [`ServerError::EventNotFound`] if the referenced event does
/// not exist.
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    tag = "Tasks",
    summary = "Add a task",
    description = "Creates a task in the todo column.",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task added", body = Task),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let task = state.tasks.create(req.into_task()).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /tasks` — List tasks, optionally filtered by event and column.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    tag = "Tasks",
    summary = "List tasks",
    params(TaskFilterParams),
    responses(
        (status = 200, description = "Task list", body = Vec<Task>),
    )
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilterParams>,
) -> impl IntoResponse {
    let tasks = state
        .tasks
        .list(filter.event_id.map(EventId::from_uuid), filter.status)
        .await;
    Json(tasks)
}

/// `GET /tasks/:id` — Get a single task.
///
/// # Errors
///
/// Returns [`ServerError::TaskNotFound`] if the task does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    summary = "Get task details",
    params(
        ("id" = uuid::Uuid, Path, description = "Task UUID"),
    ),
    responses(
        (status = 200, description = "Task details", body = Task),
        (status = 404, description = "Task not found", body = ErrorResponse),
    )
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let task = state.tasks.get(TaskId::from_uuid(id)).await?;
    Ok(Json(task))
}

/// `PATCH /tasks/:id` — Update a task, including column moves.
///
/// # Errors
///
/// Returns [`ServerError::TaskNotFound`] if the task does not exist.
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    summary = "Update a task",
    params(
        ("id" = uuid::Uuid, Path, description = "Task UUID"),
    ),
    request_body = TaskPatch,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 404, description = "Task not found", body = ErrorResponse),
    )
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(patch): Json<TaskPatch>,
) -> Result<impl IntoResponse, ServerError> {
    let task = state.tasks.update(TaskId::from_uuid(id), patch).await?;
    Ok(Json(task))
}

/// `DELETE /tasks/:id` — Remove a task.
///
/// # Errors
///
/// Returns [`ServerError::TaskNotFound`] if the task does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    summary = "Remove a task",
    params(
        ("id" = uuid::Uuid, Path, description = "Task UUID"),
    ),
    responses(
        (status = 204, description = "Task removed"),
        (status = 404, description = "Task not found", body = ErrorResponse),
    )
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    state.tasks.remove(TaskId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Task routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", post(create_task).get(list_tasks))
        .route(
            "/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
}
