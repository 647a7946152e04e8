//! Budget handlers: line CRUD and expense recording.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateBudgetItemRequest, EventFilterParams, RecordExpenseRequest};
use crate::app_state::AppState;
use crate::domain::{BudgetItem, BudgetItemId, BudgetItemPatch, EventId};
use crate::error::{ErrorResponse, ServerError};

/// `POST /budgets` — Add a budget line to an event.
///
/// # Errors
///
/// Returns [`ServerError::EventNotFound`] if the referenced event does
/// not exist.
#[utoipa::path(
    post,
    path = "/api/v1/budgets",
    tag = "Budgets",
    summary = "Add a budget line",
    description = "Creates a budget line with its status derived from the initial allocation and spend.",
    request_body = CreateBudgetItemRequest,
    responses(
        (status = 201, description = "Budget line added", body = BudgetItem),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn create_budget_item(
    State(state): State<AppState>,
    Json(req): Json<CreateBudgetItemRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let line = state.budgets.create(req.into_budget_item()).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// `GET /budgets` — List budget lines, optionally for one event.
#[utoipa::path(
    get,
    path = "/api/v1/budgets",
    tag = "Budgets",
    summary = "List budget lines",
    params(EventFilterParams),
    responses(
        (status = 200, description = "Budget line list", body = Vec<BudgetItem>),
    )
)]
pub async fn list_budget_items(
    State(state): State<AppState>,
    Query(filter): Query<EventFilterParams>,
) -> impl IntoResponse {
    let lines = state
        .budgets
        .list(filter.event_id.map(EventId::from_uuid))
        .await;
    Json(lines)
}

/// `GET /budgets/:id` — Get a single budget line.
///
/// # Errors
///
/// Returns [`ServerError::BudgetNotFound`] if the line does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/budgets/{id}",
    tag = "Budgets",
    summary = "Get budget line details",
    params(
        ("id" = uuid::Uuid, Path, description = "Budget line UUID"),
    ),
    responses(
        (status = 200, description = "Budget line details", body = BudgetItem),
        (status = 404, description = "Budget line not found", body = ErrorResponse),
    )
)]
pub async fn get_budget_item(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let line = state.budgets.get(BudgetItemId::from_uuid(id)).await?;
    Ok(Json(line))
}

/// `PATCH /budgets/:id` — Update a budget line's figures.
///
/// # Errors
///
/// Returns [`ServerError::BudgetNotFound`] if the line does not exist.
#[utoipa::path(
    patch,
    path = "/api/v1/budgets/{id}",
    tag = "Budgets",
    summary = "Update a budget line",
    description = "Applies a partial update and re-derives the status from the new figures. The status itself cannot be set directly.",
    params(
        ("id" = uuid::Uuid, Path, description = "Budget line UUID"),
    ),
    request_body = BudgetItemPatch,
    responses(
        (status = 200, description = "Updated budget line", body = BudgetItem),
        (status = 404, description = "Budget line not found", body = ErrorResponse),
    )
)]
pub async fn update_budget_item(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(patch): Json<BudgetItemPatch>,
) -> Result<impl IntoResponse, ServerError> {
    let line = state.budgets.update(BudgetItemId::from_uuid(id), patch).await?;
    Ok(Json(line))
}

/// `POST /budgets/:id/expenses` — Record an expense against a line.
///
/// # Errors
///
/// Returns [`ServerError::BudgetNotFound`] if the line does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/budgets/{id}/expenses",
    tag = "Budgets",
    summary = "Record an expense",
    description = "Adds the amount to the line's spend and re-derives the status.",
    params(
        ("id" = uuid::Uuid, Path, description = "Budget line UUID"),
    ),
    request_body = RecordExpenseRequest,
    responses(
        (status = 200, description = "Updated budget line", body = BudgetItem),
        (status = 404, description = "Budget line not found", body = ErrorResponse),
    )
)]
pub async fn record_expense(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<RecordExpenseRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let line = state
        .budgets
        .record_expense(BudgetItemId::from_uuid(id), req.amount)
        .await?;
    Ok(Json(line))
}

/// `DELETE /budgets/:id` — Remove a budget line.
///
/// # Errors
///
/// Returns [`ServerError::BudgetNotFound`] if the line does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/budgets/{id}",
    tag = "Budgets",
    summary = "Remove a budget line",
    params(
        ("id" = uuid::Uuid, Path, description = "Budget line UUID"),
    ),
    responses(
        (status = 204, description = "Budget line removed"),
        (status = 404, description = "Budget line not found", body = ErrorResponse),
    )
)]
pub async fn delete_budget_item(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    state.budgets.remove(BudgetItemId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", post(create_budget_item).get(list_budget_items))
        .route(
            "/budgets/{id}",
            get(get_budget_item)
                .patch(update_budget_item)
                .delete(delete_budget_item),
        )
        .route("/budgets/{id}/expenses", post(record_expense))
}
