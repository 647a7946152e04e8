//! Sponsor, budget, and task DTOs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{BudgetItem, EventId, Sponsor, Task, TaskPriority, TaskStatus};

/// Request body for `POST /sponsors`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateSponsorRequest {
    /// Sponsor display name.
    pub name: String,
    /// The event this sponsor is attached to.
    pub event_id: EventId,
    /// Initial impression count.
    #[serde(default)]
    pub impressions: u64,
    /// Initial booth visit count.
    #[serde(default)]
    pub booth_visits: u64,
    /// Initial engagement rate in percent.
    #[serde(default)]
    pub engagement_rate: f64,
}

impl CreateSponsorRequest {
    /// Builds the domain record with a fresh id.
    #[must_use]
    pub fn into_sponsor(self) -> Sponsor {
        Sponsor::new(
            self.name,
            self.event_id,
            self.impressions,
            self.booth_visits,
            self.engagement_rate,
        )
    }
}

/// Request body for `POST /budgets`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateBudgetItemRequest {
    /// The event this line belongs to.
    pub event_id: EventId,
    /// Spend category label.
    pub category: String,
    /// Amount allocated to this category.
    pub allocated: f64,
    /// Amount already spent (defaults to 0).
    #[serde(default)]
    pub spent: f64,
    /// Optional overall budget cap.
    #[serde(default)]
    pub budget_limit: Option<f64>,
}

impl CreateBudgetItemRequest {
    /// Builds the domain record, deriving the initial status.
    #[must_use]
    pub fn into_budget_item(self) -> BudgetItem {
        BudgetItem::new(
            self.event_id,
            self.category,
            self.allocated,
            self.spent,
            self.budget_limit,
        )
    }
}

/// Request body for `POST /budgets/{id}/expenses`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RecordExpenseRequest {
    /// Expense amount to add to the line's spend.
    pub amount: f64,
}

/// Request body for `POST /tasks`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateTaskRequest {
    /// The event this task belongs to.
    pub event_id: EventId,
    /// Short task title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Urgency label.
    pub priority: TaskPriority,
    /// Who the task is assigned to.
    pub assigned_to: String,
    /// When the task is due.
    pub due_date: DateTime<Utc>,
}

impl CreateTaskRequest {
    /// Builds the domain record in the `todo` column.
    #[must_use]
    pub fn into_task(self) -> Task {
        Task::new(
            self.event_id,
            self.title,
            self.description,
            self.priority,
            self.assigned_to,
            self.due_date,
        )
    }
}

/// Filters for `GET /tasks`.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct TaskFilterParams {
    /// Restrict to tasks of one event.
    #[serde(default)]
    pub event_id: Option<uuid::Uuid>,
    /// Restrict to one kanban column.
    #[serde(default)]
    pub status: Option<TaskStatus>,
}
