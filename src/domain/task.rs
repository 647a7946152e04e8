//! Planning tasks for the per-event kanban board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventId, TaskId};

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    Medium,
    /// Needs attention soon.
    High,
}

/// Kanban column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum TaskStatus {
    /// Not started.
    #[serde(rename = "todo")]
    Todo,
    /// Being worked on.
    #[serde(rename = "inprogress")]
    InProgress,
    /// Finished.
    #[serde(rename = "done")]
    Done,
}

/// A planning task attached to an event.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Task {
    /// Unique task identifier (immutable after creation).
    pub id: TaskId,

    /// The event this task belongs to.
    pub event_id: EventId,

    /// Short task title.
    pub title: String,

    /// Longer description.
    pub description: String,

    /// Urgency label.
    pub priority: TaskPriority,

    /// Who the task is assigned to (free-form name).
    pub assigned_to: String,

    /// When the task is due.
    pub due_date: DateTime<Utc>,

    /// Current kanban column.
    pub status: TaskStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in the `todo` column.
    #[must_use]
    pub fn new(
        event_id: EventId,
        title: String,
        description: String,
        priority: TaskPriority,
        assigned_to: String,
        due_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            event_id,
            title,
            description,
            priority,
            assigned_to,
            due_date,
            status: TaskStatus::Todo,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update to a [`Task`]. Moving between kanban columns is a
/// status patch.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New urgency label.
    pub priority: Option<TaskPriority>,
    /// New assignee.
    pub assigned_to: Option<String>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// New kanban column.
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = &self.assigned_to {
            task.assigned_to.clone_from(assigned_to);
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task.updated_at = Utc::now();
    }
}
