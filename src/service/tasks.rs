//! Planning task management.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{EventBus, EventId, FeedEvent, Task, TaskId, TaskPatch, TaskStatus};
use crate::error::ServerError;
use crate::store::JsonStore;

/// Service for the per-event kanban board.
#[derive(Debug, Clone)]
pub struct TaskService {
    store: Arc<JsonStore>,
    event_bus: EventBus,
}

impl TaskService {
    /// Creates a new `TaskService`.
    #[must_use]
    pub fn new(store: Arc<JsonStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns a handle to the live feed bus.
    #[must_use]
    pub fn event_bus(&self) -> EventBus {
        self.event_bus.clone()
    }

    /// Adds a task to an existing event's board.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::EventNotFound`] if the referenced event
    /// does not exist, or [`ServerError::PersistenceError`] if the
    /// store rewrite fails.
    pub async fn create(&self, task: Task) -> Result<Task, ServerError> {
        let event_id = task.event_id;
        if self.store.events.find(|e| e.id == event_id).await.is_none() {
            return Err(ServerError::EventNotFound(event_id.into()));
        }
        self.store.tasks.insert(task.clone()).await?;
        tracing::info!(task_id = %task.id, event_id = %event_id, "task added");
        Ok(task)
    }

    /// Lists tasks, optionally narrowed to one event or one column.
    pub async fn list(&self, event_id: Option<EventId>, status: Option<TaskStatus>) -> Vec<Task> {
        self.store
            .tasks
            .filter(|t| {
                event_id.is_none_or(|id| t.event_id == id)
                    && status.is_none_or(|s| t.status == s)
            })
            .await
    }

    /// Looks up one task by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::TaskNotFound`] if no task has this id.
    pub async fn get(&self, id: TaskId) -> Result<Task, ServerError> {
        self.store
            .tasks
            .find(|t| t.id == id)
            .await
            .ok_or(ServerError::TaskNotFound(id.into()))
    }

    /// Applies a partial update. A column change is broadcast as a move
    /// on the live feed.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::TaskNotFound`] if no task has this id,
    /// or [`ServerError::PersistenceError`] if the store rewrite fails.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, ServerError> {
        let before = self.get(id).await?;
        let updated = self
            .store
            .tasks
            .update_where(|t| t.id == id, |t| patch.apply_to(t))
            .await?
            .ok_or(ServerError::TaskNotFound(id.into()))?;
        if updated.status != before.status {
            let _ = self.event_bus.publish(FeedEvent::TaskMoved {
                event_id: updated.event_id,
                task_id: updated.id,
                status: updated.status,
                timestamp: Utc::now(),
            });
        }
        tracing::info!(task_id = %id, status = ?updated.status, "task updated");
        Ok(updated)
    }

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::TaskNotFound`] if no task has this id,
    /// or [`ServerError::PersistenceError`] if the store rewrite fails.
    pub async fn remove(&self, id: TaskId) -> Result<(), ServerError> {
        let removed = self.store.tasks.remove_where(|t| t.id == id).await?;
        if removed == 0 {
            return Err(ServerError::TaskNotFound(id.into()));
        }
        tracing::info!(task_id = %id, "task removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Event, TaskPriority};

    async fn fixture() -> (TaskService, EventId, tempfile::TempDir) {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let Ok(store) = JsonStore::open(dir.path()) else {
            panic!("store open failed");
        };
        let store = Arc::new(store);
        let event = Event::new(
            "TechConf".to_string(),
            Utc::now(),
            "Convention Center".to_string(),
            1500.0,
            "desc".to_string(),
            None,
        );
        let Ok(()) = store.events.insert(event.clone()).await else {
            panic!("event insert failed");
        };
        (TaskService::new(store, EventBus::new(100)), event.id, dir)
    }

    fn sample_task(event_id: EventId, title: &str) -> Task {
        Task::new(
            event_id,
            title.to_string(),
            "details".to_string(),
            TaskPriority::Medium,
            "Priya".to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn create_requires_existing_event() {
        let (service, _event_id, _dir) = fixture().await;
        let result = service.create(sample_task(EventId::new(), "Book caterer")).await;
        assert!(matches!(result, Err(ServerError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn status_patch_moves_columns() {
        let (service, event_id, _dir) = fixture().await;
        let Ok(created) = service.create(sample_task(event_id, "Book caterer")).await else {
            panic!("create failed");
        };
        assert_eq!(created.status, TaskStatus::Todo);

        let patch = TaskPatch {
            status: Some(TaskStatus::InProgress),
            ..TaskPatch::default()
        };
        let Ok(moved) = service.update(created.id, patch).await else {
            panic!("update failed");
        };
        assert_eq!(moved.status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn list_filters_by_column() {
        let (service, event_id, _dir) = fixture().await;
        let Ok(first) = service.create(sample_task(event_id, "Book caterer")).await else {
            panic!("create failed");
        };
        let Ok(_) = service.create(sample_task(event_id, "Print badges")).await else {
            panic!("create failed");
        };
        let patch = TaskPatch {
            status: Some(TaskStatus::Done),
            ..TaskPatch::default()
        };
        let Ok(_) = service.update(first.id, patch).await else {
            panic!("update failed");
        };

        let done = service.list(Some(event_id), Some(TaskStatus::Done)).await;
        assert_eq!(done.len(), 1);
        let todo = service.list(None, Some(TaskStatus::Todo)).await;
        assert_eq!(todo.len(), 1);
        let all = service.list(Some(event_id), None).await;
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn only_column_changes_are_broadcast() {
        let (service, event_id, _dir) = fixture().await;
        let Ok(created) = service.create(sample_task(event_id, "Book caterer")).await else {
            panic!("create failed");
        };
        let mut rx = service.event_bus().subscribe();

        let rename = TaskPatch {
            title: Some("Book the caterer".to_string()),
            ..TaskPatch::default()
        };
        let Ok(_) = service.update(created.id, rename).await else {
            panic!("update failed");
        };
        assert!(rx.try_recv().is_err());

        let move_patch = TaskPatch {
            status: Some(TaskStatus::Done),
            ..TaskPatch::default()
        };
        let Ok(_) = service.update(created.id, move_patch).await else {
            panic!("update failed");
        };
        let Ok(feed) = rx.recv().await else {
            panic!("expected feed event");
        };
        assert_eq!(feed.event_type_str(), "task_moved");
        assert_eq!(feed.event_id(), event_id);
    }
}
