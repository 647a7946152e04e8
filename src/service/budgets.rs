//! Budget lines and expense recording.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{BudgetItem, BudgetItemId, BudgetItemPatch, EventBus, EventId, FeedEvent};
use crate::error::ServerError;
use crate::store::JsonStore;

/// Service for managing per-event budget lines.
///
/// The `status` on each line is derived from its figures; every write
/// path re-derives it so a stored status can never drift.
#[derive(Debug, Clone)]
pub struct BudgetService {
    store: Arc<JsonStore>,
    event_bus: EventBus,
}

impl BudgetService {
    /// Creates a new `BudgetService`.
    #[must_use]
    pub fn new(store: Arc<JsonStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns a handle to the live feed bus.
    #[must_use]
    pub fn event_bus(&self) -> EventBus {
        self.event_bus.clone()
    }

    /// Broadcasts the line's current figures to the live feed.
    fn broadcast(&self, line: &BudgetItem) {
        let _ = self.event_bus.publish(FeedEvent::BudgetUpdated {
            event_id: line.event_id,
            budget_item_id: line.id,
            category: line.category.clone(),
            status: line.status,
            timestamp: Utc::now(),
        });
    }

    /// Adds a budget line to an existing event.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::EventNotFound`] if the referenced event
    /// does not exist, or [`ServerError::PersistenceError`] if the
    /// store rewrite fails.
    pub async fn create(&self, line: BudgetItem) -> Result<BudgetItem, ServerError> {
        let event_id = line.event_id;
        if self.store.events.find(|e| e.id == event_id).await.is_none() {
            return Err(ServerError::EventNotFound(event_id.into()));
        }
        self.store.budgets.insert(line.clone()).await?;
        self.broadcast(&line);
        tracing::info!(
            budget_id = %line.id,
            event_id = %event_id,
            category = %line.category,
            "budget line added"
        );
        Ok(line)
    }

    /// Lists budget lines, optionally narrowed to one event.
    pub async fn list(&self, event_id: Option<EventId>) -> Vec<BudgetItem> {
        match event_id {
            Some(id) => self.store.budgets.filter(|b| b.event_id == id).await,
            None => self.store.budgets.all().await,
        }
    }

    /// Looks up one budget line by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BudgetNotFound`] if no line has this id.
    pub async fn get(&self, id: BudgetItemId) -> Result<BudgetItem, ServerError> {
        self.store
            .budgets
            .find(|b| b.id == id)
            .await
            .ok_or(ServerError::BudgetNotFound(id.into()))
    }

    /// Applies a partial update and re-derives the status.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BudgetNotFound`] if no line has this id,
    /// or [`ServerError::PersistenceError`] if the store rewrite fails.
    pub async fn update(
        &self,
        id: BudgetItemId,
        patch: BudgetItemPatch,
    ) -> Result<BudgetItem, ServerError> {
        let updated = self
            .store
            .budgets
            .update_where(|b| b.id == id, |b| patch.apply_to(b))
            .await?
            .ok_or(ServerError::BudgetNotFound(id.into()))?;
        self.broadcast(&updated);
        tracing::info!(budget_id = %id, status = ?updated.status, "budget line updated");
        Ok(updated)
    }

    /// Adds an expense to a line.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BudgetNotFound`] if no line has this id,
    /// or [`ServerError::PersistenceError`] if the store rewrite fails.
    pub async fn record_expense(
        &self,
        id: BudgetItemId,
        amount: f64,
    ) -> Result<BudgetItem, ServerError> {
        let now = Utc::now();
        let updated = self
            .store
            .budgets
            .update_where(|b| b.id == id, |b| b.record_expense(amount, now))
            .await?
            .ok_or(ServerError::BudgetNotFound(id.into()))?;
        self.broadcast(&updated);
        tracing::info!(
            budget_id = %id,
            amount,
            status = ?updated.status,
            "expense recorded"
        );
        Ok(updated)
    }

    /// Removes a budget line.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BudgetNotFound`] if no line has this id,
    /// or [`ServerError::PersistenceError`] if the store rewrite fails.
    pub async fn remove(&self, id: BudgetItemId) -> Result<(), ServerError> {
        let removed = self.store.budgets.remove_where(|b| b.id == id).await?;
        if removed == 0 {
            return Err(ServerError::BudgetNotFound(id.into()));
        }
        tracing::info!(budget_id = %id, "budget line removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{BudgetStatus, Event};

    async fn fixture() -> (BudgetService, EventId, tempfile::TempDir) {
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
        (BudgetService::new(store, EventBus::new(100)), event.id, dir)
    }

    #[tokio::test]
    async fn create_requires_existing_event() {
        let (service, _event_id, _dir) = fixture().await;
        let line = BudgetItem::new(EventId::new(), "Catering".to_string(), 1000.0, 0.0, None);
        let result = service.create(line).await;
        assert!(matches!(result, Err(ServerError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn expenses_move_the_status() {
        let (service, event_id, _dir) = fixture().await;
        let line = BudgetItem::new(event_id, "Catering".to_string(), 1000.0, 0.0, None);
        let Ok(created) = service.create(line).await else {
            panic!("create failed");
        };
        assert_eq!(created.status, BudgetStatus::Under);

        let Ok(after) = service.record_expense(created.id, 800.0).await else {
            panic!("expense failed");
        };
        assert_eq!(after.status, BudgetStatus::OnTrack);

        let Ok(over) = service.record_expense(created.id, 300.0).await else {
            panic!("expense failed");
        };
        assert_eq!(over.status, BudgetStatus::Over);
    }

    #[tokio::test]
    async fn patching_allocation_rederives_status() {
        let (service, event_id, _dir) = fixture().await;
        let line = BudgetItem::new(event_id, "Venue".to_string(), 1000.0, 900.0, None);
        let Ok(created) = service.create(line).await else {
            panic!("create failed");
        };
        assert_eq!(created.status, BudgetStatus::OnTrack);

        let patch = BudgetItemPatch {
            allocated: Some(500.0),
            ..BudgetItemPatch::default()
        };
        let Ok(updated) = service.update(created.id, patch).await else {
            panic!("update failed");
        };
        assert_eq!(updated.status, BudgetStatus::Over);
    }

    #[tokio::test]
    async fn remove_unknown_line_is_not_found() {
        let (service, _event_id, _dir) = fixture().await;
        let result = service.remove(BudgetItemId::new()).await;
        assert!(matches!(result, Err(ServerError::BudgetNotFound(_))));
    }

    #[tokio::test]
    async fn mutations_are_broadcast() {
        let (service, event_id, _dir) = fixture().await;
        let mut rx = service.event_bus().subscribe();

        let line = BudgetItem::new(event_id, "Catering".to_string(), 1000.0, 0.0, None);
        let Ok(created) = service.create(line).await else {
            panic!("create failed");
        };
        let Ok(_) = service.record_expense(created.id, 800.0).await else {
            panic!("expense failed");
        };

        let Ok(first) = rx.recv().await else {
            panic!("expected feed event");
        };
        assert_eq!(first.event_type_str(), "budget_updated");
        assert_eq!(first.event_id(), event_id);
        let Ok(second) = rx.recv().await else {
            panic!("expected feed event");
        };
        assert_eq!(second.event_type_str(), "budget_updated");
    }
}
