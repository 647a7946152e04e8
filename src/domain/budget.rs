//! Budget lines and spend status derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BudgetItemId, EventId};

/// Derived health of a budget line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum BudgetStatus {
    /// Spend is within the expected band.
    #[serde(rename = "on track")]
    OnTrack,
    /// Spend exceeds the allocation.
    #[serde(rename = "over")]
    Over,
    /// Spend is below 70% of the allocation.
    #[serde(rename = "under")]
    Under,
    /// Nothing allocated or spent yet.
    #[serde(rename = "pending")]
    Pending,
}

impl BudgetStatus {
    /// Derives the status from spend and allocation.
    ///
    /// Branch order matters: overspend wins over everything, and a zero
    /// spend only reads as pending when the allocation is also zero
    /// (otherwise the under-70% branch catches it first).
    #[must_use]
    pub fn derive(spent: f64, allocated: f64) -> Self {
        if spent > allocated {
            Self::Over
        } else if spent < allocated * 0.7 {
            Self::Under
        } else if spent == 0.0 {
            Self::Pending
        } else {
            Self::OnTrack
        }
    }
}

/// A single budget line for an event.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BudgetItem {
    /// Unique budget line identifier (immutable after creation).
    pub id: BudgetItemId,

    /// The event this line belongs to.
    pub event_id: EventId,

    /// Spend category label (e.g. `"Catering"`).
    pub category: String,

    /// Amount allocated to this category.
    pub allocated: f64,

    /// Amount spent so far.
    pub spent: f64,

    /// Derived spend status.
    pub status: BudgetStatus,

    /// Optional overall budget cap carried from the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_limit: Option<f64>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

impl BudgetItem {
    /// Creates a new budget line with its status derived from the
    /// initial figures.
    #[must_use]
    pub fn new(
        event_id: EventId,
        category: String,
        allocated: f64,
        spent: f64,
        budget_limit: Option<f64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetItemId::new(),
            event_id,
            category,
            allocated,
            spent,
            status: BudgetStatus::derive(spent, allocated),
            budget_limit,
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds an expense to this line and re-derives the status.
    pub fn record_expense(&mut self, amount: f64, at: DateTime<Utc>) {
        self.spent += amount;
        self.status = BudgetStatus::derive(self.spent, self.allocated);
        self.updated_at = at;
    }
}

/// Partial update to a [`BudgetItem`].
///
/// `status` is derived state and cannot be set directly; changing the
/// figures re-derives it.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct BudgetItemPatch {
    /// New category label.
    pub category: Option<String>,
    /// New allocation.
    pub allocated: Option<f64>,
    /// Corrected spend figure.
    pub spent: Option<f64>,
    /// New overall cap.
    pub budget_limit: Option<f64>,
}

impl BudgetItemPatch {
    /// Applies the patch in place, re-derives the status, and bumps
    /// `updated_at`.
    pub fn apply_to(&self, line: &mut BudgetItem) {
        if let Some(category) = &self.category {
            line.category.clone_from(category);
        }
        if let Some(allocated) = self.allocated {
            line.allocated = allocated;
        }
        if let Some(spent) = self.spent {
            line.spent = spent;
        }
        if let Some(limit) = self.budget_limit {
            line.budget_limit = Some(limit);
        }
        line.status = BudgetStatus::derive(line.spent, line.allocated);
        line.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn overspend_wins() {
        assert_eq!(BudgetStatus::derive(1100.0, 1000.0), BudgetStatus::Over);
    }

    #[test]
    fn below_seventy_percent_is_under() {
        assert_eq!(BudgetStatus::derive(500.0, 1000.0), BudgetStatus::Under);
    }

    #[test]
    fn zero_spend_with_allocation_is_under_not_pending() {
        assert_eq!(BudgetStatus::derive(0.0, 1000.0), BudgetStatus::Under);
    }

    #[test]
    fn zero_spend_zero_allocation_is_pending() {
        assert_eq!(BudgetStatus::derive(0.0, 0.0), BudgetStatus::Pending);
    }

    #[test]
    fn within_band_is_on_track() {
        assert_eq!(BudgetStatus::derive(800.0, 1000.0), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::derive(1000.0, 1000.0), BudgetStatus::OnTrack);
    }

    #[test]
    fn status_serializes_with_space() {
        let Ok(json) = serde_json::to_string(&BudgetStatus::OnTrack) else {
            panic!("serialization failed");
        };
        assert_eq!(json, r#""on track""#);
    }

    #[test]
    fn record_expense_rederives_status() {
        let mut line = BudgetItem::new(EventId::new(), "Catering".to_string(), 1000.0, 0.0, None);
        assert_eq!(line.status, BudgetStatus::Under);

        line.record_expense(800.0, Utc::now());
        assert_eq!(line.status, BudgetStatus::OnTrack);

        line.record_expense(300.0, Utc::now());
        assert_eq!(line.status, BudgetStatus::Over);
        assert!((line.spent - 1100.0).abs() < f64::EPSILON);
    }
}
