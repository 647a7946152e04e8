//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{
    AttendeeService, BudgetService, CheckinService, EventService, NotificationService,
    SponsorService, TaskService,
};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Event lifecycle and sponsor-portal access.
    pub events: Arc<EventService>,
    /// Attendee registration, ticketing and preferences.
    pub attendees: Arc<AttendeeService>,
    /// QR check-in verification.
    pub checkin: Arc<CheckinService>,
    /// Sponsor records and engagement metrics.
    pub sponsors: Arc<SponsorService>,
    /// Budget lines and expense tracking.
    pub budgets: Arc<BudgetService>,
    /// Kanban task board.
    pub tasks: Arc<TaskService>,
    /// Notification scheduling and delivery.
    pub notifications: Arc<NotificationService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
