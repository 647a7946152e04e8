//! REST endpoint handlers organized by resource.

pub mod attendees;
pub mod budgets;
pub mod checkin;
pub mod events;
pub mod notifications;
pub mod sponsors;
pub mod system;
pub mod tasks;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(events::routes())
        .merge(attendees::routes())
        .merge(checkin::routes())
        .merge(sponsors::routes())
        .merge(budgets::routes())
        .merge(tasks::routes())
        .merge(notifications::routes())
}
