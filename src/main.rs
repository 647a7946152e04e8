//! planora-server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use planora_server::api;
use planora_server::app_state::AppState;
use planora_server::config::ServerConfig;
use planora_server::domain::EventBus;
use planora_server::service::{
    AttendeeService, BudgetService, CheckinService, EventService, NotificationService,
    ReminderScheduler, SponsorService, TaskService,
};
use planora_server::store::JsonStore;
use planora_server::ticket::TicketCodec;
use planora_server::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting planora-server");

    // Build storage and domain layer
    let store = Arc::new(JsonStore::open(&config.data_dir)?);
    let event_bus = EventBus::new(config.event_bus_capacity);
    let codec = TicketCodec::new(config.ticket_signing_key.clone());

    // Build service layer
    let events = Arc::new(EventService::new(Arc::clone(&store), event_bus.clone()));
    let attendees = Arc::new(AttendeeService::new(
        Arc::clone(&store),
        codec.clone(),
        event_bus.clone(),
    ));
    let checkin = Arc::new(CheckinService::new(
        Arc::clone(&store),
        codec,
        event_bus.clone(),
    ));
    let sponsors = Arc::new(SponsorService::new(Arc::clone(&store)));
    let budgets = Arc::new(BudgetService::new(Arc::clone(&store), event_bus.clone()));
    let tasks = Arc::new(TaskService::new(Arc::clone(&store), event_bus.clone()));
    let notifications = Arc::new(NotificationService::new(
        Arc::clone(&store),
        event_bus.clone(),
    ));

    // Background reminder delivery
    let scheduler = ReminderScheduler::new(
        notifications.as_ref().clone(),
        Duration::from_secs(config.scheduler_tick_secs),
    );
    if config.scheduler_enabled {
        scheduler.start().await;
    }

    // Build application state
    let app_state = AppState {
        events,
        attendees,
        checkin,
        sponsors,
        budgets,
        tasks,
        notifications,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.stop().await;

    Ok(())
}

/// Resolves when Ctrl-C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
