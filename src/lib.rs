//! # planora-server
//!
//! REST API and WebSocket backend for event planning and on-site check-in.
//!
//! This crate manages the full lifecycle of an event: creation and budgeting,
//! attendee registration, signed QR tickets, entrance verification, sponsor
//! portals, kanban task boards and scheduled reminder notifications. State
//! lives in JSON collections on disk; every mutation is broadcast to
//! WebSocket subscribers as a feed event.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── Services (service/)
//!     │     events · attendees · checkin · sponsors
//!     │     budgets · tasks · notifications · scheduler
//!     │
//!     ├── TicketCodec (ticket/)
//!     ├── EventBus (domain/)
//!     │
//!     └── JsonStore (store/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;
pub mod ticket;
pub mod ws;
