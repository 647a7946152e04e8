//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams the live activity feed.
//! Clients subscribe to individual events (or the `"*"` wildcard) and
//! receive check-in results, registrations and reminder deliveries as
//! they happen.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
