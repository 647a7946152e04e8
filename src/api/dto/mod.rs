//! Data Transfer Objects for REST request/response serialization.
//!
//! Partial updates use the domain patch types directly; the DTOs here
//! cover creation requests, list envelopes, and query parameters.

pub mod attendee_dto;
pub mod checkin_dto;
pub mod common_dto;
pub mod event_dto;
pub mod notification_dto;
pub mod planning_dto;

pub use attendee_dto::*;
pub use checkin_dto::*;
pub use common_dto::*;
pub use event_dto::*;
pub use notification_dto::*;
pub use planning_dto::*;
