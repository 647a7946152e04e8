//! Domain layer: records, identifiers, and the event system.
//!
//! This module contains the server-side domain model: typed identifiers,
//! the stored records (events, attendees, sponsors, budget lines, tasks,
//! notifications), and the broadcast bus carrying feed events to
//! WebSocket subscribers.

pub mod attendee;
pub mod budget;
pub mod event;
pub mod event_bus;
pub mod feed_event;
pub mod id;
pub mod notification;
pub mod sponsor;
pub mod task;

pub use attendee::{Attendee, AttendeePatch, NotificationPreferences};
pub use budget::{BudgetItem, BudgetItemPatch, BudgetStatus};
pub use event::{Event, EventPatch};
pub use event_bus::EventBus;
pub use feed_event::FeedEvent;
pub use id::{AttendeeId, BudgetItemId, EventId, NotificationId, SponsorId, TaskId};
pub use notification::{Notification, NotificationKind, NotificationStatus};
pub use sponsor::{Sponsor, SponsorPatch};
pub use task::{Task, TaskPatch, TaskPriority, TaskStatus};
