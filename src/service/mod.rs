//! Service layer: business logic between the HTTP handlers and the
//! store.

pub mod attendees;
pub mod budgets;
pub mod checkin;
pub mod events;
pub mod notifications;
pub mod scheduler;
pub mod sponsors;
pub mod tasks;

pub use attendees::AttendeeService;
pub use budgets::BudgetService;
pub use checkin::{CheckinService, VerificationOutcome};
pub use events::EventService;
pub use notifications::NotificationService;
pub use scheduler::ReminderScheduler;
pub use sponsors::SponsorService;
pub use tasks::TaskService;
