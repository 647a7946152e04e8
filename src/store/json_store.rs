//! The flat-file store: six JSON collections under one data directory.

use std::path::Path;

use crate::domain::{Attendee, BudgetItem, Event, EventId, Notification, Sponsor, Task};
use crate::error::ServerError;

use super::collection::Collection;

/// File name for the events collection.
const EVENTS_FILE: &str = "events.json";
/// File name for the attendees collection.
const ATTENDEES_FILE: &str = "attendees.json";
/// File name for the sponsors collection.
const SPONSORS_FILE: &str = "sponsors.json";
/// File name for the budgets collection.
const BUDGETS_FILE: &str = "budgets.json";
/// File name for the tasks collection.
const TASKS_FILE: &str = "tasks.json";
/// File name for the notifications collection.
const NOTIFICATIONS_FILE: &str = "notifications.json";

/// All persistent state, one JSON file per collection.
///
/// There is no cross-collection transaction: a multi-file operation like
/// the event cascade rewrites one file at a time and the last writer
/// wins, matching the flat-file semantics the data directory has always
/// had.
#[derive(Debug)]
pub struct JsonStore {
    /// Managed events.
    pub events: Collection<Event>,
    /// Registered attendees.
    pub attendees: Collection<Attendee>,
    /// Sponsors with engagement metrics.
    pub sponsors: Collection<Sponsor>,
    /// Budget lines.
    pub budgets: Collection<BudgetItem>,
    /// Planning tasks.
    pub tasks: Collection<Task>,
    /// Scheduled notifications.
    pub notifications: Collection<Notification>,
}

impl JsonStore {
    /// Opens the store rooted at `data_dir`, creating the directory if
    /// needed and loading whatever data files already exist.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PersistenceError`] if the data directory
    /// cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self, ServerError> {
        std::fs::create_dir_all(data_dir).map_err(|e| {
            ServerError::PersistenceError(format!("create {}: {e}", data_dir.display()))
        })?;

        Ok(Self {
            events: Collection::open(data_dir.join(EVENTS_FILE)),
            attendees: Collection::open(data_dir.join(ATTENDEES_FILE)),
            sponsors: Collection::open(data_dir.join(SPONSORS_FILE)),
            budgets: Collection::open(data_dir.join(BUDGETS_FILE)),
            tasks: Collection::open(data_dir.join(TASKS_FILE)),
            notifications: Collection::open(data_dir.join(NOTIFICATIONS_FILE)),
        })
    }

    /// Removes an event together with its attendees and sponsors.
    ///
    /// Budget lines, tasks, and notifications survive the cascade; they
    /// keep their `event_id` as a dangling reference, which list filters
    /// simply stop matching.
    ///
    /// Returns `false` without touching any file when the event does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PersistenceError`] if a rewrite fails.
    pub async fn delete_event_cascade(&self, id: EventId) -> Result<bool, ServerError> {
        let removed = self.events.remove_where(|e| e.id == id).await?;
        if removed == 0 {
            return Ok(false);
        }
        self.attendees.remove_where(|a| a.event_id == id).await?;
        self.sponsors.remove_where(|s| s.event_id == id).await?;
        Ok(true)
    }
}
