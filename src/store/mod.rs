//! Persistence layer: flat JSON data files.
//!
//! One JSON file per collection, read at startup and rewritten wholesale
//! on every mutation. [`Collection`] provides the generic file-backed
//! array; [`JsonStore`] groups the six collections the app persists.

pub mod collection;
pub mod json_store;

pub use collection::Collection;
pub use json_store::JsonStore;
