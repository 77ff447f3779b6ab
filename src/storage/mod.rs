//! Settings and history collaborators.
//!
//! The engine reads a save directory from a [`SettingsStore`] every time a
//! task starts, and reports completed transfers to an optional
//! [`HistoryStore`]. Both are traits so an application can back them with
//! its own persistence; [`JsonSettings`] and [`JsonHistory`] are small
//! file-based implementations.

pub mod history;
pub mod settings;

pub use history::{HistoryEntry, HistoryStore, JsonHistory};
pub use settings::{default_save_directory, JsonSettings, SettingsStore, StoredSettings};
