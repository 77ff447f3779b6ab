//! fetchpool runs HTTP downloads on a bounded pool of workers. Transfers
//! resume from whatever is already on disk, can be paused or cancelled by id,
//! and report their progress through caller-supplied callbacks.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fetchpool::{CallbackSet, EngineBuilder, Error};
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Error> {
//! let engine = EngineBuilder::new()
//!     .directory(PathBuf::from("output"))
//!     .build()?;
//!
//! let id = engine.start(
//!     "https://github.com/seanmonstar/reqwest/archive/refs/tags/v0.11.9.zip",
//!     CallbackSet::new()
//!         .on_progress(|percent| println!("{percent:.1}%"))
//!         .on_finish(|name, _, size| println!("{name}: {size} bytes")),
//! );
//!
//! // Later: keep what we have and stop.
//! engine.pause(id);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`engine`] - The `Engine`, its builder and configuration
//! - [`task`] - One transfer: the resumable request and its lifecycle
//! - [`callbacks`] - The event surface tasks report through
//! - [`download`] - URL to file name resolution
//! - [`storage`] - Settings and history collaborators
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client construction
//! - [`utils`] - Shared utility functions

pub mod callbacks;
pub mod download;
pub mod engine;
pub mod error;
pub mod http;
pub mod storage;
pub mod task;
pub mod utils;

pub use callbacks::{CallbackSet, Callbacks, NoopCallbacks};
pub use download::Download;
pub use engine::{Engine, EngineBuilder, EngineConfig};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig};
pub use storage::{HistoryEntry, HistoryStore, JsonHistory, JsonSettings, SettingsStore, StoredSettings};
pub use task::{Task, TaskContext, TaskId, TaskState};
