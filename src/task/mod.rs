//! Single-transfer execution.
//!
//! A [`Task`] owns one download attempt: it resolves the destination file,
//! asks the server for whatever is missing, streams the body to disk and
//! reports the outcome through its [`Callbacks`](crate::callbacks::Callbacks).
//!
//! Tasks are normally created and scheduled by the
//! [`Engine`](crate::engine::Engine). They can also be driven directly:
//!
//! ```rust,no_run
//! use fetchpool::http::{create_http_client, HttpClientConfig};
//! use fetchpool::storage::StoredSettings;
//! use fetchpool::task::{Task, TaskContext, TaskState};
//! use fetchpool::CallbackSet;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! let settings = StoredSettings::with_directory(PathBuf::from("downloads"));
//! let context = Arc::new(TaskContext::new(client, Arc::new(settings)));
//!
//! let task = Task::new(1, "https://example.com/file.zip", Arc::new(CallbackSet::new()), context);
//! task.run().await;
//! assert_eq!(task.state(), TaskState::Finished);
//! # Ok(())
//! # }
//! ```

pub mod flags;
pub mod state;
pub mod task;
pub(crate) mod transfer;

pub use flags::{ControlFlags, Interrupt};
pub use state::{TaskId, TaskState};
pub use task::{Task, TaskContext, DEFAULT_CHUNK_SIZE};
