//! Engine module: worker pool, task registry and command routing.
//!
//! The [`Engine`] accepts download requests by URL, hands back a task id
//! right away and runs the transfer on a bounded pool of workers. Requests for
//! a URL that already has an active task are answered with that task's id.
//! Pause and cancel commands are routed by id.
//!
//! # Overview
//!
//! - `engine` - The Engine itself
//! - `builder` - EngineBuilder for configuring an Engine
//! - `config` - Configuration values and defaults
//! - `pool` - Worker slots the transfers run in
//! - `registry` - Id allocation and the id to task map
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchpool::{CallbackSet, EngineBuilder};
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), fetchpool::Error> {
//! let engine = EngineBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .concurrent_downloads(3)
//!     .build()?;
//!
//! let callbacks = CallbackSet::new()
//!     .on_progress(|p| println!("{p:.0}%"))
//!     .on_finish(|name, _, size| println!("{name}: {size} bytes"));
//!
//! let id = engine.start("https://example.com/file.zip", callbacks);
//! engine.pause(id);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub(crate) mod pool;
pub(crate) mod registry;

pub use builder::EngineBuilder;
pub use config::{EngineConfig, DEFAULT_CONCURRENT_DOWNLOADS};
pub use engine::Engine;
