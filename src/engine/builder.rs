//! Builder pattern implementation for creating Engine instances.
//!
//! ```rust
//! use fetchpool::EngineBuilder;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), fetchpool::Error> {
//! let engine = EngineBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .concurrent_downloads(5)
//!     .chunk_size(32 * 1024)
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::{config::EngineConfig, engine::Engine};
use crate::error::Result;
use crate::storage::{HistoryStore, SettingsStore, StoredSettings};

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// A builder used to create an [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        EngineBuilder::default()
    }

    /// Save into `directory` instead of asking a settings store.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.settings = Arc::new(StoredSettings::with_directory(directory));
        self
    }

    /// Read the save directory from `settings` each time a task starts.
    pub fn settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.config.settings = settings;
        self
    }

    /// Record finished transfers in `history`.
    pub fn history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.config.history = Some(history);
        self
    }

    /// Set the number of concurrent downloads. Clamped to at least one.
    pub fn concurrent_downloads(mut self, concurrent_downloads: usize) -> Self {
        self.config.concurrent_downloads = concurrent_downloads.max(1);
        self
    }

    /// Set how many bytes are written between two pause/cancel checks.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the connect and read timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Route requests through `proxy`.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// Calling `.headers()` several times merges all maps into one.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add one http header.
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use fetchpool::EngineBuilder;
    ///
    /// let ua = HeaderValue::from_static("fetchpool/0.1");
    /// let builder = EngineBuilder::new().header(header::USER_AGENT, ua);
    /// ```
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Create the [`Engine`] with the specified options.
    ///
    /// Built inside a tokio runtime, the engine schedules its transfers on
    /// that runtime. Otherwise it starts a runtime of its own.
    pub fn build(self) -> Result<Engine> {
        Engine::new(self.config)
    }
}
