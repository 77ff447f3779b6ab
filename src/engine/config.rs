//! Configuration structures and defaults for the engine.

use crate::http::DEFAULT_TIMEOUT;
use crate::storage::{HistoryStore, SettingsStore, StoredSettings};
use crate::task::DEFAULT_CHUNK_SIZE;

use reqwest::header::HeaderMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Worker slots used when none is configured.
pub const DEFAULT_CONCURRENT_DOWNLOADS: usize = 5;

/// Configuration structure for the engine.
#[derive(Clone)]
pub struct EngineConfig {
    /// Where the save directory comes from.
    pub settings: Arc<dyn SettingsStore>,
    /// Where finished transfers are recorded, if anywhere.
    pub history: Option<Arc<dyn HistoryStore>>,
    /// Number of transfers running at the same time.
    pub concurrent_downloads: usize,
    /// Bytes written between two interrupt checks.
    pub chunk_size: usize,
    /// Connect and read timeout.
    pub timeout: Duration,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("save_directory", &self.settings.save_directory())
            .field("history", &self.history.is_some())
            .field("concurrent_downloads", &self.concurrent_downloads)
            .field("chunk_size", &self.chunk_size)
            .field("timeout", &self.timeout)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy.is_some())
            .finish()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settings: Arc::new(StoredSettings::default()),
            history: None,
            concurrent_downloads: DEFAULT_CONCURRENT_DOWNLOADS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: DEFAULT_TIMEOUT,
            headers: None,
            proxy: None,
        }
    }
}
