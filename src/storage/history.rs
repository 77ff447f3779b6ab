//! Record of completed downloads.

use crate::error::Result;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Sink for completed transfers.
///
/// Called from pool workers once a task reaches `Finished`.
pub trait HistoryStore: Send + Sync {
    /// Remember that `url` was saved as `name` at `path`.
    fn record_completed(&self, name: &str, url: &str, size_bytes: u64, path: &Path)
        -> Result<()>;
}

/// One completed download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub url: String,
    pub status: String,
    pub size_bytes: u64,
    /// Human readable size, whole megabytes.
    pub size: String,
    pub progress: String,
    pub path: PathBuf,
}

impl HistoryEntry {
    /// Entry for a finished transfer.
    pub fn finished(name: &str, url: &str, size_bytes: u64, path: &Path) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            status: "Finished".to_string(),
            size_bytes,
            size: format!("{} MB", size_bytes / (1024 * 1024)),
            progress: "100%".to_string(),
            path: path.to_path_buf(),
        }
    }

    /// Whether the file this entry points at is still on disk.
    ///
    /// The store keeps stale entries; consumers filter with this.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// History kept as a JSON array in a single file.
#[derive(Debug)]
pub struct JsonHistory {
    path: PathBuf,
    // Serializes read-modify-write cycles between workers.
    lock: Mutex<()>,
}

impl JsonHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded entries, oldest first.
    ///
    /// A missing or corrupt file reads as an empty history.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable history file {:?}: {}", self.path, e);
            Vec::new()
        })
    }

    /// Append an entry and rewrite the file.
    pub fn append(&self, entry: HistoryEntry) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load();
        entries.push(entry);
        let json = serde_json::to_string_pretty(&entries).map_err(std::io::Error::from)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl HistoryStore for JsonHistory {
    fn record_completed(
        &self,
        name: &str,
        url: &str,
        size_bytes: u64,
        path: &Path,
    ) -> Result<()> {
        self.append(HistoryEntry::finished(name, url, size_bytes, path))
    }
}
