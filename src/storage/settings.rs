//! Save directory and post-download preferences.

use crate::error::Result;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Source of user preferences consulted by tasks.
pub trait SettingsStore: Send + Sync {
    /// Directory downloads are saved into.
    fn save_directory(&self) -> PathBuf;

    /// Whether the application wants to open files once they finish.
    ///
    /// The engine only exposes this value; acting on it is up to the caller.
    fn open_on_finish(&self) -> bool {
        false
    }
}

/// The platform "Downloads" directory, or the current directory when the
/// platform has none.
pub fn default_save_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
}

/// Plain settings values, serialized as the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSettings {
    /// Explicit save directory. `None` means the platform default.
    #[serde(default)]
    pub save_path: Option<PathBuf>,
    /// Open finished downloads.
    #[serde(default)]
    pub open_on_finish: bool,
}

impl StoredSettings {
    /// Settings saving into `directory`.
    pub fn with_directory(directory: PathBuf) -> Self {
        Self {
            save_path: Some(directory),
            open_on_finish: false,
        }
    }
}

impl SettingsStore for StoredSettings {
    fn save_directory(&self) -> PathBuf {
        self.save_path.clone().unwrap_or_else(default_save_directory)
    }

    fn open_on_finish(&self) -> bool {
        self.open_on_finish
    }
}

/// Settings kept in a JSON file.
///
/// A missing or unreadable file yields the defaults rather than an error.
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    current: Mutex<StoredSettings>,
}

impl JsonSettings {
    /// Load the settings file at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = read_settings(&path);
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current values.
    pub fn get(&self) -> StoredSettings {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current values and write them to disk.
    pub fn save(&self, settings: StoredSettings) -> Result<()> {
        let json = serde_json::to_string_pretty(&settings).map_err(std::io::Error::from)?;
        fs::write(&self.path, json)?;
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }
}

impl SettingsStore for JsonSettings {
    fn save_directory(&self) -> PathBuf {
        self.get().save_directory()
    }

    fn open_on_finish(&self) -> bool {
        self.get().open_on_finish
    }
}

fn read_settings(path: &Path) -> StoredSettings {
    let Ok(raw) = fs::read_to_string(path) else {
        return StoredSettings::default();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("Ignoring unreadable settings file {:?}: {}", path, e);
        StoredSettings::default()
    })
}
