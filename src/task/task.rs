//! The task executor.

use super::flags::{ControlFlags, Interrupt};
use super::state::{TaskId, TaskState};
use super::transfer::{self, Resume, Session};
use crate::callbacks::Callbacks;
use crate::download::Download;
use crate::error::Result;
use crate::storage::{HistoryStore, SettingsStore};

use futures::StreamExt;
use reqwest_middleware::ClientWithMiddleware;
use std::convert::TryFrom;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, warn};

/// Chunk size used when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Everything tasks of one engine share.
pub struct TaskContext {
    client: ClientWithMiddleware,
    settings: Arc<dyn SettingsStore>,
    history: Option<Arc<dyn HistoryStore>>,
    chunk_size: usize,
}

impl TaskContext {
    pub fn new(client: ClientWithMiddleware, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            client,
            settings,
            history: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Record finished transfers in `history`.
    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    /// Write and poll for interrupts every `chunk_size` bytes. Clamped to at
    /// least one byte.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.settings
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("save_directory", &self.settings.save_directory())
            .field("history", &self.history.is_some())
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

/// How a run ended without error.
enum Outcome {
    Finished {
        filename: String,
        path: PathBuf,
        total: u64,
    },
    Paused,
    Cancelled,
}

/// Clears the running claim however the run exits.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One download attempt bound to a URL.
pub struct Task {
    id: TaskId,
    url: String,
    callbacks: Arc<dyn Callbacks>,
    context: Arc<TaskContext>,
    flags: ControlFlags,
    running: AtomicBool,
    state: Mutex<TaskState>,
    downloaded: AtomicU64,
    total: AtomicU64,
}

impl Task {
    pub fn new(
        id: TaskId,
        url: &str,
        callbacks: Arc<dyn Callbacks>,
        context: Arc<TaskContext>,
    ) -> Self {
        Self {
            id,
            url: url.to_string(),
            callbacks,
            context,
            flags: ControlFlags::new(),
            running: AtomicBool::new(false),
            state: Mutex::new(TaskState::Idle),
            downloaded: AtomicU64::new(0),
            total: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> TaskState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bytes of the resource on disk as of the last written chunk.
    pub fn bytes_downloaded(&self) -> u64 {
        self.downloaded.load(Ordering::Relaxed)
    }

    /// Announced size of the resource, 0 while unknown.
    pub fn bytes_total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Stop at the next chunk boundary and keep the partial file.
    pub fn pause(&self) {
        debug!("Task {} pause requested", self.id);
        self.flags.request_stop();
    }

    /// Stop at the next chunk boundary and delete the partial file.
    pub fn cancel(&self) {
        debug!("Task {} cancel requested", self.id);
        self.flags.request_cancel();
    }

    fn set_state(&self, state: TaskState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Reserve the single execution slot of this task.
    ///
    /// Returns `false` when a run is already scheduled or in progress.
    pub(crate) fn claim(&self) -> bool {
        let claimed = self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if claimed {
            self.set_state(TaskState::Queued);
        }
        claimed
    }

    /// Execute the download and report the outcome through the callbacks.
    ///
    /// Returns immediately, without any callback, if another run of this task
    /// is already in progress.
    pub async fn run(&self) {
        if !self.claim() {
            warn!("Task {} is already running", self.id);
            return;
        }
        self.execute().await;
    }

    /// Body of [`Task::run`] for a task whose slot is already claimed.
    pub(crate) async fn execute(&self) {
        let _guard = RunGuard(&self.running);
        self.set_state(TaskState::Running);

        match self.transfer().await {
            Ok(Outcome::Finished {
                filename,
                path,
                total,
            }) => {
                self.set_state(TaskState::Finished);
                info!("Task {} finished: {:?} ({} bytes)", self.id, path, total);
                self.record_history(&filename, &path, total).await;
                self.callbacks.on_finish(&filename, &path, total);
            }
            Ok(Outcome::Paused) => {
                self.set_state(TaskState::Paused);
                info!("Task {} paused at {} bytes", self.id, self.bytes_downloaded());
                self.callbacks.on_pause();
            }
            Ok(Outcome::Cancelled) => {
                self.set_state(TaskState::Cancelled);
                info!("Task {} cancelled", self.id);
                self.callbacks.on_cancel();
            }
            Err(e) => {
                self.set_state(TaskState::Failed);
                warn!("Task {} failed: {}", self.id, e);
                self.callbacks.on_error(&e.to_string());
            }
        }
    }

    async fn transfer(&self) -> Result<Outcome> {
        let download = Download::try_from(self.url.as_str())?;
        let directory = self.context.settings.save_directory();
        fs::create_dir_all(&directory).await?;
        let path = download.destination(&directory);

        let existing_size = transfer::existing_size(&path).await?;
        self.downloaded.store(existing_size, Ordering::Relaxed);

        // Interrupted while waiting for a worker.
        if self.flags.interrupt().is_some() {
            debug!("Task {} interrupted before its request", self.id);
            return self.resolve(download.filename, path, existing_size).await;
        }

        let session = Session::open(&self.context.client, &download.url, existing_size).await?;
        self.total.store(session.total, Ordering::Relaxed);

        if session.resume == Resume::Complete {
            debug!("{:?} is already complete", path);
            return Ok(Outcome::Finished {
                filename: download.filename,
                path,
                total: existing_size,
            });
        }

        self.callbacks.on_status("Downloading...");

        let mut file = session.open_destination(&path).await?;
        let total = session.total;
        let chunk_size = self.context.chunk_size;
        let mut downloaded = session.offset;
        self.downloaded.store(downloaded, Ordering::Relaxed);

        debug!("Retrieving chunks...");
        let mut stream = session.response.bytes_stream();
        'body: while let Some(item) = stream.next().await {
            let mut bytes = item?;
            while !bytes.is_empty() {
                if self.flags.interrupt().is_some() {
                    break 'body;
                }
                let chunk = bytes.split_to(chunk_size.min(bytes.len()));
                file.write_all(&chunk).await?;

                downloaded += chunk.len() as u64;
                self.downloaded.store(downloaded, Ordering::Relaxed);
                if total > 0 {
                    self.callbacks.on_progress(percent(downloaded, total));
                }
            }
        }
        file.flush().await?;
        drop(file);

        self.resolve(download.filename, path, total).await
    }

    async fn resolve(&self, filename: String, path: PathBuf, total: u64) -> Result<Outcome> {
        match self.flags.interrupt() {
            Some(Interrupt::Cancel) => {
                transfer::remove_partial(&path).await?;
                Ok(Outcome::Cancelled)
            }
            Some(Interrupt::Pause) => Ok(Outcome::Paused),
            None => Ok(Outcome::Finished {
                filename,
                path,
                total,
            }),
        }
    }

    /// Stores may do blocking file I/O, so they run off the async workers.
    async fn record_history(&self, filename: &str, path: &Path, total: u64) {
        let Some(history) = self.context.history.clone() else {
            return;
        };
        let filename = filename.to_string();
        let url = self.url.clone();
        let path = path.to_path_buf();

        let recorded = tokio::task::spawn_blocking(move || {
            history.record_completed(&filename, &url, total, &path)
        })
        .await;
        match recorded {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Task {} could not be added to the history: {}", self.id, e),
            Err(e) => warn!("Task {} history writer did not complete: {}", self.id, e),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("state", &self.state())
            .field("stop_requested", &self.flags.stop_requested())
            .field("cancel_requested", &self.flags.cancel_requested())
            .field("bytes_downloaded", &self.bytes_downloaded())
            .field("bytes_total", &self.bytes_total())
            .finish()
    }
}

/// Share of `total` covered by `downloaded`, in `[0, 100]`.
fn percent(downloaded: u64, total: u64) -> f64 {
    (downloaded as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::NoopCallbacks;
    use crate::http::{create_http_client, HttpClientConfig};
    use crate::storage::StoredSettings;

    fn context(dir: &std::path::Path) -> Arc<TaskContext> {
        let client = create_http_client(HttpClientConfig::default()).unwrap();
        let settings = StoredSettings::with_directory(dir.to_path_buf());
        Arc::new(TaskContext::new(client, Arc::new(settings)))
    }

    #[test]
    fn test_percent_is_bounded() {
        assert_eq!(percent(0, 100), 0.0);
        assert_eq!(percent(50, 200), 25.0);
        assert_eq!(percent(100, 100), 100.0);
        assert_eq!(percent(150, 100), 100.0);
    }

    #[test]
    fn test_new_task_is_idle() {
        let dir = tempfile::tempdir().unwrap();
        let task = Task::new(7, "http://domain.com/a.bin", Arc::new(NoopCallbacks), context(dir.path()));
        assert_eq!(task.id(), 7);
        assert_eq!(task.url(), "http://domain.com/a.bin");
        assert_eq!(task.state(), TaskState::Idle);
        assert_eq!(task.bytes_downloaded(), 0);
        assert_eq!(task.bytes_total(), 0);
    }

    #[test]
    fn test_claim_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let task = Task::new(1, "http://domain.com/a.bin", Arc::new(NoopCallbacks), context(dir.path()));
        assert!(task.claim());
        assert_eq!(task.state(), TaskState::Queued);
        assert!(!task.claim());
    }

    #[test]
    fn test_chunk_size_is_at_least_one() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = TaskContext::new(
            create_http_client(HttpClientConfig::default()).unwrap(),
            Arc::new(StoredSettings::with_directory(dir.path().to_path_buf())),
        )
        .with_chunk_size(0);
        assert_eq!(ctx.chunk_size(), 1);
    }

    #[tokio::test]
    async fn test_invalid_url_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let task = Task::new(1, "not a url", Arc::new(NoopCallbacks), context(dir.path()));
        task.run().await;
        assert_eq!(task.state(), TaskState::Failed);
        // The slot is released, a second run is possible.
        assert!(task.claim());
    }

    #[tokio::test]
    async fn test_pause_before_run_keeps_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let partial = dir.path().join("a.bin");
        std::fs::write(&partial, vec![1u8; 64]).unwrap();

        // Nothing listens on this port; the request must never be sent.
        let task = Task::new(1, "http://127.0.0.1:9/a.bin", Arc::new(NoopCallbacks), context(dir.path()));
        task.pause();
        task.run().await;

        assert_eq!(task.state(), TaskState::Paused);
        assert_eq!(std::fs::metadata(&partial).unwrap().len(), 64);
        assert_eq!(task.bytes_downloaded(), 64);
    }

    #[tokio::test]
    async fn test_cancel_before_run_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let partial = dir.path().join("a.bin");
        std::fs::write(&partial, vec![1u8; 64]).unwrap();

        let task = Task::new(1, "http://127.0.0.1:9/a.bin", Arc::new(NoopCallbacks), context(dir.path()));
        task.pause();
        task.cancel();
        task.run().await;

        assert_eq!(task.state(), TaskState::Cancelled);
        assert!(!partial.exists());
    }
}
