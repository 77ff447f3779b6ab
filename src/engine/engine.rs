//! Core engine implementation.

use super::config::EngineConfig;
use super::pool::WorkerPool;
use super::registry::Registry;
use crate::callbacks::Callbacks;
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};
use crate::task::{Task, TaskContext, TaskId, TaskState};

use reqwest::header::HeaderMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Represents the download orchestrator.
///
/// An engine is created via its builder:
///
/// ```rust
/// # fn main() -> Result<(), fetchpool::Error> {
/// use fetchpool::EngineBuilder;
///
/// let engine = EngineBuilder::new().concurrent_downloads(2).build()?;
/// assert_eq!(engine.concurrent_downloads(), 2);
/// # Ok(())
/// # }
/// ```
///
/// None of the methods wait for network or disk I/O; transfers only happen
/// on the engine's workers.
pub struct Engine {
    config: EngineConfig,
    context: Arc<TaskContext>,
    pool: WorkerPool,
    registry: Mutex<Registry>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("pool", &self.pool)
            .field("tasks", &self.registry().len())
            .finish()
    }
}

impl Engine {
    /// Creates a new Engine with the given configuration.
    pub(crate) fn new(config: EngineConfig) -> Result<Self> {
        let client = create_http_client(HttpClientConfig {
            timeout: config.timeout,
            proxy: config.proxy.clone(),
            headers: config.headers.clone(),
        })?;

        let mut context = TaskContext::new(client, config.settings.clone())
            .with_chunk_size(config.chunk_size);
        if let Some(ref history) = config.history {
            context = context.with_history(history.clone());
        }

        let pool = WorkerPool::new(config.concurrent_downloads)?;

        Ok(Self {
            config,
            context: Arc::new(context),
            pool,
            registry: Mutex::new(Registry::default()),
        })
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gets the directory new transfers are saved into.
    pub fn directory(&self) -> PathBuf {
        self.config.settings.save_directory()
    }

    /// Gets whether finished files should be opened.
    pub fn open_on_finish(&self) -> bool {
        self.config.settings.open_on_finish()
    }

    /// Gets the number of concurrent downloads.
    pub fn concurrent_downloads(&self) -> usize {
        self.pool.size()
    }

    /// Gets the chunk size.
    pub fn chunk_size(&self) -> usize {
        self.context.chunk_size()
    }

    /// Gets the connect and read timeout.
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Download `url`, reporting to `callbacks`. Returns the task id at once.
    ///
    /// If a task for the same URL is queued or running, its id is returned
    /// and `callbacks` is dropped: no second transfer starts. Otherwise any
    /// older task for the URL is paused and left registered, and a new task
    /// under a new id takes over, resuming from whatever is on disk.
    pub fn start(&self, url: &str, callbacks: impl Callbacks + 'static) -> TaskId {
        let mut registry = self.registry();

        if let Some(active) = registry.for_url(url).find(|task| task.state().is_active()) {
            debug!("{} is already handled by task {}", url, active.id());
            return active.id();
        }
        for stale in registry.for_url(url) {
            stale.pause();
        }

        let id = registry.allocate_id();
        let task = Arc::new(Task::new(
            id,
            url,
            Arc::new(callbacks),
            self.context.clone(),
        ));
        // Fresh task, the claim always succeeds.
        let claimed = task.claim();
        debug_assert!(claimed, "task {} was claimed before registration", id);
        registry.insert(task.clone());
        debug!("Task {} registered for {}", id, url);

        self.pool.submit(async move { task.execute().await });
        id
    }

    /// Ask task `id` to stop and keep its partial file.
    ///
    /// Unknown ids are ignored.
    pub fn pause(&self, id: TaskId) {
        match self.registry().get(id) {
            Some(task) => task.pause(),
            None => debug!("Ignoring pause: {}", Error::UnknownTask(id)),
        }
    }

    /// Ask task `id` to stop and delete its partial file, and forget it.
    ///
    /// The id is invalid as soon as this returns, even though the transfer
    /// may still be unwinding on its worker. Unknown ids are ignored.
    pub fn cancel(&self, id: TaskId) {
        match self.registry().remove(id) {
            Some(task) => task.cancel(),
            None => debug!("Ignoring cancel: {}", Error::UnknownTask(id)),
        }
    }

    /// Current state of task `id`.
    pub fn state(&self, id: TaskId) -> Result<TaskState> {
        self.task(id).map(|task| task.state())
    }

    /// Task `id` itself, for progress counters and the like.
    pub fn task(&self, id: TaskId) -> Result<Arc<Task>> {
        self.registry()
            .get(id)
            .cloned()
            .ok_or(Error::UnknownTask(id))
    }

    /// Ids of all registered tasks, ascending.
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.registry().ids()
    }
}
