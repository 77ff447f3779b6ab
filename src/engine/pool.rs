//! Bounded set of worker slots.
//!
//! Transfers run as tokio tasks. A semaphore with one permit per slot bounds
//! how many of them transfer at once; the rest wait in submission order for a
//! permit.

use crate::error::{Error, Result};

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::Semaphore;
use tracing::debug;

pub(crate) struct WorkerPool {
    handle: Handle,
    // Set when no runtime was running at construction time.
    runtime: Option<Runtime>,
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// A pool of `size` slots on the current runtime, or on a dedicated one
    /// when called outside of a runtime.
    pub(crate) fn new(size: usize) -> Result<Self> {
        let size = size.max(1);
        let (handle, runtime) = match Handle::try_current() {
            Ok(handle) => (handle, None),
            Err(_) => {
                debug!("No runtime available, starting one with {} workers", size);
                let runtime = Builder::new_multi_thread()
                    .worker_threads(size)
                    .thread_name("fetchpool-worker")
                    .enable_all()
                    .build()
                    .map_err(|e| Error::Runtime(e.to_string()))?;
                (runtime.handle().clone(), Some(runtime))
            }
        };

        Ok(Self {
            handle,
            runtime,
            permits: Arc::new(Semaphore::new(size)),
            size,
        })
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// Schedule `job` to run once a slot is free. Never blocks.
    pub(crate) fn submit<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = self.permits.clone();
        self.handle.spawn(async move {
            // The semaphore is never closed.
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            job.await;
        });
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("available", &self.permits.available_permits())
            .field("owns_runtime", &self.runtime.is_some())
            .finish()
    }
}
