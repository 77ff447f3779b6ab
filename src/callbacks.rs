//! The event surface a [`Task`](crate::task::Task) reports through.
//!
//! Callbacks are invoked from pool worker threads, never from the thread that
//! called [`Engine::start`](crate::engine::Engine::start). Implementations that
//! drive a user interface are responsible for marshalling events back into
//! their own context.
//!
//! Every operation has a no-op default, so an implementation only overrides
//! what it cares about. For ad-hoc use, [`CallbackSet`] takes closures:
//!
//! ```rust
//! use fetchpool::CallbackSet;
//!
//! let callbacks = CallbackSet::new()
//!     .on_progress(|percent| println!("{percent:.1}%"))
//!     .on_finish(|name, path, size| println!("{name}: {size} bytes at {}", path.display()))
//!     .on_error(|message| eprintln!("failed: {message}"));
//! ```

use std::fmt;
use std::path::Path;

/// Receiver for the lifecycle events of one task.
///
/// Exactly one of `on_finish`, `on_error`, `on_pause` and `on_cancel` is
/// invoked per run. `on_progress` values are non-decreasing within a run and
/// bounded to `[0, 100]`.
pub trait Callbacks: Send + Sync {
    /// Percentage of the resource written to disk. Only reported when the
    /// server announced a length.
    fn on_progress(&self, _percent: f64) {}

    /// Free-form status text.
    fn on_status(&self, _text: &str) {}

    /// The file is complete at `path`. `total_bytes` is the size on disk before
    /// the request plus the announced length, or 0 when no length was sent.
    fn on_finish(&self, _filename: &str, _path: &Path, _total_bytes: u64) {}

    /// The run failed. The partial file, if any, is left as written.
    fn on_error(&self, _message: &str) {}

    /// The run stopped after a pause request. The partial file is kept.
    fn on_pause(&self) {}

    /// The run stopped after a cancel request. The partial file is gone.
    fn on_cancel(&self) {}
}

impl<T: Callbacks + ?Sized> Callbacks for std::sync::Arc<T> {
    fn on_progress(&self, percent: f64) {
        (**self).on_progress(percent)
    }

    fn on_status(&self, text: &str) {
        (**self).on_status(text)
    }

    fn on_finish(&self, filename: &str, path: &Path, total_bytes: u64) {
        (**self).on_finish(filename, path, total_bytes)
    }

    fn on_error(&self, message: &str) {
        (**self).on_error(message)
    }

    fn on_pause(&self) {
        (**self).on_pause()
    }

    fn on_cancel(&self) {
        (**self).on_cancel()
    }
}

/// Callbacks that ignore every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

impl Callbacks for NoopCallbacks {}

type ProgressFn = Box<dyn Fn(f64) + Send + Sync>;
type TextFn = Box<dyn Fn(&str) + Send + Sync>;
type FinishFn = Box<dyn Fn(&str, &Path, u64) + Send + Sync>;
type SignalFn = Box<dyn Fn() + Send + Sync>;

/// Closure-backed [`Callbacks`]. Unset operations do nothing.
#[derive(Default)]
pub struct CallbackSet {
    progress: Option<ProgressFn>,
    status: Option<TextFn>,
    finish: Option<FinishFn>,
    error: Option<TextFn>,
    pause: Option<SignalFn>,
    cancel: Option<SignalFn>,
}

impl CallbackSet {
    /// Creates a set with every operation unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the progress handler.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(f));
        self
    }

    /// Set the status handler.
    pub fn on_status<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.status = Some(Box::new(f));
        self
    }

    /// Set the completion handler.
    pub fn on_finish<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Path, u64) + Send + Sync + 'static,
    {
        self.finish = Some(Box::new(f));
        self
    }

    /// Set the failure handler.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.error = Some(Box::new(f));
        self
    }

    /// Set the pause handler.
    pub fn on_pause<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.pause = Some(Box::new(f));
        self
    }

    /// Set the cancellation handler.
    pub fn on_cancel<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.cancel = Some(Box::new(f));
        self
    }
}

impl Callbacks for CallbackSet {
    fn on_progress(&self, percent: f64) {
        if let Some(ref f) = self.progress {
            f(percent);
        }
    }

    fn on_status(&self, text: &str) {
        if let Some(ref f) = self.status {
            f(text);
        }
    }

    fn on_finish(&self, filename: &str, path: &Path, total_bytes: u64) {
        if let Some(ref f) = self.finish {
            f(filename, path, total_bytes);
        }
    }

    fn on_error(&self, message: &str) {
        if let Some(ref f) = self.error {
            f(message);
        }
    }

    fn on_pause(&self) {
        if let Some(ref f) = self.pause {
            f();
        }
    }

    fn on_cancel(&self) {
        if let Some(ref f) = self.cancel {
            f();
        }
    }
}

impl fmt::Debug for CallbackSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSet")
            .field("on_progress", &self.progress.is_some())
            .field("on_status", &self.status.is_some())
            .field("on_finish", &self.finish.is_some())
            .field("on_error", &self.error.is_some())
            .field("on_pause", &self.pause.is_some())
            .field("on_cancel", &self.cancel.is_some())
            .finish()
    }
}
