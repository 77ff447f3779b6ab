//! Cooperative pause/cancel signalling between callers and a running task.
//!
//! Requests are plain atomic stores; the running task polls them once per
//! chunk. A store with `Release` ordering paired with an `Acquire` load means
//! a task that observes a request also observes everything the requesting
//! thread did before it.

use std::sync::atomic::{AtomicBool, Ordering};

/// Why a transfer stops early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Keep the partial file for a later resume.
    Pause,
    /// Discard the partial file.
    Cancel,
}

/// Stop and cancel requests for one task.
#[derive(Debug, Default)]
pub struct ControlFlags {
    stop: AtomicBool,
    cancel: AtomicBool,
}

impl ControlFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the task to stop and keep its partial file. Idempotent.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Ask the task to stop and delete its partial file. Idempotent.
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// The pending interrupt, if any. Cancel takes precedence over pause.
    pub fn interrupt(&self) -> Option<Interrupt> {
        if self.cancel_requested() {
            Some(Interrupt::Cancel)
        } else if self.stop_requested() {
            Some(Interrupt::Pause)
        } else {
            None
        }
    }
}
