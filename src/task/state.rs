//! Task identity and lifecycle states.

use std::fmt;

/// Engine-issued task identifier. Never reused within one engine.
pub type TaskId = u64;

/// Lifecycle of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Created, never scheduled.
    Idle,
    /// Scheduled, waiting for a free worker.
    Queued,
    /// Transferring.
    Running,
    /// Stopped on request, partial file kept.
    Paused,
    /// Stopped on request, partial file deleted.
    Cancelled,
    /// File complete.
    Finished,
    /// Stopped by an error.
    Failed,
}

impl TaskState {
    /// Whether a run is scheduled or in progress.
    pub fn is_active(self) -> bool {
        matches!(self, TaskState::Queued | TaskState::Running)
    }

    /// Whether this state ends a run.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Paused | TaskState::Cancelled | TaskState::Finished | TaskState::Failed
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Idle => "idle",
            TaskState::Queued => "queued",
            TaskState::Running => "running",
            TaskState::Paused => "paused",
            TaskState::Cancelled => "cancelled",
            TaskState::Finished => "finished",
            TaskState::Failed => "failed",
        };
        f.write_str(s)
    }
}
