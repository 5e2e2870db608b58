// Error kinds surfaced by the task store

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("empty task")]
    EmptyText,

    #[error("too long: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("task {0} not found")]
    NotFound(u64),

    #[error("unknown filter: {0} (expected all, completed or pending)")]
    UnknownFilter(String),
}

impl TaskError {
    /// True for errors the user can fix by changing the text they typed
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::EmptyText | TaskError::TooLong { .. })
    }
}
