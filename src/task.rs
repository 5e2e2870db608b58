// Task record and text validation

use crate::error::TaskError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum task text length, in characters, after trimming
pub const DEFAULT_MAX_TEXT_LEN: usize = 100;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned by the store at creation, never reused
    pub id: u64,
    pub text: String,
    pub completed: bool,
    /// Milliseconds since epoch
    pub created_at: i64,
}

impl Task {
    pub(crate) fn new(id: u64, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at: now_ms(),
        }
    }

    /// Creation time as a UTC datetime, for display
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }
}

/// Trim raw input and check it against the length limit
///
/// Length is counted in chars so multi-byte text is not penalized.
pub fn normalize_text(raw: &str, max_len: usize) -> Result<String, TaskError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyText);
    }

    let len = text.chars().count();
    if len > max_len {
        return Err(TaskError::TooLong { len, max: max_len });
    }

    Ok(text.to_string())
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
