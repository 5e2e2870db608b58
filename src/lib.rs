// TodoStore - In-memory to-do list with add/toggle/edit/remove and filtered views

pub mod config;
pub mod error;
pub mod filter;
pub mod repl;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use config::Config;
pub use error::TaskError;
pub use filter::Filter;
pub use repl::{Session, SessionOptions};
pub use store::{Stats, TaskStore};
pub use task::{DEFAULT_MAX_TEXT_LEN, Task, now_ms};
