// In-memory task store: ordered tasks, id counter and the active filter

use crate::config::Config;
use crate::error::TaskError;
use crate::filter::Filter;
use crate::task::{DEFAULT_MAX_TEXT_LEN, Task, normalize_text};
use serde::Serialize;
use tracing::{debug, warn};

/// Summary counts over all tasks, independent of the active filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Owner of every task in the session
///
/// Not synchronized. Callers sharing a store across threads must wrap the
/// whole store in a lock so `tasks` and `next_id` move together.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    filter: Filter,
    max_text_len: usize,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Create an empty store with the default 100 character limit
    pub fn new() -> Self {
        Self::with_max_text_len(DEFAULT_MAX_TEXT_LEN)
    }

    pub fn with_config(config: &Config) -> Self {
        Self::with_max_text_len(config.max_text_len)
    }

    pub fn with_max_text_len(max_text_len: usize) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            filter: Filter::All,
            max_text_len: max_text_len.max(1),
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Validate `text` and append a new pending task
    pub fn add(&mut self, text: &str) -> Result<Task, TaskError> {
        let text = normalize_text(text, self.max_text_len).inspect_err(|e| {
            warn!(error = %e, "add: rejected");
        })?;

        let task = Task::new(self.next_id, text);
        self.next_id += 1;
        self.tasks.push(task.clone());

        debug!(id = task.id, next_id = self.next_id, "add: created task");
        Ok(task)
    }

    /// Flip the completion flag of task `id`
    pub fn toggle(&mut self, id: u64) -> Result<Task, TaskError> {
        let task = self.find_mut(id)?;
        task.completed = !task.completed;

        debug!(id, completed = task.completed, "toggle: updated task");
        Ok(task.clone())
    }

    /// Replace the text of task `id`, keeping id, state and creation time
    ///
    /// The task is looked up before the text is validated, so an unknown id
    /// reports `NotFound` even when the new text is also invalid.
    pub fn edit(&mut self, id: u64, new_text: &str) -> Result<Task, TaskError> {
        let max_text_len = self.max_text_len;
        let task = self.find_mut(id)?;

        let text = normalize_text(new_text, max_text_len).inspect_err(|e| {
            warn!(id, error = %e, "edit: rejected, text unchanged");
        })?;
        task.text = text;

        debug!(id, "edit: updated task");
        Ok(task.clone())
    }

    /// Remove task `id`; an absent id is a no-op and returns `None`
    pub fn remove(&mut self, id: u64) -> Option<Task> {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(index) => {
                let task = self.tasks.remove(index);
                debug!(id, remaining = self.tasks.len(), "remove: deleted task");
                Some(task)
            }
            None => {
                debug!(id, "remove: no such task, nothing to do");
                None
            }
        }
    }

    /// Remove every completed task, returning how many were removed
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();

        debug!(removed, "clear_completed: done");
        removed
    }

    pub fn set_filter(&mut self, filter: Filter) {
        debug!(from = %self.filter, to = %filter, "set_filter");
        self.filter = filter;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tasks matching the active filter, in insertion order
    ///
    /// Returns owned copies; changing them does not touch the store.
    pub fn list(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).cloned().collect()
    }

    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Stats {
            total,
            completed,
            pending: total - completed,
        }
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// The id the next successful `add` will assign
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn max_text_len(&self) -> usize {
        self.max_text_len
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// True when the active filter hides every task (or there are none)
    pub fn is_view_empty(&self) -> bool {
        !self.tasks.iter().any(|t| self.filter.matches(t))
    }

    fn find_mut(&mut self, id: u64) -> Result<&mut Task, TaskError> {
        self.tasks.iter_mut().find(|t| t.id == id).ok_or_else(|| {
            warn!(id, "task not found");
            TaskError::NotFound(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    /// Snapshot of everything a rejected call must leave untouched
    fn snapshot(store: &TaskStore) -> (Vec<Task>, u64, Filter) {
        (store.tasks.clone(), store.next_id(), store.filter())
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = TaskStore::new();
        assert!(store.is_empty());
        assert!(store.is_view_empty());
        assert_eq!(store.next_id(), 1);
        assert_eq!(store.filter(), Filter::All);
        assert_eq!(store.stats(), Stats::default());
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut store = TaskStore::new();

        let first = store.add("Buy milk").unwrap();
        let second = store.add("  Walk dog  ").unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(first.text, "Buy milk");
        assert!(!first.completed);
        assert_eq!(second.id, 2);
        assert_eq!(second.text, "Walk dog");
        assert_eq!(store.next_id(), 3);
        assert_eq!(ids(&store.list()), vec![1, 2]);
    }

    #[test]
    fn test_ids_unique_and_below_next_id() {
        let mut store = TaskStore::new();
        for i in 0..50 {
            store.add(&format!("task {}", i)).unwrap();
            if i % 3 == 0 {
                store.remove(i as u64);
            }
        }

        let tasks = store.list();
        let mut seen = std::collections::HashSet::new();
        for task in &tasks {
            assert!(seen.insert(task.id), "duplicate id {}", task.id);
            assert!(task.id < store.next_id());
        }
    }

    #[test]
    fn test_add_rejects_empty() {
        let mut store = TaskStore::new();
        store.add("keep").unwrap();
        let before = snapshot(&store);

        assert_eq!(store.add(""), Err(TaskError::EmptyText));
        assert_eq!(store.add("   "), Err(TaskError::EmptyText));
        assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn test_add_rejects_too_long() {
        let mut store = TaskStore::new();
        let before = snapshot(&store);

        let err = store.add(&"x".repeat(101)).unwrap_err();
        assert_eq!(err, TaskError::TooLong { len: 101, max: 100 });
        assert_eq!(snapshot(&store), before);

        assert!(store.add(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_custom_max_len_from_config() {
        let config = Config {
            max_text_len: 5,
            ..Config::default()
        };
        let mut store = TaskStore::with_config(&config);

        assert!(store.add("12345").is_ok());
        assert!(store.add("123456").is_err());
        assert_eq!(store.max_text_len(), 5);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut store = TaskStore::new();
        store.add("Buy milk").unwrap();

        assert!(store.toggle(1).unwrap().completed);
        assert!(!store.toggle(1).unwrap().completed);
        assert!(!store.get(1).unwrap().completed);
    }

    #[test]
    fn test_toggle_missing_is_not_found() {
        let mut store = TaskStore::new();
        store.add("Buy milk").unwrap();
        let before = snapshot(&store);

        assert_eq!(store.toggle(42), Err(TaskError::NotFound(42)));
        assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn test_edit_replaces_text_only() {
        let mut store = TaskStore::new();
        let original = store.add("Buy milk").unwrap();
        store.toggle(1).unwrap();

        let edited = store.edit(1, "  Buy oat milk ").unwrap();
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.text, "Buy oat milk");
        assert!(edited.completed);
        assert_eq!(edited.created_at, original.created_at);
    }

    #[test]
    fn test_edit_empty_keeps_original_text() {
        let mut store = TaskStore::new();
        store.add("Buy milk").unwrap();
        let before = snapshot(&store);

        assert_eq!(store.edit(1, ""), Err(TaskError::EmptyText));
        assert_eq!(store.edit(1, "  \t"), Err(TaskError::EmptyText));
        assert!(store.edit(1, &"y".repeat(101)).unwrap_err().is_validation());
        assert_eq!(store.get(1).unwrap().text, "Buy milk");
        assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn test_edit_missing_is_not_found() {
        let mut store = TaskStore::new();
        assert_eq!(store.edit(9, "anything"), Err(TaskError::NotFound(9)));
        assert_eq!(store.edit(9, ""), Err(TaskError::NotFound(9)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = TaskStore::new();
        store.add("a").unwrap();
        store.add("b").unwrap();

        let removed = store.remove(2).unwrap();
        assert_eq!(removed.text, "b");
        let once = snapshot(&store);

        assert!(store.remove(2).is_none());
        assert_eq!(snapshot(&store), once);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut store = TaskStore::new();
        store.add("a").unwrap();
        store.add("b").unwrap();
        store.remove(2);

        let next = store.add("c").unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn test_filter_only_changes_view() {
        let mut store = TaskStore::new();
        store.add("a").unwrap();
        store.add("b").unwrap();
        store.add("c").unwrap();
        store.toggle(2).unwrap();

        store.set_filter(Filter::Pending);
        assert_eq!(ids(&store.list()), vec![1, 3]);

        store.set_filter(Filter::Completed);
        assert_eq!(ids(&store.list()), vec![2]);

        store.set_filter(Filter::All);
        assert_eq!(ids(&store.list()), vec![1, 2, 3]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_list_returns_copies() {
        let mut store = TaskStore::new();
        store.add("Buy milk").unwrap();

        let mut listed = store.list();
        listed[0].text = "changed".to_string();
        listed[0].completed = true;
        listed.clear();

        let task = store.get(1).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn test_is_view_empty_follows_filter() {
        let mut store = TaskStore::new();
        store.add("a").unwrap();

        store.set_filter(Filter::Completed);
        assert!(store.is_view_empty());
        assert!(!store.is_empty());

        store.toggle(1).unwrap();
        assert!(!store.is_view_empty());
    }

    #[test]
    fn test_stats_always_consistent() {
        let mut store = TaskStore::new();
        for i in 1..=6 {
            store.add(&format!("task {}", i)).unwrap();
            if i % 2 == 0 {
                store.toggle(i).unwrap();
            }
            let stats = store.stats();
            assert_eq!(stats.completed + stats.pending, stats.total);
        }

        store.set_filter(Filter::Pending);
        assert_eq!(
            store.stats(),
            Stats {
                total: 6,
                completed: 3,
                pending: 3
            }
        );
    }

    #[test]
    fn test_clear_completed() {
        let mut store = TaskStore::new();
        store.add("a").unwrap();
        store.add("b").unwrap();
        store.add("c").unwrap();
        store.toggle(1).unwrap();
        store.toggle(3).unwrap();

        assert_eq!(store.clear_completed(), 2);
        assert_eq!(ids(&store.list()), vec![2]);
        assert_eq!(store.next_id(), 4);
        assert_eq!(store.clear_completed(), 0);
    }

    #[test]
    fn test_milk_and_dog_scenario() {
        let mut store = TaskStore::new();

        let milk = store.add("Buy milk").unwrap();
        assert_eq!((milk.id, milk.text.as_str(), milk.completed), (1, "Buy milk", false));
        let dog = store.add("Walk dog").unwrap();
        assert_eq!(dog.id, 2);

        store.toggle(1).unwrap();
        store.set_filter(Filter::Completed);

        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 1);
        assert_eq!(listed[0].text, "Buy milk");
        assert!(listed[0].completed);
        assert_eq!(
            store.stats(),
            Stats {
                total: 2,
                completed: 1,
                pending: 1
            }
        );

        store.remove(2);
        store.set_filter(Filter::All);
        assert_eq!(ids(&store.list()), vec![1]);
        assert_eq!(store.stats().total, 1);
    }

    #[test]
    fn test_stats_serialization() {
        let stats = Stats {
            total: 2,
            completed: 1,
            pending: 1,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"total":2,"completed":1,"pending":1}"#);
    }
}
