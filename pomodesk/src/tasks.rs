//! The to-do list shown next to the timer.

use crate::persistence::TaskStore;
use chrono::Utc;
use pomodesk_ipc::TaskEntry;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Creation time in Unix milliseconds, strictly increasing within a list.
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

impl From<&Task> for TaskEntry {
    fn from(task: &Task) -> Self {
        TaskEntry {
            id: task.id,
            text: task.text.clone(),
            completed: task.completed,
        }
    }
}

/// Task list that writes itself back to its store after every change.
pub struct TaskList {
    tasks: Vec<Task>,
    store: Option<TaskStore>,
}

impl TaskList {
    /// Load from `store`. An unreadable file gives an empty list.
    pub fn load(store: TaskStore) -> Self {
        let tasks = store.load().unwrap_or_else(|e| {
            warn!("Starting with an empty task list: {:#}", e);
            Vec::new()
        });
        debug!(count = tasks.len(), path = ?store.path(), "tasks loaded");
        Self {
            tasks,
            store: Some(store),
        }
    }

    /// A list that is never written anywhere.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            tasks: Vec::new(),
            store: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn entries(&self) -> Vec<TaskEntry> {
        self.tasks.iter().map(TaskEntry::from).collect()
    }

    /// Add a task, returning its id. Blank text is ignored.
    pub fn add(&mut self, text: &str) -> Option<i64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.next_id();
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            completed: false,
        });
        self.persist();
        Some(id)
    }

    /// Returns false when no task has `id`.
    pub fn toggle(&mut self, id: i64) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        self.persist();
        true
    }

    /// Returns false when no task has `id`.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.persist();
        true
    }

    fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        match self.tasks.iter().map(|t| t.id).max() {
            Some(last) if last >= now => last + 1,
            _ => now,
        }
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.tasks) {
                warn!("Failed to save tasks: {:#}", e);
            }
        }
    }
}
