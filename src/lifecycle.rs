//! Task lifecycle: one focus per user per day.
//!
//! Tasks are appended to a per-user JSONL log; the newest entry is the
//! candidate "current" task. States per user: NONE (no current task),
//! PENDING (newest task incomplete, created today), DONE (newest task
//! completed). An incomplete task from a previous day is not failed or
//! deleted — it simply stops being current (rollover), prompting a fresh
//! focus. A completed task stays visible until replaced, whatever its
//! age.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{calendar_day, Clock};
use crate::error::{Error, Result};
use crate::id::IdGenerator;
use crate::storage::Storage;

/// A single day's focus task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Lifecycle state of this task as of `today`.
    pub fn is_stale(&self, today: chrono::NaiveDate) -> bool {
        !self.completed && calendar_day(self.created_at) != today
    }
}

#[derive(Clone)]
pub struct TaskLifecycle {
    storage: Storage,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl TaskLifecycle {
    pub fn new(storage: Storage, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            ids,
            clock,
        }
    }

    /// Create a new task; it becomes current by recency.
    ///
    /// The engine does not block creation while a pending task exists;
    /// single-task-at-a-time is the caller's rule.
    pub fn create_task(&self, user_id: &str, text: &str) -> Result<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("task text cannot be empty".to_string()));
        }

        let task = Task {
            id: self.ids.generate(),
            user_id: user_id.to_string(),
            text: text.to_string(),
            completed: false,
            created_at: self.clock.now(),
            completed_at: None,
        };

        let _lock = self.storage.lock_user(user_id)?;
        self.storage
            .append_jsonl(&self.storage.tasks_log(user_id), &task)?;

        Ok(task)
    }

    /// The user's current task, if any.
    ///
    /// Returns the most recently created task, except an incomplete task
    /// whose creation day is not today — that one has rolled over and
    /// reads as absent.
    pub fn current_task(&self, user_id: &str) -> Result<Option<Task>> {
        let newest = self.newest_task(user_id)?;
        let today = self.clock.today();

        Ok(newest.filter(|task| !task.is_stale(today)))
    }

    /// Mark a task completed.
    ///
    /// Idempotent at this layer: completing an already-completed task
    /// re-sets the same fields. The streak engine guards against
    /// double-counting the day.
    pub fn complete_task(
        &self,
        task_id: &str,
        user_id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<Task> {
        let _lock = self.storage.lock_user(user_id)?;

        let log_path = self.storage.tasks_log(user_id);
        let mut tasks: Vec<Task> = self.storage.read_jsonl(&log_path)?;

        let task = tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

        task.completed = true;
        task.completed_at = Some(completed_at);
        let updated = task.clone();

        self.rewrite_log(&log_path, &tasks)?;

        Ok(updated)
    }

    /// Most recent task regardless of rollover; history is never surfaced
    /// beyond this.
    fn newest_task(&self, user_id: &str) -> Result<Option<Task>> {
        let tasks: Vec<Task> = self.storage.read_jsonl(&self.storage.tasks_log(user_id))?;
        Ok(tasks
            .into_iter()
            .max_by(|a, b| a.created_at.cmp(&b.created_at)))
    }

    fn rewrite_log(&self, path: &std::path::Path, tasks: &[Task]) -> Result<()> {
        let mut buffer = Vec::new();
        for task in tasks {
            let json = serde_json::to_string(task)?;
            buffer.extend_from_slice(json.as_bytes());
            buffer.push(b'\n');
        }
        crate::lock::write_atomic(path, &buffer)
    }
}
