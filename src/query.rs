//! Read-only query facade.
//!
//! Composes the task lifecycle and streak engine into presentation-ready
//! views. Defines no invariants of its own and never writes.

use serde::Serialize;

use crate::error::Result;
use crate::lifecycle::{Task, TaskLifecycle};
use crate::streak::{DayMark, StreakEngine, StreakSummary};

/// Lifecycle state of a user's current task.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// No current task (none created, or the last one rolled over)
    None,
    /// Current task exists and is incomplete
    Pending,
    /// Current task exists and is completed
    Done,
}

/// Today's task as the presentation layer sees it.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub state: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
}

/// Streak summary plus the rolling window.
#[derive(Debug, Clone, Serialize)]
pub struct StreakView {
    #[serde(flatten)]
    pub summary: StreakSummary,
    pub window: Vec<DayMark>,
}

#[derive(Clone)]
pub struct QueryFacade {
    lifecycle: TaskLifecycle,
    streak: StreakEngine,
    window_days: usize,
}

impl QueryFacade {
    pub fn new(lifecycle: TaskLifecycle, streak: StreakEngine, window_days: usize) -> Self {
        Self {
            lifecycle,
            streak,
            window_days,
        }
    }

    pub fn current_task_view(&self, user_id: &str) -> Result<TaskView> {
        let task = self.lifecycle.current_task(user_id)?;
        let state = match &task {
            None => TaskState::None,
            Some(task) if task.completed => TaskState::Done,
            Some(_) => TaskState::Pending,
        };
        Ok(TaskView { state, task })
    }

    pub fn streak_view(&self, user_id: &str) -> Result<StreakView> {
        let summary = self.streak.summary(user_id)?;
        let window = self.streak.last_n_days(user_id, self.window_days)?;
        Ok(StreakView { summary, window })
    }
}
