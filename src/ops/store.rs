use std::fmt;
use std::str::FromStr;

use crate::model::task::{Status, SubTask, Task};

/// Error type for task validation and mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task id must not be empty")]
    EmptyId,
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("invalid due date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("task not found: {0}")]
    NotFound(String),
}

/// Which statuses a list query keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Anything not done
    Active,
    /// Done only
    Completed,
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status != Status::Done,
            StatusFilter::Completed => status == Status::Done,
        }
    }

    /// all → active → completed → all
    pub fn cycle(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(format!(
                "invalid filter '{}' (expected: all, active, completed)",
                other
            )),
        }
    }
}

/// Checklist completion of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    /// Completion percentage; 0 when there are no steps
    pub fn percent(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64 * 100.0
        }
    }
}

/// Step counts for a task
pub fn progress(task: &Task) -> Progress {
    Progress {
        done: task.subtasks.iter().filter(|s| s.done).count(),
        total: task.subtasks.len(),
    }
}

/// The ordered in-memory task list. Newest tasks sit at the front.
///
/// Operations on an id that is not present are no-ops; the store never
/// holds two tasks with the same id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted tasks. Later duplicates of an id are
    /// dropped so the uniqueness invariant holds from the start.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = TaskStore::new();
        for task in tasks {
            if store.position(&task.id).is_some() {
                log::warn!("dropping duplicate task id {}", task.id);
                continue;
            }
            store.tasks.push(task);
        }
        store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// First task that is not done, in store order
    pub fn first_open(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| !t.is_done())
    }

    /// Replace the task with the same id in place, or insert at the front.
    pub fn upsert(&mut self, task: Task) -> Result<(), TaskError> {
        if task.id.trim().is_empty() {
            return Err(TaskError::EmptyId);
        }
        if task.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        match self.position(&task.id) {
            Some(idx) => self.tasks[idx] = task,
            None => self.tasks.insert(0, task),
        }
        Ok(())
    }

    /// Remove a task. Returns the removed task, `None` if absent.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let idx = self.position(id)?;
        Some(self.tasks.remove(idx))
    }

    /// Set a task's status (any transition allowed). Returns false if absent.
    pub fn set_status(&mut self, id: &str, status: Status) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    /// Checkbox toggle: done → todo, anything else → done.
    /// Returns the new status.
    pub fn toggle_done(&mut self, id: &str) -> Option<Status> {
        let task = self.get_mut(id)?;
        task.status = if task.is_done() {
            Status::Todo
        } else {
            Status::Done
        };
        Some(task.status)
    }

    /// Tasks whose title contains `term` (case-insensitive) and whose status
    /// passes `filter`, in store order.
    pub fn filter<'a>(
        &'a self,
        term: &str,
        filter: StatusFilter,
    ) -> impl Iterator<Item = &'a Task> + use<'a> {
        let needle = term.to_lowercase();
        self.tasks.iter().filter(move |t| {
            filter.matches(t.status) && t.title.to_lowercase().contains(&needle)
        })
    }

    /// Append a step. Blank text is ignored. Returns true if a step was added.
    pub fn add_subtask(&mut self, id: &str, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(task) => {
                task.subtasks.push(SubTask::new(text));
                true
            }
            None => false,
        }
    }

    /// Flip a step's done flag. Returns the new flag.
    pub fn toggle_subtask(&mut self, id: &str, index: usize) -> Option<bool> {
        let step = self.get_mut(id)?.subtasks.get_mut(index)?;
        step.done = !step.done;
        Some(step.done)
    }

    pub fn remove_subtask(&mut self, id: &str, index: usize) -> Option<SubTask> {
        let task = self.get_mut(id)?;
        if index < task.subtasks.len() {
            Some(task.subtasks.remove(index))
        } else {
            None
        }
    }
}
