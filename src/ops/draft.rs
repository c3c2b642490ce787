use chrono::{DateTime, NaiveDate, Utc};

use crate::model::task::{Priority, Status, SubTask, Task};
use crate::ops::store::{TaskError, TaskStore};

/// Raw form input for creating or editing a task.
///
/// `validate` turns it into a [`Task`] ready for [`TaskStore::upsert`];
/// nothing in the store changes until then.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    /// Id of the task being edited; `None` creates a new task
    pub id: Option<String>,
    pub title: String,
    pub priority: Priority,
    pub notes: String,
    /// `YYYY-MM-DD`; blank means no due date
    pub due: String,
    /// Replacement step list; `None` keeps the edited task's steps
    pub steps: Option<Vec<String>>,
    /// Explicit status; `None` keeps the edited task's status (todo for new)
    pub status: Option<Status>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Prefill a draft from an existing task (the edit form)
    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            id: Some(task.id.clone()),
            title: task.title.clone(),
            priority: task.priority,
            notes: task.notes.clone(),
            due: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            steps: Some(task.subtasks.iter().map(|s| s.text.clone()).collect()),
            status: None,
        }
    }

    /// Validate and build the task to upsert.
    ///
    /// Editing keeps the stored `created_at`, and the stored status unless
    /// one is given. Steps whose text matches an existing step keep its done
    /// flag; blank steps are dropped.
    pub fn validate(self, store: &TaskStore, now: DateTime<Utc>) -> Result<Task, TaskError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        let due_date = parse_due(&self.due)?;

        let existing = self.id.as_deref().and_then(|id| store.get(id));
        let id = match &self.id {
            Some(id) if id.trim().is_empty() => return Err(TaskError::EmptyId),
            Some(id) => id.clone(),
            None => mint_id(store, now),
        };

        let subtasks = match (self.steps, existing) {
            (Some(lines), existing) => merge_steps(existing.map(|t| t.subtasks.as_slice()), &lines),
            (None, Some(task)) => task.subtasks.clone(),
            (None, None) => Vec::new(),
        };

        Ok(Task {
            id,
            title: title.to_string(),
            priority: self.priority,
            notes: self.notes.trim_end().to_string(),
            due_date,
            status: self
                .status
                .or(existing.map(|t| t.status))
                .unwrap_or(Status::Todo),
            subtasks,
            created_at: existing.map_or(now, |t| t.created_at),
        })
    }
}

/// Parse a due date; blank input is no due date.
pub fn parse_due(raw: &str) -> Result<Option<NaiveDate>, TaskError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| TaskError::InvalidDate(raw.to_string()))
}

/// Mint a fresh id from the current time in milliseconds, bumped until it
/// does not collide with an existing task.
pub fn mint_id(store: &TaskStore, now: DateTime<Utc>) -> String {
    let mut n = now.timestamp_millis();
    loop {
        let id = n.to_string();
        if !store.contains(&id) {
            return id;
        }
        n += 1;
    }
}

fn merge_steps(existing: Option<&[SubTask]>, lines: &[String]) -> Vec<SubTask> {
    let existing = existing.unwrap_or(&[]);
    let mut used = vec![false; existing.len()];
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|text| !text.is_empty())
        .map(|text| {
            let prior = existing
                .iter()
                .enumerate()
                .position(|(i, s)| !used[i] && s.text == text);
            let done = match prior {
                Some(i) => {
                    used[i] = true;
                    existing[i].done
                }
                None => false,
            };
            SubTask {
                text: text.to_string(),
                done,
            }
        })
        .collect()
}
