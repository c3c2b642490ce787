use chrono::NaiveDate;
use serde::Serialize;

use crate::model::task::{Priority, Status, SubTask, Task};
use crate::ops::store::{StatusFilter, TaskStore, progress};

/// Shown when a query matches nothing
pub const EMPTY_MESSAGE: &str = "No tasks found.";

/// One row of the task list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItemView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub priority: Priority,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDate>,
    pub steps_done: usize,
    pub steps_total: usize,
    /// Width of the progress bar, 0–100
    pub percent: f64,
    /// `"1/2 steps"`, absent when the task has no steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_label: Option<String>,
    pub checked: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<SubTask>,
}

impl ListItemView {
    pub fn from_task(task: &Task) -> Self {
        let p = progress(task);
        ListItemView {
            id: task.id.clone(),
            title: task.title.clone(),
            notes: task.notes().map(str::to_string),
            priority: task.priority,
            status: task.status,
            due: task.due_date,
            steps_done: p.done,
            steps_total: p.total,
            percent: p.percent(),
            steps_label: (p.total > 0).then(|| format!("{}/{} steps", p.done, p.total)),
            checked: task.is_done(),
            steps: task.subtasks.clone(),
        }
    }

    /// Whether a progress bar is drawn for this row
    pub fn has_progress(&self) -> bool {
        self.steps_total > 0
    }
}

/// The filtered task list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    pub search: String,
    #[serde(serialize_with = "serialize_filter")]
    pub filter: StatusFilter,
    pub items: Vec<ListItemView>,
    /// Size of the whole store, regardless of filter
    pub total: usize,
}

impl ListView {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Message to show in place of rows, if any
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_MESSAGE)
    }
}

fn serialize_filter<S: serde::Serializer>(filter: &StatusFilter, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(filter.as_str())
}

pub fn list_view(store: &TaskStore, search: &str, filter: StatusFilter) -> ListView {
    ListView {
        search: search.to_string(),
        filter,
        items: store.filter(search, filter).map(ListItemView::from_task).collect(),
        total: store.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn no_steps_means_no_progress_bar() {
        let task = Task::new("1", "Write report", Utc::now());
        let row = ListItemView::from_task(&task);
        assert!(!row.has_progress());
        assert_eq!(row.steps_label, None);
        assert_eq!(row.percent, 0.0);
    }

    #[test]
    fn half_done_steps() {
        let mut task = Task::new("1", "Write report", Utc::now());
        task.subtasks = vec![
            SubTask { text: "a".into(), done: true },
            SubTask::new("b"),
        ];
        let row = ListItemView::from_task(&task);
        assert_eq!(row.steps_label.as_deref(), Some("1/2 steps"));
        assert_eq!(row.percent, 50.0);
    }

    #[test]
    fn empty_list_has_message() {
        let store = TaskStore::new();
        let view = list_view(&store, "anything", StatusFilter::All);
        assert_eq!(view.empty_message(), Some(EMPTY_MESSAGE));
        assert_eq!(view.total, 0);
    }

    #[test]
    fn list_keeps_store_order_and_total() {
        let store = TaskStore::from_tasks(vec![
            Task::new("b", "Beta", Utc::now()),
            Task::new("a", "Alpha", Utc::now()),
        ]);
        let view = list_view(&store, "", StatusFilter::All);
        let ids: Vec<_> = view.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);

        let filtered = list_view(&store, "alp", StatusFilter::All);
        assert_eq!(filtered.items.len(), 1);
        assert_eq!(filtered.total, 2);
    }
}
