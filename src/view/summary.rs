use serde::Serialize;

use crate::model::task::Status;
use crate::ops::store::TaskStore;

/// Task counts per status, the input to the analytics chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SummaryView {
    pub todo: usize,
    pub doing: usize,
    pub done: usize,
}

impl SummaryView {
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Todo => self.todo,
            Status::Doing => self.doing,
            Status::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.todo + self.doing + self.done
    }

    /// Bars in chart order: To Do, In Progress, Done
    pub fn bars(&self) -> [(&'static str, usize); 3] {
        Status::ALL.map(|s| (s.label(), self.count(s)))
    }

    /// Done as a percentage of all tasks; 0 for an empty store
    pub fn completion_percent(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.done as f64 / total as f64 * 100.0,
        }
    }
}

pub fn summary_view(store: &TaskStore) -> SummaryView {
    let mut summary = SummaryView::default();
    for task in store.iter() {
        match task.status {
            Status::Todo => summary.todo += 1,
            Status::Doing => summary.doing += 1,
            Status::Done => summary.done += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use chrono::Utc;

    #[test]
    fn counts_each_status() {
        let mut tasks = Vec::new();
        for (i, status) in [Status::Todo, Status::Done, Status::Done, Status::Doing]
            .into_iter()
            .enumerate()
        {
            let mut t = Task::new(i.to_string(), "t", Utc::now());
            t.status = status;
            tasks.push(t);
        }
        let summary = summary_view(&TaskStore::from_tasks(tasks));
        assert_eq!(
            summary.bars(),
            [("To Do", 1), ("In Progress", 1), ("Done", 2)]
        );
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.completion_percent(), 50.0);
    }

    #[test]
    fn empty_store_is_all_zero() {
        let summary = summary_view(&TaskStore::new());
        assert_eq!(summary, SummaryView::default());
        assert_eq!(summary.completion_percent(), 0.0);
    }
}
