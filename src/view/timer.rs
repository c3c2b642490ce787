use serde::Serialize;

use crate::ops::store::TaskStore;
use crate::ops::timer::{FocusTimer, TimerState, format_clock};

/// A task offered in the focus picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusCandidate {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerView {
    /// `MM:SS`
    pub clock: String,
    pub state: TimerState,
    pub running: bool,
    pub finished: bool,
    /// Elapsed fraction 0.0–1.0; 0 for a zero-length timer
    pub progress: f64,
    pub total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_title: Option<String>,
    /// Open tasks, in store order
    pub candidates: Vec<FocusCandidate>,
}

pub fn timer_view(timer: &FocusTimer, store: &TaskStore) -> TimerView {
    let bound = timer.bound_task().and_then(|id| store.get(id));
    TimerView {
        clock: timer.display(),
        state: timer.state(),
        running: timer.is_running(),
        finished: timer.state() == TimerState::Finished,
        progress: timer.progress().unwrap_or(0.0),
        total: format_clock(timer.total_secs()),
        task_id: bound.map(|t| t.id.clone()),
        task_title: bound.map(|t| t.title.clone()),
        candidates: store
            .iter()
            .filter(|t| !t.is_done())
            .map(|t| FocusCandidate {
                id: t.id.clone(),
                title: t.title.clone(),
            })
            .collect(),
    }
}
