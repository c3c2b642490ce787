use serde::Serialize;

use crate::ops::store::TaskStore;

/// Message delivered when a focus session runs out
pub const COMPLETION_MESSAGE: &str = "Focus Session Complete! Take a break.";

/// Default session length (25 minutes)
pub const DEFAULT_DURATION_SECS: u32 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Reset or never started; the full length remains
    #[default]
    Idle,
    Running,
    Paused,
    /// Ran down to zero; stays here until restarted or reset
    Finished,
}

impl TimerState {
    pub fn label(self) -> &'static str {
        match self {
            TimerState::Idle => "ready",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Finished => "finished",
        }
    }
}

/// Emitted by [`FocusTimer::tick`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    SessionComplete(Completion),
}

/// Outcome of stopping a session with a completion message. The caller
/// notifies the user and, if they confirm, marks `task` done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub message: String,
    pub task: Option<String>,
}

/// A single countdown clock, optionally bound to one task by id.
///
/// The binding is a plain id: whoever deletes tasks must call
/// [`FocusTimer::unbind_if`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTimer {
    state: TimerState,
    remaining_secs: u32,
    total_secs: u32,
    bound_task: Option<String>,
}

impl Default for FocusTimer {
    fn default() -> Self {
        FocusTimer::new(DEFAULT_DURATION_SECS)
    }
}

impl FocusTimer {
    pub fn new(duration_secs: u32) -> Self {
        FocusTimer {
            state: TimerState::Idle,
            remaining_secs: duration_secs,
            total_secs: duration_secs,
            bound_task: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn bound_task(&self) -> Option<&str> {
        self.bound_task.as_deref()
    }

    /// Start counting down. Binds the first open task when nothing is bound.
    /// Returns false if already running.
    pub fn start(&mut self, store: &TaskStore) -> bool {
        if self.is_running() {
            return false;
        }
        if self.bound_task.is_none()
            && let Some(task) = store.first_open()
        {
            log::debug!("timer auto-bound to {}", task.id);
            self.bound_task = Some(task.id.clone());
        }
        if self.remaining_secs == 0 {
            self.remaining_secs = self.total_secs;
        }
        self.state = TimerState::Running;
        true
    }

    /// Advance one second. Returns the completion event on the tick that
    /// reaches zero; ticks while not running do nothing.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.is_running() {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.stop(Some(COMPLETION_MESSAGE)).map(TimerEvent::SessionComplete)
    }

    /// Halt ticking. A completion message marks a natural expiry and yields
    /// the [`Completion`] to hand to the notifier; a plain stop is a pause.
    /// Only a running session can complete or pause.
    pub fn stop(&mut self, completion: Option<&str>) -> Option<Completion> {
        if !self.is_running() {
            return None;
        }
        match completion {
            Some(message) => {
                self.state = TimerState::Finished;
                Some(Completion {
                    message: message.to_string(),
                    task: self.bound_task.clone(),
                })
            }
            None => {
                self.state = TimerState::Paused;
                None
            }
        }
    }

    /// Stop and set both remaining and total to `duration_secs`.
    pub fn reset(&mut self, duration_secs: u32) {
        self.stop(None);
        self.remaining_secs = duration_secs;
        self.total_secs = duration_secs;
        self.state = TimerState::Idle;
    }

    /// Stop and restore the last configured duration.
    pub fn rewind(&mut self) {
        self.reset(self.total_secs);
    }

    pub fn bind(&mut self, task_id: impl Into<String>) {
        self.bound_task = Some(task_id.into());
    }

    pub fn unbind(&mut self) {
        self.bound_task = None;
    }

    /// Clear the binding if it points at `task_id`. Returns true if cleared.
    pub fn unbind_if(&mut self, task_id: &str) -> bool {
        if self.bound_task.as_deref() == Some(task_id) {
            self.bound_task = None;
            true
        } else {
            false
        }
    }

    /// Elapsed fraction of the session, `None` for a zero-length timer
    pub fn progress(&self) -> Option<f64> {
        if self.total_secs == 0 {
            return None;
        }
        Some((self.total_secs - self.remaining_secs.min(self.total_secs)) as f64 / self.total_secs as f64)
    }

    /// `MM:SS`
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

/// Format seconds as zero-padded `MM:SS` (minutes may exceed 59)
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Status, Task};
    use chrono::Utc;

    fn store() -> TaskStore {
        let mut done = Task::new("1", "finished", Utc::now());
        done.status = Status::Done;
        TaskStore::from_tasks(vec![done, Task::new("2", "open", Utc::now())])
    }

    #[test]
    fn reset_then_progress_is_zero() {
        let mut timer = FocusTimer::default();
        timer.reset(300);
        assert_eq!(timer.progress(), Some(0.0));
        assert_eq!(timer.display(), "05:00");
    }

    #[test]
    fn zero_length_has_no_progress() {
        let timer = FocusTimer::new(0);
        assert_eq!(timer.progress(), None);
    }

    #[test]
    fn start_binds_first_open_task() {
        let mut timer = FocusTimer::default();
        assert!(timer.start(&store()));
        assert_eq!(timer.bound_task(), Some("2"));
        assert!(!timer.start(&store()));
    }

    #[test]
    fn start_keeps_manual_binding() {
        let mut timer = FocusTimer::default();
        timer.bind("1");
        timer.start(&store());
        assert_eq!(timer.bound_task(), Some("1"));
    }

    #[test]
    fn start_with_empty_store_runs_unbound() {
        let mut timer = FocusTimer::default();
        assert!(timer.start(&TaskStore::new()));
        assert!(timer.is_running());
        assert_eq!(timer.bound_task(), None);
    }

    #[test]
    fn tick_from_one_completes_once() {
        let mut timer = FocusTimer::new(1);
        timer.start(&store());
        let events: Vec<_> = (0..5).filter_map(|_| timer.tick()).collect();
        assert_eq!(
            events,
            vec![TimerEvent::SessionComplete(Completion {
                message: COMPLETION_MESSAGE.to_string(),
                task: Some("2".to_string()),
            })]
        );
        assert_eq!(timer.remaining_secs(), 0);
        assert_eq!(timer.state(), TimerState::Finished);
        assert_eq!(timer.progress(), Some(1.0));
    }

    #[test]
    fn ticks_while_paused_do_nothing() {
        let mut timer = FocusTimer::new(10);
        timer.start(&store());
        timer.tick();
        assert!(timer.stop(None).is_none());
        assert_eq!(timer.state(), TimerState::Paused);
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_secs(), 9);
    }

    #[test]
    fn completion_needs_a_running_session() {
        let mut timer = FocusTimer::new(10);
        timer.bind("2");
        assert!(timer.stop(Some(COMPLETION_MESSAGE)).is_none());
        assert_eq!(timer.state(), TimerState::Idle);

        timer.start(&store());
        timer.stop(None);
        assert!(timer.stop(Some(COMPLETION_MESSAGE)).is_none());
        assert_eq!(timer.state(), TimerState::Paused);
        assert_eq!(timer.remaining_secs(), 10);
    }

    #[test]
    fn restart_after_finish_rewinds() {
        let mut timer = FocusTimer::new(2);
        timer.start(&store());
        timer.tick();
        timer.tick();
        assert_eq!(timer.state(), TimerState::Finished);
        timer.start(&store());
        assert_eq!(timer.remaining_secs(), 2);
    }

    #[test]
    fn rewind_restores_total() {
        let mut timer = FocusTimer::new(60);
        timer.start(&store());
        timer.tick();
        timer.rewind();
        assert_eq!(timer.remaining_secs(), 60);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn unbind_if_only_matches_bound() {
        let mut timer = FocusTimer::default();
        timer.bind("a");
        assert!(!timer.unbind_if("b"));
        assert!(timer.unbind_if("a"));
        assert_eq!(timer.bound_task(), None);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(61), "01:01");
    }
}
