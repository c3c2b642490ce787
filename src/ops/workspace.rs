use std::path::Path;

use chrono::Utc;

use crate::io::storage::{self, Storage, StorageError};
use crate::model::task::{Status, SubTask, Task};
use crate::ops::draft::TaskDraft;
use crate::ops::store::{TaskError, TaskStore};
use crate::ops::timer::{Completion, FocusTimer, TimerEvent};

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Application root: owns the task store, the focus timer and the storage
/// they persist to. Every mutation that changes the task list rewrites the
/// full list before returning.
pub struct Workspace {
    store: TaskStore,
    timer: FocusTimer,
    storage: Box<dyn Storage>,
    theme: String,
}

impl Workspace {
    /// Load tasks and theme from `storage`.
    pub fn open(storage: Box<dyn Storage>, timer: FocusTimer) -> Result<Self, StorageError> {
        let tasks = storage::load_tasks(storage.as_ref())?;
        let theme = storage::load_theme(storage.as_ref());
        log::info!("loaded {} tasks", tasks.len());
        Ok(Workspace {
            store: TaskStore::from_tasks(tasks),
            timer,
            storage,
            theme,
        })
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn timer(&self) -> &FocusTimer {
        &self.timer
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        storage::save_tasks(self.storage.as_mut(), self.store.tasks())
    }

    /// Re-read the task list from storage, picking up writes made by other
    /// processes. A timer bound to a task that no longer exists is unbound.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        let tasks = storage::load_tasks(self.storage.as_ref())?;
        self.store = TaskStore::from_tasks(tasks);
        if let Some(id) = self.timer.bound_task().map(str::to_string)
            && !self.store.contains(&id)
        {
            log::debug!("bound task {} disappeared on reload", id);
            self.timer.unbind();
        }
        Ok(())
    }

    /// Run one read-modify-write cycle: lock (when the storage is shared),
    /// reload, apply `f`. `f` persists when it changed something.
    fn write_cycle<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, WorkspaceError>,
    ) -> Result<T, WorkspaceError> {
        let _lock = self.storage.lock()?;
        self.reload()?;
        f(self)
    }

    // -----------------------------------------------------------------------
    // Task mutations
    // -----------------------------------------------------------------------

    /// Validate a form draft and upsert it. Returns the task id.
    pub fn submit(&mut self, draft: TaskDraft) -> Result<String, WorkspaceError> {
        self.write_cycle(|ws| {
            let task = draft.validate(&ws.store, Utc::now())?;
            let id = task.id.clone();
            let is_new = !ws.store.contains(&id);
            ws.store.upsert(task)?;
            ws.persist()?;
            log::info!("{} task {}", if is_new { "created" } else { "updated" }, id);
            Ok(id)
        })
    }

    /// Delete a task and drop any timer binding to it. Absent ids are a
    /// no-op and return `None`.
    pub fn delete(&mut self, id: &str) -> Result<Option<Task>, WorkspaceError> {
        self.write_cycle(|ws| {
            let Some(removed) = ws.store.delete(id) else {
                return Ok(None);
            };
            if ws.timer.unbind_if(id) {
                log::debug!("cleared focus binding to deleted task {}", id);
            }
            ws.persist()?;
            log::info!("deleted task {}", id);
            Ok(Some(removed))
        })
    }

    /// Returns false (without persisting) when the id is absent.
    pub fn set_status(&mut self, id: &str, status: Status) -> Result<bool, WorkspaceError> {
        self.write_cycle(|ws| {
            if !ws.store.set_status(id, status) {
                return Ok(false);
            }
            ws.persist()?;
            log::info!("task {} → {}", id, status);
            Ok(true)
        })
    }

    pub fn toggle_done(&mut self, id: &str) -> Result<Option<Status>, WorkspaceError> {
        self.write_cycle(|ws| {
            let status = ws.store.toggle_done(id);
            if status.is_some() {
                ws.persist()?;
            }
            Ok(status)
        })
    }

    pub fn add_subtask(&mut self, id: &str, text: &str) -> Result<bool, WorkspaceError> {
        self.write_cycle(|ws| {
            let added = ws.store.add_subtask(id, text);
            if added {
                ws.persist()?;
            }
            Ok(added)
        })
    }

    pub fn toggle_subtask(&mut self, id: &str, index: usize) -> Result<Option<bool>, WorkspaceError> {
        self.write_cycle(|ws| {
            let done = ws.store.toggle_subtask(id, index);
            if done.is_some() {
                ws.persist()?;
            }
            Ok(done)
        })
    }

    pub fn remove_subtask(
        &mut self,
        id: &str,
        index: usize,
    ) -> Result<Option<SubTask>, WorkspaceError> {
        self.write_cycle(|ws| {
            let removed = ws.store.remove_subtask(id, index);
            if removed.is_some() {
                ws.persist()?;
            }
            Ok(removed)
        })
    }

    // -----------------------------------------------------------------------
    // Focus timer
    // -----------------------------------------------------------------------

    /// Bind the timer to an existing task.
    pub fn bind_timer(&mut self, id: &str) -> Result<(), TaskError> {
        if !self.store.contains(id) {
            return Err(TaskError::NotFound(id.to_string()));
        }
        self.timer.bind(id);
        Ok(())
    }

    pub fn unbind_timer(&mut self) {
        self.timer.unbind();
    }

    pub fn start_timer(&mut self) -> bool {
        self.timer.start(&self.store)
    }

    pub fn pause_timer(&mut self) {
        self.timer.stop(None);
    }

    /// Start if stopped, pause if running. Returns true when now running.
    pub fn toggle_timer(&mut self) -> bool {
        if self.timer.is_running() {
            self.pause_timer();
            false
        } else {
            self.start_timer()
        }
    }

    pub fn reset_timer(&mut self, duration_secs: u32) {
        self.timer.reset(duration_secs);
    }

    pub fn rewind_timer(&mut self) {
        self.timer.rewind();
    }

    /// Advance the timer one second; returns the completion when the
    /// session ends on this tick.
    pub fn tick_timer(&mut self) -> Option<Completion> {
        match self.timer.tick()? {
            TimerEvent::SessionComplete(completion) => {
                log::info!("focus session complete (task {:?})", completion.task);
                Some(completion)
            }
        }
    }

    /// The user-confirmed follow-up to a completion: mark the focused task
    /// done. Returns false if nothing is bound or the task is gone.
    pub fn mark_focused_done(&mut self) -> Result<bool, WorkspaceError> {
        match self.timer.bound_task().map(str::to_string) {
            Some(id) => self.set_status(&id, Status::Done),
            None => Ok(false),
        }
    }

    // -----------------------------------------------------------------------
    // Theme and export
    // -----------------------------------------------------------------------

    pub fn set_theme(&mut self, name: &str) -> Result<(), StorageError> {
        storage::save_theme(self.storage.as_mut(), name)?;
        self.theme = name.to_string();
        Ok(())
    }

    /// dark ↔ light. Returns the new theme name.
    pub fn toggle_theme(&mut self) -> Result<&str, StorageError> {
        let next = if self.theme == "dark" { "light" } else { "dark" };
        self.set_theme(next)?;
        Ok(&self.theme)
    }

    pub fn export(&self, path: &Path) -> Result<(), StorageError> {
        storage::export_tasks(self.store.tasks(), path)?;
        log::info!("exported {} tasks to {}", self.store.len(), path.display());
        Ok(())
    }
}
