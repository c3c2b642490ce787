use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use regex::Regex;

use crate::io::config_io;
use crate::io::storage::{DEFAULT_EXPORT_FILE, FileStorage};
use crate::model::Config;
use crate::model::task::{Priority, Task};
use crate::ops::draft::TaskDraft;
use crate::ops::notify::{DesktopNotifier, Notifier};
use crate::ops::store::StatusFilter;
use crate::ops::timer::{Completion, FocusTimer};
use crate::ops::workspace::Workspace;
use crate::view::{BoardView, ListView, TimerView, board_view, list_view, timer_view};

use super::input;
use super::render;
use super::theme::Theme;

const ONE_SECOND: Duration = Duration::from_secs(1);
/// How often the TUI re-reads the task list written by CLI commands
const RELOAD_INTERVAL: Duration = Duration::from_secs(2);

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Board,
    Focus,
    Analytics,
}

impl View {
    pub const ALL: [View; 4] = [View::List, View::Board, View::Focus, View::Analytics];

    pub fn label(self) -> &'static str {
        match self {
            View::List => "List",
            View::Board => "Board",
            View::Focus => "Focus",
            View::Analytics => "Analytics",
        }
    }

    pub fn next(self) -> View {
        match self {
            View::List => View::Board,
            View::Board => View::Focus,
            View::Focus => View::Analytics,
            View::Analytics => View::List,
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a live list search
    Search,
    /// Typing a new step for the expanded task
    StepInput,
    /// Task form popup open
    Form,
    /// Modal waiting for y/n
    Confirm,
    /// Carrying a board card between columns
    Move,
}

/// Field focus inside the task form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Priority,
    Due,
    Notes,
    Steps,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Title,
        FormField::Priority,
        FormField::Due,
        FormField::Notes,
        FormField::Steps,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Priority => "Priority",
            FormField::Due => "Due",
            FormField::Notes => "Notes",
            FormField::Steps => "Steps",
        }
    }

    pub fn next(self) -> FormField {
        let idx = FormField::ALL.iter().position(|f| *f == self).unwrap_or(0);
        FormField::ALL[(idx + 1) % FormField::ALL.len()]
    }

    pub fn prev(self) -> FormField {
        let idx = FormField::ALL.iter().position(|f| *f == self).unwrap_or(0);
        FormField::ALL[(idx + FormField::ALL.len() - 1) % FormField::ALL.len()]
    }
}

/// The add/edit popup. Text is edited at the end of each field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// Task being edited; `None` for a new task
    pub editing: Option<String>,
    pub title: String,
    pub priority: Priority,
    pub due: String,
    pub notes: String,
    /// One step per line
    pub steps: String,
    pub field: FormField,
    /// Last validation error, shown in the popup
    pub error: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::from_draft(TaskDraft::default())
    }

    pub fn edit(task: &Task) -> Self {
        Self::from_draft(TaskDraft::from_task(task))
    }

    fn from_draft(draft: TaskDraft) -> Self {
        FormState {
            editing: draft.id,
            title: draft.title,
            priority: draft.priority,
            due: draft.due,
            notes: draft.notes,
            steps: draft.steps.unwrap_or_default().join("\n"),
            field: FormField::Title,
            error: None,
        }
    }

    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            id: self.editing.clone(),
            title: self.title.clone(),
            priority: self.priority,
            notes: self.notes.clone(),
            due: self.due.clone(),
            steps: Some(self.steps.lines().map(str::to_string).collect()),
            status: None,
        }
    }

    /// Text buffer of the focused field (`None` for the priority selector)
    pub fn input_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Title => Some(&mut self.title),
            FormField::Priority => None,
            FormField::Due => Some(&mut self.due),
            FormField::Notes => Some(&mut self.notes),
            FormField::Steps => Some(&mut self.steps),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a confirmation modal does on `y`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask { id: String },
    /// Focus session ended; `y` marks the bound task done
    MarkFocusedDone,
    /// Message only; any key dismisses
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub title: String,
    pub message: String,
    pub action: ConfirmAction,
}

impl ConfirmState {
    /// Prompt line, absent for message-only modals
    pub fn prompt(&self) -> Option<&'static str> {
        match self.action {
            ConfirmAction::DeleteTask { .. } => Some("Delete this task? (y/n)"),
            ConfirmAction::MarkFocusedDone => Some("Mark focused task as done? (y/n)"),
            ConfirmAction::Dismiss => None,
        }
    }
}

/// A board card picked up in move mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveState {
    pub id: String,
    /// Column the card started in
    pub origin: usize,
    /// Column it will be dropped into
    pub target: usize,
}

/// Main application state
pub struct App {
    pub workspace: Workspace,
    pub config: Config,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    notifier: Box<dyn Notifier>,
    /// Instant of the last whole-second timer tick
    last_tick: Option<Instant>,

    // List view
    pub list_cursor: usize,
    pub list_scroll: usize,
    pub search: String,
    pub filter: StatusFilter,
    /// Task whose steps are shown under its row
    pub expanded: Option<String>,
    pub step_cursor: usize,
    pub step_input: String,

    // Board view
    pub board_col: usize,
    pub board_row: usize,
    pub moving: Option<MoveState>,

    // Focus view
    pub focus_cursor: usize,
    pub preset_idx: usize,

    // Overlays
    pub form: Option<FormState>,
    pub confirm: Option<ConfirmState>,
    /// Completion modal held back until the open form, modal or move ends
    pub pending_confirm: Option<ConfirmState>,
    /// Transient status-row message, cleared on the next key
    pub message: Option<String>,
}

impl App {
    pub fn new(workspace: Workspace, config: Config) -> Self {
        let notifier = Box::new(DesktopNotifier::from_config(&config.notify));
        Self::with_notifier(workspace, config, notifier)
    }

    pub fn with_notifier(workspace: Workspace, config: Config, notifier: Box<dyn Notifier>) -> Self {
        let theme = Theme::named(workspace.theme(), &config.ui);
        let preset_idx = config
            .timer
            .presets
            .iter()
            .position(|m| *m == config.timer.minutes)
            .unwrap_or(0);
        App {
            workspace,
            config,
            view: View::List,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            notifier,
            last_tick: None,
            list_cursor: 0,
            list_scroll: 0,
            search: String::new(),
            filter: StatusFilter::All,
            expanded: None,
            step_cursor: 0,
            step_input: String::new(),
            board_col: 0,
            board_row: 0,
            moving: None,
            focus_cursor: 0,
            preset_idx,
            form: None,
            confirm: None,
            pending_confirm: None,
            message: None,
        }
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    pub fn list(&self) -> ListView {
        list_view(self.workspace.store(), &self.search, self.filter)
    }

    pub fn board(&self) -> BoardView {
        board_view(self.workspace.store())
    }

    pub fn timer(&self) -> TimerView {
        timer_view(self.workspace.timer(), self.workspace.store())
    }

    /// Case-insensitive literal match on the search term, for highlighting
    pub fn search_re(&self) -> Option<Regex> {
        if self.search.is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(&self.search))).ok()
    }

    /// Task under the cursor in the List or Board view
    pub fn selected_task_id(&self) -> Option<String> {
        match self.view {
            View::List => self.list().items.get(self.list_cursor).map(|i| i.id.clone()),
            View::Board => self
                .board()
                .columns
                .get(self.board_col)?
                .cards
                .get(self.board_row)
                .map(|c| c.id.clone()),
            View::Focus => self
                .timer()
                .candidates
                .get(self.focus_cursor)
                .map(|c| c.id.clone()),
            View::Analytics => None,
        }
    }

    /// Keep cursors inside their lists after the store changed.
    pub fn clamp_cursors(&mut self) {
        let list_len = self.list().items.len();
        self.list_cursor = self.list_cursor.min(list_len.saturating_sub(1));

        let board = self.board();
        self.board_col = self.board_col.min(board.columns.len() - 1);
        let col_len = board.columns[self.board_col].cards.len();
        self.board_row = self.board_row.min(col_len.saturating_sub(1));

        let candidates = self.timer().candidates.len();
        self.focus_cursor = self.focus_cursor.min(candidates.saturating_sub(1));

        if let Some(id) = self.expanded.clone() {
            match self.workspace.store().get(&id) {
                Some(task) => {
                    self.step_cursor = self.step_cursor.min(task.subtasks.len().saturating_sub(1))
                }
                None => self.expanded = None,
            }
        }
    }

    /// Put the list cursor on `id` if it is visible
    pub fn select_in_list(&mut self, id: &str) {
        if let Some(idx) = self.list().items.iter().position(|i| i.id == id) {
            self.list_cursor = idx;
        }
    }

    /// Put the board cursor on `id`
    pub fn select_on_board(&mut self, id: &str) {
        if let Some((col, row)) = self.board().position_of(id) {
            self.board_col = col;
            self.board_row = row;
        }
    }

    // -----------------------------------------------------------------------
    // Actions shared by the input handlers
    // -----------------------------------------------------------------------

    /// Show an error in the status row. Returns the value on success.
    pub fn report<T, E: std::fmt::Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                log::error!("{}", e);
                self.message = Some(format!("error: {}", e));
                None
            }
        }
    }

    pub fn open_form(&mut self, form: FormState) {
        self.form = Some(form);
        self.mode = Mode::Form;
    }

    pub fn submit_form(&mut self) {
        let Some(form) = &self.form else {
            return;
        };
        let is_new = form.editing.is_none();
        match self.workspace.submit(form.to_draft()) {
            Ok(id) => {
                self.form = None;
                self.mode = Mode::Navigate;
                self.message = Some(if is_new { "Task added" } else { "Task saved" }.into());
                self.clamp_cursors();
                match self.view {
                    View::Board => self.select_on_board(&id),
                    _ => self.select_in_list(&id),
                }
            }
            Err(e) => {
                if let Some(form) = &mut self.form {
                    form.error = Some(e.to_string());
                }
            }
        }
    }

    pub fn ask_delete(&mut self, id: &str) {
        let Some(task) = self.workspace.store().get(id) else {
            return;
        };
        self.confirm = Some(ConfirmState {
            title: "Delete Task".into(),
            message: task.title.clone(),
            action: ConfirmAction::DeleteTask { id: id.to_string() },
        });
        self.mode = Mode::Confirm;
    }

    pub fn toggle_theme(&mut self) {
        let toggled = self.workspace.toggle_theme().map(str::to_string);
        if let Some(name) = self.report(toggled) {
            self.theme = Theme::named(&name, &self.config.ui);
            self.message = Some(format!("Theme: {}", name));
        }
    }

    pub fn export(&mut self) {
        let path = Path::new(DEFAULT_EXPORT_FILE);
        let count = self.workspace.store().len();
        let exported = self.workspace.export(path);
        if self.report(exported).is_some() {
            self.message = Some(format!("Exported {} tasks to {}", count, DEFAULT_EXPORT_FILE));
        }
    }

    /// Reset the timer to `minutes` (at least one)
    pub fn set_timer_minutes(&mut self, minutes: u32) {
        let minutes = minutes.max(1);
        self.workspace.reset_timer(minutes.saturating_mul(60));
        self.last_tick = None;
    }

    pub fn cycle_preset(&mut self) {
        let presets = &self.config.timer.presets;
        if presets.is_empty() {
            return;
        }
        self.preset_idx = (self.preset_idx + 1) % presets.len();
        let minutes = presets[self.preset_idx];
        self.set_timer_minutes(minutes);
    }

    // -----------------------------------------------------------------------
    // Timer
    // -----------------------------------------------------------------------

    /// Tick the focus timer once for every whole second since the last tick.
    pub fn advance_clock(&mut self, now: Instant) {
        if !self.workspace.timer().is_running() {
            self.last_tick = None;
            return;
        }
        let mut last = *self.last_tick.get_or_insert(now);
        while now.duration_since(last) >= ONE_SECOND {
            last += ONE_SECOND;
            if let Some(completion) = self.workspace.tick_timer() {
                self.last_tick = None;
                self.on_completion(completion);
                return;
            }
        }
        self.last_tick = Some(last);
    }

    /// Notify, then ask whether to mark the focused task done. Without a
    /// bound task the modal only carries the message, and is skipped when the
    /// desktop notification went through. The modal waits for any open form,
    /// modal or card move to finish.
    fn on_completion(&mut self, completion: Completion) {
        let delivered = self.notifier.notify(&completion.message);
        let action = match &completion.task {
            Some(_) => ConfirmAction::MarkFocusedDone,
            None if delivered => {
                self.message = Some(completion.message);
                return;
            }
            None => ConfirmAction::Dismiss,
        };
        let title = completion
            .task
            .as_deref()
            .and_then(|id| self.workspace.store().get(id))
            .map(|t| t.title.clone())
            .unwrap_or_default();
        self.pending_confirm = Some(ConfirmState {
            title: completion.message,
            message: title,
            action,
        });
        self.show_pending_confirm();
    }

    /// Open a held-back completion modal once nothing else is in progress.
    pub fn show_pending_confirm(&mut self) {
        if self.mode != Mode::Navigate || self.pending_confirm.is_none() {
            return;
        }
        self.confirm = self.pending_confirm.take();
        self.mode = Mode::Confirm;
    }

    /// Pick up changes other processes made to the task list.
    pub fn reload(&mut self) {
        let reloaded = self.workspace.reload();
        if self.report(reloaded).is_some() {
            self.clamp_cursors();
        }
    }
}

pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::read_config(data_dir)?;
    let timer = FocusTimer::new(config.timer.duration_secs());
    let storage = FileStorage::new(data_dir).with_lock();
    let workspace = Workspace::open(Box::new(storage), timer)?;
    log::info!("tui started in {}", data_dir.display());

    let mut app = App::new(workspace, config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_reload = Instant::now();
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }
        let now = Instant::now();
        app.advance_clock(now);
        // Only while browsing, so an open form never edits a stale task
        if app.mode == Mode::Navigate && now.duration_since(last_reload) >= RELOAD_INTERVAL {
            app.reload();
            last_reload = now;
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
