use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, FormState, Mode, MoveState, View};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Global keys first
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.view = app.view.next();
            return;
        }
        KeyCode::Char(c @ '1'..='4') => {
            let idx = (c as u8 - b'1') as usize;
            app.view = View::ALL[idx];
            return;
        }
        KeyCode::Char('T') => {
            app.toggle_theme();
            return;
        }
        KeyCode::Char('E') => {
            app.export();
            return;
        }
        _ => {}
    }

    match app.view {
        View::List => handle_list(app, key),
        View::Board => handle_board(app, key),
        View::Focus => handle_focus(app, key),
        View::Analytics => {}
    }
}

/// Task actions shared by the List and Board views
fn handle_task_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('a') => app.open_form(FormState::new()),
        KeyCode::Char('e') => {
            let task = app
                .selected_task_id()
                .and_then(|id| app.workspace.store().get(&id).cloned());
            if let Some(task) = task {
                app.open_form(FormState::edit(&task));
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_task_id() {
                app.ask_delete(&id);
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = app.selected_task_id() {
                let toggled = app.workspace.toggle_done(&id);
                app.report(toggled);
                app.clamp_cursors();
                if app.view == View::Board {
                    app.select_on_board(&id);
                }
            }
        }
        _ => return false,
    }
    true
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

fn handle_list(app: &mut App, key: KeyEvent) {
    if handle_task_key(app, key) {
        return;
    }
    let len = app.list().items.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.list_cursor + 1 < len {
                app.list_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.list_cursor = app.list_cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.list_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.list_cursor = len.saturating_sub(1),
        KeyCode::Char('/') => {
            app.mode = Mode::Search;
        }
        KeyCode::Char('f') => {
            app.filter = app.filter.cycle();
            app.list_cursor = 0;
            app.message = Some(format!("Filter: {}", app.filter));
        }
        KeyCode::Enter => {
            let selected = app.selected_task_id();
            app.expanded = if app.expanded == selected { None } else { selected };
            app.step_cursor = 0;
        }
        KeyCode::Esc => {
            if app.expanded.is_some() {
                app.expanded = None;
            } else if !app.search.is_empty() {
                app.search.clear();
                app.list_cursor = 0;
            }
        }
        _ => handle_steps(app, key),
    }
}

/// Step keys, active when the cursor row is expanded
fn handle_steps(app: &mut App, key: KeyEvent) {
    let Some(id) = app.selected_task_id().filter(|id| app.expanded.as_ref() == Some(id)) else {
        return;
    };
    let count = app
        .workspace
        .store()
        .get(&id)
        .map_or(0, |t| t.subtasks.len());
    match key.code {
        KeyCode::Char('J') => {
            if app.step_cursor + 1 < count {
                app.step_cursor += 1;
            }
        }
        KeyCode::Char('K') => app.step_cursor = app.step_cursor.saturating_sub(1),
        KeyCode::Char('t') => {
            let toggled = app.workspace.toggle_subtask(&id, app.step_cursor);
            app.report(toggled);
        }
        KeyCode::Char('s') => {
            app.step_input.clear();
            app.mode = Mode::StepInput;
        }
        KeyCode::Char('X') => {
            let removed = app.workspace.remove_subtask(&id, app.step_cursor);
            app.report(removed);
            app.clamp_cursors();
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

fn handle_board(app: &mut App, key: KeyEvent) {
    if handle_task_key(app, key) {
        return;
    }
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => {
            app.board_col = app.board_col.saturating_sub(1);
            app.clamp_cursors();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.board_col = (app.board_col + 1).min(2);
            app.clamp_cursors();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.board_row += 1;
            app.clamp_cursors();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.board_row = app.board_row.saturating_sub(1);
        }
        KeyCode::Char('m') => {
            if let Some(id) = app.selected_task_id() {
                app.moving = Some(MoveState {
                    id,
                    origin: app.board_col,
                    target: app.board_col,
                });
                app.mode = Mode::Move;
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

fn handle_focus(app: &mut App, key: KeyEvent) {
    let candidates = app.timer().candidates.len();
    match key.code {
        KeyCode::Char(' ') => {
            let running = app.workspace.toggle_timer();
            app.message = Some(if running { "Focus started" } else { "Paused" }.into());
        }
        KeyCode::Char('r') => app.workspace.rewind_timer(),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let minutes = app.workspace.timer().total_secs() / 60;
            app.set_timer_minutes(minutes + 1);
        }
        KeyCode::Char('-') => {
            let minutes = app.workspace.timer().total_secs() / 60;
            app.set_timer_minutes(minutes.saturating_sub(1));
        }
        KeyCode::Char('p') => app.cycle_preset(),
        KeyCode::Char('j') | KeyCode::Down => {
            if app.focus_cursor + 1 < candidates {
                app.focus_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.focus_cursor = app.focus_cursor.saturating_sub(1);
        }
        KeyCode::Char('b') | KeyCode::Enter => {
            if let Some(id) = app.selected_task_id() {
                let bound = app.workspace.bind_timer(&id);
                app.report(bound);
            }
        }
        KeyCode::Char('u') => app.workspace.unbind_timer(),
        _ => {}
    }
}
