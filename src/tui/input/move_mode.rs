use crossterm::event::{KeyCode, KeyEvent};

use crate::model::task::Status;
use crate::tui::app::{App, Mode};

/// Board move mode: the picked card's target column follows h/l until it is
/// dropped.
pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    let Some(state) = &mut app.moving else {
        app.mode = Mode::Navigate;
        return;
    };

    match key.code {
        KeyCode::Char('h') | KeyCode::Left => state.target = state.target.saturating_sub(1),
        KeyCode::Char('l') | KeyCode::Right => state.target = (state.target + 1).min(2),
        KeyCode::Char(c @ '1'..='3') => {
            state.target = (c as u8 - b'1') as usize;
            drop_card(app);
        }
        KeyCode::Enter => drop_card(app),
        KeyCode::Esc => {
            app.moving = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

fn drop_card(app: &mut App) {
    app.mode = Mode::Navigate;
    let Some(state) = app.moving.take() else {
        return;
    };
    let Some(status) = Status::from_index(state.target) else {
        return;
    };
    if state.target != state.origin {
        let moved = app.workspace.set_status(&state.id, status);
        if app.report(moved) == Some(true) {
            app.message = Some(format!("Moved to {}", status.label()));
        }
    }
    app.clamp_cursors();
    app.select_on_board(&state.id);
}
