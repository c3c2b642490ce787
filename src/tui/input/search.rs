use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

use super::typed_char;

/// Live search: the list re-filters on every keystroke.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        // Cancel: drop the term
        KeyCode::Esc => {
            app.search.clear();
            app.mode = Mode::Navigate;
        }
        // Keep the term and go back to the list
        KeyCode::Enter => app.mode = Mode::Navigate,
        KeyCode::Backspace => {
            app.search.pop();
        }
        _ => match typed_char(&key) {
            Some(c) => app.search.push(c),
            None => return,
        },
    }
    app.list_cursor = 0;
}

pub(super) fn handle_step_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.step_input.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
            let text = std::mem::take(&mut app.step_input);
            let Some(id) = app.expanded.clone() else {
                return;
            };
            let added = app.workspace.add_subtask(&id, &text);
            if app.report(added) == Some(true) {
                let count = app
                    .workspace
                    .store()
                    .get(&id)
                    .map_or(0, |t| t.subtasks.len());
                app.step_cursor = count.saturating_sub(1);
            }
        }
        KeyCode::Backspace => {
            app.step_input.pop();
        }
        _ => {
            if let Some(c) = typed_char(&key) {
                app.step_input.push(c);
            }
        }
    }
}
