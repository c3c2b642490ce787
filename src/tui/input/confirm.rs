use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    let Some(state) = &app.confirm else {
        app.mode = Mode::Navigate;
        return;
    };

    // Message-only modal: any key dismisses
    if state.action == ConfirmAction::Dismiss {
        close(app);
        return;
    }

    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let action = app.confirm.take().map(|s| s.action);
            app.mode = Mode::Navigate;
            match action {
                Some(ConfirmAction::DeleteTask { id }) => confirm_delete(app, &id),
                Some(ConfirmAction::MarkFocusedDone) => confirm_mark_done(app),
                Some(ConfirmAction::Dismiss) | None => {}
            }
        }
        // Cancel: n or Esc
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => close(app),
        _ => {}
    }
}

fn close(app: &mut App) {
    app.confirm = None;
    app.mode = Mode::Navigate;
}

fn confirm_delete(app: &mut App, id: &str) {
    let deleted = app.workspace.delete(id);
    if let Some(Some(task)) = app.report(deleted) {
        app.message = Some(format!("Deleted: {}", task.title));
    }
    app.clamp_cursors();
}

fn confirm_mark_done(app: &mut App) {
    let marked = app.workspace.mark_focused_done();
    if app.report(marked) == Some(true) {
        app.message = Some("Focused task marked done".into());
    }
    app.clamp_cursors();
}
