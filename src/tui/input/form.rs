use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, FormField, Mode};

use super::typed_char;

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    // Submit from anywhere: Ctrl+S
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
        app.submit_form();
        return;
    }

    let Some(form) = &mut app.form else {
        app.mode = Mode::Navigate;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.form = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
        KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
        // In the steps field Enter starts the next step line
        KeyCode::Enter if form.field == FormField::Steps => form.steps.push('\n'),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Backspace => {
            if let Some(input) = form.input_mut() {
                input.pop();
            }
        }
        KeyCode::Left | KeyCode::Right if form.field == FormField::Priority => {
            form.priority = form.priority.cycle();
        }
        _ => {
            let Some(c) = typed_char(&key) else {
                return;
            };
            match form.input_mut() {
                Some(input) => input.push(c),
                None if c == ' ' || c == 'h' || c == 'l' => {
                    form.priority = form.priority.cycle();
                }
                None => {}
            }
        }
    }
}
