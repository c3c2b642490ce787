use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::task::Priority;
use crate::tui::app::{App, FormField, FormState};

use super::centered_rect_fixed;

const POPUP_W: u16 = 60;
const LABEL_W: usize = 10;

/// Render the add/edit task popup
pub fn render_form_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.form else {
        return;
    };
    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = vec![Line::default()];
    for field in FormField::ALL {
        let focused = form.field == field;
        let mut spans = vec![label_span(app, field, focused)];
        match field {
            FormField::Priority => spans.extend(priority_spans(app, form.priority)),
            FormField::Steps => {}
            _ => {
                spans.push(Span::styled(field_text(form, field).to_string(), text_style));
                if focused {
                    spans.push(cursor_span(app));
                }
            }
        }
        lines.push(Line::from(spans));
    }

    // Steps: one per line below the label
    let indent = " ".repeat(LABEL_W + 2);
    let mut step_lines: Vec<&str> = form.steps.split('\n').collect();
    if form.steps.is_empty() {
        step_lines.clear();
    }
    if step_lines.is_empty() && form.field != FormField::Steps {
        lines.push(Line::from(Span::styled(format!("{}(one per line)", indent), dim_style)));
    }
    let last = step_lines.len().saturating_sub(1);
    for (i, step) in step_lines.iter().enumerate() {
        let mut spans = vec![Span::styled(format!("{}{}", indent, step), text_style)];
        if form.field == FormField::Steps && i == last {
            spans.push(cursor_span(app));
        }
        lines.push(Line::from(spans));
    }
    if step_lines.is_empty() && form.field == FormField::Steps {
        lines.push(Line::from(vec![Span::styled(indent.clone(), text_style), cursor_span(app)]));
    }

    lines.push(Line::default());
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", err),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    }
    lines.push(Line::from(Span::styled(
        "  Tab field  Enter save  Ctrl+S save  Esc cancel",
        dim_style,
    )));

    let title = if form.editing.is_some() {
        " Edit Task "
    } else {
        " New Task "
    };
    let height = lines.len() as u16 + 2;
    let popup = centered_rect_fixed(POPUP_W, height, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn field_text(form: &FormState, field: FormField) -> &str {
    match field {
        FormField::Title => &form.title,
        FormField::Due => &form.due,
        FormField::Notes => &form.notes,
        FormField::Priority | FormField::Steps => "",
    }
}

fn label_span<'a>(app: &App, field: FormField, focused: bool) -> Span<'a> {
    let style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(app.theme.background)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    };
    let marker = if focused { "\u{25B8}" } else { " " };
    Span::styled(
        format!("{} {:<width$}", marker, format!("{}:", field.label()), width = LABEL_W),
        style,
    )
}

fn priority_spans<'a>(app: &App, current: Priority) -> Vec<Span<'a>> {
    let bg = app.theme.background;
    [Priority::Low, Priority::Medium, Priority::High]
        .into_iter()
        .map(|p| {
            let style = if p == current {
                Style::default()
                    .fg(app.theme.priority_color(p))
                    .bg(app.theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.dim).bg(bg)
            };
            Span::styled(format!(" {} ", p.as_str()), style)
        })
        .collect()
}

fn cursor_span<'a>(app: &App) -> Span<'a> {
    Span::styled(
        "\u{258C}",
        Style::default()
            .fg(app.theme.highlight)
            .bg(app.theme.background),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Mode;
    use crate::tui::render::test_helpers::*;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| render_form_popup(frame, app, area))
    }

    #[test]
    fn new_form_lists_fields() {
        let mut app = empty_app();
        app.open_form(FormState::new());
        assert_eq!(app.mode, Mode::Form);

        let out = draw(&app);
        assert!(out.contains("New Task"));
        assert!(out.contains("\u{25B8} Title:    \u{258C}"));
        assert!(out.contains("Priority:"));
        assert!(out.contains(" low  medium  high "));
        assert!(out.contains("(one per line)"));
    }

    #[test]
    fn edit_form_shows_steps_and_error() {
        let mut form = FormState::new();
        form.editing = Some("1".into());
        form.title = "Write report".into();
        form.steps = "Outline\nDraft".into();
        form.field = FormField::Steps;
        form.error = Some("title must not be empty".into());
        let mut app = empty_app();
        app.open_form(form);

        let out = draw(&app);
        assert!(out.contains("Edit Task"));
        assert!(out.contains("Write report"));
        assert!(out.contains("Outline"));
        assert!(out.contains("Draft\u{258C}"));
        assert!(out.contains("title must not be empty"));
    }
}
