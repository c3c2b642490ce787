use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::Status;
use crate::tui::app::{App, Mode, View};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Navigate => {
            let spans = match &app.message {
                Some(msg) => vec![Span::styled(
                    format!(" {}", msg),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                )],
                None => Vec::new(),
            };
            let hint = if app.config.ui.show_key_hints {
                navigate_hint(app)
            } else {
                ""
            };
            (spans, hint)
        }
        Mode::Search => (
            input_spans(app, "/", &app.search),
            "Enter keep  Esc clear",
        ),
        Mode::StepInput => (
            input_spans(app, "step: ", &app.step_input),
            "Enter add  Esc cancel",
        ),
        Mode::Move => {
            let target = app
                .moving
                .as_ref()
                .and_then(|m| Status::from_index(m.target))
                .unwrap_or(Status::Todo);
            (
                vec![
                    Span::styled(" MOVE \u{2192} ", Style::default().fg(app.theme.highlight).bg(bg)),
                    Span::styled(
                        target.label(),
                        Style::default().fg(app.theme.text_bright).bg(bg),
                    ),
                ],
                "h/l column  Enter drop  1-3 drop into  Esc cancel",
            )
        }
        Mode::Form => (Vec::new(), "Tab next field  Enter save  Ctrl+S save  Esc cancel"),
        Mode::Confirm => (Vec::new(), ""),
    };

    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let hint_width = hint.chars().count();
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Prompt text followed by a block cursor
fn input_spans<'a>(app: &App, prompt: &str, input: &str) -> Vec<Span<'a>> {
    let bg = app.theme.background;
    vec![
        Span::styled(
            format!("{}{}", prompt, input),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
    ]
}

fn navigate_hint(app: &App) -> &'static str {
    match app.view {
        View::List if app.expanded.is_some() => "J/K step  t toggle  s add  X remove  Enter close",
        View::List => "a add  e edit  d del  x done  / search  f filter  q quit",
        View::Board => "h/l j/k move  m pick up  a add  e edit  x done  q quit",
        View::Focus => "space start/pause  r rewind  +/- p length  b bind  u unbind",
        View::Analytics => "T theme  E export  q quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn row(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn message_and_hint_share_row() {
        let mut app = app_with_titles(&[]);
        app.message = Some("Task added".into());
        let out = row(&app);
        assert!(out.starts_with(" Task added"));
        assert!(out.ends_with("q quit"));
    }

    #[test]
    fn search_prompt_shows_input() {
        let mut app = app_with_titles(&[]);
        app.mode = Mode::Search;
        app.search = "rep".into();
        assert!(row(&app).starts_with("/rep\u{258C}"));
    }

    #[test]
    fn hints_can_be_disabled() {
        let mut app = app_with_titles(&[]);
        app.config.ui.show_key_hints = false;
        assert_eq!(row(&app), "");
    }
}
