use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered_rect_fixed;

/// Render the y/n modal (delete, focus complete) or a message-only modal
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(confirm) = &app.confirm else {
        return;
    };

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let bright_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(format!(" {}", confirm.title), header_style)),
        Line::default(),
    ];
    if !confirm.message.is_empty() {
        lines.push(Line::from(Span::styled(format!("  {}", confirm.message), bright_style)));
        lines.push(Line::default());
    }
    let prompt = confirm.prompt().unwrap_or("Press any key");
    lines.push(Line::from(Span::styled(format!("  {}", prompt), dim_style)));

    let content_w = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let popup_w = (content_w + 4).max(30).min(area.width.saturating_sub(2));
    let popup = centered_rect_fixed(popup_w, lines.len() as u16 + 2, area);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::timer::COMPLETION_MESSAGE;
    use crate::tui::app::{ConfirmAction, ConfirmState};
    use crate::tui::render::test_helpers::*;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| render_confirm_popup(frame, app, area))
    }

    #[test]
    fn delete_prompt_names_task() {
        let mut app = app_with_titles(&["Write report"]);
        let id = id_of(&app, "Write report");
        app.ask_delete(&id);

        let out = draw(&app);
        assert!(out.contains("Delete Task"));
        assert!(out.contains("Write report"));
        assert!(out.contains("Delete this task? (y/n)"));
    }

    #[test]
    fn message_only_modal_waits_for_any_key() {
        let mut app = empty_app();
        app.confirm = Some(ConfirmState {
            title: COMPLETION_MESSAGE.into(),
            message: String::new(),
            action: ConfirmAction::Dismiss,
        });

        let out = draw(&app);
        assert!(out.contains(COMPLETION_MESSAGE));
        assert!(out.contains("Press any key"));
    }
}
