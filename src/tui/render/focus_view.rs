use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::tui::app::App;

use super::pad_line;

/// Render the focus timer: clock, elapsed gauge, bound task, then the picker
/// of open tasks.
pub fn render_focus_view(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.timer();
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // spacer
            Constraint::Length(1), // clock
            Constraint::Length(1), // state
            Constraint::Length(1), // gauge
            Constraint::Length(1), // bound task
            Constraint::Length(1), // presets
            Constraint::Length(1), // spacer
            Constraint::Min(0),    // picker
        ])
        .split(area);

    let clock_color = if view.finished {
        app.theme.green
    } else if view.running {
        app.theme.highlight
    } else {
        app.theme.text_bright
    };
    let clock = Paragraph::new(Line::from(Span::styled(
        view.clock.clone(),
        Style::default()
            .fg(clock_color)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )))
    .centered()
    .style(bg_style);
    frame.render_widget(clock, chunks[1]);

    let state_line = Paragraph::new(Line::from(Span::styled(
        format!("{} \u{00B7} {}", view.state.label(), view.total),
        Style::default().fg(app.theme.dim).bg(bg),
    )))
    .centered()
    .style(bg_style);
    frame.render_widget(state_line, chunks[2]);

    let gauge_area = chunks[3].inner(ratatui::layout::Margin::new(2, 0));
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(app.theme.highlight).bg(app.theme.selection_bg))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", view.progress * 100.0));
    frame.render_widget(gauge, gauge_area);

    let bound = match &view.task_title {
        Some(title) => Line::from(vec![
            Span::styled("Focusing on: ", Style::default().fg(app.theme.dim).bg(bg)),
            Span::styled(title.clone(), Style::default().fg(app.theme.text_bright).bg(bg)),
        ]),
        None => Line::from(Span::styled(
            "No task bound",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    };
    frame.render_widget(Paragraph::new(bound).centered().style(bg_style), chunks[4]);

    let minutes = app.workspace.timer().total_secs() / 60;
    let mut presets: Vec<Span> = vec![Span::styled(
        "presets: ",
        Style::default().fg(app.theme.dim).bg(bg),
    )];
    for m in &app.config.timer.presets {
        let style = if *m == minutes {
            Style::default().fg(app.theme.highlight).bg(bg)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        presets.push(Span::styled(format!("{}m ", m), style));
    }
    frame.render_widget(
        Paragraph::new(Line::from(presets)).centered().style(bg_style),
        chunks[5],
    );

    render_picker(frame, app, &view.candidates, view.task_id.as_deref(), chunks[7]);
}

fn render_picker(
    frame: &mut Frame,
    app: &App,
    candidates: &[crate::view::FocusCandidate],
    bound: Option<&str>,
    area: Rect,
) {
    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(Span::styled(
            " Open tasks (b to bind) ",
            Style::default().fg(app.theme.text).bg(bg),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let height = inner.height as usize;
    if candidates.is_empty() {
        let empty = Line::from(Span::styled(
            "  nothing open",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(empty), inner);
        return;
    }

    let offset = if height > 0 {
        app.focus_cursor.saturating_sub(height - 1)
    } else {
        0
    };
    let lines: Vec<Line> = candidates
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, c)| {
            let selected = i == app.focus_cursor;
            let row_bg = if selected {
                app.theme.selection_bg
            } else {
                bg
            };
            let base = Style::default().bg(row_bg);
            let marker = if bound == Some(c.id.as_str()) {
                " \u{25CF} "
            } else if selected {
                " \u{25B8} "
            } else {
                "   "
            };
            let mut spans = vec![
                Span::styled(marker, base.fg(app.theme.highlight)),
                Span::styled(c.title.as_str(), base.fg(app.theme.text)),
            ];
            pad_line(&mut spans, width, base);
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| render_focus_view(frame, app, area))
    }

    #[test]
    fn idle_timer_shows_full_length() {
        let app = empty_app();
        let out = draw(&app);
        assert!(out.contains("25:00"));
        assert!(out.contains("ready \u{00B7} 25:00"));
        assert!(out.contains("No task bound"));
        assert!(out.contains("nothing open"));
    }

    #[test]
    fn paused_timer_says_paused() {
        let mut app = app_with_titles(&["Write report"]);
        app.workspace.start_timer();
        app.workspace.pause_timer();
        assert!(draw(&app).contains("paused \u{00B7} 25:00"));
    }

    #[test]
    fn bound_task_is_named_and_marked() {
        let mut app = app_with_titles(&["Write report", "Buy milk"]);
        let id = id_of(&app, "Write report");
        app.workspace.bind_timer(&id).unwrap();

        let out = draw(&app);
        assert!(out.contains("Focusing on: Write report"));
        assert!(out.contains(" \u{25CF} Write report"));
        assert!(out.contains("Buy milk"));
    }

    #[test]
    fn current_preset_is_listed() {
        let app = empty_app();
        assert!(draw(&app).contains("presets: 15m 25m 50m"));
    }
}
