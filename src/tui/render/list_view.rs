use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regex::Regex;

use crate::cli::output::progress_bar;
use crate::model::task::{Status, SubTask};
use crate::tui::app::App;
use crate::tui::theme::Theme;
use crate::view::ListItemView;

use super::{pad_line, push_highlighted_spans};

const BAR_WIDTH: usize = 10;

/// Render the task list. Expanded rows show their notes and steps underneath.
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let view = app.list();
    let bg = app.theme.background;
    let width = area.width as usize;
    let visible_height = area.height as usize;

    if let Some(msg) = view.empty_message() {
        let lines = vec![
            Line::default(),
            Line::from(Span::styled(
                format!("  {}", msg),
                Style::default().fg(app.theme.dim).bg(bg),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
        return;
    }

    let search_re = app.search_re();
    let mut lines: Vec<Line<'static>> = Vec::new();
    // Line that must stay on screen: the cursor row, or its selected step
    let mut focus_line = 0;

    for (idx, item) in view.items.iter().enumerate() {
        let is_cursor = idx == app.list_cursor;
        if is_cursor {
            focus_line = lines.len();
        }
        lines.push(item_line(&app.theme, item, is_cursor, search_re.as_ref(), width));

        if app.expanded.as_deref() != Some(item.id.as_str()) {
            continue;
        }
        let dim = Style::default().fg(app.theme.dim).bg(bg);
        if let Some(notes) = &item.notes {
            for note in notes.lines() {
                lines.push(Line::from(Span::styled(format!("      {}", note), dim)));
            }
        }
        if item.steps.is_empty() {
            lines.push(Line::from(Span::styled("      no steps (s to add)", dim)));
        }
        for (i, step) in item.steps.iter().enumerate() {
            let on_step = is_cursor && i == app.step_cursor;
            if on_step {
                focus_line = lines.len();
            }
            lines.push(step_line(&app.theme, step, on_step, width));
        }
    }

    if visible_height > 0 {
        if focus_line < app.list_scroll {
            app.list_scroll = focus_line;
        } else if focus_line >= app.list_scroll + visible_height {
            app.list_scroll = focus_line + 1 - visible_height;
        }
    }
    app.list_scroll = app.list_scroll.min(lines.len().saturating_sub(1));

    let end = lines.len().min(app.list_scroll + visible_height);
    let shown: Vec<Line> = lines.drain(app.list_scroll..end).collect();
    frame.render_widget(Paragraph::new(shown).style(Style::default().bg(bg)), area);
}

fn item_line(
    theme: &Theme,
    item: &ListItemView,
    is_cursor: bool,
    search_re: Option<&Regex>,
    width: usize,
) -> Line<'static> {
    let bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(bg);
    let title_style = if item.status == Status::Done {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if is_cursor {
        base.fg(theme.text_bright)
    } else {
        base.fg(theme.text)
    };
    let match_style = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);

    let mut spans: Vec<Span<'static>> = vec![
        Span::styled(
            if is_cursor { " \u{25B8} " } else { "   " },
            base.fg(theme.highlight),
        ),
        Span::styled(
            format!("[{}] ", item.status.checkbox_char()),
            base.fg(theme.status_color(item.status)),
        ),
    ];
    push_highlighted_spans(&mut spans, &item.title, title_style, match_style, search_re);
    spans.push(Span::styled(
        format!("  {}", item.priority.as_str()),
        base.fg(theme.priority_color(item.priority)),
    ));
    if let Some(due) = item.due {
        spans.push(Span::styled(
            format!("  due {}", due.format("%Y-%m-%d")),
            base.fg(theme.cyan),
        ));
    }
    if let Some(label) = &item.steps_label {
        spans.push(Span::styled(
            format!("  {}", progress_bar(item.percent, BAR_WIDTH)),
            base.fg(theme.green),
        ));
        spans.push(Span::styled(format!(" {}", label), base.fg(theme.dim)));
    }
    pad_line(&mut spans, width, base);
    Line::from(spans)
}

fn step_line(theme: &Theme, step: &SubTask, on_step: bool, width: usize) -> Line<'static> {
    let bg = if on_step {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(bg);
    let (mark, mark_color) = if step.done {
        ('x', theme.green)
    } else {
        (' ', theme.dim)
    };
    let text_style = if step.done {
        base.fg(theme.dim)
    } else {
        base.fg(theme.text)
    };
    let mut spans = vec![
        Span::styled(
            if on_step { "    \u{203A} " } else { "      " },
            base.fg(theme.highlight),
        ),
        Span::styled(format!("[{}] ", mark), base.fg(mark_color)),
        Span::styled(step.text.clone(), text_style),
    ];
    pad_line(&mut spans, width, base);
    Line::from(spans)
}
