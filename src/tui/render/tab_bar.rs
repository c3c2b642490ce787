use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::store::StatusFilter;
use crate::tui::app::{App, View};

use super::pad_line;

/// Render the tab bar: one tab per view, task count and running clock on the
/// right, with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Split into tab row and separator row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    // Leading icon
    spans.push(Span::styled(" ", bg_style));
    spans.push(Span::styled(
        "\u{25B6}",
        Style::default().fg(app.theme.purple).bg(bg),
    ));
    spans.push(Span::styled(" ", bg_style));

    for (i, view) in View::ALL.iter().enumerate() {
        let style = tab_style(app, app.view == *view);
        spans.push(Span::styled(format!(" {} {} ", i + 1, view.label()), style));
        sep_cols.push(spans.iter().map(|s| s.content.chars().count()).sum());
        spans.push(sep.clone());
    }

    // Right side: running clock, then task count
    let mut right: Vec<Span> = Vec::new();
    let timer = app.workspace.timer();
    if timer.is_running() {
        right.push(Span::styled(
            format!("\u{25CF} {}  ", timer.display()),
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    let count = app.workspace.store().len();
    right.push(Span::styled(
        format!("{} task{} ", count, if count == 1 { "" } else { "s" }),
        Style::default().fg(app.theme.dim).bg(bg),
    ));

    let left_w: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let right_w: usize = right.iter().map(|s| s.content.chars().count()).sum();
    let width = area.width as usize;
    if left_w + right_w < width {
        spans.push(Span::styled(" ".repeat(width - left_w - right_w), bg_style));
        spans.extend(right);
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim = app.theme.dim;

    // Filter/search indicator on the list view
    let mut indicator_spans: Vec<Span> = Vec::new();
    if app.view == View::List {
        if app.filter != StatusFilter::All {
            indicator_spans.push(Span::styled(
                "filter: ",
                Style::default().fg(app.theme.purple).bg(bg),
            ));
            indicator_spans.push(Span::styled(
                app.filter.as_str(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ));
        }
        if !app.search.is_empty() {
            if !indicator_spans.is_empty() {
                indicator_spans.push(Span::styled(" ", Style::default().bg(bg)));
            }
            indicator_spans.push(Span::styled(
                format!("/{}", app.search),
                Style::default().fg(app.theme.search_match_bg).bg(bg),
            ));
        }
    }

    let indicator_width: usize = indicator_spans
        .iter()
        .map(|s| s.content.chars().count())
        .sum();
    // +2: one space before indicator, one space after (right edge buffer)
    let separator_end = if indicator_spans.is_empty() {
        width
    } else {
        width.saturating_sub(indicator_width + 2)
    };

    let sep_text: String = (0..separator_end)
        .map(|col| {
            if sep_cols.contains(&col) {
                '\u{2534}'
            } else {
                '\u{2500}'
            }
        })
        .collect();

    let mut spans = vec![Span::styled(sep_text, Style::default().fg(dim).bg(bg))];
    if !indicator_spans.is_empty() {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.extend(indicator_spans);
        pad_line(&mut spans, width, Style::default().bg(bg));
    }

    let sep_widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn tabs_show_views_and_count() {
        let app = app_with_titles(&["a", "b"]);
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        let first = output.lines().next().unwrap();
        assert!(first.contains("1 List"));
        assert!(first.contains("4 Analytics"));
        assert!(first.ends_with("2 tasks"));
    }

    #[test]
    fn separator_shows_active_filter() {
        let mut app = app_with_titles(&["a"]);
        app.filter = StatusFilter::Completed;
        app.search = "rep".into();
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        assert!(output.lines().nth(1).unwrap().ends_with("filter: completed /rep"));
    }
}
