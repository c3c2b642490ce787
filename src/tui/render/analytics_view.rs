use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};

use crate::model::task::Status;
use crate::tui::app::App;
use crate::view::summary_view;

const BAR_WIDTH: u16 = 13;

/// Render the analytics view: a bar per status and the totals below it
pub fn render_analytics_view(frame: &mut Frame, app: &App, area: Rect) {
    let summary = summary_view(app.workspace.store());
    let bg = app.theme.background;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let bars: Vec<Bar> = Status::ALL
        .iter()
        .zip(summary.bars())
        .map(|(status, (label, count))| {
            let color = app.theme.status_color(*status);
            Bar::default()
                .value(count as u64)
                .label(Line::from(label))
                .style(Style::default().fg(color).bg(bg))
                .value_style(Style::default().fg(bg).bg(color).add_modifier(Modifier::BOLD))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.dim).bg(bg))
                .title(Span::styled(
                    " Tasks by status ",
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ))
                .style(Style::default().bg(bg)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(3)
        .label_style(Style::default().fg(app.theme.text).bg(bg));
    frame.render_widget(chart, chunks[0]);

    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let bright = Style::default().fg(app.theme.text_bright).bg(bg);
    let lines = vec![
        Line::from(vec![
            Span::styled("  Total: ", dim),
            Span::styled(summary.total().to_string(), bright),
            Span::styled("   Completed: ", dim),
            Span::styled(
                format!("{:.0}%", summary.completion_percent()),
                Style::default().fg(app.theme.green).bg(bg),
            ),
        ]),
        Line::from(Status::ALL.iter().fold(Vec::new(), |mut spans, status| {
            spans.push(Span::styled(format!("  {}: ", status.label()), dim));
            spans.push(Span::styled(
                summary.count(*status).to_string(),
                Style::default().fg(app.theme.status_color(*status)).bg(bg),
            ));
            spans
        })),
    ];
    let totals = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(totals, chunks[1]);
}
