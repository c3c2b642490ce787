use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Mode};
use crate::view::{BoardColumn, CardView};

use super::pad_line;

/// Render the kanban board: one bordered column per status
pub fn render_board_view(frame: &mut Frame, app: &App, area: Rect) {
    let board = app.board();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (idx, column) in board.columns.iter().enumerate() {
        render_column(frame, app, column, idx, chunks[idx]);
    }
}

fn render_column(frame: &mut Frame, app: &App, column: &BoardColumn, idx: usize, area: Rect) {
    let bg = app.theme.background;
    let moving = app.moving.as_ref().filter(|_| app.mode == Mode::Move);
    let is_target = moving.is_some_and(|m| m.target == idx);
    let is_current = moving.is_none() && app.board_col == idx;

    let border_color = if is_target {
        app.theme.highlight
    } else if is_current {
        app.theme.text
    } else {
        app.theme.dim
    };
    let mut title = vec![Span::styled(
        format!(" {} ({}) ", column.title, column.cards.len()),
        Style::default()
            .fg(app.theme.status_color(column.status))
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    if is_target {
        title.push(Span::styled(
            "\u{2190} drop ",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(Line::from(title))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let height = inner.height as usize;
    if column.cards.is_empty() {
        let empty = Line::from(Span::styled(" empty", Style::default().fg(app.theme.dim).bg(bg)));
        frame.render_widget(Paragraph::new(empty), inner);
        return;
    }

    let offset = if is_current && height > 0 {
        app.board_row.saturating_sub(height - 1)
    } else {
        0
    };
    let lines: Vec<Line> = column
        .cards
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(row, card)| {
            let selected = is_current && row == app.board_row;
            let picked = moving.is_some_and(|m| m.id == card.id);
            card_line(app, card, selected, picked, width)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn card_line<'a>(app: &App, card: &'a CardView, selected: bool, picked: bool, width: usize) -> Line<'a> {
    let bg = if selected || picked {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let base = Style::default().bg(bg);
    let marker = if picked {
        "\u{2725} "
    } else if selected {
        "\u{25B8} "
    } else {
        "  "
    };
    let title_style = if selected || picked {
        base.fg(app.theme.text_bright)
    } else {
        base.fg(app.theme.text)
    };

    let mut spans = vec![
        Span::styled(marker, base.fg(app.theme.highlight)),
        Span::styled("\u{25CF} ", base.fg(app.theme.priority_color(card.priority))),
        Span::styled(card.title.as_str(), title_style),
    ];
    if let Some(label) = &card.steps_label {
        spans.push(Span::styled(format!("  {}", label), base.fg(app.theme.dim)));
    }
    pad_line(&mut spans, width, base);
    Line::from(spans)
}
