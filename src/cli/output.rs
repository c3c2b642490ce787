use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::task::{Status, Task};
use crate::ops::store::progress;
use crate::view::{BoardView, ListItemView, ListView, SummaryView};

/// Width of the text progress bar in list output
const BAR_WIDTH: usize = 10;
/// Column width on the printed board
const BOARD_COL_WIDTH: usize = 26;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// `[x] 1717171717171 Write report (high) due 2025-03-09  ■■■■■□□□□□ 1/2 steps`
pub fn format_item_line(item: &ListItemView) -> String {
    let mut line = format!(
        "[{}] {} {} ({})",
        item.status.checkbox_char(),
        item.id,
        item.title,
        item.priority
    );
    if let Some(due) = item.due {
        line.push_str(&format!(" due {}", due));
    }
    if let Some(label) = &item.steps_label {
        line.push_str(&format!("  {} {}", progress_bar(item.percent, BAR_WIDTH), label));
    }
    line
}

/// Text progress bar, `width` cells wide
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "■".repeat(filled), "□".repeat(width - filled))
}

pub fn format_list(view: &ListView) -> Vec<String> {
    if let Some(msg) = view.empty_message() {
        return vec![msg.to_string()];
    }
    view.items.iter().map(format_item_line).collect()
}

/// Detailed task view
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![format!(
        "[{}] {} {}",
        task.status.checkbox_char(),
        task.id,
        task.title
    )];
    lines.push(format!("status: {}", task.status));
    lines.push(format!("priority: {}", task.priority));
    if let Some(due) = task.due_date {
        lines.push(format!("due: {}", due));
    }
    lines.push(format!(
        "created: {}",
        task.created_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    ));
    if let Some(notes) = task.notes() {
        lines.push("notes:".to_string());
        for line in notes.lines() {
            lines.push(format!("  {}", line));
        }
    }
    if !task.subtasks.is_empty() {
        let p = progress(task);
        lines.push(String::new());
        lines.push(format!("steps: {}/{}", p.done, p.total));
        for (i, step) in task.subtasks.iter().enumerate() {
            lines.push(format!(
                "  {}. [{}] {}",
                i + 1,
                if step.done { 'x' } else { ' ' },
                step.text
            ));
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Board and stats
// ---------------------------------------------------------------------------

/// Three side-by-side columns
pub fn format_board(board: &BoardView) -> Vec<String> {
    let mut lines = Vec::new();
    let header: Vec<String> = board
        .columns
        .iter()
        .map(|c| pad(&format!("{} ({})", c.title, c.cards.len()), BOARD_COL_WIDTH))
        .collect();
    lines.push(header.join(" │ ").trim_end().to_string());
    lines.push(
        ["─"; 3]
            .map(|s| s.repeat(BOARD_COL_WIDTH))
            .join("─┼─"),
    );

    let rows = board.columns.iter().map(|c| c.cards.len()).max().unwrap_or(0);
    for r in 0..rows {
        let cells: Vec<String> = board
            .columns
            .iter()
            .map(|c| match c.cards.get(r) {
                Some(card) => pad(&format!("{} ({})", card.title, card.priority), BOARD_COL_WIDTH),
                None => " ".repeat(BOARD_COL_WIDTH),
            })
            .collect();
        lines.push(cells.join(" │ ").trim_end().to_string());
    }
    lines
}

pub fn format_summary(summary: &SummaryView) -> Vec<String> {
    let max = summary.bars().iter().map(|(_, n)| *n).max().unwrap_or(0);
    let label_w = Status::ALL.iter().map(|s| s.label().len()).max().unwrap_or(0);
    let mut lines: Vec<String> = summary
        .bars()
        .iter()
        .map(|(label, n)| {
            let bar_len = if max == 0 { 0 } else { n * 30 / max };
            format!("{:<w$}  {:>3}  {}", label, n, "█".repeat(bar_len), w = label_w)
        })
        .collect();
    lines.push(format!(
        "{:<w$}  {:>3}  ({:.0}% done)",
        "Total",
        summary.total(),
        summary.completion_percent(),
        w = label_w
    ));
    lines
}

/// Truncate or pad `text` to exactly `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width.saturating_sub(1) && text.width() > width {
            out.push('…');
            used += 1;
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
