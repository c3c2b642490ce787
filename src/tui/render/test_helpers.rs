use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::storage::MemoryStorage;
use crate::model::Config;
use crate::ops::draft::TaskDraft;
use crate::ops::notify::Notifier;
use crate::ops::timer::FocusTimer;
use crate::ops::workspace::Workspace;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

struct Quiet;

impl Notifier for Quiet {
    fn notify(&mut self, _message: &str) -> bool {
        false
    }
}

/// An app over in-memory storage with a 25-minute timer and no tasks.
pub fn empty_app() -> App {
    let ws = Workspace::open(Box::new(MemoryStorage::new()), FocusTimer::default()).unwrap();
    App::with_notifier(ws, Config::default(), Box::new(Quiet))
}

/// Add tasks oldest first; the list shows the last title on top.
pub fn app_with_titles(titles: &[&str]) -> App {
    let mut app = empty_app();
    for title in titles {
        app.workspace.submit(TaskDraft::new(*title)).unwrap();
    }
    app
}

/// Id of the task with `title`
pub fn id_of(app: &App, title: &str) -> String {
    app.workspace
        .store()
        .iter()
        .find(|t| t.title == title)
        .map(|t| t.id.clone())
        .unwrap()
}
