//! Renderer-agnostic view models derived from the task store.
//!
//! Nothing here mutates state. The TUI re-derives the model for the active
//! screen after every mutation; the CLI derives one per command.

pub mod board;
pub mod list;
pub mod summary;
pub mod timer;

pub use board::{BoardColumn, BoardView, CardView, board_view};
pub use list::{ListItemView, ListView, list_view};
pub use summary::{SummaryView, summary_view};
pub use timer::{FocusCandidate, TimerView, timer_view};
