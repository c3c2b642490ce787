use serde::Serialize;

use crate::model::task::{Priority, Status, Task};
use crate::ops::store::{TaskStore, progress};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_label: Option<String>,
}

impl CardView {
    fn from_task(task: &Task) -> Self {
        let p = progress(task);
        CardView {
            id: task.id.clone(),
            title: task.title.clone(),
            priority: task.priority,
            steps_label: (p.total > 0).then(|| format!("{}/{}", p.done, p.total)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn {
    pub status: Status,
    pub title: &'static str,
    pub cards: Vec<CardView>,
}

/// Kanban board: always exactly three columns, todo / doing / done
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub columns: [BoardColumn; 3],
}

impl BoardView {
    pub fn column(&self, status: Status) -> &BoardColumn {
        &self.columns[status.index()]
    }

    /// Locate a card: (column index, row index)
    pub fn position_of(&self, id: &str) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(c, col)| {
            col.cards.iter().position(|card| card.id == id).map(|r| (c, r))
        })
    }
}

pub fn board_view(store: &TaskStore) -> BoardView {
    let mut columns = Status::ALL.map(|status| BoardColumn {
        status,
        title: status.label(),
        cards: Vec::new(),
    });
    for task in store.iter() {
        columns[task.status.index()].cards.push(CardView::from_task(task));
    }
    BoardView { columns }
}
