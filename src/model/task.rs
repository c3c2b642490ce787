use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Workflow stage of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    Doing,
    Done,
}

impl Status {
    /// All statuses in board column order
    pub const ALL: [Status; 3] = [Status::Todo, Status::Doing, Status::Done];

    /// Stored/CLI name
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::Doing => "doing",
            Status::Done => "done",
        }
    }

    /// Column and chart label
    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::Doing => "In Progress",
            Status::Done => "Done",
        }
    }

    /// The character shown inside a checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            Status::Todo => ' ',
            Status::Doing => '>',
            Status::Done => 'x',
        }
    }

    /// Column index on the board
    pub fn index(self) -> usize {
        match self {
            Status::Todo => 0,
            Status::Doing => 1,
            Status::Done => 2,
        }
    }

    pub fn from_index(idx: usize) -> Option<Status> {
        Status::ALL.get(idx).copied()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "todo" => Ok(Status::Todo),
            "doing" => Ok(Status::Doing),
            "done" => Ok(Status::Done),
            other => Err(format!(
                "invalid status '{}' (expected: todo, doing, done)",
                other
            )),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Next priority in low → medium → high → low order (form cycling)
    pub fn cycle(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "invalid priority '{}' (expected: low, medium, high)",
                other
            )),
        }
    }
}

/// A checklist line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl SubTask {
    pub fn new(text: impl Into<String>) -> Self {
        SubTask {
            text: text.into(),
            done: false,
        }
    }
}

/// A task record, stored verbatim in the persisted JSON array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique id, stable for the task's lifetime
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: String,
    /// Stored as `YYYY-MM-DD`, or an empty string when unset
    #[serde(default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    pub status: Status,
    /// Checklist steps in insertion order
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a todo task with no notes, due date or steps
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            priority: Priority::default(),
            notes: String::new(),
            due_date: None,
            status: Status::Todo,
            subtasks: Vec::new(),
            created_at,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    /// Notes, or `None` when blank
    pub fn notes(&self) -> Option<&str> {
        let trimmed = self.notes.trim();
        if trimmed.is_empty() { None } else { Some(&self.notes) }
    }
}

mod due_date_format {
    use super::*;

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_EXPORT: &str = r#"[
      {
        "id": "1717171717171",
        "title": "Write report",
        "priority": "high",
        "notes": "",
        "dueDate": "",
        "status": "doing",
        "subtasks": [{"text": "outline", "done": true}, {"text": "draft", "done": false}],
        "createdAt": "2024-05-31T15:28:37.171Z"
      }
    ]"#;

    #[test]
    fn reads_page_export_format() {
        let tasks: Vec<Task> = serde_json::from_str(PAGE_EXPORT).unwrap();
        assert_eq!(tasks.len(), 1);
        let t = &tasks[0];
        assert_eq!(t.id, "1717171717171");
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.status, Status::Doing);
        assert_eq!(t.due_date, None);
        assert!(t.notes().is_none());
        assert_eq!(t.subtasks[0].text, "outline");
        assert!(t.subtasks[0].done);
    }

    #[test]
    fn writes_camel_case_fields() {
        let mut task = Task::new("1", "A", Utc::now());
        task.due_date = NaiveDate::from_ymd_opt(2025, 3, 9);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2025-03-09");
        assert_eq!(json["status"], "todo");
        assert_eq!(json["priority"], "medium");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let raw = r#"{"id":"1","title":"x","status":"blocked","createdAt":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn subtask_order_survives_round_trip() {
        let created: DateTime<Utc> = "2024-01-01T09:30:00Z".parse().unwrap();
        let mut task = Task::new("1", "A", created);
        for text in ["c", "a", "b"] {
            task.subtasks.push(SubTask::new(text));
        }
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        let texts: Vec<_> = back.subtasks.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["c", "a", "b"]);
        assert_eq!(back, task);
    }

    #[test]
    fn parse_status_and_priority() {
        assert_eq!("Doing".parse::<Status>().unwrap(), Status::Doing);
        assert!("parked".parse::<Status>().is_err());
        assert_eq!("med".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(Priority::High.cycle(), Priority::Low);
    }
}
