use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Task ids are positive and never reused within a store.
pub type TaskId = u32;

/// Format of every persisted timestamp: `DD.MM.YYYY HH:MM`.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// The name used on the command line and in the store file
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn parse_status(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wall-clock minute in `DD.MM.YYYY HH:MM` form.
///
/// The original string is kept verbatim so a load/save cycle never rewrites
/// it. Ordering is plain string ordering, which is only meaningful for two
/// stamps taken on the same day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(String);

impl Timestamp {
    /// Current local time, truncated to the minute
    pub fn now() -> Self {
        Timestamp(Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn parse(s: &str) -> Result<Self, InvalidTimestamp> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .map(|_| Timestamp(s.to_string()))
            .map_err(|_| InvalidTimestamp(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = InvalidTimestamp;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Timestamp::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp '{0}': expected DD.MM.YYYY HH:MM")]
pub struct InvalidTimestamp(pub String);

/// A single tracked unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub status: TaskStatus,
    pub created: Timestamp,
    pub updated: Timestamp,
}

impl Task {
    /// A fresh `todo` task with both stamps set to `now`
    pub fn new(id: TaskId, description: String, now: Timestamp) -> Self {
        Task {
            id,
            description,
            status: TaskStatus::Todo,
            created: now.clone(),
            updated: now,
        }
    }

    /// Refresh the `updated` stamp after a mutation
    pub fn touch(&mut self, now: Timestamp) {
        self.updated = now;
    }
}

/// The persisted root object: every task plus the id counter.
///
/// `next_id_counter` holds the last id handed out. It only ever grows, so an
/// id freed by a delete is never assigned again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Store {
    pub tasks: Vec<Task>,
    pub next_id_counter: TaskId,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Check the invariants a well-formed store file must satisfy
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for task in &self.tasks {
            if task.id == 0 {
                return Err("task id 0 is not allowed".to_string());
            }
            if !seen.insert(task.id) {
                return Err(format!("duplicate task id {}", task.id));
            }
            if task.id > self.next_id_counter {
                return Err(format!(
                    "task id {} exceeds next_id_counter {}",
                    task.id, self.next_id_counter
                ));
            }
        }
        Ok(())
    }
}
