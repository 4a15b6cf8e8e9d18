//! Plan model types shared by every front end
//!
//! These are the rows the store persists and the JSON shapes the HTTP API and
//! CLI emit. Field names match the wire format (`obj_id`, `weekly_goals`, ...).

use serde::{Deserialize, Serialize};

/// Status of a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Parse a status string as stored in SQL or sent over the wire
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Some(Self::Todo),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A concrete, status-tracked unit of work under one objective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Task {
    pub id: String,
    pub content: String,
    pub status: TaskStatus,
    /// Id of the objective that owns this task
    pub obj_id: String,
}

impl Task {
    pub fn new(id: impl Into<String>, content: impl Into<String>, obj_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            status: TaskStatus::Todo,
            obj_id: obj_id.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// A high-level goal grouping several tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Objective {
    pub id: String,
    pub title: String,
    /// Tasks in creation order
    pub tasks: Vec<Task>,
}

impl Objective {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    /// Number of tasks marked done
    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_done()).count()
    }
}

/// The full objectives/tasks structure produced by one ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Plan {
    pub objectives: Vec<Objective>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.objectives.iter().map(|o| o.tasks.len()).sum()
    }

    /// Iterate every task across all objectives
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.objectives.iter().flat_map(|o| o.tasks.iter())
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks().find(|t| t.id == id)
    }
}

/// Raw goal text as submitted by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserInput {
    pub weekly_goals: String,
    pub overall_goals: String,
    /// RFC 3339 UTC timestamp, empty when nothing has been recorded
    pub created_at: String,
}

impl UserInput {
    pub fn is_empty(&self) -> bool {
        self.weekly_goals.is_empty() && self.overall_goals.is_empty() && self.created_at.is_empty()
    }
}
