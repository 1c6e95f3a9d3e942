//! Task domain entity
//!
//! A unit of work inside a sprint, assigned to zero or more users.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sprint::SprintId;
use super::user::UserId;

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TaskId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task status
///
/// Stored and serialized in kebab-case. Parsing also accepts the
/// space-separated labels ("To Do", "In Progress").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Blocked,
    Completed,
}

impl TaskStatus {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Blocked => "Blocked",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::ToDo => write!(f, "to-do"),
            TaskStatus::InProgress => write!(f, "in-progress"),
            TaskStatus::Blocked => write!(f, "blocked"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "to-do" | "to do" | "to_do" | "todo" => Ok(TaskStatus::ToDo),
            "in-progress" | "in progress" | "in_progress" | "inprogress" => {
                Ok(TaskStatus::InProgress)
            }
            "blocked" => Ok(TaskStatus::Blocked),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// A task within a sprint
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub sprint_id: SprintId,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub assigned_to: BTreeSet<UserId>,
    pub comments: String,
    /// Reference to an uploaded screenshot, if any
    pub screenshots: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data needed to create a new task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub sprint_id: SprintId,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub assigned_to: BTreeSet<UserId>,
    pub comments: String,
    pub screenshots: Option<String>,
}

impl NewTask {
    /// A task with only a title; everything else at its default
    pub fn bare(sprint_id: SprintId, title: impl Into<String>) -> Self {
        Self {
            sprint_id,
            title: title.into(),
            description: String::new(),
            due_date: None,
            status: TaskStatus::default(),
            assigned_to: BTreeSet::new(),
            comments: String::new(),
            screenshots: None,
        }
    }
}

/// Partial update of a task. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub sprint_id: Option<SprintId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<BTreeSet<UserId>>,
    pub comments: Option<String>,
    pub screenshots: Option<String>,
}

impl TaskUpdate {
    /// Apply the present fields onto a task
    pub fn apply_to(self, task: &mut Task) {
        if let Some(sprint_id) = self.sprint_id {
            task.sprint_id = sprint_id;
        }
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(comments) = self.comments {
            task.comments = comments;
        }
        if let Some(screenshots) = self.screenshots {
            task.screenshots = Some(screenshots);
        }
    }
}
