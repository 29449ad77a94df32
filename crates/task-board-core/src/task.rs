use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::id::TaskId;

/// Error returned when a user-facing token does not name a known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {token}")]
pub struct ParseTokenError {
    /// What was being parsed (`status`, `priority`, ...).
    pub kind: &'static str,
    /// The rejected input.
    pub token: String,
}

impl ParseTokenError {
    pub(crate) fn new(kind: &'static str, token: &str) -> Self {
        Self {
            kind,
            token: token.to_owned(),
        }
    }
}

/// Workflow column a task lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Every status in board order (left to right).
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Identifier used for persistence and as the column drop target id.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Column heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Position of the column on the board.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Todo => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    /// Inverse of [`index`](Self::index).
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Todo),
            1 => Some(Self::InProgress),
            2 => Some(Self::Done),
            _ => None,
        }
    }

    /// Match one of the exact column identifiers (`todo`, `in-progress`, `done`).
    #[must_use]
    pub fn from_column_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == id)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "todo" | "to-do" => Ok(Self::Todo),
            "in-progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTokenError::new("status", s)),
        }
    }
}

/// Task importance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default for new tasks.
    #[default]
    Medium,
    /// Do first.
    High,
}

impl Priority {
    /// Every priority from lowest to highest.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Persisted identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTokenError::new("priority", s)),
        }
    }
}

/// Recurrence label attached to a task. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    /// Free-form frequency label such as `daily` or `weekly`.
    pub frequency: String,
}

impl Routine {
    /// Wrap a frequency label.
    #[must_use]
    pub fn new(frequency: impl Into<String>) -> Self {
        Self {
            frequency: frequency.into(),
        }
    }
}

/// A single card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier assigned at creation.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Optional longer text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column the task is in.
    pub status: TaskStatus,
    /// Importance.
    #[serde(default)]
    pub priority: Priority,
    /// Creation timestamp (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Optional due date.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub due_date: Option<OffsetDateTime>,
    /// Optional recurrence label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine: Option<Routine>,
}

impl Task {
    /// Materialize a draft with the given identity.
    #[must_use]
    pub fn from_draft(id: TaskId, created_at: OffsetDateTime, draft: TaskDraft) -> Self {
        let TaskDraft {
            title,
            description,
            status,
            priority,
            due_date,
            routine,
        } = draft;
        Self {
            id,
            title,
            description,
            status,
            priority,
            created_at,
            due_date,
            routine,
        }
    }
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial column.
    pub status: TaskStatus,
    /// Initial priority.
    pub priority: Priority,
    /// Optional due date.
    pub due_date: Option<OffsetDateTime>,
    /// Optional recurrence label.
    pub routine: Option<Routine>,
}

impl TaskDraft {
    /// Draft with the create-dialog defaults: `todo`, `medium`, nothing else set.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::default(),
            due_date: None,
            routine: None,
        }
    }

    /// Set the initial column.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the initial priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: OffsetDateTime) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Attach a recurrence label.
    #[must_use]
    pub fn with_routine(mut self, routine: Routine) -> Self {
        self.routine = Some(routine);
        self
    }
}

/// Change to an optional field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Overwrite with the provided value.
    Set(T),
    /// Remove the value.
    Clear,
}

impl<T: Clone + PartialEq> Patch<T> {
    fn apply(&self, slot: &mut Option<T>) -> bool {
        let desired = match self {
            Self::Set(value) => Some(value),
            Self::Clear => None,
        };
        if slot.as_ref() == desired {
            return false;
        }
        *slot = desired.cloned();
        true
    }
}

/// Partial update merged into an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New title.
    pub title: Option<String>,
    /// Description change.
    pub description: Option<Patch<String>>,
    /// New column.
    pub status: Option<TaskStatus>,
    /// New priority.
    pub priority: Option<Priority>,
    /// Due date change.
    pub due_date: Option<Patch<OffsetDateTime>>,
    /// Routine change.
    pub routine: Option<Patch<Routine>>,
}

impl TaskUpdate {
    /// Update that only moves the task to another column.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns true when no field is touched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.routine.is_none()
    }

    /// Merge into `task`. Returns true when any field changed.
    pub fn apply_to(&self, task: &mut Task) -> bool {
        let mut changed = false;

        if let Some(title) = &self.title
            && *title != task.title
        {
            task.title.clone_from(title);
            changed = true;
        }
        if let Some(status) = self.status
            && status != task.status
        {
            task.status = status;
            changed = true;
        }
        if let Some(priority) = self.priority
            && priority != task.priority
        {
            task.priority = priority;
            changed = true;
        }
        if let Some(patch) = &self.description {
            changed |= patch.apply(&mut task.description);
        }
        if let Some(patch) = &self.due_date {
            changed |= patch.apply(&mut task.due_date);
        }
        if let Some(patch) = &self.routine {
            changed |= patch.apply(&mut task.routine);
        }

        changed
    }
}
