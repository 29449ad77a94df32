//! Conversion of user-facing strings into typed board values.

use task_board_core::{ParseTokenError, Priority, PriorityFilter, Routine, TaskDraft, TaskId, TaskStatus};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

/// Error type returned while turning user input into board values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Title was empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Status, priority or filter token not recognised.
    #[error(transparent)]
    InvalidToken(#[from] ParseTokenError),
    /// Due date is neither `YYYY-MM-DD` nor RFC 3339.
    #[error("invalid due date: {token} (expected YYYY-MM-DD or RFC 3339)")]
    InvalidDueDate {
        /// Rejected input.
        token: String,
    },
    /// Task identifier is not a UUID.
    #[error("invalid task id: {token}")]
    InvalidTaskId {
        /// Rejected input.
        token: String,
    },
}

/// Result alias for input helpers.
pub type InputResult<T> = Result<T, InputError>;

/// Builder that accepts raw field values and produces a validated [`TaskDraft`].
#[derive(Debug, Clone)]
pub struct TaskDraftBuilder {
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: Priority,
    due_date: Option<OffsetDateTime>,
    routine: Option<Routine>,
}

impl TaskDraftBuilder {
    /// Start from a raw title with `todo` / `medium` defaults.
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

    /// Set the description. Whitespace-only input clears it.
    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description.and_then(non_blank);
        self
    }

    /// Set the initial column.
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the initial priority.
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Parse and set the due date. Blank input clears it.
    ///
    /// # Errors
    /// Returns [`InputError::InvalidDueDate`] when the date cannot be parsed.
    pub fn due(mut self, raw: Option<&str>) -> InputResult<Self> {
        self.due_date = match raw.map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(parse_due_date(text)?),
        };
        Ok(self)
    }

    /// Set the recurrence label. Blank input clears it.
    #[must_use]
    pub fn routine(mut self, frequency: Option<String>) -> Self {
        self.routine = frequency.and_then(non_blank).map(Routine::new);
        self
    }

    /// Validate and produce the draft.
    ///
    /// # Errors
    /// Returns [`InputError::EmptyTitle`] when the title is blank.
    pub fn build(self) -> InputResult<TaskDraft> {
        Ok(TaskDraft {
            title: normalize_title(&self.title)?,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            routine: self.routine,
        })
    }
}

/// Trim a title and reject the empty result.
///
/// # Errors
/// Returns [`InputError::EmptyTitle`] when nothing is left after trimming.
pub fn normalize_title(raw: &str) -> InputResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

/// Parse a status token such as `todo`, `In Progress` or `in_progress`.
///
/// # Errors
/// Returns [`InputError::InvalidToken`] for unknown tokens.
pub fn parse_status(token: &str) -> InputResult<TaskStatus> {
    Ok(token.parse()?)
}

/// Parse a priority token.
///
/// # Errors
/// Returns [`InputError::InvalidToken`] for unknown tokens.
pub fn parse_priority(token: &str) -> InputResult<Priority> {
    Ok(token.parse()?)
}

/// Parse a priority filter token (`all` or a priority).
///
/// # Errors
/// Returns [`InputError::InvalidToken`] for unknown tokens.
pub fn parse_priority_filter(token: &str) -> InputResult<PriorityFilter> {
    Ok(token.parse()?)
}

/// Parse a task identifier.
///
/// # Errors
/// Returns [`InputError::InvalidTaskId`] when the token is not a UUID.
pub fn parse_task_id(token: &str) -> InputResult<TaskId> {
    token.parse().map_err(|_| InputError::InvalidTaskId {
        token: token.to_owned(),
    })
}

/// Parse a due date. `YYYY-MM-DD` means midnight UTC; RFC 3339 values are normalized to UTC.
///
/// # Errors
/// Returns [`InputError::InvalidDueDate`] when neither form matches.
pub fn parse_due_date(token: &str) -> InputResult<OffsetDateTime> {
    let trimmed = token.trim();
    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return Ok(date.midnight().assume_utc());
    }
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .map(|dt| dt.to_offset(UtcOffset::UTC))
        .map_err(|_| InputError::InvalidDueDate {
            token: token.to_owned(),
        })
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}
