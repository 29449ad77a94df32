//! Drag-and-drop reconciliation.
//!
//! Gestures arrive as two messages: `Over` fires repeatedly while a card is
//! dragged and commits column changes immediately, `End` fires once and
//! reorders the collection when the card was dropped onto another card.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::TaskId;
use crate::task::{ParseTokenError, Task, TaskStatus};

/// Something a card can be dragged over or dropped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// A whole column, addressed by its status identifier.
    Column(TaskStatus),
    /// Another card.
    Task(TaskId),
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(status) => status.fmt(f),
            Self::Task(id) => id.fmt(f),
        }
    }
}

impl FromStr for DropTarget {
    type Err = ParseTokenError;

    /// Column identifiers win over task ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(status) = TaskStatus::from_column_id(trimmed) {
            return Ok(Self::Column(status));
        }
        trimmed
            .parse::<TaskId>()
            .map(Self::Task)
            .map_err(|_| ParseTokenError::new("drop target", s))
    }
}

/// Gesture message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    /// Pointer moved over `target` (or over nothing) while dragging.
    Over {
        /// Card being dragged.
        dragged: TaskId,
        /// Resolved target under the pointer.
        target: Option<DropTarget>,
    },
    /// Gesture finished over `target` (or was cancelled).
    End {
        /// Card being dragged.
        dragged: TaskId,
        /// Resolved target under the pointer.
        target: Option<DropTarget>,
    },
}

impl DragEvent {
    /// Card being dragged.
    #[must_use]
    pub const fn dragged(&self) -> TaskId {
        match self {
            Self::Over { dragged, .. } | Self::End { dragged, .. } => *dragged,
        }
    }
}

/// Mutation decided for a gesture message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DragOutcome {
    /// The dragged card moved to another column.
    StatusChanged {
        /// Card that moved.
        task: TaskId,
        /// Previous column.
        from: TaskStatus,
        /// New column.
        to: TaskStatus,
    },
    /// The dragged card moved within the collection.
    Reordered {
        /// Card that moved.
        task: TaskId,
        /// Previous collection index.
        from: usize,
        /// New collection index.
        to: usize,
    },
    /// Nothing to do.
    Ignored,
}

impl DragOutcome {
    /// Returns true when the outcome mutates the board.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Decide what a gesture message does to `tasks` without applying it.
#[must_use]
pub fn reconcile(tasks: &[Task], event: &DragEvent) -> DragOutcome {
    match *event {
        DragEvent::Over { dragged, target } => reconcile_over(tasks, dragged, target),
        DragEvent::End { dragged, target } => reconcile_end(tasks, dragged, target),
    }
}

fn reconcile_over(tasks: &[Task], dragged: TaskId, target: Option<DropTarget>) -> DragOutcome {
    let Some(DropTarget::Column(to)) = target else {
        return DragOutcome::Ignored;
    };
    let Some(task) = tasks.iter().find(|task| task.id == dragged) else {
        return DragOutcome::Ignored;
    };
    if task.status == to {
        return DragOutcome::Ignored;
    }
    DragOutcome::StatusChanged {
        task: dragged,
        from: task.status,
        to,
    }
}

fn reconcile_end(tasks: &[Task], dragged: TaskId, target: Option<DropTarget>) -> DragOutcome {
    let Some(DropTarget::Task(over)) = target else {
        return DragOutcome::Ignored;
    };
    let position = |id: TaskId| tasks.iter().position(|task| task.id == id);
    let (Some(from), Some(to)) = (position(dragged), position(over)) else {
        return DragOutcome::Ignored;
    };
    if from == to {
        return DragOutcome::Ignored;
    }
    DragOutcome::Reordered {
        task: dragged,
        from,
        to,
    }
}
