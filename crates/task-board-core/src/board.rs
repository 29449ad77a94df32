use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::dnd::{DragEvent, DragOutcome, reconcile};
use crate::filter::{PriorityFilter, TaskFilter};
use crate::id::TaskId;
use crate::task::{Task, TaskDraft, TaskStatus, TaskUpdate};
use crate::view::BoardView;

/// Reasons a reorder request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    /// The new order does not list every task exactly once.
    #[error("expected {expected} task ids, got {actual}")]
    LengthMismatch {
        /// Number of tasks on the board.
        expected: usize,
        /// Number of ids supplied.
        actual: usize,
    },
    /// The new order names a task that is not on the board.
    #[error("task {0} is not on the board")]
    UnknownTask(TaskId),
    /// The new order names a task twice.
    #[error("task {0} appears more than once")]
    DuplicateTask(TaskId),
}

/// Authoritative task collection plus the search/priority filter state.
///
/// Serialized field names match the persisted record
/// (`tasks`, `searchQuery`, `filterPriority`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardState {
    tasks: Vec<Task>,
    search_query: String,
    filter_priority: PriorityFilter,
}

impl BoardState {
    /// Empty board with default filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every task in collection order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Collection index of a task.
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Current free-text query.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Current priority filter.
    #[must_use]
    pub const fn filter_priority(&self) -> PriorityFilter {
        self.filter_priority
    }

    /// Both filter criteria as one value.
    #[must_use]
    pub fn filter(&self) -> TaskFilter {
        TaskFilter::new(self.search_query.clone(), self.filter_priority)
    }

    /// Derive the visible set and columns under the stored filters.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        BoardView::derive(&self.tasks, &self.filter())
    }

    /// Derive a view under an explicit filter, ignoring the stored one.
    #[must_use]
    pub fn view_with(&self, filter: &TaskFilter) -> BoardView<'_> {
        BoardView::derive(&self.tasks, filter)
    }

    /// Append a new task stamped with a fresh id and the current time.
    pub fn add_task(&mut self, draft: TaskDraft) -> TaskId {
        self.add_task_at(draft, OffsetDateTime::now_utc())
    }

    /// Append a new task stamped with a fresh id and `created_at`.
    pub fn add_task_at(&mut self, draft: TaskDraft, created_at: OffsetDateTime) -> TaskId {
        let id = TaskId::new();
        debug!(task = %id, status = %draft.status, "adding task");
        self.tasks.push(Task::from_draft(id, created_at, draft));
        id
    }

    /// Merge `update` into the task. Unknown ids are ignored.
    ///
    /// Returns true when any field changed.
    pub fn update_task(&mut self, id: TaskId, update: &TaskUpdate) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(task = %id, "update ignored: unknown task");
            return false;
        };
        update.apply_to(task)
    }

    /// Move the task to the `done` column.
    pub fn complete_task(&mut self, id: TaskId) -> bool {
        self.update_task(id, &TaskUpdate::status(TaskStatus::Done))
    }

    /// Remove a task. Unknown ids are ignored.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        if !removed {
            debug!(task = %id, "delete ignored: unknown task");
        }
        removed
    }

    /// Replace the collection order. `order` must be a permutation of the current ids.
    ///
    /// # Errors
    /// Returns [`ReorderError`] and leaves the board untouched when `order` is not a permutation.
    pub fn reorder_tasks(&mut self, order: &[TaskId]) -> Result<(), ReorderError> {
        if order.len() != self.tasks.len() {
            return Err(ReorderError::LengthMismatch {
                expected: self.tasks.len(),
                actual: order.len(),
            });
        }

        let index: HashMap<TaskId, usize> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| (task.id, idx))
            .collect();
        let mut seen = HashSet::with_capacity(order.len());
        let mut positions = Vec::with_capacity(order.len());
        for id in order {
            let Some(&idx) = index.get(id) else {
                return Err(ReorderError::UnknownTask(*id));
            };
            if !seen.insert(*id) {
                return Err(ReorderError::DuplicateTask(*id));
            }
            positions.push(idx);
        }

        let mut slots: Vec<Option<Task>> = std::mem::take(&mut self.tasks).into_iter().map(Some).collect();
        self.tasks = positions
            .into_iter()
            .filter_map(|idx| slots.get_mut(idx).and_then(Option::take))
            .collect();
        Ok(())
    }

    /// Move the task at `from` to `to`, shifting everything in between by one slot.
    ///
    /// Returns false when the indices are equal or out of range.
    pub fn move_task(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.tasks.len() || to >= self.tasks.len() {
            return false;
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        true
    }

    /// Remove every `done` task, keeping the survivors' order. Returns the number removed.
    pub fn clear_completed_tasks(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.status != TaskStatus::Done);
        before - self.tasks.len()
    }

    /// Update the free-text query. Returns true when it changed.
    pub fn set_search_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query == self.search_query {
            return false;
        }
        self.search_query = query;
        true
    }

    /// Update the priority filter. Returns true when it changed.
    pub fn set_filter_priority(&mut self, priority: PriorityFilter) -> bool {
        if priority == self.filter_priority {
            return false;
        }
        self.filter_priority = priority;
        true
    }

    /// Reconcile a gesture message and apply the resulting mutation.
    pub fn apply_drag(&mut self, event: &DragEvent) -> DragOutcome {
        let outcome = reconcile(&self.tasks, event);
        match outcome {
            DragOutcome::StatusChanged { task, to, .. } => {
                self.update_task(task, &TaskUpdate::status(to));
            }
            DragOutcome::Reordered { from, to, .. } => {
                self.move_task(from, to);
            }
            DragOutcome::Ignored => {}
        }
        outcome
    }
}
