//! Derived, read-only board views.

use crate::filter::TaskFilter;
use crate::id::TaskId;
use crate::task::{Task, TaskStatus};

/// Visible tasks and their partition into status columns.
///
/// Derived from scratch on every call; holds borrows into the task slice.
#[derive(Debug, Clone)]
pub struct BoardView<'a> {
    visible: Vec<&'a Task>,
    columns: [Vec<&'a Task>; 3],
}

impl<'a> BoardView<'a> {
    /// Filter `tasks` in collection order and partition the survivors by status.
    #[must_use]
    pub fn derive(tasks: &'a [Task], filter: &TaskFilter) -> Self {
        let predicate = filter.compile();
        let visible: Vec<&'a Task> = tasks.iter().filter(|task| predicate.matches(task)).collect();

        let mut columns: [Vec<&'a Task>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for &task in &visible {
            columns[task.status.index()].push(task);
        }

        Self { visible, columns }
    }

    /// Visible tasks in collection order.
    #[must_use]
    pub fn visible(&self) -> &[&'a Task] {
        &self.visible
    }

    /// Tasks of one column in collection order.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[&'a Task] {
        &self.columns[status.index()]
    }

    /// Number of visible tasks in a column.
    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.columns[status.index()].len()
    }

    /// Number of visible tasks overall.
    #[must_use]
    pub fn total(&self) -> usize {
        self.visible.len()
    }

    /// Iterate columns left to right together with their status.
    pub fn columns(&self) -> impl Iterator<Item = (TaskStatus, &[&'a Task])> + '_ {
        TaskStatus::ALL
            .into_iter()
            .map(|status| (status, self.column(status)))
    }

    /// Locate a visible task as `(status, index within column)`.
    #[must_use]
    pub fn locate(&self, id: TaskId) -> Option<(TaskStatus, usize)> {
        self.columns().find_map(|(status, tasks)| {
            tasks
                .iter()
                .position(|task| task.id == id)
                .map(|index| (status, index))
        })
    }
}
