//! Board service that pairs the in-memory state with its persisted record.

use anyhow::{Context, Error};
use task_board_core::{
    BoardState, BoardView, DragEvent, DragOutcome, PriorityFilter, ReorderError, Task, TaskDraft, TaskId,
    TaskUpdate,
};
use task_board_store::KeyValueStore;
use tracing::debug;

use crate::persistence::{encode_board, load_board};

/// Error type returned by [`TaskBoard`] mutations.
#[derive(thiserror::Error, Debug)]
pub enum BoardWriteError {
    /// Reorder request was not a permutation of the current tasks.
    #[error(transparent)]
    InvalidOrder(#[from] ReorderError),
    /// Saving the board failed. The in-memory state keeps the mutation.
    #[error(transparent)]
    Store(#[from] Error),
}

/// Result alias for board mutations.
pub type BoardWriteResult<T> = Result<T, BoardWriteError>;

/// Board state plus the store it is saved to after every change.
pub struct TaskBoard<S> {
    store: S,
    key: String,
    state: BoardState,
}

impl<S> TaskBoard<S> {
    /// Current state.
    pub const fn state(&self) -> &BoardState {
        &self.state
    }

    /// Every task in collection order.
    pub fn tasks(&self) -> &[Task] {
        self.state.tasks()
    }

    /// Look up a task by id.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.state.task(id)
    }

    /// Derived view under the stored filters.
    pub fn view(&self) -> BoardView<'_> {
        self.state.view()
    }

    /// Backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S> TaskBoard<S>
where
    S: KeyValueStore,
{
    /// Load the board saved under `key`, starting empty when nothing usable is stored.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read.
    pub fn open(store: S, key: impl Into<String>) -> anyhow::Result<Self> {
        let key = key.into();
        let state = load_board(&store, &key)
            .map_err(Into::<Error>::into)
            .with_context(|| format!("failed to load board '{key}'"))?;
        Ok(Self { store, key, state })
    }

    /// Wrap an existing state without reading the store.
    pub fn with_state(store: S, key: impl Into<String>, state: BoardState) -> Self {
        Self {
            store,
            key: key.into(),
            state,
        }
    }

    /// Write the full state under the board key.
    ///
    /// # Errors
    /// Returns [`BoardWriteError::Store`] when encoding or writing fails.
    pub fn save(&self) -> BoardWriteResult<()> {
        let raw = encode_board(&self.state).context("failed to encode board")?;
        self.store
            .set(&self.key, &raw)
            .map_err(Into::<Error>::into)
            .with_context(|| format!("failed to save board '{}'", self.key))?;
        debug!(key = %self.key, tasks = self.state.tasks().len(), "saved board");
        Ok(())
    }

    fn save_if(&self, changed: bool) -> BoardWriteResult<()> {
        if changed {
            self.save()
        } else {
            debug!("board unchanged; skipping save");
            Ok(())
        }
    }

    /// Append a task and save.
    ///
    /// # Errors
    /// Returns [`BoardWriteError::Store`] when saving fails.
    pub fn add_task(&mut self, draft: TaskDraft) -> BoardWriteResult<TaskId> {
        let id = self.state.add_task(draft);
        self.save()?;
        Ok(id)
    }

    /// Merge a partial update. Returns false (and does not save) when nothing changed.
    ///
    /// # Errors
    /// Returns [`BoardWriteError::Store`] when saving fails.
    pub fn update_task(&mut self, id: TaskId, update: &TaskUpdate) -> BoardWriteResult<bool> {
        let changed = self.state.update_task(id, update);
        self.save_if(changed)?;
        Ok(changed)
    }

    /// Move a task to `done`.
    ///
    /// # Errors
    /// Returns [`BoardWriteError::Store`] when saving fails.
    pub fn complete_task(&mut self, id: TaskId) -> BoardWriteResult<bool> {
        let changed = self.state.complete_task(id);
        self.save_if(changed)?;
        Ok(changed)
    }

    /// Remove a task. Returns false when the id is unknown.
    ///
    /// # Errors
    /// Returns [`BoardWriteError::Store`] when saving fails.
    pub fn delete_task(&mut self, id: TaskId) -> BoardWriteResult<bool> {
        let removed = self.state.delete_task(id);
        self.save_if(removed)?;
        Ok(removed)
    }

    /// Replace the collection order.
    ///
    /// # Errors
    /// Returns [`BoardWriteError::InvalidOrder`] for non-permutations and
    /// [`BoardWriteError::Store`] when saving fails.
    pub fn reorder_tasks(&mut self, order: &[TaskId]) -> BoardWriteResult<()> {
        self.state.reorder_tasks(order)?;
        self.save()
    }

    /// Remove every `done` task. Returns the number removed.
    ///
    /// # Errors
    /// Returns [`BoardWriteError::Store`] when saving fails.
    pub fn clear_completed_tasks(&mut self) -> BoardWriteResult<usize> {
        let removed = self.state.clear_completed_tasks();
        self.save_if(removed > 0)?;
        Ok(removed)
    }

    /// Update and save the free-text query.
    ///
    /// # Errors
    /// Returns [`BoardWriteError::Store`] when saving fails.
    pub fn set_search_query(&mut self, query: impl Into<String>) -> BoardWriteResult<bool> {
        let changed = self.state.set_search_query(query);
        self.save_if(changed)?;
        Ok(changed)
    }

    /// Update and save the priority filter.
    ///
    /// # Errors
    /// Returns [`BoardWriteError::Store`] when saving fails.
    pub fn set_filter_priority(&mut self, priority: PriorityFilter) -> BoardWriteResult<bool> {
        let changed = self.state.set_filter_priority(priority);
        self.save_if(changed)?;
        Ok(changed)
    }

    /// Apply a gesture message and save when it mutated the board.
    ///
    /// # Errors
    /// Returns [`BoardWriteError::Store`] when saving fails.
    pub fn apply_drag(&mut self, event: &DragEvent) -> BoardWriteResult<DragOutcome> {
        let outcome = self.state.apply_drag(event);
        debug!(?event, ?outcome, "applied drag event");
        self.save_if(outcome.is_mutation())?;
        Ok(outcome)
    }
}
