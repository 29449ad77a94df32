//! Domain types, view derivation and drag reconciliation for the task board.

/// Authoritative board state and its mutations.
pub mod board;
/// Closest-corner collision detection.
pub mod collision;
/// Drag-and-drop reconciliation.
pub mod dnd;
/// Search and priority filters.
pub mod filter;
/// Identifier types.
pub mod id;
/// Task records, drafts and partial updates.
pub mod task;
/// Case-insensitive substring matching.
pub mod text_matcher;
/// Visible set and column partitioning.
pub mod view;

pub use board::{BoardState, ReorderError};
pub use dnd::{DragEvent, DragOutcome, DropTarget};
pub use filter::{PriorityFilter, TaskFilter};
pub use id::TaskId;
pub use task::{ParseTokenError, Patch, Priority, Routine, Task, TaskDraft, TaskStatus, TaskUpdate};
pub use view::BoardView;
