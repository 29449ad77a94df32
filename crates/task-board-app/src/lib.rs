//! Application layer for the task board.
//!
//! This crate provides the persisted board service, configuration, and input
//! parsing shared by the CLI and the terminal board.

pub mod board;
pub mod config;
pub mod input;
pub mod persistence;

// Re-exports for convenience
pub use board::{BoardWriteError, BoardWriteResult, TaskBoard};
pub use config::{BoardConfig, DefaultsConfig, StorageConfig};
pub use input::{
    InputError, InputResult, TaskDraftBuilder, normalize_title, parse_due_date, parse_priority,
    parse_priority_filter, parse_status, parse_task_id,
};
pub use persistence::{STATE_VERSION, decode_board, encode_board, load_board};
