//! Versioned envelope around the persisted board record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use task_board_core::BoardState;
use task_board_store::KeyValueStore;
use tracing::{debug, warn};

/// Envelope version written by this build.
pub const STATE_VERSION: u32 = 0;

/// Persisted form: `{ "state": {...}, "version": 0 }`.
#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a BoardState,
    version: u32,
}

/// Decode a persisted record.
///
/// Returns `None` for unparsable JSON, a missing `state` object or a foreign version.
/// Missing fields inside `state` take their defaults.
#[must_use]
pub fn decode_board(raw: &str) -> Option<BoardState> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "persisted board is not valid JSON; starting empty");
            return None;
        }
    };

    let version = value.get("version").and_then(Value::as_u64).unwrap_or(0);
    if version != u64::from(STATE_VERSION) {
        warn!(version, expected = STATE_VERSION, "unsupported board version; starting empty");
        return None;
    }

    let Some(state) = value.get("state") else {
        warn!("persisted board has no state; starting empty");
        return None;
    };
    match BoardState::deserialize(state) {
        Ok(board) => Some(board),
        Err(err) => {
            warn!(error = %err, "persisted board state is malformed; starting empty");
            None
        }
    }
}

/// Encode the board as the persisted envelope.
///
/// # Errors
/// Returns an error when serialization fails.
pub fn encode_board(board: &BoardState) -> serde_json::Result<String> {
    serde_json::to_string(&EnvelopeRef {
        state: board,
        version: STATE_VERSION,
    })
}

/// Load the board stored under `key`, falling back to an empty board.
///
/// # Errors
/// Returns the store's error when reading fails. Bad contents are not an error.
pub fn load_board<S: KeyValueStore>(store: &S, key: &str) -> Result<BoardState, S::Error> {
    let board = store
        .get(key)?
        .and_then(|raw| decode_board(&raw))
        .unwrap_or_default();
    debug!(key, tasks = board.tasks().len(), "loaded board");
    Ok(board)
}
