use anyhow::Result;
use task_board_store::KeyValueStore;

use super::terminal::Tty;
use super::view::{Ui, UiAction};

pub(super) mod drag;
pub(super) mod edit;
pub(super) mod navigation;

pub(super) fn handle_ui_action<S: KeyValueStore>(
    terminal: &mut Tty,
    ui: &mut Ui<S>,
    action: UiAction,
) -> Result<()> {
    edit::handle_ui_action(terminal, ui, action)
}
