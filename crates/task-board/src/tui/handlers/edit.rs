use anyhow::{Context, Result};
use task_board_core::TaskId;
use task_board_store::KeyValueStore;

use super::super::editor::{edit_task_editor_template, new_task_editor_template, parse_task_editor_output};
use super::super::terminal::{EditorCommand, Tty, suspended};
use super::super::view::{Ui, UiAction};

pub(super) fn handle_ui_action<S: KeyValueStore>(
    terminal: &mut Tty,
    ui: &mut Ui<S>,
    action: UiAction,
) -> Result<()> {
    let editor = EditorCommand::from_env()?;
    match action {
        UiAction::CreateTask { status } => {
            let template = new_task_editor_template(status, ui.defaults.priority);
            let raw = suspended(terminal, || editor.edit(&template))?;
            ui.apply_new_task_input(&raw)?;
        }
        UiAction::EditTask { task } => {
            let Some(template) = ui.board.task(task).map(edit_task_editor_template) else {
                ui.error("Task to edit no longer exists");
                return Ok(());
            };
            let raw = suspended(terminal, || editor.edit(&template))?;
            ui.apply_edit_task_input(task, &raw)?;
        }
    }
    Ok(())
}

impl<S: KeyValueStore> Ui<S> {
    pub(in crate::tui) fn apply_new_task_input(&mut self, raw: &str) -> Result<()> {
        match parse_task_editor_output(raw) {
            Ok(Some(form)) => {
                let title = form.title.clone();
                let id = self
                    .board
                    .add_task(form.into_draft())
                    .context("failed to save the new task")?;
                self.select_task(id);
                self.info(format!("Created \"{title}\""));
            }
            Ok(None) => self.info("Task creation cancelled"),
            Err(msg) => self.error(msg),
        }
        Ok(())
    }

    pub(in crate::tui) fn apply_edit_task_input(&mut self, task: TaskId, raw: &str) -> Result<()> {
        match parse_task_editor_output(raw) {
            Ok(Some(form)) => {
                let updated = self
                    .board
                    .update_task(task, &form.into_update())
                    .context("failed to save the task")?;
                self.select_task(task);
                if updated {
                    self.info("Task updated");
                } else {
                    self.info("No changes");
                }
            }
            Ok(None) => self.info("Edit cancelled"),
            Err(msg) => self.error(msg),
        }
        Ok(())
    }
}
