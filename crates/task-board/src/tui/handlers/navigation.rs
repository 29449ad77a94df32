use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use task_board_store::KeyValueStore;

use super::super::view::{Mode, Ui, UiAction};

impl<S: KeyValueStore> Ui<S> {
    pub(in crate::tui) fn handle_key(&mut self, key: KeyEvent) -> Result<Option<UiAction>> {
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }

        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search => {
                self.handle_search_key(key)?;
                Ok(None)
            }
            Mode::KeyboardDrag(drag) => {
                self.handle_keyboard_drag_key(drag, key)?;
                Ok(None)
            }
            // The mouse owns the gesture; only Esc lets go of it.
            Mode::PointerDrag(_) => {
                if key.code == KeyCode::Esc {
                    self.cancel_pointer_drag()?;
                }
                Ok(None)
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<Option<UiAction>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('c') {
                self.should_quit = true;
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::Left => self.focus_column(-1),
            KeyCode::Char('l') | KeyCode::Right => self.focus_column(1),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('n') => {
                return Ok(Some(UiAction::CreateTask { status: self.focus }));
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                return Ok(self.selected_task_id().map_or_else(
                    || {
                        self.error("No task selected to edit");
                        None
                    },
                    |task| Some(UiAction::EditTask { task }),
                ));
            }
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected()?,
            KeyCode::Char('c' | ' ') => self.complete_selected()?,
            KeyCode::Char('x') => self.clear_completed()?,
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                self.info("Type to search, Enter or Esc to finish");
            }
            KeyCode::Char('p') => self.cycle_priority_filter()?,
            KeyCode::Char('m') => self.start_keyboard_drag(),
            _ => {}
        }
        Ok(None)
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        let mut query = self.board.state().search_query().to_owned();
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.message = None;
                return Ok(());
            }
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => query.clear(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => query.push(c),
            _ => return Ok(()),
        }
        self.board.set_search_query(query)?;
        self.clamp_selection();
        Ok(())
    }

    fn delete_selected(&mut self) -> Result<()> {
        let Some(task) = self.selected_task() else {
            self.error("No task selected to delete");
            return Ok(());
        };
        let (id, title) = (task.id, task.title.clone());
        if self.board.delete_task(id)? {
            self.info(format!("Deleted \"{title}\""));
        }
        self.clamp_selection();
        Ok(())
    }

    fn complete_selected(&mut self) -> Result<()> {
        let Some(id) = self.selected_task_id() else {
            self.error("No task selected to complete");
            return Ok(());
        };
        if self.board.complete_task(id)? {
            self.info("Marked as done");
        } else {
            self.info("Already done");
        }
        self.clamp_selection();
        Ok(())
    }

    fn clear_completed(&mut self) -> Result<()> {
        let removed = self.board.clear_completed_tasks()?;
        if removed == 0 {
            self.info("No completed tasks to clear");
        } else {
            self.info(format!("Cleared {removed} completed task(s)"));
        }
        self.clamp_selection();
        Ok(())
    }

    fn cycle_priority_filter(&mut self) -> Result<()> {
        let next = self.board.state().filter_priority().next();
        self.board.set_filter_priority(next)?;
        self.clamp_selection();
        self.info(format!("Priority filter: {next}"));
        Ok(())
    }
}
