//! Card moves driven by the keyboard or the mouse.
//!
//! Both paths speak the same gesture messages as the `drag`/`drop` commands:
//! hovering a column commits the status change at once, dropping onto a card
//! reorders the collection.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use task_board_core::collision::closest_corners;
use task_board_core::{DragEvent, DragOutcome, DropTarget, TaskId, TaskStatus};
use task_board_store::KeyValueStore;

use super::super::layout::to_collision_rect;
use super::super::view::{KeyboardDrag, Mode, PointerDrag, Ui};

impl<S: KeyValueStore> Ui<S> {
    pub(in crate::tui) fn start_keyboard_drag(&mut self) {
        let Some(task) = self.selected_task() else {
            self.error("No task selected to move");
            return;
        };
        let title = task.title.clone();
        self.mode = Mode::KeyboardDrag(KeyboardDrag { task: task.id });
        self.info(format!("Moving \"{title}\": h/l column, j/k position, Enter drop"));
    }

    pub(in crate::tui) fn handle_keyboard_drag_key(&mut self, drag: KeyboardDrag, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.drag_to_adjacent_column(drag.task, -1)?,
            KeyCode::Char('l') | KeyCode::Right => self.drag_to_adjacent_column(drag.task, 1)?,
            KeyCode::Char('j') | KeyCode::Down => self.drag_past_neighbour(drag.task, 1)?,
            KeyCode::Char('k') | KeyCode::Up => self.drag_past_neighbour(drag.task, -1)?,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('m') => {
                self.mode = Mode::Browse;
                self.info("Dropped");
            }
            _ => {}
        }
        Ok(())
    }

    fn drag_to_adjacent_column(&mut self, task: TaskId, delta: isize) -> Result<()> {
        let Some(current) = self.board.task(task).map(|task| task.status) else {
            self.mode = Mode::Browse;
            return Ok(());
        };
        let Some(next) = TaskStatus::from_index(current.index().saturating_add_signed(delta)) else {
            return Ok(());
        };
        self.board.apply_drag(&DragEvent::Over {
            dragged: task,
            target: Some(DropTarget::Column(next)),
        })?;
        self.select_task(task);
        Ok(())
    }

    /// Drop onto the card above or below within the visible column.
    fn drag_past_neighbour(&mut self, task: TaskId, delta: isize) -> Result<()> {
        let neighbour = {
            let view = self.board.view();
            let Some((status, index)) = view.locate(task) else {
                return Ok(());
            };
            let Some(target) = index.checked_add_signed(delta) else {
                return Ok(());
            };
            view.column(status).get(target).map(|task| task.id)
        };
        let Some(neighbour) = neighbour else {
            return Ok(());
        };
        self.board.apply_drag(&DragEvent::End {
            dragged: task,
            target: Some(DropTarget::Task(neighbour)),
        })?;
        self.select_task(task);
        Ok(())
    }

    /// Route a mouse event against the layout of the frame filling `area`.
    pub(in crate::tui) fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect) -> Result<()> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start_pointer_drag(mouse.column, mouse.row, area);
                Ok(())
            }
            MouseEventKind::Drag(MouseButton::Left) => self.pointer_moved(mouse.column, mouse.row, area),
            MouseEventKind::Up(MouseButton::Left) => self.finish_pointer_drag(),
            MouseEventKind::ScrollDown => {
                self.move_selection(1);
                Ok(())
            }
            MouseEventKind::ScrollUp => {
                self.move_selection(-1);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn start_pointer_drag(&mut self, x: u16, y: u16, area: Rect) {
        if !matches!(self.mode, Mode::Browse) {
            return;
        }
        let Some(slot) = self.layout(area).card_at(x, y) else {
            return;
        };
        self.select_task(slot.task);
        self.mode = Mode::PointerDrag(PointerDrag {
            task: slot.task,
            grab: (f64::from(x - slot.area.x), f64::from(y - slot.area.y)),
            rect: to_collision_rect(slot.area),
            over: None,
        });
    }

    fn pointer_moved(&mut self, x: u16, y: u16, area: Rect) -> Result<()> {
        let Mode::PointerDrag(mut drag) = self.mode else {
            return Ok(());
        };
        drag.rect = drag.rect.moved_to(f64::from(x) - drag.grab.0, f64::from(y) - drag.grab.1);
        let target = closest_corners(&drag.rect, &self.layout(area).droppables());
        let changed = target != drag.over;
        drag.over = target;
        self.mode = Mode::PointerDrag(drag);

        if changed {
            let outcome = self.board.apply_drag(&DragEvent::Over {
                dragged: drag.task,
                target,
            })?;
            if let DragOutcome::StatusChanged { to, .. } = outcome {
                self.select_task(drag.task);
                self.info(format!("Moved to {}", to.label()));
            }
        }
        Ok(())
    }

    fn finish_pointer_drag(&mut self) -> Result<()> {
        let Mode::PointerDrag(drag) = self.mode else {
            return Ok(());
        };
        self.mode = Mode::Browse;
        let outcome = self.board.apply_drag(&DragEvent::End {
            dragged: drag.task,
            target: drag.over,
        })?;
        if outcome.is_mutation() {
            self.info("Reordered");
        }
        self.select_task(drag.task);
        Ok(())
    }

    pub(in crate::tui) fn cancel_pointer_drag(&mut self) -> Result<()> {
        let Mode::PointerDrag(drag) = self.mode else {
            return Ok(());
        };
        self.mode = Mode::Browse;
        self.board.apply_drag(&DragEvent::End {
            dragged: drag.task,
            target: None,
        })?;
        self.select_task(drag.task);
        Ok(())
    }
}
