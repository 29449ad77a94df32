use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use task_board_core::{DropTarget, Task};
use task_board_store::KeyValueStore;

use crate::commands::format_due;

use super::super::constants::{DRAG_MARKER, EMPTY_COLUMN_TEXT};
use super::super::layout::ColumnLayout;
use super::super::view::{Mode, PointerDrag, Ui};
use super::util::{priority_badge, priority_style, truncate_with_ellipsis};

impl<S: KeyValueStore> Ui<S> {
    pub(in crate::tui) fn draw_column(&self, f: &mut Frame<'_>, column: &ColumnLayout) {
        let view = self.board.view();
        let count = view.count(column.status);
        let focused = column.status == self.focus;
        let hovered = matches!(
            self.mode,
            Mode::PointerDrag(PointerDrag { over: Some(DropTarget::Column(status)), .. }) if status == column.status
        );

        let border_style = if hovered {
            Style::default().fg(Color::Magenta)
        } else if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::default()
            .title(format!(" {} ({count}) ", column.status.label()))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(column.area);
        f.render_widget(block, column.area);

        if count == 0 {
            let empty = Paragraph::new(EMPTY_COLUMN_TEXT)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(empty, inner);
            return;
        }

        let selected = self.selected[column.status.index()];
        for (index, slot) in (column.offset..).zip(&column.cards) {
            if let Some(task) = self.board.task(slot.task) {
                self.draw_card(f, slot.area, task, focused && index == selected);
            }
        }
    }

    /// Floating copy of the card under the mouse while it is dragged.
    pub(in crate::tui) fn draw_drag_ghost(&self, f: &mut Frame<'_>) {
        let Mode::PointerDrag(drag) = self.mode else {
            return;
        };
        let Some(task) = self.board.task(drag.task) else {
            return;
        };
        let area = ghost_area(&drag, f.area());
        if area.width == 0 || area.height == 0 {
            return;
        }
        f.render_widget(Clear, area);
        self.draw_card(f, area, task, false);
    }

    fn draw_card(&self, f: &mut Frame<'_>, area: Rect, task: &Task, selected: bool) {
        let dragged = self.dragged_task() == Some(task.id);
        let border_style = if dragged {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default().borders(Borders::ALL).border_style(border_style);
        let width = usize::from(area.width.saturating_sub(2));

        let marker = if dragged { DRAG_MARKER } else { "" };
        let badge = priority_badge(task.priority);
        let title_width = width.saturating_sub(marker.chars().count() + badge.len() + 1);
        let mut title_style = Style::default().add_modifier(Modifier::BOLD);
        if selected {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }
        let title = Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Magenta)),
            Span::styled(badge, priority_style(task.priority)),
            Span::raw(" "),
            Span::styled(truncate_with_ellipsis(&task.title, title_width), title_style),
        ]);

        let description = task
            .description
            .as_deref()
            .and_then(|text| text.lines().next())
            .map_or_else(Line::default, |first| {
                Line::styled(
                    truncate_with_ellipsis(first, width).into_owned(),
                    Style::default().fg(Color::Gray),
                )
            });

        let mut meta = Vec::new();
        if let Some(due) = task.due_date {
            meta.push(format!("due {}", format_due(due)));
        }
        if let Some(routine) = &task.routine {
            meta.push(format!("↻ {}", routine.frequency));
        }
        let meta = Line::styled(
            truncate_with_ellipsis(&meta.join("  "), width).into_owned(),
            Style::default().fg(Color::Cyan),
        );

        let card = Paragraph::new(vec![title, description, meta]).block(block);
        f.render_widget(card, area);
    }
}

/// Card-sized rectangle under the pointer, kept inside the frame.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ghost_area(drag: &PointerDrag, frame: Rect) -> Rect {
    let width = (drag.rect.width as u16).min(frame.width);
    let height = (drag.rect.height as u16).min(frame.height);
    let max_x = f64::from(frame.right().saturating_sub(width));
    let max_y = f64::from(frame.bottom().saturating_sub(height));
    let x = drag.rect.x.clamp(f64::from(frame.x), max_x) as u16;
    let y = drag.rect.y.clamp(f64::from(frame.y), max_y) as u16;
    Rect::new(x, y, width, height)
}
