//! Screen geometry shared by drawing and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use task_board_core::collision::{self, Droppable};
use task_board_core::{BoardView, DropTarget, TaskId, TaskStatus};

use super::constants::{CARD_HEIGHT, FILTER_BAR_HEIGHT, FOOTER_HEIGHT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct CardSlot {
    pub(super) task: TaskId,
    pub(super) area: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ColumnLayout {
    pub(super) status: TaskStatus,
    pub(super) area: Rect,
    /// Index of the first card drawn.
    pub(super) offset: usize,
    pub(super) cards: Vec<CardSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct BoardLayout {
    pub(super) filter_bar: Rect,
    pub(super) columns: Vec<ColumnLayout>,
    pub(super) help: Rect,
    pub(super) status: Rect,
}

impl BoardLayout {
    /// Place the bars, the three columns and the cards that fit.
    ///
    /// Each column scrolls just far enough to keep `selected[column]` on screen.
    pub(super) fn compute(area: Rect, view: &BoardView<'_>, selected: [usize; 3]) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FILTER_BAR_HEIGHT),
                Constraint::Min(CARD_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        let column_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(rows[1]);

        let columns = view
            .columns()
            .zip(column_areas.iter())
            .map(|((status, tasks), &column_area)| {
                let inner = inner_area(column_area);
                let capacity = usize::from((inner.height / CARD_HEIGHT).max(1));
                let offset = selected[status.index()].saturating_sub(capacity - 1);
                let cards = tasks
                    .iter()
                    .skip(offset)
                    .take(capacity)
                    .zip(0u16..)
                    .filter_map(|(task, slot)| {
                        let y = inner.y + slot * CARD_HEIGHT;
                        let height = CARD_HEIGHT.min(inner.bottom().saturating_sub(y));
                        (height > 0).then(|| CardSlot {
                            task: task.id,
                            area: Rect::new(inner.x, y, inner.width, height),
                        })
                    })
                    .collect();
                ColumnLayout {
                    status,
                    area: column_area,
                    offset,
                    cards,
                }
            })
            .collect();

        Self {
            filter_bar: rows[0],
            columns,
            help: rows[2],
            status: rows[3],
        }
    }

    /// Card under a terminal cell, tested at the cell's centre.
    pub(super) fn card_at(&self, x: u16, y: u16) -> Option<CardSlot> {
        let (cx, cy) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
        self.columns
            .iter()
            .flat_map(|column| column.cards.iter())
            .find(|slot| to_collision_rect(slot.area).contains(cx, cy))
            .copied()
    }

    /// Every drop zone: the columns first, then each visible card.
    pub(super) fn droppables(&self) -> Vec<Droppable> {
        let columns = self.columns.iter().map(|column| Droppable {
            target: DropTarget::Column(column.status),
            rect: to_collision_rect(column.area),
        });
        let cards = self
            .columns
            .iter()
            .flat_map(|column| column.cards.iter())
            .map(|slot| Droppable {
                target: DropTarget::Task(slot.task),
                rect: to_collision_rect(slot.area),
            });
        columns.chain(cards).collect()
    }
}

pub(super) fn to_collision_rect(area: Rect) -> collision::Rect {
    collision::Rect::new(
        f64::from(area.x),
        f64::from(area.y),
        f64::from(area.width),
        f64::from(area.height),
    )
}

const fn inner_area(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}
