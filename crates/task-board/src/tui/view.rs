use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
};
use task_board_app::{DefaultsConfig, TaskBoard};
use task_board_core::{DropTarget, Task, TaskId, TaskStatus, collision};
use task_board_store::KeyValueStore;

use super::constants::UI_MESSAGE_TTL_SECS;
use super::layout::BoardLayout;

/// Card picked up with the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct KeyboardDrag {
    pub(super) task: TaskId,
}

/// Card held by the mouse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PointerDrag {
    pub(super) task: TaskId,
    /// Pointer position relative to the card's top-left corner.
    pub(super) grab: (f64, f64),
    /// Where the card would be drawn under the pointer.
    pub(super) rect: collision::Rect,
    /// Last reported hover target.
    pub(super) over: Option<DropTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Mode {
    Browse,
    /// Typing into the search bar.
    Search,
    KeyboardDrag(KeyboardDrag),
    PointerDrag(PointerDrag),
}

pub(super) struct Ui<S> {
    pub(super) board: TaskBoard<S>,
    pub(super) defaults: DefaultsConfig,
    /// Column with keyboard focus.
    pub(super) focus: TaskStatus,
    /// Selected card index per column.
    pub(super) selected: [usize; 3],
    pub(super) mode: Mode,
    pub(super) message: Option<Message>,
    pub(super) should_quit: bool,
}

impl<S: KeyValueStore> Ui<S> {
    pub(super) const fn new(board: TaskBoard<S>, defaults: DefaultsConfig) -> Self {
        Self {
            board,
            defaults,
            focus: TaskStatus::Todo,
            selected: [0; 3],
            mode: Mode::Browse,
            message: None,
            should_quit: false,
        }
    }

    pub(super) fn layout(&self, area: Rect) -> BoardLayout {
        BoardLayout::compute(area, &self.board.view(), self.selected)
    }

    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        let layout = self.layout(f.area());
        self.draw_filter_bar(f, layout.filter_bar);
        for column in &layout.columns {
            self.draw_column(f, column);
        }
        self.draw_drag_ghost(f);
        self.draw_help(f, layout.help);
        self.draw_status(f, layout.status);
    }

    pub(super) fn selected_task(&self) -> Option<&Task> {
        let view = self.board.view();
        let id = view
            .column(self.focus)
            .get(self.selected[self.focus.index()])
            .map(|task| task.id)?;
        self.board.task(id)
    }

    pub(super) fn selected_task_id(&self) -> Option<TaskId> {
        self.selected_task().map(|task| task.id)
    }

    /// Task currently held by either drag mode.
    pub(super) const fn dragged_task(&self) -> Option<TaskId> {
        match self.mode {
            Mode::KeyboardDrag(KeyboardDrag { task }) | Mode::PointerDrag(PointerDrag { task, .. }) => {
                Some(task)
            }
            Mode::Browse | Mode::Search => None,
        }
    }

    /// Move focus and selection onto `task` when it is visible.
    pub(super) fn select_task(&mut self, task: TaskId) {
        if let Some((status, index)) = self.board.view().locate(task) {
            self.focus = status;
            self.selected[status.index()] = index;
        }
        self.clamp_selection();
    }

    /// Keep every column's selection inside its visible cards.
    pub(super) fn clamp_selection(&mut self) {
        let view = self.board.view();
        for status in TaskStatus::ALL {
            let count = view.count(status);
            let slot = &mut self.selected[status.index()];
            *slot = (*slot).min(count.saturating_sub(1));
        }
    }

    pub(super) fn focus_column(&mut self, delta: isize) {
        let next = self.focus.index().saturating_add_signed(delta);
        if let Some(status) = TaskStatus::from_index(next) {
            self.focus = status;
        }
        self.clamp_selection();
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        let count = self.board.view().count(self.focus);
        if count == 0 {
            return;
        }
        let slot = &mut self.selected[self.focus.index()];
        *slot = slot.saturating_add_signed(delta).min(count - 1);
    }

    pub(super) fn info(&mut self, message: impl Into<String>) {
        self.message = Some(Message::info(message));
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        self.message = Some(Message::error(message));
    }

    pub(super) fn tick(&mut self) {
        if let Some(msg) = &self.message
            && msg.is_expired(Duration::from_secs(UI_MESSAGE_TTL_SECS))
        {
            self.message = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UiAction {
    CreateTask { status: TaskStatus },
    EditTask { task: TaskId },
}

pub(super) struct Message {
    pub(super) text: String,
    pub(super) level: MessageLevel,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MessageLevel {
    Info,
    Error,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Info,
            created_at: Instant::now(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Error,
            created_at: Instant::now(),
        }
    }

    pub(super) fn style(&self) -> Style {
        match self.level {
            MessageLevel::Info => Style::default().fg(Color::Green),
            MessageLevel::Error => Style::default().fg(Color::Red),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}
