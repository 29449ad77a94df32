use super::editor::*;
use super::layout::{BoardLayout, CardSlot};
use super::view::{Mode, Ui, UiAction};
use super::widgets::truncate_with_ellipsis;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::fmt::Display;
use std::result::Result as StdResult;
use task_board_app::{DefaultsConfig, TaskBoard, TaskDraftBuilder};
use task_board_core::{Priority, PriorityFilter, TaskId, TaskStatus};
use task_board_store::{KeyValueStore, MemoryStore};
use time::macros::datetime;

const KEY: &str = "task-storage";
const AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 120,
    height: 40,
};

fn expect_ok<T, E: Display>(result: StdResult<T, E>, ctx: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{ctx}: {err}"),
    }
}

fn expect_some<T>(value: Option<T>, ctx: &str) -> T {
    value.map_or_else(|| panic!("{ctx}"), |inner| inner)
}

fn ui_with(tasks: &[(&str, TaskStatus)]) -> (Ui<MemoryStore>, Vec<TaskId>) {
    let mut board = expect_ok(TaskBoard::open(MemoryStore::new(), KEY), "open board");
    let ids = tasks
        .iter()
        .map(|(title, status)| {
            let draft = expect_ok(TaskDraftBuilder::new(*title).status(*status).build(), "draft");
            expect_ok(board.add_task(draft), "add task")
        })
        .collect();
    (Ui::new(board, DefaultsConfig::default()), ids)
}

fn press(ui: &mut Ui<MemoryStore>, code: KeyCode) -> Option<UiAction> {
    expect_ok(ui.handle_key(KeyEvent::new(code, KeyModifiers::NONE)), "handle key")
}

fn mouse(ui: &mut Ui<MemoryStore>, kind: MouseEventKind, column: u16, row: u16) {
    let event = MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    };
    expect_ok(ui.handle_mouse(event, AREA), "handle mouse");
}

fn titles(ui: &Ui<MemoryStore>, status: TaskStatus) -> Vec<String> {
    ui.board
        .view()
        .column(status)
        .iter()
        .map(|task| task.title.clone())
        .collect()
}

fn slot_of(layout: &BoardLayout, task: TaskId) -> CardSlot {
    expect_some(
        layout
            .columns
            .iter()
            .flat_map(|column| column.cards.iter())
            .find(|slot| slot.task == task)
            .copied(),
        "card should be laid out",
    )
}

fn status_of(ui: &Ui<MemoryStore>, task: TaskId) -> TaskStatus {
    expect_some(ui.board.task(task).map(|task| task.status), "task exists")
}

#[test]
fn column_navigation_clamps_selection() {
    let (mut ui, ids) = ui_with(&[
        ("a", TaskStatus::Todo),
        ("b", TaskStatus::Todo),
        ("c", TaskStatus::InProgress),
    ]);

    press(&mut ui, KeyCode::Char('j'));
    press(&mut ui, KeyCode::Char('j'));
    assert_eq!(ui.selected_task_id(), Some(ids[1]));

    press(&mut ui, KeyCode::Char('l'));
    assert_eq!(ui.focus, TaskStatus::InProgress);
    assert_eq!(ui.selected_task_id(), Some(ids[2]));

    press(&mut ui, KeyCode::Char('l'));
    press(&mut ui, KeyCode::Char('l'));
    assert_eq!(ui.focus, TaskStatus::Done);
    assert_eq!(ui.selected_task_id(), None);

    press(&mut ui, KeyCode::Left);
    press(&mut ui, KeyCode::Left);
    press(&mut ui, KeyCode::Left);
    assert_eq!(ui.focus, TaskStatus::Todo);
}

#[test]
fn create_and_edit_keys_emit_actions() {
    let (mut ui, ids) = ui_with(&[("a", TaskStatus::InProgress)]);

    assert_eq!(
        press(&mut ui, KeyCode::Char('n')),
        Some(UiAction::CreateTask {
            status: TaskStatus::Todo
        })
    );
    assert_eq!(press(&mut ui, KeyCode::Char('e')), None);
    assert!(ui.message.is_some());

    press(&mut ui, KeyCode::Char('l'));
    assert_eq!(
        press(&mut ui, KeyCode::Enter),
        Some(UiAction::EditTask { task: ids[0] })
    );
}

#[test]
fn complete_delete_and_clear_keys_update_the_board() {
    let (mut ui, ids) = ui_with(&[
        ("a", TaskStatus::Todo),
        ("b", TaskStatus::Todo),
        ("c", TaskStatus::Todo),
    ]);

    press(&mut ui, KeyCode::Char(' '));
    assert_eq!(status_of(&ui, ids[0]), TaskStatus::Done);

    press(&mut ui, KeyCode::Char('d'));
    assert!(ui.board.task(ids[1]).is_none());
    assert_eq!(titles(&ui, TaskStatus::Todo), vec!["c"]);

    press(&mut ui, KeyCode::Char('x'));
    assert_eq!(ui.board.tasks().len(), 1);

    let raw = expect_some(
        expect_ok(ui.board.store().get(KEY), "read store"),
        "board should be saved",
    );
    assert!(!raw.contains(&ids[0].to_string()));
}

#[test]
fn search_mode_edits_the_saved_query() {
    let (mut ui, _) = ui_with(&[("buy milk", TaskStatus::Todo), ("write report", TaskStatus::Todo)]);

    press(&mut ui, KeyCode::Char('/'));
    assert_eq!(ui.mode, Mode::Search);
    for c in "mil".chars() {
        press(&mut ui, KeyCode::Char(c));
    }
    assert_eq!(ui.board.state().search_query(), "mil");
    assert_eq!(titles(&ui, TaskStatus::Todo), vec!["buy milk"]);

    press(&mut ui, KeyCode::Backspace);
    assert_eq!(ui.board.state().search_query(), "mi");

    press(&mut ui, KeyCode::Esc);
    assert_eq!(ui.mode, Mode::Browse);
    assert!(!ui.should_quit);

    // Typing `q` while searching is text, not quit.
    press(&mut ui, KeyCode::Char('/'));
    press(&mut ui, KeyCode::Char('q'));
    assert!(!ui.should_quit);
    assert_eq!(ui.board.state().search_query(), "miq");
}

#[test]
fn priority_key_cycles_the_filter() {
    let (mut ui, _) = ui_with(&[("a", TaskStatus::Todo)]);

    press(&mut ui, KeyCode::Char('p'));
    assert_eq!(
        ui.board.state().filter_priority(),
        PriorityFilter::Only(Priority::Low)
    );
    assert!(titles(&ui, TaskStatus::Todo).is_empty());

    press(&mut ui, KeyCode::Char('p'));
    assert_eq!(
        ui.board.state().filter_priority(),
        PriorityFilter::Only(Priority::Medium)
    );
    assert_eq!(titles(&ui, TaskStatus::Todo), vec!["a"]);
}

#[test]
fn keyboard_move_changes_column_then_drops() {
    let (mut ui, ids) = ui_with(&[("a", TaskStatus::Todo), ("b", TaskStatus::Todo)]);

    press(&mut ui, KeyCode::Char('m'));
    assert!(matches!(ui.mode, Mode::KeyboardDrag(_)));

    press(&mut ui, KeyCode::Char('l'));
    assert_eq!(status_of(&ui, ids[0]), TaskStatus::InProgress);
    assert_eq!(ui.focus, TaskStatus::InProgress);

    press(&mut ui, KeyCode::Enter);
    assert_eq!(ui.mode, Mode::Browse);
    assert_eq!(titles(&ui, TaskStatus::Todo), vec!["b"]);
    assert_eq!(titles(&ui, TaskStatus::InProgress), vec!["a"]);
}

#[test]
fn keyboard_move_reorders_within_a_column() {
    let (mut ui, ids) = ui_with(&[
        ("a", TaskStatus::Todo),
        ("b", TaskStatus::Todo),
        ("c", TaskStatus::Todo),
    ]);

    press(&mut ui, KeyCode::Char('m'));
    press(&mut ui, KeyCode::Char('j'));
    press(&mut ui, KeyCode::Char('j'));
    assert_eq!(titles(&ui, TaskStatus::Todo), vec!["b", "c", "a"]);
    assert_eq!(ui.selected_task_id(), Some(ids[0]));

    // Already last: nothing below to drop onto.
    press(&mut ui, KeyCode::Char('j'));
    assert_eq!(titles(&ui, TaskStatus::Todo), vec!["b", "c", "a"]);

    press(&mut ui, KeyCode::Char('k'));
    assert_eq!(titles(&ui, TaskStatus::Todo), vec!["b", "a", "c"]);
    press(&mut ui, KeyCode::Esc);
    assert_eq!(ui.mode, Mode::Browse);
}

#[test]
fn mouse_drag_into_empty_column_changes_status() {
    let (mut ui, ids) = ui_with(&[("a", TaskStatus::Todo), ("b", TaskStatus::Todo)]);
    let layout = ui.layout(AREA);
    let card = slot_of(&layout, ids[0]);
    let done = layout.columns[TaskStatus::Done.index()].area;

    mouse(
        &mut ui,
        MouseEventKind::Down(MouseButton::Left),
        card.area.x + 2,
        card.area.y + 1,
    );
    assert!(matches!(ui.mode, Mode::PointerDrag(_)));

    mouse(
        &mut ui,
        MouseEventKind::Drag(MouseButton::Left),
        done.x + 3,
        done.y + 2,
    );
    assert_eq!(status_of(&ui, ids[0]), TaskStatus::Done);

    mouse(
        &mut ui,
        MouseEventKind::Up(MouseButton::Left),
        done.x + 3,
        done.y + 2,
    );
    assert_eq!(ui.mode, Mode::Browse);
    assert_eq!(titles(&ui, TaskStatus::Done), vec!["a"]);
    assert_eq!(ui.focus, TaskStatus::Done);
}

#[test]
fn mouse_drop_onto_card_reorders() {
    let (mut ui, ids) = ui_with(&[
        ("a", TaskStatus::Todo),
        ("b", TaskStatus::Todo),
        ("c", TaskStatus::Todo),
    ]);
    let layout = ui.layout(AREA);
    let first = slot_of(&layout, ids[0]);
    let last = slot_of(&layout, ids[2]);

    mouse(
        &mut ui,
        MouseEventKind::Down(MouseButton::Left),
        first.area.x + 2,
        first.area.y + 1,
    );
    mouse(
        &mut ui,
        MouseEventKind::Drag(MouseButton::Left),
        last.area.x + 2,
        last.area.y + 1,
    );
    // Hovering a card never changes anything.
    assert_eq!(titles(&ui, TaskStatus::Todo), vec!["a", "b", "c"]);

    mouse(
        &mut ui,
        MouseEventKind::Up(MouseButton::Left),
        last.area.x + 2,
        last.area.y + 1,
    );
    assert_eq!(titles(&ui, TaskStatus::Todo), vec!["b", "c", "a"]);
}

#[test]
fn click_outside_cards_does_not_start_a_drag() {
    let (mut ui, _) = ui_with(&[("a", TaskStatus::Todo)]);
    let layout = ui.layout(AREA);

    mouse(
        &mut ui,
        MouseEventKind::Down(MouseButton::Left),
        layout.filter_bar.x + 1,
        layout.filter_bar.y + 1,
    );
    assert_eq!(ui.mode, Mode::Browse);

    // Releasing without a drag is a no-op.
    mouse(&mut ui, MouseEventKind::Up(MouseButton::Left), 0, 0);
    assert_eq!(titles(&ui, TaskStatus::Todo), vec!["a"]);
}

#[test]
fn escape_cancels_a_pointer_drag() {
    let (mut ui, ids) = ui_with(&[("a", TaskStatus::Todo)]);
    let card = slot_of(&ui.layout(AREA), ids[0]);

    mouse(
        &mut ui,
        MouseEventKind::Down(MouseButton::Left),
        card.area.x + 1,
        card.area.y + 1,
    );
    press(&mut ui, KeyCode::Esc);
    assert_eq!(ui.mode, Mode::Browse);
    assert!(!ui.should_quit);
}

#[test]
fn layout_scrolls_to_keep_selection_visible() {
    let tasks: Vec<(String, TaskStatus)> = (0..12)
        .map(|index| (format!("task {index}"), TaskStatus::Todo))
        .collect();
    let borrowed: Vec<(&str, TaskStatus)> = tasks
        .iter()
        .map(|(title, status)| (title.as_str(), *status))
        .collect();
    let (mut ui, ids) = ui_with(&borrowed);

    let layout = ui.layout(AREA);
    let todo = &layout.columns[TaskStatus::Todo.index()];
    assert_eq!(todo.offset, 0);
    let capacity = todo.cards.len();
    assert!(capacity > 0 && capacity < 12);
    assert_eq!(todo.cards[0].task, ids[0]);

    ui.selected[TaskStatus::Todo.index()] = 11;
    let layout = ui.layout(AREA);
    let todo = &layout.columns[TaskStatus::Todo.index()];
    assert_eq!(todo.offset, 12 - capacity);
    assert_eq!(todo.cards.last().map(|slot| slot.task), Some(ids[11]));
    assert!(layout.card_at(todo.cards[0].area.x, todo.cards[0].area.y).is_some());

    // Adjacent cards share an edge; each cell resolves to exactly one of them.
    let first = todo.cards[0].area;
    let second = todo.cards[1].area;
    let hit = |x, y| layout.card_at(x, y).map(|slot| slot.task);
    assert_eq!(hit(first.x, first.bottom() - 1), Some(todo.cards[0].task));
    assert_eq!(hit(second.x, second.y), Some(todo.cards[1].task));
    assert_eq!(hit(first.right() - 1, first.y), Some(todo.cards[0].task));
    assert_eq!(hit(first.right(), first.y), None);

    // Three columns plus every visible card are drop zones.
    assert_eq!(layout.droppables().len(), 3 + capacity);
}

#[test]
fn board_renders_columns_and_cards() {
    let (mut ui, ids) = ui_with(&[("Write spec", TaskStatus::Todo), ("Ship", TaskStatus::Done)]);
    let update = task_board_core::TaskUpdate {
        due_date: Some(task_board_core::Patch::Set(datetime!(2025-03-04 00:00 UTC))),
        ..task_board_core::TaskUpdate::default()
    };
    expect_ok(ui.board.update_task(ids[0], &update), "set due date");

    let mut terminal = expect_ok(Terminal::new(TestBackend::new(AREA.width, AREA.height)), "terminal");
    expect_ok(terminal.draw(|f| ui.draw(f)), "draw");
    let screen: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect();

    assert!(screen.contains("To Do (1)"));
    assert!(screen.contains("In Progress (0)"));
    assert!(screen.contains("Done (1)"));
    assert!(screen.contains("Write spec"));
    assert!(screen.contains("due Mar 4"));
    assert!(screen.contains("No tasks"));
}

#[test]
fn new_task_template_round_trips_defaults() {
    let template = new_task_editor_template(TaskStatus::InProgress, Priority::High);
    let filled = template.replacen("title: ", "title: Plan sprint", 1);
    let form = expect_some(
        expect_ok(parse_task_editor_output(&filled), "parse form"),
        "form should not be empty",
    );
    assert_eq!(form.title, "Plan sprint");
    assert_eq!(form.status, TaskStatus::InProgress);
    assert_eq!(form.priority, Priority::High);
    assert!(form.due_date.is_none());
    assert!(form.description.is_none());
}

#[test]
fn edit_template_keeps_existing_fields() {
    let (mut ui, ids) = ui_with(&[("Review", TaskStatus::Todo)]);
    let update = task_board_core::TaskUpdate {
        description: Some(task_board_core::Patch::Set("line one\nline two".into())),
        due_date: Some(task_board_core::Patch::Set(datetime!(2025-03-04 00:00 UTC))),
        routine: Some(task_board_core::Patch::Set(task_board_core::Routine::new("weekly"))),
        ..task_board_core::TaskUpdate::default()
    };
    expect_ok(ui.board.update_task(ids[0], &update), "update");
    let task = expect_some(ui.board.task(ids[0]), "task");

    let template = edit_task_editor_template(task);
    assert!(template.contains("due: 2025-03-04"));
    let form = expect_some(
        expect_ok(parse_task_editor_output(&template), "parse"),
        "form",
    );
    assert_eq!(form.description.as_deref(), Some("line one\nline two"));
    assert_eq!(form.routine.as_deref(), Some("weekly"));

    // Saving the untouched form changes nothing.
    let changed = expect_ok(ui.board.update_task(ids[0], &form.into_update()), "apply form");
    assert!(!changed);
}

#[test]
fn edit_form_keeps_hash_lines_in_description() {
    let (mut ui, ids) = ui_with(&[("Triage", TaskStatus::Todo)]);
    let description = "#42 regression\n\n  # indented note\nsee ticket";
    let update = task_board_core::TaskUpdate {
        description: Some(task_board_core::Patch::Set(description.into())),
        ..task_board_core::TaskUpdate::default()
    };
    expect_ok(ui.board.update_task(ids[0], &update), "update");
    let task = expect_some(ui.board.task(ids[0]), "task");

    let template = edit_task_editor_template(task);
    let form = expect_some(
        expect_ok(parse_task_editor_output(&template), "parse"),
        "form",
    );
    assert_eq!(form.description.as_deref(), Some(description));

    let changed = expect_ok(ui.board.update_task(ids[0], &form.into_update()), "apply form");
    assert!(!changed);

    let fresh = new_task_editor_template(TaskStatus::Todo, Priority::Low)
        .replacen("title: ", "title: Notes", 1)
        + "# heading\nbody\n";
    let form = expect_some(
        expect_ok(parse_task_editor_output(&fresh), "parse new form"),
        "new form",
    );
    assert_eq!(form.description.as_deref(), Some("# heading\nbody"));
}

#[test]
fn editor_output_validation() {
    assert_eq!(parse_task_editor_output("# only comments\n\n"), Ok(None));
    assert!(parse_task_editor_output("title: x\nowner: me\n").is_err());
    assert!(parse_task_editor_output("title: x\nstatus: backlog\n").is_err());
    assert!(parse_task_editor_output("title: x\ndue: next week\n").is_err());
    assert!(parse_task_editor_output("title:   \npriority: high\n").is_err());
    assert!(parse_task_editor_output("just text\n").is_err());

    let form = expect_some(
        expect_ok(parse_task_editor_output("title: x\ndue: 2025-01-02\n"), "parse"),
        "form",
    );
    assert_eq!(form.due_date, Some(datetime!(2025-01-02 00:00 UTC)));
    assert_eq!(form.status, TaskStatus::Todo);
}

#[test]
fn apply_new_task_input_selects_the_created_card() {
    let (mut ui, _) = ui_with(&[("a", TaskStatus::Done)]);
    expect_ok(
        ui.apply_new_task_input("title: b\nstatus: done\n"),
        "apply input",
    );
    assert_eq!(titles(&ui, TaskStatus::Done), vec!["a", "b"]);
    assert_eq!(ui.focus, TaskStatus::Done);
    assert_eq!(ui.selected[TaskStatus::Done.index()], 1);

    expect_ok(ui.apply_new_task_input("title: \n"), "blank title");
    assert_eq!(ui.board.tasks().len(), 2);
}

#[test]
fn truncate_respects_grapheme_boundaries() {
    assert_eq!(truncate_with_ellipsis("short", 10), "short");
    assert_eq!(truncate_with_ellipsis("abcdefghij", 6), "abc...");
    assert_eq!(truncate_with_ellipsis("日本語のタスク", 5), "日本...");
    assert_eq!(truncate_with_ellipsis("abc", 0), "");
}
