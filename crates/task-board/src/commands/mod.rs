use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use task_board_app::{
    DefaultsConfig, TaskBoard, TaskDraftBuilder, normalize_title, parse_due_date, parse_priority,
    parse_priority_filter, parse_status,
};
use task_board_core::{
    BoardView, DragEvent, DragOutcome, DropTarget, Patch, Routine, Task, TaskFilter, TaskId, TaskStatus,
    TaskUpdate,
};
use task_board_store::KeyValueStore;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::{Command, LsFormat};

/// Execute a non-interactive command against the board, writing results to `out`.
pub fn run<S: KeyValueStore, W: Write>(
    command: Command,
    board: &mut TaskBoard<S>,
    defaults: DefaultsConfig,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Add {
            title,
            description,
            status,
            priority,
            due,
            routine,
        } => {
            let status = status.as_deref().map(parse_status).transpose()?.unwrap_or(defaults.status.0);
            let priority = priority
                .as_deref()
                .map(parse_priority)
                .transpose()?
                .unwrap_or(defaults.priority);
            let draft = TaskDraftBuilder::new(title)
                .description(description)
                .status(status)
                .priority(priority)
                .routine(routine)
                .due(due.as_deref())?
                .build()?;
            let id = board.add_task(draft)?;
            writeln!(out, "created task: {id}")?;
        }
        Command::Edit {
            task,
            title,
            description,
            clear_description,
            status,
            priority,
            due,
            clear_due,
            routine,
            clear_routine,
        } => {
            let id = resolve_task_id(board.tasks(), &task)?;
            let update = TaskUpdate {
                title: title.as_deref().map(normalize_title).transpose()?,
                description: patch_from(description.filter(|text| !text.trim().is_empty()), clear_description),
                status: status.as_deref().map(parse_status).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                due_date: patch_from(due.as_deref().map(parse_due_date).transpose()?, clear_due),
                routine: patch_from(routine.map(Routine::new), clear_routine),
            };
            if update.is_empty() {
                bail!("nothing to change; pass at least one field to edit");
            }
            if board.update_task(id, &update)? {
                writeln!(out, "updated task: {id}")?;
            } else {
                writeln!(out, "no changes for task: {id}")?;
            }
        }
        Command::Rm { task } => {
            let id = resolve_task_id(board.tasks(), &task)?;
            board.delete_task(id)?;
            writeln!(out, "deleted task: {id}")?;
        }
        Command::Done { task } => {
            let id = resolve_task_id(board.tasks(), &task)?;
            if board.complete_task(id)? {
                writeln!(out, "completed task: {id}")?;
            } else {
                writeln!(out, "task already done: {id}")?;
            }
        }
        Command::Ls {
            query,
            priority,
            format,
        } => {
            let mut filter = board.state().filter();
            if let Some(query) = query {
                filter.query = query;
            }
            if let Some(priority) = priority {
                filter.priority = parse_priority_filter(&priority)?;
            }
            let view = board.state().view_with(&filter);
            match format {
                LsFormat::Text => render_board(out, &view, &filter)?,
                LsFormat::Json => render_board_json(out, &view)?,
            }
        }
        Command::Search { query } => {
            board.set_search_query(query.clone())?;
            if query.is_empty() {
                writeln!(out, "search cleared")?;
            } else {
                writeln!(out, "search: {query}")?;
            }
        }
        Command::Filter { priority } => {
            let filter = parse_priority_filter(&priority)?;
            board.set_filter_priority(filter)?;
            writeln!(out, "priority filter: {filter}")?;
        }
        Command::Reorder { tasks } => {
            let order = tasks
                .iter()
                .map(|raw| resolve_task_id(board.tasks(), raw))
                .collect::<Result<Vec<_>>>()?;
            board.reorder_tasks(&order)?;
            writeln!(out, "reordered {} tasks", order.len())?;
        }
        Command::Drag { task, over } => {
            let dragged = resolve_task_id(board.tasks(), &task)?;
            let target = over.as_deref().map(|raw| resolve_target(board.tasks(), raw)).transpose()?;
            let outcome = board.apply_drag(&DragEvent::Over { dragged, target })?;
            describe_outcome(out, outcome)?;
        }
        Command::Drop { task, onto } => {
            let dragged = resolve_task_id(board.tasks(), &task)?;
            let target = onto.as_deref().map(|raw| resolve_target(board.tasks(), raw)).transpose()?;
            let outcome = board.apply_drag(&DragEvent::End { dragged, target })?;
            describe_outcome(out, outcome)?;
        }
        Command::ClearDone => {
            let removed = board.clear_completed_tasks()?;
            writeln!(out, "removed {removed} completed tasks")?;
        }
        Command::Tui => bail!("the terminal board runs through `task-board tui`, not the command runner"),
    }

    Ok(())
}

fn patch_from<T>(value: Option<T>, clear: bool) -> Option<Patch<T>> {
    if clear {
        return Some(Patch::Clear);
    }
    value.map(Patch::Set)
}

/// Accept a full task id or a unique prefix of one.
fn resolve_task_id(tasks: &[Task], raw: &str) -> Result<TaskId> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<TaskId>() {
        return Ok(id);
    }

    let needle = trimmed.to_ascii_lowercase();
    if needle.is_empty() {
        bail!("Invalid task id: {raw}");
    }
    let mut matches = tasks.iter().filter(|task| {
        task.id.to_string().starts_with(&needle) || task.id.0.simple().to_string().starts_with(&needle)
    });
    let first = matches.next().ok_or_else(|| anyhow!("Invalid task id: {raw}"))?;
    if matches.next().is_some() {
        bail!("Ambiguous task id prefix: {raw}");
    }
    Ok(first.id)
}

fn resolve_target(tasks: &[Task], raw: &str) -> Result<DropTarget> {
    if let Some(status) = TaskStatus::from_column_id(raw.trim()) {
        return Ok(DropTarget::Column(status));
    }
    resolve_task_id(tasks, raw)
        .map(DropTarget::Task)
        .with_context(|| format!("Invalid drop target: {raw}"))
}

fn describe_outcome<W: Write>(out: &mut W, outcome: DragOutcome) -> Result<()> {
    match outcome {
        DragOutcome::StatusChanged { task, from, to } => {
            writeln!(out, "moved {} from {from} to {to}", task.short())?;
        }
        DragOutcome::Reordered { task, from, to } => {
            writeln!(out, "moved {} from position {from} to {to}", task.short())?;
        }
        DragOutcome::Ignored => writeln!(out, "nothing to do")?,
    }
    Ok(())
}

fn render_board<W: Write>(out: &mut W, view: &BoardView<'_>, filter: &TaskFilter) -> Result<()> {
    if !filter.is_empty() {
        writeln!(out, "filter: query={:?} priority={}", filter.query, filter.priority)?;
    }
    for (index, (status, tasks)) in view.columns().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{} ({})", status.label(), tasks.len())?;
        if tasks.is_empty() {
            writeln!(out, "  -")?;
        }
        for task in tasks {
            writeln!(out, "  {}", task_line(task))?;
        }
    }
    Ok(())
}

fn task_line(task: &Task) -> String {
    let mut line = format!("{} [{}] {}", task.id.short(), task.priority, task.title);
    if let Some(due) = task.due_date {
        line.push_str(&format!(" | due {}", format_due(due)));
    }
    if let Some(routine) = &task.routine {
        line.push_str(&format!(" | {}", routine.frequency));
    }
    if let Some(description) = task.description.as_deref().and_then(|text| text.lines().next()) {
        line.push_str(&format!(" - {description}"));
    }
    line
}

/// Short due date such as `Mar 4`.
pub fn format_due(due: OffsetDateTime) -> String {
    due.format(format_description!("[month repr:short] [day padding:none]"))
        .unwrap_or_else(|_| due.date().to_string())
}

fn render_board_json<W: Write>(out: &mut W, view: &BoardView<'_>) -> Result<()> {
    let mut columns = serde_json::Map::new();
    for (status, tasks) in view.columns() {
        columns.insert(status.as_str().to_owned(), serde_json::to_value(tasks)?);
    }
    serde_json::to_writer_pretty(&mut *out, &columns)?;
    writeln!(out)?;
    Ok(())
}
