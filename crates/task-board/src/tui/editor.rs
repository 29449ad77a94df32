//! Plain-text task form edited in `$EDITOR`.

use task_board_app::{TaskDraftBuilder, parse_due_date, parse_priority, parse_status};
use task_board_core::{Patch, Priority, Routine, Task, TaskDraft, TaskStatus, TaskUpdate};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, Time};

/// Fields read back from the editor. Blank optional fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct TaskForm {
    pub(super) title: String,
    pub(super) status: TaskStatus,
    pub(super) priority: Priority,
    pub(super) due_date: Option<OffsetDateTime>,
    pub(super) routine: Option<String>,
    pub(super) description: Option<String>,
}

impl TaskForm {
    pub(super) fn into_draft(self) -> TaskDraft {
        let mut draft = TaskDraft::new(self.title)
            .with_status(self.status)
            .with_priority(self.priority);
        draft.due_date = self.due_date;
        draft.description = self.description;
        draft.routine = self.routine.map(Routine::new);
        draft
    }

    /// Update that makes the task match the form exactly.
    pub(super) fn into_update(self) -> TaskUpdate {
        TaskUpdate {
            title: Some(self.title),
            description: Some(patch(self.description)),
            status: Some(self.status),
            priority: Some(self.priority),
            due_date: Some(patch(self.due_date)),
            routine: Some(patch(self.routine.map(Routine::new))),
        }
    }
}

fn patch<T>(value: Option<T>) -> Patch<T> {
    value.map_or(Patch::Clear, Patch::Set)
}

pub(super) fn new_task_editor_template(status: TaskStatus, priority: Priority) -> String {
    let lines = [
        "# New task. The title is required.".to_string(),
        "# Saving an empty form cancels.".to_string(),
        "title: ".to_string(),
        format!("# status: {}", status_hint()),
        format!("status: {status}"),
        format!("# priority: {}", priority_hint()),
        format!("priority: {priority}"),
        "# due: YYYY-MM-DD or RFC 3339, blank for none".to_string(),
        "due: ".to_string(),
        "# routine: free-form label such as daily or weekly".to_string(),
        "routine: ".to_string(),
        "# Description goes below the --- line and is kept as written.".to_string(),
        "---".to_string(),
        String::new(),
    ];
    lines.join("\n")
}

pub(super) fn edit_task_editor_template(task: &Task) -> String {
    let due = task.due_date.map(format_due_field).unwrap_or_default();
    let routine = task
        .routine
        .as_ref()
        .map(|routine| routine.frequency.as_str())
        .unwrap_or_default();

    let mut lines = vec![
        format!("# Editing {}. Blank fields are cleared.", task.id.short()),
        format!("title: {}", task.title),
        format!("# status: {}", status_hint()),
        format!("status: {}", task.status),
        format!("# priority: {}", priority_hint()),
        format!("priority: {}", task.priority),
        format!("due: {due}"),
        format!("routine: {routine}"),
        "# Description goes below the --- line. Leave it empty to remove it.".to_string(),
        "---".to_string(),
    ];
    match task.description.as_deref() {
        Some(description) => lines.extend(description.lines().map(str::to_owned)),
        None => lines.push(String::new()),
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Parse the saved form.
///
/// `Ok(None)` means every field was left blank; errors are user-facing messages.
pub(super) fn parse_task_editor_output(raw: &str) -> Result<Option<TaskForm>, String> {
    let mut title = "";
    let mut status = "";
    let mut priority = "";
    let mut due = "";
    let mut routine = "";
    let mut description_lines = Vec::new();
    let mut in_description = false;

    for line in raw.lines() {
        if in_description {
            description_lines.push(line);
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed == "---" {
            in_description = true;
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            return Err(format!("malformed line: {trimmed}"));
        };
        let value = value.trim();
        match key.trim() {
            "title" => title = value,
            "status" => status = value,
            "priority" => priority = value,
            "due" => due = value,
            "routine" => routine = value,
            unknown => return Err(format!("unknown field: {unknown}")),
        }
    }

    // Everything after the separator is kept verbatim apart from surrounding blank lines.
    let description = description_lines
        .into_iter()
        .skip_while(|line| line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let description = description.trim_end();
    if [title, status, priority, due, routine, description.trim()]
        .iter()
        .all(|value| value.is_empty())
    {
        return Ok(None);
    }

    let status = if status.is_empty() {
        TaskStatus::Todo
    } else {
        parse_status(status).map_err(|err| err.to_string())?
    };
    let priority = if priority.is_empty() {
        Priority::default()
    } else {
        parse_priority(priority).map_err(|err| err.to_string())?
    };
    let due_date = if due.is_empty() {
        None
    } else {
        Some(parse_due_date(due).map_err(|err| err.to_string())?)
    };

    // Title trimming and blank-to-None follow the draft rules.
    let draft = TaskDraftBuilder::new(title)
        .description(Some(description.to_owned()))
        .routine(Some(routine.to_owned()))
        .build()
        .map_err(|err| err.to_string())?;

    Ok(Some(TaskForm {
        title: draft.title,
        status,
        priority,
        due_date,
        routine: draft.routine.map(|routine| routine.frequency),
        description: draft.description,
    }))
}

/// Date-only dues stay short so they read back unchanged.
fn format_due_field(due: OffsetDateTime) -> String {
    let formatted = if due.time() == Time::MIDNIGHT {
        due.format(format_description!("[year]-[month]-[day]"))
    } else {
        due.format(&Rfc3339)
    };
    formatted.unwrap_or_else(|_| due.date().to_string())
}

fn status_hint() -> String {
    TaskStatus::ALL
        .iter()
        .map(|status| status.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn priority_hint() -> String {
    Priority::ALL
        .iter()
        .map(|priority| priority.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
