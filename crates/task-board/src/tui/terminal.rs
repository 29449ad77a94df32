//! Terminal mode switching and the external editor.

use std::env;
use std::fs;
use std::io::{Stdout, Write};
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow, bail};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tempfile::NamedTempFile;
use tracing::debug;

pub(super) type Tty = Terminal<CrosstermBackend<Stdout>>;

/// Variables consulted for the editor, most specific first.
const EDITOR_VARS: [&str; 3] = ["TASK_BOARD_EDITOR", "VISUAL", "EDITOR"];
const FALLBACK_EDITOR: &str = "vi";

/// Raw mode, the alternate screen and mouse capture, switched together.
pub(super) fn enter_board_mode(terminal: &mut Tty) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(terminal.backend_mut(), EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    terminal.clear()?;
    terminal.hide_cursor()?;
    Ok(())
}

/// Undo [`enter_board_mode`], leaving the shell as it was.
pub(super) fn leave_board_mode(terminal: &mut Tty) -> Result<()> {
    terminal.show_cursor()?;
    terminal.flush()?;
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    Ok(())
}

/// Hand the terminal to `f` and take it back afterwards, even when `f` fails.
pub(super) fn suspended<T>(terminal: &mut Tty, f: impl FnOnce() -> Result<T>) -> Result<T> {
    leave_board_mode(terminal)?;
    let result = f();
    enter_board_mode(terminal)?;
    result
}

/// An editor invocation split into program and leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct EditorCommand {
    program: String,
    args: Vec<String>,
}

impl EditorCommand {
    /// Resolve from the process environment.
    pub(super) fn from_env() -> Result<Self> {
        Self::resolve(|name| env::var(name).ok())
    }

    /// The first non-blank editor variable wins, `vi` otherwise.
    pub(super) fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let command = EDITOR_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_EDITOR.to_owned());
        Self::parse(&command)
    }

    /// Split a shell-quoted command line.
    pub(super) fn parse(command: &str) -> Result<Self> {
        let words = shell_words::split(command).map_err(|err| anyhow!("cannot parse editor command '{command}': {err}"))?;
        let mut words = words.into_iter();
        let Some(program) = words.next() else {
            bail!("editor command is empty");
        };
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    fn run_on(&self, path: &Path) -> Result<()> {
        debug!(program = %self.program, "launching editor");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .with_context(|| format!("failed to launch editor {}", self.program))?;
        if !status.success() {
            bail!("editor exited with {status}");
        }
        Ok(())
    }

    /// Open `initial` in the editor and return what was saved.
    pub(super) fn edit(&self, initial: &str) -> Result<String> {
        let mut file = NamedTempFile::with_suffix(".md").context("failed to create a temporary file")?;
        file.write_all(initial.as_bytes())
            .and_then(|()| file.flush())
            .context("failed to write the temporary file")?;
        self.run_on(file.path())?;
        fs::read_to_string(file.path()).context("failed to read the edited file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(program: &str, args: &[&str]) -> EditorCommand {
        EditorCommand {
            program: program.to_owned(),
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
        }
    }

    #[test]
    fn parse_splits_quoted_arguments() {
        let parsed = EditorCommand::parse("code --wait").unwrap_or_else(|err| panic!("parse: {err}"));
        assert_eq!(parsed, command("code", &["--wait"]));

        let parsed = EditorCommand::parse("'/opt/My Editor/edit' -n \"two words\"")
            .unwrap_or_else(|err| panic!("parse: {err}"));
        assert_eq!(parsed, command("/opt/My Editor/edit", &["-n", "two words"]));
    }

    #[test]
    fn parse_rejects_empty_and_unbalanced_commands() {
        assert!(EditorCommand::parse("").is_err());
        assert!(EditorCommand::parse("   ").is_err());
        assert!(EditorCommand::parse("vim 'unterminated").is_err());
    }

    #[test]
    fn resolve_prefers_the_most_specific_non_blank_variable() {
        let resolved = EditorCommand::resolve(|name| match name {
            "TASK_BOARD_EDITOR" => Some("  ".to_owned()),
            "VISUAL" => Some("nano -w".to_owned()),
            "EDITOR" => Some("ed".to_owned()),
            _ => None,
        })
        .unwrap_or_else(|err| panic!("resolve: {err}"));
        assert_eq!(resolved, command("nano", &["-w"]));

        let fallback = EditorCommand::resolve(|_| None).unwrap_or_else(|err| panic!("resolve: {err}"));
        assert_eq!(fallback, command("vi", &[]));
    }

    #[cfg(unix)]
    #[test]
    fn edit_returns_what_the_editor_saved() {
        let editor = command("sh", &["-c", "printf 'title: from editor\\n' >> \"$1\"", "sh"]);
        let saved = editor
            .edit("# header\n")
            .unwrap_or_else(|err| panic!("edit: {err}"));
        assert_eq!(saved, "# header\ntitle: from editor\n");
    }

    #[cfg(unix)]
    #[test]
    fn edit_reports_a_failing_editor() {
        let err = command("false", &[])
            .edit("")
            .err()
            .unwrap_or_else(|| panic!("a failing editor should be an error"));
        assert!(err.to_string().contains("editor exited"));
    }
}
