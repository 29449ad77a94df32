//! CLI entry point for task-board.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt::format::FmtSpan};

use task_board_app::{BoardConfig, TaskBoard};
use task_board_store::FileStore;

mod commands;
mod tui;

/// Single-user Kanban board stored as one local JSON record.
#[derive(Parser, Debug)]
#[command(
    name = "task-board",
    version,
    about = "task-board: a three-column Kanban board in your terminal"
)]
struct Cli {
    /// Configuration file (defaults to <config_dir>/task-board/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding the board record (overrides `storage.dir`).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// todo, in-progress or done (defaults to the configured status).
        #[arg(long)]
        status: Option<String>,
        /// low, medium or high (defaults to the configured priority).
        #[arg(long)]
        priority: Option<String>,
        /// YYYY-MM-DD or RFC 3339.
        #[arg(long)]
        due: Option<String>,
        /// Recurrence label such as `daily` or `weekly`.
        #[arg(long)]
        routine: Option<String>,
    },

    /// Change fields of an existing task.
    Edit {
        #[arg(long)]
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_due: bool,
        #[arg(long, conflicts_with = "clear_routine")]
        routine: Option<String>,
        #[arg(long)]
        clear_routine: bool,
    },

    /// Delete a task.
    Rm {
        #[arg(long)]
        task: String,
    },

    /// Move a task to the done column.
    Done {
        #[arg(long)]
        task: String,
    },

    /// Show the board, one section per column.
    Ls {
        /// Search text (defaults to the saved query).
        #[arg(long)]
        query: Option<String>,
        /// Priority filter: all, low, medium or high (defaults to the saved filter).
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, value_enum, default_value_t = LsFormat::Text)]
        format: LsFormat,
    },

    /// Save the search query used by `ls` and the terminal board.
    Search {
        /// Empty string clears the query.
        query: String,
    },

    /// Save the priority filter used by `ls` and the terminal board.
    Filter {
        /// all, low, medium or high.
        priority: String,
    },

    /// Replace the task order with the given ids.
    Reorder {
        #[arg(required = true)]
        tasks: Vec<String>,
    },

    /// Report that a task is dragged over a column or card.
    Drag {
        #[arg(long)]
        task: String,
        /// Column id (todo, in-progress, done) or task id; omit for "over nothing".
        #[arg(long)]
        over: Option<String>,
    },

    /// Report that a dragged task was dropped.
    Drop {
        #[arg(long)]
        task: String,
        /// Column id or task id; omit for "dropped on nothing".
        #[arg(long)]
        onto: Option<String>,
    },

    /// Remove every task in the done column.
    ClearDone,

    /// Launch the interactive terminal board.
    Tui,
}

/// Output format for `ls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let Cli {
        config,
        data_dir,
        cmd,
    } = Cli::parse();

    install_tracing();
    execute_command(config.as_deref(), data_dir.as_deref(), cmd)
}

fn execute_command(config_path: Option<&Path>, data_dir: Option<&Path>, command: Command) -> Result<()> {
    let config = BoardConfig::load(config_path)?;
    let dir = config.storage.resolve_dir(data_dir)?;
    let mut board = TaskBoard::open(FileStore::open(dir), config.storage.key.clone())?;

    match command {
        Command::Tui => tui::run(board, config.defaults),
        other => commands::run(other, &mut board, config.defaults, &mut io::stdout().lock()),
    }
}

fn install_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&directives))
        .with_writer(io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

/// `RUST_LOG`-style directives; INFO applies when none name a level.
fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from([
            "task-board",
            "--data-dir",
            "/tmp/board",
            "add",
            "--title",
            "Write spec",
            "--status",
            "todo",
            "--priority",
            "high",
            "--due",
            "2025-03-04",
        ]);

        assert_eq!(cli.data_dir.as_deref(), Some(Path::new("/tmp/board")));
        match cli.cmd {
            Command::Add {
                title,
                status,
                priority,
                due,
                description,
                routine,
            } => {
                assert_eq!(title, "Write spec");
                assert_eq!(status.as_deref(), Some("todo"));
                assert_eq!(priority.as_deref(), Some("high"));
                assert_eq!(due.as_deref(), Some("2025-03-04"));
                assert!(description.is_none());
                assert!(routine.is_none());
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::parse_from(["task-board", "ls", "--config", "board.toml", "--format", "json"]);
        assert_eq!(cli.config.as_deref(), Some(Path::new("board.toml")));
        match cli.cmd {
            Command::Ls { format, query, .. } => {
                assert_eq!(format, LsFormat::Json);
                assert!(query.is_none());
            }
            _ => panic!("expected ls command"),
        }
    }

    #[test]
    fn edit_rejects_value_and_clear_together() {
        let result = Cli::try_parse_from([
            "task-board",
            "edit",
            "--task",
            "abc",
            "--due",
            "2025-01-01",
            "--clear-due",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_drag_without_target() {
        let cli = Cli::parse_from(["task-board", "drag", "--task", "abc"]);
        match cli.cmd {
            Command::Drag { task, over } => {
                assert_eq!(task, "abc");
                assert!(over.is_none());
            }
            _ => panic!("expected drag command"),
        }
    }

    #[test]
    fn reorder_requires_ids() {
        assert!(Cli::try_parse_from(["task-board", "reorder"]).is_err());
    }

    #[test]
    fn parse_tui_command() {
        let cli = Cli::parse_from(["task-board", "tui"]);
        match cli.cmd {
            Command::Tui => {}
            _ => panic!("expected tui command"),
        }
    }

    #[test]
    fn log_filter_follows_requested_level() {
        assert_eq!(env_filter("").max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(env_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(env_filter("warn").max_level_hint(), Some(LevelFilter::WARN));
    }
}
