//! Interactive terminal board.

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use task_board_app::{DefaultsConfig, TaskBoard};
use task_board_store::KeyValueStore;
use tracing::info;
use tracing::subscriber::NoSubscriber;

pub mod constants;
mod editor;
mod handlers;
mod layout;
mod terminal;
mod view;
mod widgets;

use self::constants::TUI_TICK_RATE_MS;
use self::handlers::handle_ui_action;
use self::terminal::{Tty, enter_board_mode, leave_board_mode};
use self::view::Ui;

/// Launch the interactive board on the current terminal.
pub fn run<S: KeyValueStore>(board: TaskBoard<S>, defaults: DefaultsConfig) -> Result<()> {
    info!(tasks = board.tasks().len(), "opening terminal board");

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    enter_board_mode(&mut terminal)?;

    let result = tracing::subscriber::with_default(NoSubscriber::default(), || {
        run_event_loop(&mut terminal, board, defaults)
    });

    leave_board_mode(&mut terminal).ok();

    if let Ok(remaining) = &result {
        info!(tasks = remaining, "closed terminal board");
    }
    result.map(|_| ())
}

/// Returns the number of tasks left on the board.
fn run_event_loop<S: KeyValueStore>(
    terminal: &mut Tty,
    board: TaskBoard<S>,
    defaults: DefaultsConfig,
) -> Result<usize> {
    let mut ui = Ui::new(board, defaults);

    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(TUI_TICK_RATE_MS);

    loop {
        terminal.draw(|f| ui.draw(f))?;
        if ui.should_quit {
            break;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)? {
            match event::read()? {
                CrosstermEvent::Key(key) => match ui.handle_key(key) {
                    Ok(Some(action)) => {
                        if let Err(err) = handle_ui_action(terminal, &mut ui, action) {
                            ui.error(format!("editor failed: {err:#}"));
                        }
                    }
                    Ok(None) => {}
                    Err(err) => ui.error(format!("{err:#}")),
                },
                CrosstermEvent::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    if let Err(err) = ui.handle_mouse(mouse, area) {
                        ui.error(format!("{err:#}"));
                    }
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            ui.tick();
            last_tick = Instant::now();
        }
    }

    Ok(ui.board.tasks().len())
}

#[cfg(test)]
mod tests;
