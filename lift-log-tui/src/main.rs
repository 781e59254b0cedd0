// lift-log-tui/src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lift_log_lib::AppService; // Use AppService from the lib
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::{io, time::Duration};
use tracing_subscriber::EnvFilter;

mod app; // Application state
mod ui; // UI rendering logic

use crate::app::App;

const LOG_FILE_NAME: &str = "ll-tui.log";

#[derive(Parser, Debug)]
#[command(version, about = "Terminal UI for logging training data against a workout program")]
struct Args {
    /// Program JSON to use instead of the configured/built-in one
    #[arg(long, value_name = "FILE")]
    program: Option<PathBuf>,
}

// Logs go next to the storage file; stderr would draw over the UI
fn init_logging() -> Result<()> {
    let storage_path =
        lift_log_lib::get_storage_path_util().context("Failed to determine data directory")?;
    let log_path = storage_path.with_file_name(LOG_FILE_NAME);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {log_path:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    // Initialize the library service before touching the terminal
    let app_service = AppService::initialize_with_program(args.program.as_deref())
        .context("Failed to initialize application service")?;
    tracing::debug!(program = ?app_service.program_source, "starting tui");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let mut app = App::new(app_service);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "tui exited with an error");
        eprintln!("Error: {err:?}"); // Print errors to stderr
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.clear_expired_error();

        terminal.draw(|f| ui::render_ui(f, app))?;

        // Poll with a timeout so expired status errors clear without input
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_flag_is_optional() {
        let args = Args::try_parse_from(["ll-tui"]).unwrap();
        assert!(args.program.is_none());

        let args = Args::try_parse_from(["ll-tui", "--program", "block.json"]).unwrap();
        assert_eq!(args.program, Some(PathBuf::from("block.json")));
    }
}
