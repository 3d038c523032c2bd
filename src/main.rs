mod app;
mod cli;
mod config;
mod error;
mod event;
mod model;
mod reconcile;
mod stats;
mod store;
mod tracker;
mod ui;

use std::io;
use std::panic;
use std::sync::Mutex;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use app::{Action, App};
use store::TicketStore;

const DEFAULT_LOG_FILTER: &str = "tickets=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// CLI commands log to stderr.
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// The dashboard owns the terminal, so its logs go to a file in the data dir.
fn init_tui_tracing() -> Result<()> {
    let dir = config::data_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join("tickets.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None => {}
        Some("help" | "-h" | "--help") => {
            cli::print_help();
            return Ok(());
        }
        Some(cmd) => {
            init_cli_tracing();
            return match cmd {
                "add" => cli::handle_add(&args[1..]).await,
                "list" => cli::handle_list().await,
                "stats" => cli::handle_stats().await,
                other => {
                    cli::print_help();
                    anyhow::bail!("Unknown command: {other}")
                }
            };
        }
    }

    init_tui_tracing()?;

    // Load config and build the store before touching the terminal, so
    // configuration errors print normally.
    let config = config::load_config()?;
    let tracker = tracker::create_tracker(&config)?;
    let mut app = App::new(TicketStore::new(tracker));

    // Set up action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Spawn event reader
    let event_tx = action_tx.clone();
    tokio::spawn(async move {
        event::run_event_loop(event_tx).await;
    });

    // Initial fetch
    terminal.draw(|f| ui::render(f, &app))?;
    app.load().await;

    // Main loop
    loop {
        // Render
        terminal.draw(|f| ui::render(f, &app))?;

        // Wait for action
        if let Some(action) = action_rx.recv().await {
            app.update(action).await;
            if app.should_quit {
                break;
            }
        } else {
            break;
        }
    }

    // Restore terminal
    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
