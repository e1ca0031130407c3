//! menudeck - Terminal Menu Flashcards
//!
//! Fetches the active items of a restaurant menu from a hosted data service
//! and presents them as a shuffled deck of flippable cards. Each card is
//! marked "know" or "repeat" until the deck runs out.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use menudeck::application::{App, AppMode};
use menudeck::infrastructure::{RestItemSource, Settings};
use menudeck::presentation::{InputHandler, render_ui};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::Rect,
};
use std::{
    fs::OpenOptions,
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Instant,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "menudeck", about = "Learn a menu with shuffled flashcards")]
struct Args {
    /// Path to a TOML settings file (defaults to ./menudeck.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base URL of the data service
    #[arg(long)]
    base_url: Option<String>,
    /// Anonymous access key for the data service
    #[arg(long)]
    anon_key: Option<String>,
    /// Table holding the menu items
    #[arg(long)]
    table: Option<String>,
}

fn load_settings(args: Args) -> Result<Settings> {
    let mut settings =
        Settings::load(args.config.as_deref()).context("failed to load settings")?;

    if let Some(v) = args.base_url {
        settings.base_url = v;
    }
    if let Some(v) = args.anon_key {
        settings.anon_key = v;
    }
    if let Some(v) = args.table {
        settings.table = v;
    }

    settings.validate().context("incomplete settings")?;
    Ok(settings)
}

fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("failed to open log file '{}'", settings.log_file.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("menudeck=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Entry point for the menudeck flashcard application.
///
/// Loads settings, sets up the terminal interface, starts the deck load
/// and runs the main event loop until the user quits. The terminal is
/// restored on every exit path.
fn main() -> Result<()> {
    let settings = load_settings(Args::parse())?;
    init_logging(&settings)?;

    let source = RestItemSource::new(&settings).context("failed to build HTTP client")?;
    let mut app = App::new(Arc::new(source), &settings);
    info!(table = %settings.table, "menudeck starting");

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start_load();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("terminal error")?;
    info!("menudeck exiting");
    Ok(())
}

/// Main application event loop.
///
/// Waits for input no longer than the next scheduled change (a pending
/// advance or the idle tick), then applies finished loads and elapsed
/// advances before drawing again.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        let size = terminal.size()?;
        app.screen = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(app.next_wakeup(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('q') | KeyCode::Esc if app.mode == AppMode::Normal => {
                        return Ok(());
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers, Instant::now()),
                },
                Event::Mouse(mouse) => InputHandler::handle_mouse_event(app, mouse, Instant::now()),
                _ => {}
            }
        }

        app.poll_load();
        app.tick(Instant::now());
    }
}
