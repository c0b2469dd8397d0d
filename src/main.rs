mod app;
mod client;
mod config;
mod intake;
mod model;
mod store;
mod ui;

use anyhow::Result;
use app::{App, InputMode, View};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use ui::highlight::Highlighter;

/// Terminal viewer for code-complexity analysis results
#[derive(Parser)]
#[command(name = "cxv", version, about)]
struct Cli {
    /// Files or directories to analyse
    paths: Vec<String>,

    /// Analysis service endpoint (overrides config)
    #[arg(long)]
    endpoint: Option<String>,

    /// Pre-apply an intake filter expression (e.g. '+*.py,-*.lock')
    #[arg(long)]
    filter: Option<String>,

    /// Open the stored results from the last run
    #[arg(long)]
    results: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = config::load_config();
    if let Some(endpoint) = cli.endpoint {
        config.analysis.endpoint = endpoint;
    }
    let theme = config.display.theme.clone();

    let store = store::ResultStore::default_location()?;
    let mut app = App::new(config, store, cli.paths, cli.filter.unwrap_or_default())?;
    if cli.results {
        app.open_results();
    }

    // Load syntax highlighting (once, reused for all files)
    let highlighter = Highlighter::new(&theme);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = run_app(&mut terminal, &mut app, &highlighter);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
    }
    Ok(())
}

/// env_logger writes to stderr by default, which fights the TUI; log to
/// a file under the cache dir instead, and only when RUST_LOG is set.
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let Some(dir) = dirs::cache_dir() else {
        return;
    };
    let dir = dir.join("cxview");
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    if let Ok(file) = std::fs::File::create(dir.join("cxview.log")) {
        let _ = env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();
    }
}

fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App, hl: &Highlighter) -> Result<()>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    loop {
        // Draw
        terminal.draw(|f| ui::draw(f, app, hl))?;

        // Poll for events with a timeout (lets us process the analysis
        // channel too)
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match app.input_mode {
                    InputMode::Filter => handle_filter_input(app, key),
                    InputMode::Normal => handle_normal_input(app, key),
                }
            }
        }

        // Check for a finished submission (non-blocking)
        app.poll_analysis();

        // Tick — used for the spinner and auto-clearing notifications
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) {
    // Quit works everywhere
    if key.code == KeyCode::Char('q')
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        app.should_quit = true;
        return;
    }

    match app.view {
        View::Intake => handle_intake_input(app, key),
        View::Results => handle_results_input(app, key),
    }
}

fn handle_intake_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Candidate navigation
        KeyCode::Char('j') | KeyCode::Down => app.next_candidate(),
        KeyCode::Char('k') | KeyCode::Up => app.prev_candidate(),

        // Drop the selected candidate from this run
        KeyCode::Char('d') => app.remove_candidate(),

        // Filter
        KeyCode::Char('f') => {
            app.input_mode = InputMode::Filter;
            // Pre-populate with current expression for editing
            app.filter_input = app.filter_expr.clone();
        }

        // Submit
        KeyCode::Char('a') | KeyCode::Enter => app.start_analysis(),

        // Open whatever the store holds
        KeyCode::Char('r') => app.open_results(),

        // Dismiss the inline error
        KeyCode::Esc => app.error = None,

        _ => {}
    }
}

fn handle_results_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // File tabs
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.next_file(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.prev_file(),

        // Finding navigation (code pane follows the cursor)
        KeyCode::Char('j') | KeyCode::Down => app.next_finding(),
        KeyCode::Char('k') | KeyCode::Up => app.prev_finding(),

        // Code scroll
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_code_down(10);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_code_up(10);
        }
        KeyCode::PageDown => app.scroll_code_down(20),
        KeyCode::PageUp => app.scroll_code_up(20),

        // Horizontal scroll (for long lines)
        KeyCode::Char(']') => app.scroll_right(8),
        KeyCode::Char('[') => app.scroll_left(8),
        KeyCode::Home => app.scroll_left(u16::MAX),

        // Back to intake (clears the stored snapshot)
        KeyCode::Char('b') | KeyCode::Esc => app.back_to_intake(),

        _ => {}
    }
}

fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let expr = app.filter_input.clone();
            app.apply_filter_expr(&expr);
            app.input_mode = InputMode::Normal;
            if expr.trim().is_empty() {
                app.notify("Filter cleared");
            } else {
                let count = app.candidates.len();
                app.notify(&format!("Filter: {} ({} files)", expr.trim(), count));
            }
        }
        KeyCode::Esc => {
            app.filter_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char(c) => {
            app.filter_input.push(c);
        }
        KeyCode::Backspace => {
            app.filter_input.pop();
        }
        _ => {}
    }
}
