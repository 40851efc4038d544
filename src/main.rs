//! userdesk binary entry point.
//!
//! Parses configuration, sets up file logging, puts the terminal in raw
//! mode, runs the TUI event loop, and restores the terminal on exit.
//!
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use userdesk::api::ApiClient;
use userdesk::app::{self, AppState, Keymap, Theme};
use userdesk::config::Cli;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Log to a file, if one is configured; the terminal belongs to the TUI.
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let api_config = cli.api_config();
    let paths = cli.config_paths();
    paths.ensure_dir();
    let theme = Theme::load_or_init(&paths.theme());
    let keymap = Keymap::load_or_init(&paths.keybinds());
    tracing::info!(base_url = %api_config.base_url(), config_dir = %paths.dir.display(), "starting");

    let api = ApiClient::new(api_config).context("build HTTP client")?;
    let mut state = AppState::new(api.base_url(), theme, keymap);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, &api).await;

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %format!("{err:#}"), "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
