//! admin-console binary entry point.
//!
//! Parses configuration, sets up file logging and the async runtime,
//! initializes the terminal in raw mode, runs the TUI event loop,
//! and restores the terminal state on exit.
//!
use std::fs::OpenOptions;
use std::sync::Mutex;

use admin_console::app::keymap::Keymap;
use admin_console::app::theme::Theme;
use admin_console::app::{self, AppState};
use admin_console::config::Config;
use admin_console::context::AppContext;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Send tracing output to `config.log_file`; the terminal belongs to the UI.
fn init_tracing(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("open log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config)?;
    info!(api_url = %config.api_url, page_size = config.page_size, "starting admin-console");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build async runtime")?;
    let ctx = AppContext::from_config(&config).context("build HTTP client")?;
    if let Some(token) = &config.token {
        ctx.auth.set_token(token.clone()).context("save token")?;
    }
    let theme = Theme::load_or_init(&config.config_path("theme.conf"));
    let keymap = Keymap::load_or_init(&config.config_path("keybinds.conf"));
    let mut state = AppState::new(ctx, config.page_size, theme, keymap);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &runtime, &mut state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
