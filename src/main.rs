//! gh-user-search binary entry point.
//!
//! Parses flags, loads settings, starts the tokio runtime for network calls,
//! runs the TUI event loop and restores the terminal on exit.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use gh_user_search::config::{Settings, config_file_write_path};
use gh_user_search::github::GithubClient;
use gh_user_search::{app, logging};

#[derive(Debug, Parser)]
#[command(name = "gh-user-search", version, about = "Search GitHub users and browse their repositories")]
struct Args {
    /// GitHub REST API base URL
    #[arg(long, env = "GH_API_BASE")]
    api_base: Option<String>,

    /// Personal access token for higher rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Settings file (default: settings.conf in the config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// trace, debug, info, warn, error or off
    #[arg(long, default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Show results without height and fade animations
    #[arg(long)]
    no_animations: bool,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => {
            let path = path.to_string_lossy();
            Settings::from_file(&path).with_context(|| format!("read settings from {path}"))?
        }
        None => Settings::load_or_init(&config_file_write_path("settings.conf")),
    };
    if let Some(base) = &args.api_base {
        settings.api_base = base.clone();
    }
    if args.token.is_some() {
        settings.token = args.token.clone();
    }
    if let Some(log) = &args.log_file {
        settings.log_file = Some(log.to_string_lossy().into_owned());
    }
    if args.no_animations {
        settings.animations = false;
    }
    Ok(settings)
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
    let args = Args::parse();
    let settings = load_settings(&args)?;

    if let Some(path) = &settings.log_file {
        logging::init(std::path::Path::new(path), &args.log_level)
            .with_context(|| format!("open log file {path}"))?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("start async runtime")?;
    let client = GithubClient::new(&settings.api_base, settings.token.as_deref())?;
    tracing::info!(api_base = %client.base_url(), "client ready");

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, settings, Arc::new(client), runtime.handle().clone());

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
