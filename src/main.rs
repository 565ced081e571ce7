use ccw::app::{self, ExitReason};
use ccw::circle::{BuildFetcher, CircleClient};
use ccw::cli::Cli;
use ccw::config::Config;
use ccw::coordinator::RefreshCoordinator;
use ccw::events::EventHandler;
use ccw::project::{self, GitCli};
use ccw::ticker::Ticker;
use ccw::tui::{self, TerminalPresenter};

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn setup_verbose_logging() -> Result<()> {
    let state_dir = state_dir();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    tracing::info!("ccw v{} starting with verbose logging", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn state_dir() -> PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        PathBuf::from(state).join("ccw")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("state").join("ccw")
    } else {
        PathBuf::from("/tmp/ccw")
    }
}

fn exit_with(e: impl Display) -> ! {
    tracing::error!("startup failed: {e}");
    eprintln!("Error: {e}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    let config = Config::from_cli(&args).unwrap_or_else(|e| exit_with(e));
    let project = project::resolve(&GitCli).await.unwrap_or_else(|e| exit_with(e));
    let client = CircleClient::new(&config).unwrap_or_else(|e| exit_with(e));
    let fetcher = BuildFetcher::new(Arc::new(client), config.fetch_policy);
    tracing::info!(
        project = %project,
        interval = ?config.update_interval,
        policy = ?fetcher.policy(),
        "watching builds"
    );

    tui::terminal::install_panic_hook();
    let terminal = tui::terminal::init(&format!("ccw {project}")).unwrap_or_else(|e| exit_with(e));

    let coordinator = Arc::new(RefreshCoordinator::new(
        project,
        fetcher,
        TerminalPresenter::new(terminal),
    ));

    let mut events = EventHandler::new(Duration::from_millis(100));
    let ticker = Ticker::spawn(config.update_interval, events.sender());

    let reason = app::run(coordinator.clone(), events.receiver_mut(), &ticker).await;
    events.stop();

    coordinator.with_presenter(TerminalPresenter::restore)?;

    match reason {
        ExitReason::Quit | ExitReason::EventsClosed => Ok(()),
        ExitReason::InputClosed(msg) => Err(eyre!(msg)),
    }
}
