//! `hostpulse-tui` — terminal dashboard for the hostpulse availability
//! monitoring service.
//!
//! Built on [ratatui](https://ratatui.rs) over `hostpulse-core`'s
//! [`Session`](hostpulse_core::Session): the session polls the service and
//! confirms configuration changes; the TUI renders groups, host tabs, and
//! per-host latency charts.
//!
//! Logs are written to a file (default `/tmp/hostpulse-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod dashboard;
mod data_bridge;
mod event;
mod term;
mod theme;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use hostpulse_core::{Session, SessionConfig};

use crate::app::App;

/// Terminal dashboard for host availability monitoring.
#[derive(Parser, Debug)]
#[command(name = "hostpulse-tui", version, about)]
struct Cli {
    /// Monitoring service URL (e.g., http://192.168.1.10:5000)
    #[arg(short = 'u', long, env = "HOSTPULSE_URL")]
    url: String,

    /// Polling interval in milliseconds
    #[arg(long, default_value_t = 2000, env = "HOSTPULSE_POLL_MS")]
    poll_ms: u64,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long, env = "HOSTPULSE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/hostpulse-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hostpulse_tui={log_level},hostpulse_core={log_level},hostpulse_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("hostpulse-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

fn build_session_config(cli: &Cli) -> Result<SessionConfig> {
    let url = Url::parse(&cli.url).map_err(|e| eyre!("invalid service URL '{}': {e}", cli.url))?;
    let mut config = SessionConfig::new(url);
    config.poll_interval = Duration::from_millis(cli.poll_ms);
    config.timeout = cli.timeout_secs.map(Duration::from_secs);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    term::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config = build_session_config(&cli)?;
    info!(url = %config.url, poll_ms = cli.poll_ms, "starting hostpulse-tui");

    let (session, events) = Session::new(config)?;
    let mut app = App::new(session, events);
    app.run().await?;

    Ok(())
}
