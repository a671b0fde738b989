//! `gatelog-tui`: live terminal dashboard for the gate-log vehicle entry API.
//!
//! Shows the entry statistics, an inside/exited occupancy bar and the
//! searchable vehicle table, refreshed on a fixed period. Data flows from
//! `gatelog-core`'s [`DataStore`](gatelog_core::DataStore) through a
//! bridge task into the action loop.
//!
//! Logs go to a file (default `/tmp/gatelog-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gatelog_config::UiState;
use gatelog_core::{DataStore, Loader};

use crate::app::App;

/// Live dashboard for vehicle entries logged at the gate.
#[derive(Parser, Debug)]
#[command(name = "gatelog-tui", version, about)]
struct Cli {
    /// API prefix (e.g., http://127.0.0.1:8000/api)
    #[arg(short = 'a', long, env = "GATELOG_API_BASE")]
    api_base: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long, env = "GATELOG_INSECURE")]
    insecure: bool,

    /// Auto-refresh period in seconds (0 disables it)
    #[arg(long, env = "GATELOG_REFRESH")]
    refresh: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/gatelog-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing; the returned guard flushes on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("gatelog_tui={level},gatelog_core={level}"))
    });

    let dir = cli.log_file.parent().unwrap_or(Path::new("/tmp"));
    let file_name = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("gatelog-tui.log"));

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Config file values with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<gatelog_config::Config> {
    let mut cfg = gatelog_config::load_config().wrap_err("failed to load config")?;
    if let Some(ref api_base) = cli.api_base {
        cfg.api_base.clone_from(api_base);
    }
    if cli.insecure {
        cfg.insecure = true;
    }
    if let Some(refresh) = cli.refresh {
        cfg.refresh_interval = refresh;
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_tracing(&cli);
    tui::install_hooks()?;

    let cfg = load_config(&cli)?;
    let dashboard = cfg
        .to_dashboard_config()
        .wrap_err("invalid configuration")?;
    let client = dashboard
        .build_client()
        .wrap_err("failed to build API client")?;

    info!(api_base = %dashboard.api_base, "starting gatelog-tui");

    let loader = Loader::new(client, Arc::new(DataStore::new()));
    let theme = UiState::load_or_default().theme;

    let mut app = App::new(
        loader,
        theme,
        cfg.export_dir(),
        gatelog_config::state_path(),
        dashboard.refresh_interval,
    );
    app.run().await
}
