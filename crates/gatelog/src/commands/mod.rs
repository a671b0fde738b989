//! Command handlers for API-backed subcommands.

pub mod config_cmd;
pub mod export;
pub mod history;
pub mod report;
pub mod stats;
pub mod vehicles;

use gatelog_core::{Loader, VehicleSource};

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Fetch statistics and the vehicle list into the loader's store.
async fn load<S: VehicleSource>(loader: &Loader<S>) -> Result<(), CliError> {
    let outcome = loader.refresh().await?;
    tracing::debug!(?outcome, "loaded dashboard data");
    Ok(())
}

/// Route a parsed command to its handler.
pub async fn dispatch<S: VehicleSource>(
    cmd: Command,
    loader: &Loader<S>,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Stats => stats::handle(loader, global).await,
        Command::Vehicles(args) => vehicles::handle(loader, &args, global).await,
        Command::History { vehicle_no } => history::handle(loader, &vehicle_no, global).await,
        Command::Export(args) => export::handle(loader, args, cfg, global).await,
        Command::Report(args) => report::handle(loader, args, global).await,
        Command::Config(_) | Command::Completions(_) => {
            unreachable!("handled before dispatch")
        }
    }
}
