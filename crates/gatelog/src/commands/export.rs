//! CSV export handler.

use std::path::PathBuf;

use gatelog_core::export::{export_csv, write_export};
use gatelog_core::{Loader, VehicleSource};

use crate::cli::{ExportArgs, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

pub async fn handle<S: VehicleSource>(
    loader: &Loader<S>,
    args: ExportArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    super::load(loader).await?;
    let all = loader.store().vehicles_snapshot();

    if args.stdout {
        let csv = export_csv(&all)?;
        // Bypasses --quiet: the CSV is the requested payload.
        print!("{csv}");
        return Ok(());
    }

    let dir: PathBuf = args.dir.unwrap_or_else(|| cfg.export_dir());
    let today = chrono::Local::now().date_naive();
    let path = write_export(&dir, &all, today)?;
    output::print_note(
        &format!("Exported {} entries to {}", all.len(), path.display()),
        global.quiet,
    );
    Ok(())
}
