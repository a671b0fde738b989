//! Statistics command handler.

use gatelog_core::{ChartSlices, Loader, Statistics, VehicleSource};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(s: &Statistics) -> String {
    let slices = ChartSlices::from(s);
    [
        format!("Total entries:    {}", s.total_entries),
        format!("Inside now:       {}", s.open_entries),
        format!("Exited:           {}", s.closed_entries),
        format!("Unique vehicles:  {}", s.unique_vehicles),
        format!(
            "Occupancy:        {:.0}% inside",
            slices.inside_ratio() * 100.0
        ),
    ]
    .join("\n")
}

fn plain(s: &Statistics) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        s.total_entries, s.open_entries, s.closed_entries, s.unique_vehicles
    )
}

pub async fn handle<S: VehicleSource>(
    loader: &Loader<S>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    super::load(loader).await?;
    let stats = loader.store().statistics();
    let out = output::render_single(&global.output, &stats, detail, plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
