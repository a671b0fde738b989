//! Single-vehicle history handler.

use gatelog_core::{Loader, VehicleHistory, VehicleSource};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::vehicles::VehicleRow;

fn detail(h: &VehicleHistory, color: bool) -> String {
    let mut lines = vec![
        format!("Vehicle:   {}", h.vehicle_no),
        format!("Visits:    {}", h.count),
        format!(
            "Inside:    {}",
            h.open_entry().map_or("no", |_| "yes")
        ),
    ];
    if !h.entries.is_empty() {
        let rows: Vec<VehicleRow> = h
            .entries
            .iter()
            .rev()
            .map(|e| VehicleRow::new(e, color))
            .collect();
        lines.push(String::new());
        lines.push(output::render_table(&rows));
    }
    lines.join("\n")
}

pub async fn handle<S: VehicleSource>(
    loader: &Loader<S>,
    vehicle_no: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let history = loader.history(vehicle_no).await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &history,
        |h| detail(h, color),
        |h| {
            h.entries
                .iter()
                .map(|e| e.in_time.clone())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
