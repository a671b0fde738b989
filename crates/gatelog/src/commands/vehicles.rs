//! Vehicle list command handler.

use std::sync::Arc;

use tabled::Tabled;

use gatelog_core::{Loader, RowView, VehicleEntry, VehicleSource, filter};

use crate::cli::{GlobalOpts, OutputFormat, SearchArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct VehicleRow {
    #[tabled(rename = "Vehicle No")]
    vehicle_no: String,
    #[tabled(rename = "Visitor")]
    visitor: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "In Time")]
    in_time: String,
    #[tabled(rename = "Out Time")]
    out_time: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl VehicleRow {
    pub(crate) fn new(entry: &VehicleEntry, color: bool) -> Self {
        let view = RowView::from(entry);
        Self {
            status: output::status_badge(view.status, color),
            vehicle_no: view.vehicle_no,
            visitor: view.visitor_name,
            phone: view.phone,
            purpose: view.purpose,
            in_time: view.in_time,
            out_time: view.out_time,
        }
    }
}

/// Filtered entries, newest first.
pub(crate) fn select(all: &[Arc<VehicleEntry>], args: &SearchArgs) -> Vec<Arc<VehicleEntry>> {
    let mut shown = filter(all, args.query(), args.status);
    shown.reverse();
    shown
}

pub(crate) fn result_count(shown: usize, total: usize) -> String {
    format!("Showing {shown} of {total} entries")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<S: VehicleSource>(
    loader: &Loader<S>,
    args: &SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    super::load(loader).await?;
    let all = loader.store().vehicles_snapshot();

    if all.is_empty() && matches!(global.output, OutputFormat::Table) {
        output::print_note(gatelog_core::render::EMPTY_MESSAGE, global.quiet);
        return Ok(());
    }

    let shown = select(&all, args);
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &shown,
        |e| VehicleRow::new(e, color),
        |e| e.vehicle_no.clone(),
    )?;
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) {
        output::print_note(&result_count(shown.len(), all.len()), global.quiet);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gatelog_core::StatusFilter;

    use super::*;

    fn entry(no: &str, name: &str, out_time: Option<&str>) -> Arc<VehicleEntry> {
        Arc::new(VehicleEntry {
            vehicle_no: no.into(),
            visitor_name: Some(name.into()),
            phone: None,
            purpose: None,
            in_time: "2024-03-05 09:15:00".into(),
            out_time: out_time.map(Into::into),
            image_path: None,
        })
    }

    #[test]
    fn select_filters_then_puts_newest_first() {
        let all = vec![
            entry("KA01", "Asha", None),
            entry("KA02", "Ravi", Some("2024-03-05 10:00:00")),
            entry("KA03", "Asha", Some("2024-03-05 11:00:00")),
        ];
        let args = SearchArgs {
            search: Some("ASHA".into()),
            status: StatusFilter::All,
        };
        let shown: Vec<_> = select(&all, &args)
            .iter()
            .map(|e| e.vehicle_no.clone())
            .collect();
        assert_eq!(shown, ["KA03", "KA01"]);

        let args = SearchArgs {
            search: None,
            status: StatusFilter::Inside,
        };
        assert_eq!(select(&all, &args).len(), 1);
    }

    #[test]
    fn row_uses_display_formatting() {
        let row = VehicleRow::new(&entry("KA01", "Asha", None), false);
        assert_eq!(row.in_time, "5 Mar 2024, 09:15");
        assert_eq!(row.out_time, "-");
        assert_eq!(row.phone, "-");
        assert_eq!(row.status, "Inside");
    }

    #[test]
    fn count_line_reads_naturally() {
        assert_eq!(result_count(2, 5), "Showing 2 of 5 entries");
    }
}
