//! Static HTML snapshot of the dashboard.

use std::path::Path;

use gatelog_config::UiState;
use gatelog_core::{
    ChartSlices, DataStore, HtmlRenderer, Loader, Renderer, ThemeMode, VehicleSource, apply_filter,
};

use crate::cli::{GlobalOpts, ReportArgs, SearchArgs};
use crate::error::CliError;
use crate::output;

/// Render the store contents the way the dashboard shows them.
fn build_report(store: &DataStore, filter: &SearchArgs, theme: ThemeMode, footer: String) -> String {
    let mut renderer = HtmlRenderer::new(theme).with_footer(footer);
    let stats = store.statistics();
    renderer.render_stats(&stats);
    renderer.render_chart(ChartSlices::from(&stats));
    let all = store.vehicles_snapshot();
    apply_filter(&mut renderer, &all, filter.query(), filter.status);
    renderer.finish()
}

pub async fn handle<S: VehicleSource>(
    loader: &Loader<S>,
    args: ReportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    super::load(loader).await?;

    let theme = args
        .theme
        .map_or_else(|| UiState::load_or_default().theme, ThemeMode::from);
    let footer = format!(
        "Generated {}",
        chrono::Local::now().format("%-d %b %Y, %H:%M")
    );
    let html = build_report(loader.store(), &args.filter, theme, footer);

    if args.file == Path::new("-") {
        print!("{html}");
        return Ok(());
    }

    std::fs::write(&args.file, html)?;
    output::print_note(
        &format!("Report written to {}", args.file.display()),
        global.quiet,
    );
    Ok(())
}
