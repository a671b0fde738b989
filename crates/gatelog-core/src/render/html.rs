// ── Standalone HTML snapshot ──
//
// Renders the dashboard as a single self-contained HTML document:
// stat cards, an Inside/Exited donut, the vehicle table and the
// result count. Every free-text value goes through `escape_text`.

use std::fmt::Write;

use crate::error::LoadFailure;
use crate::format::escape_text;
use crate::model::{EntryStatus, Statistics, ThemeMode};

use super::{ChartSlices, Renderer, TableBody};

const PAGE_TITLE: &str = "Vehicle Gate Log";

const STYLE: &str = r"
        :root { --inside: #f59e0b; --exited: #22c55e; --radius: 0.5rem; }
        body.dark { --bg: #0f172a; --card: #1e293b; --border: #334155; --text: #e2e8f0; --muted: #94a3b8; }
        body.light { --bg: #f8fafc; --card: #ffffff; --border: #e2e8f0; --text: #1e293b; --muted: #64748b; }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif; background: var(--bg); color: var(--text); padding: 2rem; line-height: 1.5; }
        .container { max-width: 1200px; margin: 0 auto; }
        h1 { font-size: 1.75rem; margin-bottom: 1.5rem; }
        .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 1rem; margin-bottom: 1.5rem; }
        .card { background: var(--card); border: 1px solid var(--border); border-radius: var(--radius); padding: 1.25rem; text-align: center; }
        .card .value { display: block; font-size: 2rem; font-weight: 700; }
        .card .label { color: var(--muted); font-size: 0.875rem; }
        .chart { background: var(--card); border: 1px solid var(--border); border-radius: var(--radius); padding: 1.25rem; margin-bottom: 1.5rem; display: flex; align-items: center; gap: 2rem; }
        .chart svg { width: 160px; height: 160px; }
        .legend span { display: inline-block; width: 0.75rem; height: 0.75rem; border-radius: 2px; margin-right: 0.5rem; }
        table { width: 100%; border-collapse: collapse; background: var(--card); border: 1px solid var(--border); }
        th, td { padding: 0.625rem 0.875rem; text-align: left; border-bottom: 1px solid var(--border); font-size: 0.875rem; }
        th { color: var(--muted); text-transform: uppercase; font-size: 0.75rem; letter-spacing: 0.05em; }
        td.placeholder { text-align: center; color: var(--muted); padding: 2rem; }
        .badge { padding: 0.2rem 0.6rem; border-radius: 9999px; font-size: 0.75rem; font-weight: 600; }
        .badge.inside { background: #fef3c7; color: #92400e; }
        .badge.exited { background: #dcfce7; color: #166534; }
        .count { margin: 0.75rem 0; color: var(--muted); font-size: 0.875rem; }
        .footer { margin-top: 2rem; color: var(--muted); font-size: 0.75rem; text-align: center; }
";

const TABLE_HEADERS: [&str; 7] = [
    "Vehicle No",
    "Visitor",
    "Phone",
    "Purpose",
    "In Time",
    "Out Time",
    "Status",
];

/// `Renderer` that accumulates sections and emits one HTML document.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    theme: ThemeMode,
    footer: Option<String>,
    stats: Option<Statistics>,
    chart: Option<ChartSlices>,
    table: Option<TableBody>,
    count: Option<(usize, usize)>,
}

impl HtmlRenderer {
    pub fn new(theme: ThemeMode) -> Self {
        Self {
            theme,
            footer: None,
            stats: None,
            chart: None,
            table: None,
            count: None,
        }
    }

    /// Free text shown at the bottom of the page (e.g. generation time).
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Assemble the document from whatever has been rendered so far.
    pub fn finish(&self) -> String {
        let mut out = String::with_capacity(8 * 1024);
        let title = PAGE_TITLE;

        let _ = write!(
            out,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    \
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
             <title>{title}</title>\n    <style>{STYLE}    </style>\n</head>\n\
             <body class=\"{}\">\n    <div class=\"container\">\n        <h1>{title}</h1>\n",
            self.theme
        );

        if let Some(stats) = &self.stats {
            write_stats(&mut out, stats);
        }
        if let Some(slices) = self.chart {
            write_chart(&mut out, slices);
        }
        if let Some((shown, total)) = self.count {
            let _ = writeln!(
                out,
                "        <p class=\"count\">Showing {shown} of {total} entries</p>"
            );
        }
        if let Some(body) = &self.table {
            write_table(&mut out, body);
        }
        if let Some(footer) = &self.footer {
            let _ = writeln!(
                out,
                "        <div class=\"footer\">{}</div>",
                escape_text(Some(footer))
            );
        }

        out.push_str("    </div>\n</body>\n</html>\n");
        out
    }
}

impl Renderer for HtmlRenderer {
    fn render_table(&mut self, body: &TableBody) {
        self.table = Some(body.clone());
    }

    fn render_stats(&mut self, stats: &Statistics) {
        self.stats = Some(*stats);
    }

    fn render_chart(&mut self, slices: ChartSlices) {
        self.chart = Some(slices);
    }

    fn render_failure(&mut self, failure: LoadFailure) {
        self.table = Some(TableBody::from_failure(failure));
        self.count = None;
    }

    fn render_result_count(&mut self, shown: usize, total: usize) {
        self.count = Some((shown, total));
    }
}

// ── Section writers ──────────────────────────────────────────────────

fn write_stats(out: &mut String, stats: &Statistics) {
    out.push_str("        <div class=\"stats\">\n");
    for (label, value) in [
        ("Total Entries", stats.total_entries),
        ("Currently Inside", stats.open_entries),
        ("Exited", stats.closed_entries),
        ("Unique Vehicles", stats.unique_vehicles),
    ] {
        let _ = writeln!(
            out,
            "            <div class=\"card\"><span class=\"value\">{value}</span>\
             <span class=\"label\">{label}</span></div>"
        );
    }
    out.push_str("        </div>\n");
}

/// Donut drawn with two stroked circles of circumference 100, so the
/// dash length of the `inside` arc is its percentage.
fn write_chart(out: &mut String, slices: ChartSlices) {
    let inside_pct = slices.inside_ratio() * 100.0;
    let rest = 100.0 - inside_pct;
    let exited_color = if slices.total() == 0 {
        "var(--border)"
    } else {
        "var(--exited)"
    };

    out.push_str("        <div class=\"chart\">\n");
    let _ = writeln!(
        out,
        "            <svg viewBox=\"0 0 42 42\" role=\"img\" aria-label=\"Inside {} / Exited {}\">\n\
         \x20               <circle cx=\"21\" cy=\"21\" r=\"15.915\" fill=\"none\" stroke=\"{exited_color}\" stroke-width=\"6\"/>\n\
         \x20               <circle cx=\"21\" cy=\"21\" r=\"15.915\" fill=\"none\" stroke=\"var(--inside)\" stroke-width=\"6\" \
         stroke-dasharray=\"{inside_pct:.2} {rest:.2}\" stroke-dashoffset=\"25\"/>\n\
         \x20           </svg>",
        slices.inside, slices.exited
    );
    let _ = writeln!(
        out,
        "            <div class=\"legend\">\n\
         \x20               <div><span style=\"background: var(--inside)\"></span>Inside: {}</div>\n\
         \x20               <div><span style=\"background: var(--exited)\"></span>Exited: {}</div>\n\
         \x20           </div>",
        slices.inside, slices.exited
    );
    out.push_str("        </div>\n");
}

fn write_table(out: &mut String, body: &TableBody) {
    out.push_str("        <table>\n            <thead><tr>");
    for header in TABLE_HEADERS {
        let _ = write!(out, "<th>{header}</th>");
    }
    out.push_str("</tr></thead>\n            <tbody>\n");

    match body {
        TableBody::Placeholder(message) => {
            let _ = writeln!(
                out,
                "                <tr><td class=\"placeholder\" colspan=\"{}\">{}</td></tr>",
                TABLE_HEADERS.len(),
                escape_text(Some(message))
            );
        }
        TableBody::Rows(rows) => {
            for row in rows {
                let badge = match row.status {
                    EntryStatus::Inside => "inside",
                    EntryStatus::Exited => "exited",
                };
                out.push_str("                <tr>");
                for cell in [
                    &row.vehicle_no,
                    &row.visitor_name,
                    &row.phone,
                    &row.purpose,
                    &row.in_time,
                    &row.out_time,
                ] {
                    let _ = write!(out, "<td>{}</td>", escape_text(Some(cell)));
                }
                let _ = writeln!(
                    out,
                    "<td><span class=\"badge {badge}\">{}</span></td></tr>",
                    row.status
                );
            }
        }
    }

    out.push_str("            </tbody>\n        </table>\n");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::VehicleEntry;

    fn entry(no: &str, visitor: &str, out_time: Option<&str>) -> Arc<VehicleEntry> {
        Arc::new(VehicleEntry {
            vehicle_no: no.into(),
            visitor_name: Some(visitor.into()),
            phone: Some("9876543210".into()),
            purpose: None,
            in_time: "2024-03-05 09:15:00".into(),
            out_time: out_time.map(str::to_owned),
            image_path: None,
        })
    }

    #[test]
    fn escapes_free_text_in_rows() {
        let mut html = HtmlRenderer::new(ThemeMode::Light);
        html.render_table(&TableBody::from_entries(&[entry(
            "KA01<b>",
            "<script>alert(1)</script>",
            None,
        )]));
        let doc = html.finish();
        assert!(!doc.contains("<script>"));
        assert!(doc.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(doc.contains("KA01&lt;b&gt;"));
    }

    #[test]
    fn rows_keep_newest_first_order() {
        let mut html = HtmlRenderer::new(ThemeMode::Dark);
        html.render_table(&TableBody::from_entries(&[
            entry("KA01AB1234", "Ravi", None),
            entry("KA02CD5678", "Asha", Some("2024-03-05 10:00:00")),
        ]));
        let doc = html.finish();
        let second = doc.find("KA02CD5678").unwrap();
        let first = doc.find("KA01AB1234").unwrap();
        assert!(second < first);
        assert!(doc.contains("<body class=\"dark\">"));
        assert!(doc.contains("badge exited\">Exited"));
        assert!(doc.contains("badge inside\">Inside"));
    }

    #[test]
    fn failure_replaces_table_with_single_row() {
        let mut html = HtmlRenderer::new(ThemeMode::Dark);
        html.render_result_count(2, 2);
        html.render_failure(LoadFailure::Network);
        let doc = html.finish();
        assert_eq!(doc.matches("<tr><td").count(), 1);
        assert!(doc.contains("Error loading data. Is the API running?"));
        assert!(!doc.contains("Showing"));
    }

    #[test]
    fn stats_and_chart_sections() {
        let mut html = HtmlRenderer::new(ThemeMode::Dark);
        let stats = Statistics {
            total_entries: 4,
            open_entries: 1,
            closed_entries: 3,
            unique_vehicles: 2,
        };
        html.render_stats(&stats);
        html.render_chart(ChartSlices::from(&stats));
        html.render_result_count(1, 4);
        let doc = html.finish();
        assert!(doc.contains("<span class=\"value\">4</span><span class=\"label\">Total Entries"));
        assert!(doc.contains("stroke-dasharray=\"25.00 75.00\""));
        assert!(doc.contains("Showing 1 of 4 entries"));
    }

    #[test]
    fn footer_is_escaped() {
        let html = HtmlRenderer::new(ThemeMode::Light).with_footer("by \"ops\" <gate>");
        let doc = html.finish();
        assert!(doc.contains("<title>Vehicle Gate Log</title>"));
        assert!(doc.contains("by &quot;ops&quot; &lt;gate&gt;"));
    }
}
