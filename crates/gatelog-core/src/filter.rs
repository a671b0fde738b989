// ── Client-side search ──
//
// Text query plus status selector over the loaded vehicle list. The
// pure `filter` never touches a renderer; `apply_filter` is the thin
// side-effecting wrapper used by front ends.

use std::sync::Arc;

use crate::model::{StatusFilter, VehicleEntry};
use crate::render::{Renderer, TableBody};

/// Whether any searchable field contains `needle` (already lowercased).
fn matches_query(entry: &VehicleEntry, needle: &str) -> bool {
    needle.is_empty()
        || entry
            .search_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
}

/// Entries matching both the query and the status selector, in input order.
///
/// The query is compared case-insensitively, whitespace included, against
/// vehicle number, visitor name, phone and purpose. Only the empty query
/// matches everything.
pub fn filter(
    all: &[Arc<VehicleEntry>],
    query: &str,
    status: StatusFilter,
) -> Vec<Arc<VehicleEntry>> {
    let needle = query.to_lowercase();
    all.iter()
        .filter(|e| status.matches(e.status()) && matches_query(e, &needle))
        .cloned()
        .collect()
}

/// Filter, render the surviving rows and report `shown / total`.
pub fn apply_filter<R: Renderer + ?Sized>(
    renderer: &mut R,
    all: &[Arc<VehicleEntry>],
    query: &str,
    status: StatusFilter,
) -> Vec<Arc<VehicleEntry>> {
    let shown = filter(all, query, status);
    renderer.render_table(&TableBody::from_entries(&shown));
    renderer.render_result_count(shown.len(), all.len());
    shown
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{EntryStatus, Statistics};
    use crate::render::ChartSlices;

    fn entry(no: &str, visitor: Option<&str>, purpose: Option<&str>, out: Option<&str>) -> Arc<VehicleEntry> {
        Arc::new(VehicleEntry {
            vehicle_no: no.into(),
            visitor_name: visitor.map(str::to_owned),
            phone: Some(format!("98{}", no.len())),
            purpose: purpose.map(str::to_owned),
            in_time: "2024-03-05 09:15:00".into(),
            out_time: out.map(str::to_owned),
            image_path: None,
        })
    }

    fn sample() -> Vec<Arc<VehicleEntry>> {
        vec![
            entry("KA01AB1234", Some("Ravi Kumar"), Some("Delivery"), None),
            entry("KA02CD5678", Some("Asha"), Some("Meeting"), Some("2024-03-05 10:00:00")),
            entry("MH12XY0001", None, Some("Courier"), None),
            entry("DL3CAB0099", Some("Imran"), None, Some("2024-03-05 12:30:00")),
        ]
    }

    #[test]
    fn empty_query_and_all_is_identity() {
        let all = sample();
        assert_eq!(filter(&all, "", StatusFilter::All), all);
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let all = sample();
        let hits = filter(&all, "ka02", StatusFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].vehicle_no, "KA02CD5678");

        let hits = filter(&all, "DELIV", StatusFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].vehicle_no, "KA01AB1234");
    }

    #[test]
    fn whitespace_is_part_of_the_query() {
        let all = sample();
        assert!(filter(&all, "kumar ", StatusFilter::All).is_empty());
        assert!(filter(&all, "   ", StatusFilter::All).is_empty());

        let hits = filter(&all, "ravi kumar", StatusFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].vehicle_no, "KA01AB1234");
    }

    #[test]
    fn included_iff_some_field_contains_query() {
        let all = sample();
        for query in ["a", "kumar", "98", "x", "zzz", "co"] {
            let hits = filter(&all, query, StatusFilter::All);
            for e in &all {
                let contains = e
                    .search_fields()
                    .into_iter()
                    .flatten()
                    .any(|f| f.to_lowercase().contains(query));
                assert_eq!(hits.contains(e), contains, "query {query:?} on {}", e.vehicle_no);
            }
        }
    }

    #[test]
    fn status_partitions_are_disjoint_and_exhaustive() {
        let all = sample();
        let inside = filter(&all, "", StatusFilter::Inside);
        let exited = filter(&all, "", StatusFilter::Exited);
        assert!(inside.iter().all(|e| e.status() == EntryStatus::Inside));
        assert!(exited.iter().all(|e| e.status() == EntryStatus::Exited));
        assert!(inside.iter().all(|e| !exited.contains(e)));
        assert_eq!(inside.len() + exited.len(), all.len());
    }

    #[test]
    fn query_and_status_combine_with_and() {
        let all = sample();
        assert!(filter(&all, "ka02", StatusFilter::Inside).is_empty());
        assert_eq!(filter(&all, "ka", StatusFilter::Inside).len(), 1);
    }

    #[test]
    fn input_order_is_preserved() {
        let all = sample();
        let hits = filter(&all, "", StatusFilter::Inside);
        let order: Vec<_> = hits.iter().map(|e| e.vehicle_no.as_str()).collect();
        assert_eq!(order, ["KA01AB1234", "MH12XY0001"]);
    }

    #[derive(Default)]
    struct Recorder {
        table: Option<TableBody>,
        count: Option<(usize, usize)>,
    }

    impl Renderer for Recorder {
        fn render_table(&mut self, body: &TableBody) {
            self.table = Some(body.clone());
        }
        fn render_stats(&mut self, _stats: &Statistics) {}
        fn render_chart(&mut self, _slices: ChartSlices) {}
        fn render_result_count(&mut self, shown: usize, total: usize) {
            self.count = Some((shown, total));
        }
    }

    #[test]
    fn apply_filter_renders_rows_and_count() {
        let all = vec![
            entry("KA01AB1234", None, None, None),
            entry("KA02CD5678", None, None, Some("2024-03-05 10:00:00")),
        ];
        let mut rec = Recorder::default();

        apply_filter(&mut rec, &all, "", StatusFilter::All);
        let Some(TableBody::Rows(rows)) = &rec.table else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].vehicle_no, "KA02CD5678");
        assert_eq!(rows[0].status, EntryStatus::Exited);
        assert_eq!(rows[1].vehicle_no, "KA01AB1234");
        assert_eq!(rows[1].status, EntryStatus::Inside);
        assert_eq!(rec.count, Some((2, 2)));

        let shown = apply_filter(&mut rec, &all, "ka02", StatusFilter::All);
        assert_eq!(shown.len(), 1);
        assert_eq!(rec.count, Some((1, 2)));
    }

    #[test]
    fn apply_filter_with_no_hits_renders_placeholder() {
        let all = sample();
        let mut rec = Recorder::default();
        apply_filter(&mut rec, &all, "nothing-matches", StatusFilter::All);
        assert_eq!(rec.table.unwrap().row_count(), 1);
        assert_eq!(rec.count, Some((0, 4)));
    }
}
