// ── API-to-domain type conversions ──
//
// Bridges raw `gatelog_api` wire types into `gatelog_core::model`.
// Blank strings are treated as absent: the server writes an open
// entry's exit column as `""` and leaves unknown visitor fields empty.

use gatelog_api::models::{RawStatistics, RawVehicle, VehicleHistory as RawHistory};

use crate::model::{Statistics, VehicleEntry, VehicleHistory};

/// Fold empty or whitespace-only strings into `None`.
fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

impl From<RawVehicle> for VehicleEntry {
    fn from(raw: RawVehicle) -> Self {
        Self {
            vehicle_no: raw.vehicle_no,
            visitor_name: non_blank(raw.visitor_name),
            phone: non_blank(raw.phone),
            purpose: non_blank(raw.purpose),
            in_time: raw.in_time,
            out_time: non_blank(raw.out_time),
            image_path: non_blank(raw.image_path),
        }
    }
}

impl From<RawStatistics> for Statistics {
    fn from(raw: RawStatistics) -> Self {
        Self {
            total_entries: raw.total_entries,
            open_entries: raw.open_entries,
            closed_entries: raw.closed_entries,
            unique_vehicles: raw.unique_vehicles,
        }
    }
}

impl From<RawHistory> for VehicleHistory {
    fn from(raw: RawHistory) -> Self {
        Self {
            vehicle_no: raw.vehicle_no,
            count: raw.count,
            entries: raw.entries.into_iter().map(VehicleEntry::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryStatus;

    fn raw(out_time: Option<&str>) -> RawVehicle {
        RawVehicle {
            vehicle_no: "MH12XY0001".into(),
            visitor_name: Some(String::new()),
            phone: Some("  ".into()),
            purpose: Some("Meeting".into()),
            in_time: "2024-03-05 11:00:00".into(),
            out_time: out_time.map(str::to_owned),
            image_path: None,
        }
    }

    #[test]
    fn empty_out_time_means_inside() {
        let entry = VehicleEntry::from(raw(Some("")));
        assert_eq!(entry.out_time, None);
        assert_eq!(entry.status(), EntryStatus::Inside);
    }

    #[test]
    fn present_out_time_means_exited() {
        let entry = VehicleEntry::from(raw(Some("2024-03-05 12:00:00")));
        assert_eq!(entry.status(), EntryStatus::Exited);
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let entry = VehicleEntry::from(raw(None));
        assert_eq!(entry.visitor_name, None);
        assert_eq!(entry.phone, None);
        assert_eq!(entry.purpose.as_deref(), Some("Meeting"));
    }

    #[test]
    fn history_converts_every_entry() {
        let history = VehicleHistory::from(RawHistory {
            vehicle_no: "MH12XY0001".into(),
            count: 2,
            entries: vec![raw(Some("2024-03-05 12:00:00")), raw(Some(""))],
        });
        assert_eq!(history.count, 2);
        assert_eq!(history.entries[1].status(), EntryStatus::Inside);
    }
}
