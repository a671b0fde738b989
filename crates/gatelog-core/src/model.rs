// ── Domain types ──
//
// Canonical, normalized views of what the gate-log API reports. Empty
// strings from the API are folded into `None` during conversion, so an
// `Option` here always means "nothing to show".

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether a vehicle is still on the premises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EntryStatus {
    Inside,
    Exited,
}

/// One logged vehicle visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleEntry {
    pub vehicle_no: String,
    pub visitor_name: Option<String>,
    pub phone: Option<String>,
    pub purpose: Option<String>,
    /// Raw timestamp string as reported by the API.
    pub in_time: String,
    /// Raw timestamp string; `None` while the vehicle is inside.
    pub out_time: Option<String>,
    pub image_path: Option<String>,
}

impl VehicleEntry {
    /// Status is derived from `out_time` alone.
    pub fn status(&self) -> EntryStatus {
        if self.out_time.is_some() {
            EntryStatus::Exited
        } else {
            EntryStatus::Inside
        }
    }

    pub fn is_inside(&self) -> bool {
        self.status() == EntryStatus::Inside
    }

    /// The free-text fields searched by the filter.
    pub fn search_fields(&self) -> [Option<&str>; 4] {
        [
            Some(self.vehicle_no.as_str()),
            self.visitor_name.as_deref(),
            self.phone.as_deref(),
            self.purpose.as_deref(),
        ]
    }
}

/// Aggregate counters reported by the API. Trusted verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_entries: u64,
    pub open_entries: u64,
    pub closed_entries: u64,
    pub unique_vehicles: u64,
}

/// All logged visits of a single vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleHistory {
    pub vehicle_no: String,
    pub count: u64,
    pub entries: Vec<VehicleEntry>,
}

impl VehicleHistory {
    /// The visit still open, if any.
    pub fn open_entry(&self) -> Option<&VehicleEntry> {
        self.entries.iter().rev().find(|e| e.is_inside())
    }
}

// ── Filter selector ──────────────────────────────────────────────────

/// Status selector applied on top of the text query.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Inside,
    Exited,
}

impl StatusFilter {
    pub fn matches(self, status: EntryStatus) -> bool {
        match self {
            Self::All => true,
            Self::Inside => status == EntryStatus::Inside,
            Self::Exited => status == EntryStatus::Exited,
        }
    }

    /// Next selector in `all -> inside -> exited -> all` order.
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Inside,
            Self::Inside => Self::Exited,
            Self::Exited => Self::All,
        }
    }
}

// ── Theme preference ─────────────────────────────────────────────────

/// Dashboard color scheme.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}
