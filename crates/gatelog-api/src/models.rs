// Wire types for the gate-log API.
//
// Every endpoint answers with a flat JSON object carrying a `status`
// marker next to its payload:
//
//   { "status": "success", "statistics": { ... } }
//   { "status": "success", "count": 2, "vehicles": [ ... ] }
//
// The marker is checked by the client before the payload is decoded.
// Fields use `#[serde(default)]` liberally because the server fills
// missing CSV columns with empty strings or drops them entirely.

use serde::{Deserialize, Serialize};

/// Value of the `status` field on a successful response.
pub const SUCCESS_STATUS: &str = "success";

// ── Vehicles ─────────────────────────────────────────────────────────

/// One logged vehicle visit as returned by `/vehicles` and `/vehicle/{no}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVehicle {
    pub vehicle_no: String,
    #[serde(default)]
    pub visitor_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub in_time: String,
    /// Empty string or null while the vehicle is still inside.
    #[serde(default)]
    pub out_time: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Payload of `GET /vehicles`.
#[derive(Debug, Deserialize)]
pub struct VehiclesResponse {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub vehicles: Vec<RawVehicle>,
}

/// Payload of `GET /vehicle/{vehicle_no}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleHistory {
    pub vehicle_no: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub entries: Vec<RawVehicle>,
}

// ── Statistics ───────────────────────────────────────────────────────

/// Counters from `GET /stats`. Trusted verbatim; absent counters read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatistics {
    #[serde(default)]
    pub total_entries: u64,
    #[serde(default)]
    pub open_entries: u64,
    #[serde(default)]
    pub closed_entries: u64,
    #[serde(default)]
    pub unique_vehicles: u64,
}

/// Payload of `GET /stats`.
#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    pub statistics: RawStatistics,
}

// ── Errors ───────────────────────────────────────────────────────────

/// Error body produced by the server framework (`{"detail": "..."}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
