// gatelog-api: Async Rust client for the gate-log vehicle entry API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::GatelogClient;
pub use error::Error;
pub use models::{RawStatistics, RawVehicle, VehicleHistory};
pub use transport::{TlsMode, TransportConfig};
