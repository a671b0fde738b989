//! Data layer between `gatelog-api` and the CLI / TUI front ends.
//!
//! - **[`Loader`]** fetches statistics and the vehicle list concurrently,
//!   applies them to the [`DataStore`], and coalesces overlapping
//!   refreshes. [`spawn_refresh_task`] drives it on a fixed period.
//!
//! - **[`DataStore`]** keeps the latest snapshot in `tokio::sync::watch`
//!   channels so front ends can read or await changes.
//!
//! - **Presentation helpers**: [`format`] (timestamps, escaping),
//!   [`filter`] (search and status selector), [`render`] (the
//!   [`Renderer`] capability trait, view models, HTML snapshot) and
//!   [`export`] (CSV).

pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod filter;
pub mod format;
pub mod loader;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, TlsVerification};
pub use error::{CoreError, LoadFailure};
pub use export::ExportError;
pub use filter::{apply_filter, filter};
pub use loader::{Loader, RefreshOutcome, VehicleSource};
pub use model::{
    EntryStatus, Statistics, StatusFilter, ThemeMode, VehicleEntry, VehicleHistory,
};
pub use render::{ChartSlices, ChartSlot, HtmlRenderer, Renderer, RowView, TableBody};
pub use scheduler::spawn_refresh_task;
pub use store::{DataStore, LoadState, VehicleSnapshot};
