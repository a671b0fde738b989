// ── Rendering contract ──
//
// View models plus the `Renderer` capability trait. Front ends (HTML
// report, terminal dashboard) implement `Renderer`; everything that
// decides *what* to show lives here and is testable without either.

pub mod html;

use std::sync::Arc;

use crate::error::LoadFailure;
use crate::format::{display_or_dash, format_timestamp};
use crate::model::{EntryStatus, Statistics, VehicleEntry};

pub use html::HtmlRenderer;

/// Placeholder row text for an empty vehicle list.
pub const EMPTY_MESSAGE: &str = "No vehicles logged yet.";

/// Placeholder row text while the first load is in flight.
pub const LOADING_MESSAGE: &str = "Loading...";

// ── Table ────────────────────────────────────────────────────────────

/// One display-ready table row. Text is plain; escaping is the
/// renderer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub vehicle_no: String,
    pub visitor_name: String,
    pub phone: String,
    pub purpose: String,
    pub in_time: String,
    pub out_time: String,
    pub status: EntryStatus,
}

impl From<&VehicleEntry> for RowView {
    fn from(entry: &VehicleEntry) -> Self {
        Self {
            vehicle_no: entry.vehicle_no.clone(),
            visitor_name: display_or_dash(entry.visitor_name.as_deref()).to_owned(),
            phone: display_or_dash(entry.phone.as_deref()).to_owned(),
            purpose: display_or_dash(entry.purpose.as_deref()).to_owned(),
            in_time: format_timestamp(Some(&entry.in_time)),
            out_time: format_timestamp(entry.out_time.as_deref()),
            status: entry.status(),
        }
    }
}

/// Contents of the vehicle table: either rows or a single message row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Placeholder(String),
    Rows(Vec<RowView>),
}

impl TableBody {
    /// Rows newest first, or the empty placeholder.
    pub fn from_entries(entries: &[Arc<VehicleEntry>]) -> Self {
        if entries.is_empty() {
            return Self::Placeholder(EMPTY_MESSAGE.to_owned());
        }
        Self::Rows(
            entries
                .iter()
                .rev()
                .map(|e| RowView::from(e.as_ref()))
                .collect(),
        )
    }

    pub fn from_failure(failure: LoadFailure) -> Self {
        Self::Placeholder(failure.message().to_owned())
    }

    pub fn loading() -> Self {
        Self::Placeholder(LOADING_MESSAGE.to_owned())
    }

    /// Number of visual rows (a placeholder counts as one).
    pub fn row_count(&self) -> usize {
        match self {
            Self::Placeholder(_) => 1,
            Self::Rows(rows) => rows.len(),
        }
    }
}

// ── Chart ────────────────────────────────────────────────────────────

/// The two slices of the occupancy chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartSlices {
    pub inside: u64,
    pub exited: u64,
}

impl ChartSlices {
    pub fn total(self) -> u64 {
        self.inside.saturating_add(self.exited)
    }

    /// Share of the `inside` slice in `0.0..=1.0`; zero for an empty chart.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn inside_ratio(self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.inside as f64 / total as f64,
        }
    }
}

impl From<&Statistics> for ChartSlices {
    fn from(stats: &Statistics) -> Self {
        Self {
            inside: stats.open_entries,
            exited: stats.closed_entries,
        }
    }
}

/// Owner of the single live chart instance.
///
/// `replace_with` disposes the previous chart before building the next
/// one, so two instances never coexist.
#[derive(Debug)]
pub struct ChartSlot<C> {
    current: Option<C>,
}

impl<C> ChartSlot<C> {
    pub const fn new() -> Self {
        Self { current: None }
    }

    pub fn replace_with<F>(&mut self, make: F) -> &mut C
    where
        F: FnOnce() -> C,
    {
        drop(self.current.take());
        self.current.insert(make())
    }

    pub fn get(&self) -> Option<&C> {
        self.current.as_ref()
    }
}

impl<C> Default for ChartSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Renderer capability ──────────────────────────────────────────────

/// Output surface for the dashboard.
pub trait Renderer {
    fn render_table(&mut self, body: &TableBody);

    fn render_stats(&mut self, stats: &Statistics);

    fn render_chart(&mut self, slices: ChartSlices);

    /// Replace the table with the failure placeholder row.
    fn render_failure(&mut self, failure: LoadFailure) {
        self.render_table(&TableBody::from_failure(failure));
    }

    /// Show how many of the loaded entries are currently visible.
    fn render_result_count(&mut self, shown: usize, total: usize);
}
