//! All possible UI actions. Actions are the sole mechanism for state mutation.

use gatelog_core::{LoadState, Statistics, ThemeMode, VehicleSnapshot};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
}

/// A transient message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Overlays ──
    ToggleHelp,
    OpenSearch,
    /// Leave search mode, discarding the query.
    CloseSearch,
    /// Leave search mode, keeping the query applied.
    SearchSubmit,
    SearchInput(String),

    // ── Dashboard ──
    CycleStatusFilter,
    RequestRefresh,
    ToggleTheme,
    ThemeChanged(ThemeMode),
    RequestExport,
    Notify(Notification),

    // ── Data (from the bridge) ──
    VehiclesUpdated(VehicleSnapshot),
    StatisticsUpdated(Statistics),
    LoadStateChanged(LoadState),
}
