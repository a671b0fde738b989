//! Small reusable widgets for the dashboard.

pub mod occupancy;
pub mod stat_card;
pub mod status_badge;
pub mod sub_tabs;
