//! Reusable widgets for the dashboard.

pub mod chart;
pub mod tab_strip;
