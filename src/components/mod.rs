//! Rendering sinks and panels of the dashboard.

pub mod detail_panel;
pub mod network_graph;
pub mod series_chart;
