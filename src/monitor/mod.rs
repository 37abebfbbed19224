//! Reconciliation and derived-view engine of the dashboard.
//!
//! Everything in here is plain Rust with no browser dependencies:
//! - [`snapshot`]: the data the monitor service sends
//! - [`graph`]: the persistent graph model and its reconciliation
//! - [`selection`]: the focused node or edge
//! - [`charts`]: chart series for the speed/CPU and I/O panels
//! - [`polling`]: the request trigger and polling delay
//! - [`engine`]: one full cycle per inbound message
//!
//! The browser side (WebSocket, timers, canvases) lives in
//! [`crate::transport`] and [`crate::components`].

pub mod channel;
pub mod charts;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod polling;
pub mod selection;
pub mod snapshot;

pub use channel::{InboundMessage, MessageChannel, OutboundMessage};
pub use charts::{ChartFeeds, ChartOptions, ChartSeries, DisplayToggles, build_series};
pub use config::{DelaySlider, MonitorConfig};
pub use engine::{DiagnosticHook, MonitorEngine};
pub use error::{MonitorError, Result};
pub use graph::{GraphEdge, GraphModel, GraphNode, GraphOp, GraphStyle};
pub use polling::{PollingController, Scheduler};
pub use selection::{Focus, PickTarget, Selection, SelectionEvent};
pub use snapshot::{EdgeRecord, NodeRecord, Snapshot, SnapshotTime, TimeSeries};
