//! Network graph visualization component.
//!
//! Renders the reconciled graph model on an HTML canvas with:
//! - Force-directed layout that keeps node positions across snapshots
//! - Service-assigned node and edge colours, edge widths and arrowheads
//! - Pan, zoom and node dragging
//! - Click selection of nodes and edges, reported as selection events
//!
//! # Example
//!
//! ```ignore
//! use adhoc_monitor::components::network_graph::{GraphEvent, NetworkGraphCanvas};
//!
//! let on_event = Rc::new(|event: GraphEvent| log::info!("{event:?}"));
//! view! { <NetworkGraphCanvas graph=graph selection=selection on_event=on_event /> }
//! ```

mod component;
mod render;
mod state;
pub mod theme;

pub use component::{GraphEvent, GraphEventHandler, NetworkGraphCanvas};
pub use theme::Theme;
