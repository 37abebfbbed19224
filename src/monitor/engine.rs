//! One reconciliation cycle per inbound snapshot.
//!
//! The engine owns the graph model, the selection, the toggles and the last
//! built chart feeds. A cycle parses the payload, reconciles the graph,
//! reconciles the selection and rebuilds the charts, all before returning, so
//! callers only ever see the state before or after a whole cycle.

use log::{debug, warn};
use serde_json::Value;

use super::channel::InboundMessage;
use super::charts::{ChartFeeds, DisplayToggles, build_series};
use super::error::MonitorError;
use super::graph::{GraphModel, GraphOp, GraphStyle};
use super::selection::{Focus, Selection, SelectionEvent};
use super::snapshot::{Snapshot, SnapshotTime};

/// Receives every recoverable error the engine swallows.
pub type DiagnosticHook = Box<dyn Fn(&MonitorError)>;

fn log_diagnostic(err: &MonitorError) {
	warn!("adhoc-monitor: discarding update: {}", err);
}

/// Client-side state of the dashboard.
pub struct MonitorEngine {
	style: GraphStyle,
	graph: GraphModel,
	selection: Selection,
	toggles: DisplayToggles,
	charts: ChartFeeds,
	latest: Option<Snapshot>,
	diagnostics: DiagnosticHook,
}

impl Default for MonitorEngine {
	fn default() -> Self {
		Self::new(GraphStyle::default())
	}
}

impl MonitorEngine {
	/// An empty engine that logs diagnostics with `warn!`.
	pub fn new(style: GraphStyle) -> Self {
		Self {
			style,
			graph: GraphModel::new(),
			selection: Selection::new(),
			toggles: DisplayToggles::default(),
			charts: ChartFeeds::default(),
			latest: None,
			diagnostics: Box::new(log_diagnostic),
		}
	}

	/// Replace the diagnostic hook.
	pub fn with_diagnostics(mut self, hook: impl Fn(&MonitorError) + 'static) -> Self {
		self.diagnostics = Box::new(hook);
		self
	}

	/// Handle a raw channel frame.
	///
	/// Returns the graph operations applied, or `None` if the frame was
	/// discarded. Discarded frames leave every piece of state untouched.
	pub fn handle_frame(&mut self, frame: &str) -> Option<Vec<GraphOp>> {
		match InboundMessage::parse(frame) {
			Ok(InboundMessage::NodeData(payload)) => self.ingest(payload),
			Err(err) => {
				(self.diagnostics)(&err);
				None
			}
		}
	}

	/// Handle the payload of a `nodeData` message.
	pub fn ingest(&mut self, payload: Value) -> Option<Vec<GraphOp>> {
		match Snapshot::from_payload(payload) {
			Ok(snapshot) => Some(self.apply_snapshot(snapshot)),
			Err(err) => {
				(self.diagnostics)(&err);
				None
			}
		}
	}

	/// Run a full cycle for an already parsed snapshot.
	pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> Vec<GraphOp> {
		let ops = self.graph.reconcile(&snapshot, &self.style);
		self.selection.reconcile(&snapshot);
		self.charts = build_series(&snapshot, &self.selection, self.toggles);
		debug!(
			"adhoc-monitor: snapshot {} with {} nodes, {} edges, {} graph ops",
			snapshot.time,
			snapshot.nodes.len(),
			snapshot.edges.len(),
			ops.len()
		);
		self.latest = Some(snapshot);
		ops
	}

	/// Apply a selection change and rebuild the charts for it.
	pub fn on_selection(&mut self, event: SelectionEvent) {
		self.selection.apply(event);
		self.rebuild_charts();
	}

	pub fn set_toggles(&mut self, toggles: DisplayToggles) {
		if self.toggles != toggles {
			self.toggles = toggles;
			self.rebuild_charts();
		}
	}

	fn rebuild_charts(&mut self) {
		if let Some(snapshot) = &self.latest {
			self.charts = build_series(snapshot, &self.selection, self.toggles);
		}
	}

	pub fn graph(&self) -> &GraphModel {
		&self.graph
	}

	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	pub fn toggles(&self) -> DisplayToggles {
		self.toggles
	}

	pub fn charts(&self) -> &ChartFeeds {
		&self.charts
	}

	/// Time of the last accepted snapshot.
	pub fn network_time(&self) -> Option<&SnapshotTime> {
		self.latest.as_ref().map(|s| &s.time)
	}

	/// The focused record of the last accepted snapshot.
	pub fn focus(&self) -> Option<Focus<'_>> {
		self.latest.as_ref().and_then(|s| self.selection.focus(s))
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use serde_json::json;

	fn payload(nodes: &[&str]) -> Value {
		let nodes: Vec<_> = nodes
			.iter()
			.map(|id| {
				json!({
					"id": id,
					"color": "green",
					"cpuUsageChart": [[0, 10]],
					"ioSendChart": [[0, 1]],
					"ioRecvChart": [[0, 2]],
					"ioTotalChart": [[0, 3]]
				})
			})
			.collect();
		json!({"time": "10:00:00", "nodes": nodes, "edges": [{"id": "a_:_b", "from": "a", "to": "b"}]})
	}

	fn frame(payload: Value) -> String {
		json!({"event": "nodeData", "data": payload.to_string()}).to_string()
	}

	fn recording_engine() -> (MonitorEngine, Rc<RefCell<Vec<String>>>) {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		let engine = MonitorEngine::default().with_diagnostics(move |err| sink.borrow_mut().push(err.to_string()));
		(engine, seen)
	}

	#[test]
	fn frame_runs_full_cycle() {
		let (mut engine, seen) = recording_engine();
		let ops = engine.handle_frame(&frame(payload(&["a", "b"]))).unwrap();
		assert_eq!(ops.len(), 3);
		assert_eq!(engine.graph().node_count(), 2);
		assert_eq!(engine.charts().speed.len(), 2);
		assert_eq!(engine.network_time(), Some(&SnapshotTime::Clock("10:00:00".into())));
		assert!(seen.borrow().is_empty());

		assert_eq!(engine.handle_frame(&frame(payload(&["a", "b"]))), Some(vec![]));
	}

	#[test]
	fn malformed_updates_change_nothing() {
		let (mut engine, seen) = recording_engine();
		engine.handle_frame(&frame(payload(&["a", "b"])));
		engine.on_selection(SelectionEvent::SelectNode("a".into()));

		let graph = engine.graph().clone();
		let selection = engine.selection().clone();
		let charts = engine.charts().clone();

		assert_eq!(engine.handle_frame("{not json"), None);
		assert_eq!(engine.handle_frame(r#"{"event":"other"}"#), None);
		assert_eq!(engine.handle_frame(&frame(json!({"nodes": "oops"}))), None);
		assert_eq!(engine.ingest(json!("[1, 2")), None);

		assert_eq!(engine.graph(), &graph);
		assert_eq!(engine.selection(), &selection);
		assert_eq!(engine.charts(), &charts);
		assert_eq!(seen.borrow().len(), 4);
		assert!(seen.borrow()[0].starts_with("unrecognised channel frame"));
		assert!(seen.borrow()[2].starts_with("malformed snapshot"));
	}

	#[test]
	fn selection_follows_membership() {
		let mut engine = MonitorEngine::default();
		engine.ingest(payload(&["a", "b"]));
		engine.on_selection(SelectionEvent::SelectNode("a".into()));
		assert_eq!(engine.charts().io.len(), 2);

		engine.ingest(payload(&["b"]));
		assert_eq!(engine.selection().node(), None);
		assert_eq!(engine.charts().io.len(), 1);
		assert_eq!(engine.charts().io[0].label, "b");
	}

	#[test]
	fn selection_and_toggles_rebuild_immediately() {
		let mut engine = MonitorEngine::default();
		engine.ingest(payload(&["a", "b"]));

		engine.on_selection(SelectionEvent::SelectNode("b".into()));
		assert_eq!(engine.charts().speed.len(), 1);
		assert_eq!(engine.charts().io[1].label, "Bytes received");

		engine.set_toggles(DisplayToggles {
			show_speed_chart: false,
			show_total_cpu_chart: true,
		});
		assert_eq!(engine.charts().speed[1].label, "b total");

		engine.on_selection(SelectionEvent::DeselectNode);
		assert_eq!(engine.charts().speed.len(), 4);
	}

	#[test]
	fn focus_tracks_selection() {
		let mut engine = MonitorEngine::default();
		assert_eq!(engine.focus(), None);

		engine.ingest(payload(&["a"]));
		engine.on_selection(SelectionEvent::SelectEdge("a_:_b".into()));
		assert!(matches!(engine.focus(), Some(Focus::Edge(e)) if e.from == "a"));

		engine.on_selection(SelectionEvent::SelectNode("a".into()));
		assert!(matches!(engine.focus(), Some(Focus::Node(n)) if n.id == "a"));
	}

	#[test]
	fn toggles_before_first_snapshot_are_kept() {
		let mut engine = MonitorEngine::default();
		let toggles = DisplayToggles {
			show_speed_chart: true,
			show_total_cpu_chart: false,
		};
		engine.set_toggles(toggles);
		assert_eq!(engine.charts(), &ChartFeeds::default());

		engine.ingest(payload(&["a"]));
		assert_eq!(engine.toggles(), toggles);
		assert!(engine.charts().speed[0].data.is_empty());
	}
}
