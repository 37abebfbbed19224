//! The persistent graph model and its reconciliation against snapshots.
//!
//! The model holds only what the graph view needs: chart buffers stay on the
//! snapshot. Reconciling produces the list of operations that were applied so
//! the rendering sink can tell whether it has anything to re-sync.

use std::collections::BTreeMap;

use super::snapshot::Snapshot;

/// Display attributes applied to every projected entry.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphStyle {
	/// Label font in vis shorthand (`"<size> <face> <colour>"`).
	pub node_font: String,
	/// Line width of every edge.
	pub edge_width: f64,
}

impl Default for GraphStyle {
	fn default() -> Self {
		Self {
			node_font: "14px arial white".to_string(),
			edge_width: 2.0,
		}
	}
}

/// A node as displayed by the graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	/// Always echoes `id`.
	pub label: String,
	pub color: String,
	pub font: String,
}

/// An edge as displayed by the graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub id: String,
	pub from: String,
	pub to: String,
	pub color: String,
	pub width: f64,
	pub arrows: String,
}

impl GraphEdge {
	pub fn arrowheads(&self) -> Arrowheads {
		Arrowheads::parse(&self.arrows)
	}
}

/// Which ends of an edge carry an arrowhead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Arrowheads {
	pub to: bool,
	pub from: bool,
	pub middle: bool,
}

impl Arrowheads {
	/// Parse a vis-style marker list such as `"to;from;"` or `"to, middle"`.
	/// Unknown markers are ignored.
	pub fn parse(markers: &str) -> Self {
		let mut heads = Self::default();
		for token in markers.split([';', ',', ' ']).map(str::trim) {
			match token {
				"to" => heads.to = true,
				"from" => heads.from = true,
				"middle" => heads.middle = true,
				_ => {}
			}
		}
		heads
	}
}

/// One change to the graph model.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphOp {
	UpsertNode(GraphNode),
	RemoveNode(String),
	UpsertEdge(GraphEdge),
	RemoveEdge(String),
}

/// Nodes and edges currently on display, keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	nodes: BTreeMap<String, GraphNode>,
	edges: BTreeMap<String, GraphEdge>,
}

impl GraphModel {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
		self.nodes.values()
	}

	pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
		self.edges.values()
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.get(id)
	}

	pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
		self.edges.get(id)
	}

	pub fn node_ids(&self) -> impl Iterator<Item = &str> {
		self.nodes.keys().map(String::as_str)
	}

	pub fn edge_ids(&self) -> impl Iterator<Item = &str> {
		self.edges.keys().map(String::as_str)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Compute the operations that would bring the model in line with
	/// `snapshot`, without touching the model.
	///
	/// Removals come first (edges, then nodes), followed by node and edge
	/// upserts. Upserts are only emitted for entries that are new or differ from
	/// what the model holds. If a snapshot repeats an id, the last record wins.
	pub fn diff(&self, snapshot: &Snapshot, style: &GraphStyle) -> Vec<GraphOp> {
		let nodes: BTreeMap<&str, GraphNode> = snapshot
			.nodes
			.iter()
			.map(|n| {
				let node = GraphNode {
					id: n.id.clone(),
					label: n.id.clone(),
					color: n.color.clone(),
					font: style.node_font.clone(),
				};
				(n.id.as_str(), node)
			})
			.collect();
		let edges: BTreeMap<&str, GraphEdge> = snapshot
			.edges
			.iter()
			.map(|e| {
				let edge = GraphEdge {
					id: e.id.clone(),
					from: e.from.clone(),
					to: e.to.clone(),
					color: e.color.clone(),
					width: style.edge_width,
					arrows: e.arrows.clone(),
				};
				(e.id.as_str(), edge)
			})
			.collect();

		let mut ops = Vec::new();
		ops.extend(
			self.edges
				.keys()
				.filter(|id| !edges.contains_key(id.as_str()))
				.map(|id| GraphOp::RemoveEdge(id.clone())),
		);
		ops.extend(
			self.nodes
				.keys()
				.filter(|id| !nodes.contains_key(id.as_str()))
				.map(|id| GraphOp::RemoveNode(id.clone())),
		);
		for (id, node) in nodes {
			if self.nodes.get(id) != Some(&node) {
				ops.push(GraphOp::UpsertNode(node));
			}
		}
		for (id, edge) in edges {
			if self.edges.get(id) != Some(&edge) {
				ops.push(GraphOp::UpsertEdge(edge));
			}
		}
		ops
	}

	/// Apply operations in order.
	pub fn apply(&mut self, ops: &[GraphOp]) {
		for op in ops {
			match op {
				GraphOp::UpsertNode(node) => {
					self.nodes.insert(node.id.clone(), node.clone());
				}
				GraphOp::RemoveNode(id) => {
					self.nodes.remove(id);
				}
				GraphOp::UpsertEdge(edge) => {
					self.edges.insert(edge.id.clone(), edge.clone());
				}
				GraphOp::RemoveEdge(id) => {
					self.edges.remove(id);
				}
			}
		}
	}

	/// Bring the model in line with `snapshot` and return what changed.
	///
	/// The diff is computed in full before anything is applied, so the model is
	/// never observed half-updated.
	pub fn reconcile(&mut self, snapshot: &Snapshot, style: &GraphStyle) -> Vec<GraphOp> {
		let ops = self.diff(snapshot, style);
		self.apply(&ops);
		ops
	}
}
