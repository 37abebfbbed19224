//! Layout simulation and interaction state for the network graph.
//!
//! Wraps the `force_graph` physics simulation with per-node display metadata
//! and the pan/zoom transform. The simulation is rebuilt from the graph model
//! whenever the model changes, carrying over the position of every node that
//! survives so the layout does not jump between snapshots.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::theme::{Theme, split_font};
use crate::monitor::graph::{Arrowheads, GraphModel};
use crate::monitor::selection::{PickTarget, Selection};

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	/// CSS colour, empty when the service sent none.
	pub color: String,
	/// Canvas font for the label.
	pub font: String,
	pub label_color: String,
}

/// An edge between two simulated nodes.
#[derive(Clone, Debug)]
pub struct EdgeView {
	pub id: String,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub color: String,
	pub width: f64,
	pub arrows: Arrowheads,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Pointer travel (screen pixels) below which a press counts as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 400.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

/// Distance from point `(px, py)` to the segment `(x1, y1)-(x2, y2)`.
pub fn segment_distance(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < f64::EPSILON {
		0.0
	} else {
		(((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Graph view state: simulation, edges with display data, transform and the
/// ids currently selected.
pub struct GraphViewState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeView>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	/// Where the current press started, for click detection.
	pub press: Option<(f64, f64)>,
	pub selected_node: Option<String>,
	pub selected_edge: Option<String>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
}

impl GraphViewState {
	pub fn new(model: &GraphModel, width: f64, height: f64, theme: &Theme) -> Self {
		let mut state = Self {
			graph: simulation(),
			edges: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			press: None,
			selected_node: None,
			selected_edge: None,
			width,
			height,
			animation_running: true,
		};
		state.sync(model, theme);
		state
	}

	/// Rebuild the simulation from `model`.
	///
	/// Surviving nodes keep their position and anchoring; new nodes are placed
	/// on a ring around the origin. Edges whose ends are not both present are
	/// not drawn.
	pub fn sync(&mut self, model: &GraphModel, theme: &Theme) {
		let mut placed: HashMap<String, (f32, f32, bool)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			placed.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		let mut graph = simulation();
		let mut id_to_idx = HashMap::new();
		let count = model.node_count().max(1);

		for (i, node) in model.nodes().enumerate() {
			let (x, y, is_anchor) = placed.get(&node.id).copied().unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / count as f64;
				((100.0 * angle.cos()) as f32, (100.0 * angle.sin()) as f32, false)
			});
			let (font, label_color) = split_font(&node.font, theme.node.label_color);
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: node.color.clone(),
					font,
					label_color,
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		let mut edges = Vec::new();
		for edge in model.edges() {
			if let (Some(&source), Some(&target)) =
				(id_to_idx.get(edge.from.as_str()), id_to_idx.get(edge.to.as_str()))
			{
				graph.add_edge(source, target, EdgeData::default());
				edges.push(EdgeView {
					id: edge.id.clone(),
					source,
					target,
					color: edge.color.clone(),
					width: edge.width,
					arrows: edge.arrowheads(),
				});
			}
		}

		self.graph = graph;
		self.edges = edges;
	}

	pub fn set_selection(&mut self, selection: &Selection) {
		self.selected_node = selection.node().map(str::to_string);
		self.selected_edge = selection.edge().map(str::to_string);
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64, theme: &Theme) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < theme.node.radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64, theme: &Theme) -> Option<&EdgeView> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.positions();
		self.edges
			.iter()
			.filter_map(|edge| {
				let (x1, y1) = positions.get(&edge.source)?;
				let (x2, y2) = positions.get(&edge.target)?;
				let distance = segment_distance(gx, gy, *x1, *y1, *x2, *y2);
				let reach = edge.width / 2.0 + theme.edge.hit_slop / self.transform.k;
				(distance <= reach).then_some((distance, edge))
			})
			.min_by(|a, b| a.0.total_cmp(&b.0))
			.map(|(_, edge)| edge)
	}

	fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	/// What a click at screen position `(sx, sy)` lands on. Nodes win over edges.
	pub fn pick(&self, sx: f64, sy: f64, theme: &Theme) -> Option<PickTarget> {
		if let Some(id) = self.node_at_position(sx, sy, theme).and_then(|idx| self.node_id(idx)) {
			return Some(PickTarget::Node(id));
		}
		self.edge_at_position(sx, sy, theme)
			.map(|edge| PickTarget::Edge(edge.id.clone()))
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn segment_distance_clamps_to_endpoints() {
		assert_eq!(segment_distance(5.0, 3.0, 0.0, 0.0, 10.0, 0.0), 3.0);
		assert_eq!(segment_distance(-4.0, 3.0, 0.0, 0.0, 10.0, 0.0), 5.0);
		assert_eq!(segment_distance(13.0, 4.0, 0.0, 0.0, 10.0, 0.0), 5.0);
		assert_eq!(segment_distance(3.0, 4.0, 0.0, 0.0, 0.0, 0.0), 5.0);
	}
}
