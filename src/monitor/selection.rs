//! Which node or edge the user has focused, kept valid across snapshots.

use super::snapshot::{EdgeRecord, NodeRecord, Snapshot};

/// A selection change reported by the graph view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
	SelectNode(String),
	DeselectNode,
	SelectEdge(String),
	DeselectEdge,
}

/// What a pointer click on the graph surface landed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickTarget {
	Node(String),
	Edge(String),
}

/// The focused record of the latest snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Focus<'a> {
	Node(&'a NodeRecord),
	Edge(&'a EdgeRecord),
}

/// The selected node id and selected edge id.
///
/// Both can be set at once; the node always takes precedence for anything
/// derived from the selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	node: Option<String>,
	edge: Option<String>,
}

impl Selection {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn node(&self) -> Option<&str> {
		self.node.as_deref()
	}

	pub fn edge(&self) -> Option<&str> {
		self.edge.as_deref()
	}

	pub fn on_select_node(&mut self, id: impl Into<String>) {
		self.node = Some(id.into());
	}

	pub fn on_deselect_node(&mut self) {
		self.node = None;
	}

	pub fn on_select_edge(&mut self, id: impl Into<String>) {
		self.edge = Some(id.into());
	}

	pub fn on_deselect_edge(&mut self) {
		self.edge = None;
	}

	pub fn apply(&mut self, event: SelectionEvent) {
		match event {
			SelectionEvent::SelectNode(id) => self.on_select_node(id),
			SelectionEvent::DeselectNode => self.on_deselect_node(),
			SelectionEvent::SelectEdge(id) => self.on_select_edge(id),
			SelectionEvent::DeselectEdge => self.on_deselect_edge(),
		}
	}

	/// Drop selections whose entity is gone from `snapshot`.
	///
	/// The node is checked first. The edge is only checked (and possibly
	/// cleared) while no node is selected, since a selected node hides the edge
	/// detail anyway.
	pub fn reconcile(&mut self, snapshot: &Snapshot) {
		if let Some(id) = &self.node {
			if snapshot.node(id).is_none() {
				self.node = None;
			}
		}
		if self.node.is_none() {
			if let Some(id) = &self.edge {
				if snapshot.edge(id).is_none() {
					self.edge = None;
				}
			}
		}
	}

	/// The record to show in the detail panel, if any.
	pub fn focus<'a>(&self, snapshot: &'a Snapshot) -> Option<Focus<'a>> {
		match (&self.node, &self.edge) {
			(Some(node), _) => snapshot.node(node).map(Focus::Node),
			(None, Some(edge)) => snapshot.edge(edge).map(Focus::Edge),
			(None, None) => None,
		}
	}
}

/// Translate a click into selection events, the way a vis network does.
///
/// Clicking the entity that is already selected produces nothing.
pub fn click_events(current: &Selection, target: Option<PickTarget>) -> Vec<SelectionEvent> {
	let mut events = Vec::new();
	match target {
		Some(PickTarget::Node(id)) => {
			if current.node() == Some(id.as_str()) {
				return events;
			}
			if current.edge().is_some() {
				events.push(SelectionEvent::DeselectEdge);
			}
			events.push(SelectionEvent::SelectNode(id));
		}
		Some(PickTarget::Edge(id)) => {
			if current.node().is_some() {
				events.push(SelectionEvent::DeselectNode);
			}
			if current.edge() != Some(id.as_str()) {
				events.push(SelectionEvent::SelectEdge(id));
			}
		}
		None => {
			if current.node().is_some() {
				events.push(SelectionEvent::DeselectNode);
			}
			if current.edge().is_some() {
				events.push(SelectionEvent::DeselectEdge);
			}
		}
	}
	events
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn snapshot(nodes: &[&str], edges: &[&str]) -> Snapshot {
		let nodes: Vec<_> = nodes.iter().map(|id| json!({"id": id})).collect();
		let edges: Vec<_> = edges
			.iter()
			.map(|id| json!({"id": id, "from": "a", "to": "b"}))
			.collect();
		Snapshot::from_payload(json!({"nodes": nodes, "edges": edges})).unwrap()
	}

	#[test]
	fn vanished_node_is_cleared() {
		let mut selection = Selection::new();
		selection.on_select_node("A");
		selection.reconcile(&snapshot(&["B"], &[]));
		assert_eq!(selection.node(), None);
	}

	#[test]
	fn present_node_survives() {
		let mut selection = Selection::new();
		selection.on_select_node("A");
		selection.reconcile(&snapshot(&["A", "B"], &[]));
		assert_eq!(selection.node(), Some("A"));
	}

	#[test]
	fn edge_is_not_checked_while_node_selected() {
		let mut selection = Selection::new();
		selection.on_select_node("A");
		selection.on_select_edge("gone");
		selection.reconcile(&snapshot(&["A"], &[]));
		assert_eq!(selection.node(), Some("A"));
		assert_eq!(selection.edge(), Some("gone"));
	}

	#[test]
	fn edge_is_cleared_once_node_is_gone() {
		let mut selection = Selection::new();
		selection.on_select_node("A");
		selection.on_select_edge("gone");
		selection.reconcile(&snapshot(&["B"], &["e1"]));
		assert_eq!(selection.node(), None);
		assert_eq!(selection.edge(), None);
	}

	#[test]
	fn present_edge_survives() {
		let mut selection = Selection::new();
		selection.on_select_edge("e1");
		selection.reconcile(&snapshot(&[], &["e1"]));
		assert_eq!(selection.edge(), Some("e1"));
	}

	#[test]
	fn events_overwrite_and_clear() {
		let mut selection = Selection::new();
		selection.apply(SelectionEvent::SelectNode("a".into()));
		selection.apply(SelectionEvent::SelectNode("b".into()));
		selection.apply(SelectionEvent::SelectEdge("e".into()));
		assert_eq!((selection.node(), selection.edge()), (Some("b"), Some("e")));

		selection.apply(SelectionEvent::DeselectNode);
		selection.apply(SelectionEvent::DeselectEdge);
		assert_eq!(selection, Selection::new());
	}

	#[test]
	fn focus_prefers_node() {
		let s = snapshot(&["a"], &["e1"]);
		let mut selection = Selection::new();
		selection.on_select_edge("e1");
		assert!(matches!(selection.focus(&s), Some(Focus::Edge(e)) if e.id == "e1"));

		selection.on_select_node("a");
		assert!(matches!(selection.focus(&s), Some(Focus::Node(n)) if n.id == "a"));

		selection.on_select_node("missing");
		assert_eq!(selection.focus(&s), None);
	}

	#[test]
	fn clicks_map_to_events() {
		let mut selection = Selection::new();
		assert_eq!(
			click_events(&selection, Some(PickTarget::Node("a".into()))),
			vec![SelectionEvent::SelectNode("a".into())]
		);

		selection.on_select_node("a");
		assert!(click_events(&selection, Some(PickTarget::Node("a".into()))).is_empty());
		assert_eq!(
			click_events(&selection, Some(PickTarget::Edge("e".into()))),
			vec![SelectionEvent::DeselectNode, SelectionEvent::SelectEdge("e".into())]
		);

		selection.on_deselect_node();
		selection.on_select_edge("e");
		assert_eq!(
			click_events(&selection, Some(PickTarget::Node("b".into()))),
			vec![SelectionEvent::DeselectEdge, SelectionEvent::SelectNode("b".into())]
		);
		assert_eq!(click_events(&selection, None), vec![SelectionEvent::DeselectEdge]);
	}
}
