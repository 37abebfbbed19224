//! Side panel listing the fields of the focused node or edge.

use leptos::prelude::*;

use crate::monitor::snapshot::property_rows;
use crate::monitor::Focus;

/// Display rows for whatever the selection focuses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailView {
	pub title: String,
	pub rows: Vec<(String, String)>,
}

impl DetailView {
	pub fn from_focus(focus: Focus<'_>) -> Self {
		match focus {
			Focus::Node(node) => {
				let mut rows = vec![("color".to_string(), node.color.clone())];
				rows.extend(property_rows(&node.extra));
				Self {
					title: format!("Node {}", node.id),
					rows,
				}
			}
			Focus::Edge(edge) => {
				let mut rows = vec![
					("from".to_string(), edge.from.clone()),
					("to".to_string(), edge.to.clone()),
					("arrows".to_string(), edge.arrows.clone()),
					("color".to_string(), edge.color.clone()),
				];
				rows.extend(property_rows(&edge.extra));
				Self {
					title: format!("Edge {}", edge.id),
					rows,
				}
			}
		}
	}
}

#[component]
pub fn DetailPanel(#[prop(into)] detail: Signal<Option<DetailView>>) -> impl IntoView {
	view! {
		<aside class="detail-panel">
			{move || match detail.get() {
				Some(shown) => {
					let rows = shown
						.rows
						.into_iter()
						.map(|(key, value)| view! { <tr><th>{key}</th><td>{value}</td></tr> })
						.collect_view();
					view! {
						<h2>{shown.title}</h2>
						<table>{rows}</table>
					}
					.into_any()
				}
				None => view! { <p class="hint">"Click a node or link for details"</p> }.into_any(),
			}}
		</aside>
	}
}
