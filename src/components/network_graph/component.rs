//! Leptos component wrapping the network graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, zooming and click selection. An
//! animation loop runs via `requestAnimationFrame`, stepping the layout
//! simulation and redrawing each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::{CLICK_TOLERANCE, GraphViewState};
use super::theme::Theme;
use crate::monitor::graph::GraphModel;
use crate::monitor::selection::{Selection, SelectionEvent, click_events};

/// Events published by the graph view.
#[derive(Clone, Debug)]
pub enum GraphEvent {
	/// A click changed what is selected.
	Selection(SelectionEvent),
	/// The canvas is mounted and drawing.
	Loaded(HtmlCanvasElement),
}

/// Receives [`GraphEvent`]s from the canvas.
pub type GraphEventHandler = Rc<dyn Fn(GraphEvent)>;

struct GraphContext {
	state: GraphViewState,
	theme: Theme,
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn pointer(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders the reconciled graph model on a canvas sized to its parent.
///
/// The view re-syncs whenever `graph` changes and outlines whatever
/// `selection` names. Clicks are translated into selection events and passed
/// to `on_event` together with a one-off [`GraphEvent::Loaded`].
#[component]
pub fn NetworkGraphCanvas(
	#[prop(into)] graph: Signal<GraphModel>,
	#[prop(into)] selection: Signal<Selection>,
	on_event: GraphEventHandler,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init, on_event_init) =
		(context.clone(), animate.clone(), resize_cb.clone(), on_event.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::warn!("adhoc-monitor: 2d canvas context unavailable");
			return;
		};

		let theme = Theme::default();
		let mut state = GraphViewState::new(&graph.get_untracked(), w, h, &theme);
		state.set_selection(&selection.get_untracked());
		*context_init.borrow_mut() = Some(GraphContext { state, theme });

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				if c.state.animation_running {
					c.state.tick(0.016);
				}
				render::render(&c.state, &ctx, &c.theme);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}

		on_event_init(GraphEvent::Loaded(canvas));
	});

	let context_sync = context.clone();
	Effect::new(move |_| {
		let model = graph.get();
		if let Some(ref mut c) = *context_sync.borrow_mut() {
			c.state.sync(&model, &c.theme);
		}
	});

	let context_sel = context.clone();
	Effect::new(move |_| {
		let current = selection.get();
		if let Some(ref mut c) = *context_sel.borrow_mut() {
			c.state.set_selection(&current);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer(&canvas.into(), &ev);

		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.press = Some((x, y));
			if let Some(idx) = c.state.node_at_position(x, y, &c.theme) {
				c.state.drag.active = true;
				c.state.drag.node_idx = Some(idx);
				c.state.drag.start_x = x;
				c.state.drag.start_y = y;
				c.state.graph.visit_nodes(|node| {
					if node.index() == idx {
						c.state.drag.node_start_x = node.x();
						c.state.drag.node_start_y = node.y();
					}
				});
			} else {
				c.state.pan.active = true;
				c.state.pan.start_x = x;
				c.state.pan.start_y = y;
				c.state.pan.transform_start_x = c.state.transform.x;
				c.state.pan.transform_start_y = c.state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer(&canvas.into(), &ev);

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag.active {
				if let Some(idx) = c.state.drag.node_idx {
					let (dx, dy) = (
						(x - c.state.drag.start_x) / c.state.transform.k,
						(y - c.state.drag.start_y) / c.state.transform.k,
					);
					let (nx, ny) = (
						c.state.drag.node_start_x + dx as f32,
						c.state.drag.node_start_y + dy as f32,
					);
					c.state.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if c.state.pan.active {
				c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
				c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
			}
		}
	};

	let (context_mu, on_event_mu) = (context.clone(), on_event.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer(&canvas.into(), &ev);

		let target = {
			let mut guard = context_mu.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			let clicked = c
				.state
				.press
				.take()
				.is_some_and(|(px, py)| ((x - px).powi(2) + (y - py).powi(2)).sqrt() < CLICK_TOLERANCE);
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
			if !clicked {
				return;
			}
			c.state.pick(x, y, &c.theme)
		};

		for event in click_events(&selection.get_untracked(), target) {
			on_event_mu(GraphEvent::Selection(event));
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.press = None;
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer(&canvas.into(), &ev);

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (c.state.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / c.state.transform.k;
			c.state.transform.x = x - (x - c.state.transform.x) * ratio;
			c.state.transform.y = y - (y - c.state.transform.y) * ratio;
			c.state.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
