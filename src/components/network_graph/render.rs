//! Canvas rendering for the network graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Selected-edge halo, edge lines, then arrowheads (world space)
//! 3. Nodes, selection ring and labels

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::state::{EdgeView, GraphViewState};
use super::theme::Theme;

/// Renders the complete graph to the canvas.
pub fn render(state: &GraphViewState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let positions = state.positions();
	draw_edges(state, ctx, theme, &positions);
	draw_nodes(state, ctx, theme);

	ctx.restore();
}

fn draw_background(state: &GraphViewState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bg = &theme.background;
	let gradient = if bg.use_gradient {
		ctx.create_radial_gradient(
			state.width / 2.0,
			state.height / 2.0,
			0.0,
			state.width / 2.0,
			state.height / 2.0,
			state.width.max(state.height) * 0.8,
		)
		.ok()
	} else {
		None
	};

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &bg.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &bg.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&bg.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn edge_color(edge: &EdgeView, theme: &Theme) -> String {
	if edge.color.is_empty() {
		theme.edge.fallback_color.to_css()
	} else {
		edge.color.clone()
	}
}

fn draw_edges(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	let radius = theme.node.radius;

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < radius * 2.0 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let (sx, sy) = (x1 + ux * radius, y1 + uy * radius);
		let (ex, ey) = (x2 - ux * radius, y2 - uy * radius);

		if state.selected_edge.as_deref() == Some(edge.id.as_str()) {
			ctx.set_stroke_style_str(&theme.edge.selected_color.to_css());
			ctx.set_line_width(edge.width * 4.0);
			ctx.begin_path();
			ctx.move_to(sx, sy);
			ctx.line_to(ex, ey);
			ctx.stroke();
		}

		let color = edge_color(edge, theme);
		ctx.set_stroke_style_str(&color);
		ctx.set_line_width(edge.width);
		ctx.begin_path();
		ctx.move_to(sx, sy);
		ctx.line_to(ex, ey);
		ctx.stroke();

		ctx.set_fill_style_str(&color);
		let size = theme.edge.arrow_size;
		if edge.arrows.to {
			draw_arrowhead(ctx, ex, ey, ux, uy, size);
		}
		if edge.arrows.from {
			draw_arrowhead(ctx, sx, sy, -ux, -uy, size);
		}
		if edge.arrows.middle {
			let (mx, my) = ((sx + ex) / 2.0 + ux * size / 2.0, (sy + ey) / 2.0 + uy * size / 2.0);
			draw_arrowhead(ctx, mx, my, ux, uy, size);
		}
	}
}

/// Filled triangle with its tip at `(tip_x, tip_y)` pointing along `(ux, uy)`.
fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip_x: f64, tip_y: f64, ux: f64, uy: f64, size: f64) {
	let (back_x, back_y) = (tip_x - ux * size, tip_y - uy * size);
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(state: &GraphViewState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let style = &theme.node;
	let fallback = style.fallback_color.to_css();

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);

		ctx.begin_path();
		let _ = ctx.arc(x, y, style.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if info.color.is_empty() { &fallback } else { &info.color });
		ctx.fill();
		if style.border_width > 0.0 {
			ctx.set_stroke_style_str(&style.border_color.to_css());
			ctx.set_line_width(style.border_width);
			ctx.stroke();
		}

		if state.selected_node.as_deref() == Some(info.id.as_str()) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, style.radius + 4.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&style.selected_ring.to_css());
			ctx.set_line_width(2.0);
			ctx.stroke();
		}

		ctx.set_font(&info.font);
		ctx.set_fill_style_str(&info.label_color);
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		let _ = ctx.fill_text(&info.label, x, y + style.radius + style.label_offset);
	});
}
