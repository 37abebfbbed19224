//! Canvas line chart for the speed/CPU and I/O feeds.

use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::monitor::charts::{ChartOptions, ChartSeries, LegendPosition};

const SERIES_COLORS: [&str; 8] = [
	"#7aa2ff", // blue
	"#fbbf24", // amber
	"#4ade80", // green
	"#fb7185", // pink/red
	"#a78bfa", // purple
	"#22c55e", // bright green
	"#60a5fa", // light blue
	"#e879f9", // magenta
];

const BG_COLOR: &str = "#161b22";
const GRID_COLOR: &str = "rgba(140, 160, 180, 0.15)";
const TEXT_COLOR: &str = "rgba(232, 236, 255, 0.85)";

/// Space reserved for the axis labels.
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 22.0;
const MARGIN_TOP: f64 = 8.0;
const MARGIN_RIGHT: f64 = 8.0;

/// Short value label: `950`, `1.2k`, `3.4M`.
pub fn compact_value(v: f64) -> String {
	let abs = v.abs();
	if abs >= 1_000_000_000.0 {
		format!("{:.1}G", v / 1_000_000_000.0)
	} else if abs >= 1_000_000.0 {
		format!("{:.1}M", v / 1_000_000.0)
	} else if abs >= 1_000.0 {
		format!("{:.1}k", v / 1_000.0)
	} else if abs >= 10.0 || v == 0.0 {
		format!("{v:.0}")
	} else {
		format!("{v:.1}")
	}
}

fn time_range(series: &[ChartSeries]) -> Option<(f64, f64)> {
	let (lo, hi) = series
		.iter()
		.flat_map(|s| s.data.iter().map(|p| p[0]))
		.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(t), hi.max(t)));
	if !lo.is_finite() {
		return None;
	}
	Some(if hi > lo { (lo, hi) } else { (lo - 1000.0, lo + 1000.0) })
}

fn clock_label(options: &ChartOptions, ms: f64) -> String {
	let date = js_sys::Date::new(&JsValue::from_f64(ms));
	if options.x_axis.local_time {
		options
			.x_axis
			.format(date.get_hours(), date.get_minutes(), date.get_seconds())
	} else {
		options
			.x_axis
			.format(date.get_utc_hours(), date.get_utc_minutes(), date.get_utc_seconds())
	}
}

/// Draw all `series` onto `canvas`.
pub fn draw_series_chart(
	canvas: &HtmlCanvasElement,
	series: &[ChartSeries],
	options: &ChartOptions,
) -> Result<(), String> {
	let ctx = canvas
		.get_context("2d")
		.map_err(|_| "get_context failed")?
		.ok_or("no 2d context")?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| "cast failed")?;

	let w = canvas.width() as f64;
	let h = canvas.height() as f64;
	let plot_w = (w - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
	let plot_h = (h - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);

	ctx.set_fill_style_str(BG_COLOR);
	ctx.fill_rect(0.0, 0.0, w, h);

	let (y_min, y_max) = options.y_axis.resolve(series);
	let y_of = |v: f64| MARGIN_TOP + plot_h - ((v - y_min) / (y_max - y_min)).clamp(0.0, 1.0) * plot_h;

	// Grid and value labels
	ctx.set_font("11px system-ui, sans-serif");
	ctx.set_line_width(0.5);
	for i in 0..=4 {
		let v = y_min + (y_max - y_min) * (i as f64) / 4.0;
		let y = y_of(v);
		ctx.set_stroke_style_str(GRID_COLOR);
		ctx.begin_path();
		ctx.move_to(MARGIN_LEFT, y);
		ctx.line_to(w - MARGIN_RIGHT, y);
		ctx.stroke();
		ctx.set_fill_style_str(TEXT_COLOR);
		ctx.set_text_align("right");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&compact_value(v), MARGIN_LEFT - 6.0, y);
	}

	let Some((t_min, t_max)) = time_range(series) else {
		ctx.set_text_align("left");
		let _ = ctx.fill_text("Waiting for data", MARGIN_LEFT + 10.0, MARGIN_TOP + 14.0);
		return Ok(());
	};
	let x_of = |t: f64| MARGIN_LEFT + (t - t_min) / (t_max - t_min) * plot_w;

	// Time labels
	ctx.set_text_baseline("top");
	ctx.set_text_align("center");
	for i in 0..=3 {
		let t = t_min + (t_max - t_min) * (i as f64) / 3.0;
		let _ = ctx.fill_text(&clock_label(options, t), x_of(t), h - MARGIN_BOTTOM + 6.0);
	}

	for (si, s) in series.iter().enumerate() {
		let color = SERIES_COLORS[si % SERIES_COLORS.len()];
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(2.0);
		ctx.begin_path();
		for (i, point) in s.data.iter().enumerate() {
			let (x, y) = (x_of(point[0]), y_of(point[1]));
			if i == 0 {
				ctx.move_to(x, y);
			} else {
				ctx.line_to(x, y);
			}
		}
		ctx.stroke();
	}

	draw_legend(&ctx, series, options.legend, w, h);
	Ok(())
}

fn draw_legend(ctx: &CanvasRenderingContext2d, series: &[ChartSeries], position: LegendPosition, w: f64, h: f64) {
	if series.is_empty() {
		return;
	}
	let row_h = 15.0;
	let box_w = series
		.iter()
		.map(|s| s.label.len() as f64 * 6.5 + 24.0)
		.fold(0.0, f64::max);
	let box_h = series.len() as f64 * row_h + 6.0;
	let (bx, by) = match position {
		LegendPosition::NorthWest => (MARGIN_LEFT + 6.0, MARGIN_TOP + 6.0),
		LegendPosition::NorthEast => (w - MARGIN_RIGHT - box_w - 6.0, MARGIN_TOP + 6.0),
		LegendPosition::SouthWest => (MARGIN_LEFT + 6.0, h - MARGIN_BOTTOM - box_h - 6.0),
		LegendPosition::SouthEast => (w - MARGIN_RIGHT - box_w - 6.0, h - MARGIN_BOTTOM - box_h - 6.0),
	};

	ctx.set_fill_style_str("rgba(22, 27, 34, 0.8)");
	ctx.fill_rect(bx, by, box_w, box_h);
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	for (si, s) in series.iter().enumerate() {
		let y = by + 3.0 + row_h * (si as f64) + row_h / 2.0;
		ctx.set_fill_style_str(SERIES_COLORS[si % SERIES_COLORS.len()]);
		ctx.fill_rect(bx + 6.0, y - 2.0, 10.0, 4.0);
		ctx.set_fill_style_str(TEXT_COLOR);
		let _ = ctx.fill_text(&s.label, bx + 20.0, y);
	}
}

/// Line chart that redraws whenever `series` or `options` change.
#[component]
pub fn SeriesChart(
	#[prop(into)] series: Signal<Vec<ChartSeries>>,
	#[prop(into)] options: Signal<ChartOptions>,
	#[prop(into)] title: Signal<String>,
	#[prop(default = 200.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	Effect::new(move |_| {
		let (current, opts) = (series.get(), options.get());
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let width = canvas
			.parent_element()
			.map(|p| p.client_width() as f64)
			.filter(|w| *w > 0.0)
			.unwrap_or(480.0);
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		if let Err(e) = draw_series_chart(&canvas, &current, &opts) {
			log::warn!("adhoc-monitor: chart draw failed: {}", e);
		}
	});

	view! {
		<section class="series-chart">
			<h2>{move || title.get()}</h2>
			<canvas node_ref=canvas_ref style="display: block; width: 100%;" />
		</section>
	}
}
