//! adhoc-monitor: live dashboard for an ad-hoc network of monitored nodes.
//!
//! The crate keeps a force-directed network graph, a selection and two chart
//! feeds in sync with snapshots pushed by the monitor service over a
//! WebSocket, and polls the service on a fixed period.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlScriptElement, Window};

pub mod components;
pub mod monitor;
pub mod transport;

use components::detail_panel::{DetailPanel, DetailView};
use components::network_graph::{GraphEvent, GraphEventHandler, NetworkGraphCanvas};
use components::series_chart::SeriesChart;
use monitor::{ChartOptions, DisplayToggles, MonitorConfig, MonitorEngine, PollingController};
use transport::{IntervalScheduler, WebSocketChannel};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("adhoc-monitor: logging initialized");
}

/// Load the dashboard configuration from a script element with
/// id="monitor-config". Missing or malformed config falls back to defaults.
fn load_config() -> MonitorConfig {
	let Some(text) = config_text() else {
		info!("adhoc-monitor: no monitor-config element, using defaults");
		return MonitorConfig::default();
	};
	match MonitorConfig::from_json(&text) {
		Ok(config) => {
			info!(
				"adhoc-monitor: config loaded, tick {}ms, initial delay {}ms",
				config.tick_period_ms, config.initial_delay_ms
			);
			config
		}
		Err(e) => {
			warn!("adhoc-monitor: {}, using defaults", e);
			MonitorConfig::default()
		}
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("monitor-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

fn socket_url(config: &MonitorConfig) -> Option<String> {
	let location = web_sys::window()?.location();
	let protocol = location.protocol().ok()?;
	let host = location.host().ok()?;
	Some(config.socket_url_for(&protocol, &host))
}

/// Signals the view reads; refreshed from the engine after every change.
#[derive(Clone, Copy)]
struct DashboardSignals {
	graph: RwSignal<monitor::GraphModel>,
	selection: RwSignal<monitor::Selection>,
	charts: RwSignal<monitor::ChartFeeds>,
	detail: RwSignal<Option<DetailView>>,
	network_time: RwSignal<String>,
}

impl DashboardSignals {
	fn new() -> Self {
		Self {
			graph: RwSignal::new(Default::default()),
			selection: RwSignal::new(Default::default()),
			charts: RwSignal::new(Default::default()),
			detail: RwSignal::new(None),
			network_time: RwSignal::new(String::new()),
		}
	}

	fn publish(&self, engine: &MonitorEngine, graph_changed: bool) {
		if graph_changed {
			self.graph.set(engine.graph().clone());
		}
		if self.selection.with_untracked(|s| s != engine.selection()) {
			self.selection.set(engine.selection().clone());
		}
		self.charts.set(engine.charts().clone());
		self.detail.set(engine.focus().map(DetailView::from_focus));
		if let Some(time) = engine.network_time() {
			self.network_time.set(time.to_string());
		}
	}
}

type Poller = PollingController<IntervalScheduler>;

fn start_polling(config: &MonitorConfig, engine: Rc<RefCell<MonitorEngine>>, signals: DashboardSignals) -> Option<Poller> {
	let url = socket_url(config)?;
	let on_frame = move |frame: String| {
		let mut engine = engine.borrow_mut();
		if let Some(ops) = engine.handle_frame(&frame) {
			signals.publish(&engine, !ops.is_empty());
		}
	};
	let channel = match WebSocketChannel::connect(&url, on_frame) {
		Ok(channel) => channel,
		Err(e) => {
			warn!("adhoc-monitor: cannot open {}: {}", url, e);
			return None;
		}
	};

	let mut poller = PollingController::new(Rc::new(channel), IntervalScheduler, config.initial_delay());
	if let Err(e) = poller.start(config.tick_period()) {
		warn!("adhoc-monitor: polling not started: {}", e);
	}
	Some(poller)
}

/// Main application component.
/// Connects to the monitor service and renders graph, charts and controls.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let engine = Rc::new(RefCell::new(MonitorEngine::new(config.graph_style())));
	let signals = DashboardSignals::new();
	let poller = Rc::new(RefCell::new(start_polling(&config, engine.clone(), signals)));

	// Graph events
	let surface: Rc<RefCell<Option<HtmlCanvasElement>>> = Rc::new(RefCell::new(None));
	let engine_graph = engine.clone();
	let on_graph_event: GraphEventHandler = Rc::new(move |event| match event {
		GraphEvent::Selection(change) => {
			let mut engine = engine_graph.borrow_mut();
			engine.on_selection(change);
			signals.publish(&engine, false);
		}
		GraphEvent::Loaded(canvas) => {
			info!("adhoc-monitor: graph surface ready");
			*surface.borrow_mut() = Some(canvas);
		}
	});

	// Toggles
	let toggles = RwSignal::new(DisplayToggles::default());
	let engine_toggles = engine.clone();
	let apply_toggles = move |next: DisplayToggles| {
		toggles.set(next);
		let mut engine = engine_toggles.borrow_mut();
		engine.set_toggles(next);
		signals.publish(&engine, false);
	};
	let apply_speed = apply_toggles.clone();
	let on_speed_toggle = move |ev: web_sys::Event| {
		apply_speed(DisplayToggles {
			show_speed_chart: event_target_checked(&ev),
			..toggles.get_untracked()
		});
	};
	let on_total_cpu_toggle = move |ev: web_sys::Event| {
		apply_toggles(DisplayToggles {
			show_total_cpu_chart: event_target_checked(&ev),
			..toggles.get_untracked()
		});
	};

	// Delay slider
	let slider = config.delay_slider.clone();
	let initial = u32::try_from(config.initial_delay_ms / slider.step_ms.max(1)).unwrap_or(slider.ceil);
	let slider_value = RwSignal::new(initial);
	let on_slide = move |ev: web_sys::Event| {
		if let Ok(value) = event_target_value(&ev).parse::<u32>() {
			slider_value.set(value);
		}
	};
	let slider_commit = slider.clone();
	let on_commit = move |ev: web_sys::Event| {
		let Ok(value) = event_target_value(&ev).parse::<u32>() else {
			return;
		};
		slider_value.set(value);
		if let Some(poller) = poller.borrow_mut().as_mut() {
			poller.set_delay(slider_commit.to_delay(value));
		}
	};
	let slider_style = if slider.right_to_left { "direction: rtl;" } else { "" };

	let speed_series = Signal::derive(move || signals.charts.with(|c| c.speed.clone()));
	let io_series = Signal::derive(move || signals.charts.with(|c| c.io.clone()));
	let speed_options = Signal::derive(move || ChartOptions::speed_panel(toggles.get()));
	let speed_title = Signal::derive(move || {
		if toggles.get().show_speed_chart {
			"Speed".to_string()
		} else {
			"CPU usage (%)".to_string()
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Ad-hoc Network Monitor" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<header class="monitor-header">
			<h1>"Ad-hoc Network Monitor"</h1>
			<p class="network-time">"Network time: " {move || signals.network_time.get()}</p>
		</header>

		<main class="monitor-layout">
			<div class="graph-pane">
				<NetworkGraphCanvas
					graph=signals.graph
					selection=signals.selection
					on_event=on_graph_event
				/>
			</div>

			<div class="side-pane">
				<section class="controls">
					<label>
						"Delay: " {move || slider_value.get()} "s"
						<input
							type="range"
							min=slider.floor.to_string()
							max=slider.ceil.to_string()
							step="1"
							value=initial.to_string()
							style=slider_style
							on:input=on_slide
							on:change=on_commit
						/>
					</label>
					<label>
						<input type="checkbox" on:change=on_speed_toggle />
						"Show speed instead of CPU"
					</label>
					<label>
						<input type="checkbox" on:change=on_total_cpu_toggle />
						"Show total CPU"
					</label>
				</section>

				<SeriesChart series=speed_series options=speed_options title=speed_title />
				<SeriesChart
					series=io_series
					options=Signal::derive(ChartOptions::throughput)
					title=Signal::stored("Network I/O".to_string())
				/>
				<DetailPanel detail=signals.detail />
			</div>
		</main>
	}
}
