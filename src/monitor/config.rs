//! Dashboard configuration embedded in the host page.

use std::time::Duration;

use serde::Deserialize;

use super::error::{MonitorError, Result};
use super::graph::GraphStyle;

/// Range and scaling of the delay slider.
///
/// The slider runs in seconds; the committed delay is `value * step_ms`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DelaySlider {
	pub floor: u32,
	pub ceil: u32,
	/// Draw the slider right to left, so "now" sits on the right.
	pub right_to_left: bool,
	pub step_ms: u64,
}

impl Default for DelaySlider {
	fn default() -> Self {
		Self {
			floor: 0,
			ceil: 300,
			right_to_left: true,
			step_ms: 1000,
		}
	}
}

impl DelaySlider {
	/// Convert a slider position into a delay, clamping it to the range first.
	pub fn to_delay(&self, value: u32) -> Duration {
		let value = value.clamp(self.floor, self.ceil.max(self.floor));
		Duration::from_millis(u64::from(value).saturating_mul(self.step_ms))
	}
}

/// Everything the dashboard reads from `<script id="monitor-config">`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
	/// Period of the `reqData` trigger.
	pub tick_period_ms: u64,
	/// Delay announced when polling starts.
	pub initial_delay_ms: u64,
	/// Path of the WebSocket endpoint on the serving host.
	pub socket_path: String,
	/// Absolute WebSocket URL; overrides `socket_path` when set.
	pub socket_url: Option<String>,
	pub edge_width: f64,
	pub node_font: String,
	pub delay_slider: DelaySlider,
}

impl Default for MonitorConfig {
	fn default() -> Self {
		let style = GraphStyle::default();
		Self {
			tick_period_ms: 500,
			initial_delay_ms: 0,
			socket_path: "/monitor".to_string(),
			socket_url: None,
			edge_width: style.edge_width,
			node_font: style.node_font,
			delay_slider: DelaySlider::default(),
		}
	}
}

impl MonitorConfig {
	pub fn from_json(text: &str) -> Result<Self> {
		serde_json::from_str(text).map_err(MonitorError::Config)
	}

	pub fn tick_period(&self) -> Duration {
		Duration::from_millis(self.tick_period_ms)
	}

	pub fn initial_delay(&self) -> Duration {
		Duration::from_millis(self.initial_delay_ms)
	}

	pub fn graph_style(&self) -> GraphStyle {
		GraphStyle {
			node_font: self.node_font.clone(),
			edge_width: self.edge_width,
		}
	}

	/// WebSocket URL for a page served over `protocol` (e.g. `"https:"`) from
	/// `host` (e.g. `"monitor.local:3000"`).
	pub fn socket_url_for(&self, protocol: &str, host: &str) -> String {
		if let Some(url) = &self.socket_url {
			return url.clone();
		}
		let scheme = if protocol == "https:" { "wss" } else { "ws" };
		let path = if self.socket_path.starts_with('/') {
			self.socket_path.clone()
		} else {
			format!("/{}", self.socket_path)
		};
		format!("{scheme}://{host}{path}")
	}
}
