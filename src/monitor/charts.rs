//! Chart series derived from a snapshot, the selection and the display toggles.
//!
//! The series are rebuilt from scratch on every call. Buffers are copied
//! straight from the node records; nothing is resampled or merged.

use super::selection::Selection;
use super::snapshot::{Snapshot, TimeSeries};

/// Label of the per-node send series while a node is selected.
pub const SEND_LABEL: &str = "Bytes send";
/// Label of the per-node receive series while a node is selected.
pub const RECEIVE_LABEL: &str = "Bytes received";

/// User switches that choose which buffers feed the speed panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayToggles {
	/// Show link speed instead of CPU usage.
	pub show_speed_chart: bool,
	/// Add a total-CPU series next to each CPU series.
	pub show_total_cpu_chart: bool,
}

/// One labelled line for a chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
	pub data: TimeSeries,
	pub label: String,
}

impl ChartSeries {
	fn new(data: &TimeSeries, label: impl Into<String>) -> Self {
		Self {
			data: data.clone(),
			label: label.into(),
		}
	}
}

/// The two chart feeds shown by the dashboard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartFeeds {
	/// Speed or CPU usage, depending on the toggles.
	pub speed: Vec<ChartSeries>,
	/// Network I/O.
	pub io: Vec<ChartSeries>,
}

/// Build both chart feeds for `snapshot`.
///
/// With a node selected only that node contributes, and its I/O is split into
/// send and receive lines. Otherwise every node contributes its total I/O.
pub fn build_series(snapshot: &Snapshot, selection: &Selection, toggles: DisplayToggles) -> ChartFeeds {
	let selected = selection.node();
	let mut feeds = ChartFeeds::default();

	for node in &snapshot.nodes {
		if selected.is_some_and(|id| id != node.id) {
			continue;
		}

		if toggles.show_speed_chart {
			feeds.speed.push(ChartSeries::new(&node.speed_chart, &node.id));
		} else {
			feeds.speed.push(ChartSeries::new(&node.cpu_usage_chart, &node.id));
			if toggles.show_total_cpu_chart {
				feeds
					.speed
					.push(ChartSeries::new(&node.cpu_total_usage_chart, format!("{} total", node.id)));
			}
		}

		if selected.is_some() {
			feeds.io.push(ChartSeries::new(&node.io_send_chart, SEND_LABEL));
			feeds.io.push(ChartSeries::new(&node.io_recv_chart, RECEIVE_LABEL));
		} else {
			feeds.io.push(ChartSeries::new(&node.io_total_chart, &node.id));
		}
	}

	feeds
}

/// Where the legend box sits inside the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendPosition {
	NorthWest,
	NorthEast,
	SouthWest,
	SouthEast,
}

/// X axis showing wall-clock time.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeAxis {
	/// strftime-style pattern; `%H`, `%M` and `%S` are substituted.
	pub time_format: String,
	/// Render in the browser's local time zone rather than UTC.
	pub local_time: bool,
}

impl TimeAxis {
	pub fn format(&self, hours: u32, minutes: u32, seconds: u32) -> String {
		self.time_format
			.replace("%H", &format!("{hours:02}"))
			.replace("%M", &format!("{minutes:02}"))
			.replace("%S", &format!("{seconds:02}"))
	}
}

/// Y axis bounds. A missing bound is taken from the data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueAxis {
	pub min: Option<f64>,
	pub max: Option<f64>,
}

impl ValueAxis {
	/// Resolve the bounds for `series`, keeping a non-empty range.
	pub fn resolve(&self, series: &[ChartSeries]) -> (f64, f64) {
		let values = series.iter().flat_map(|s| s.data.iter().map(|p| p[1]));
		let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
		let min = self.min.unwrap_or(if lo.is_finite() { lo } else { 0.0 });
		let max = self.max.unwrap_or(if hi.is_finite() { hi } else { min + 1.0 });
		if max > min { (min, max) } else { (min, min + 1.0) }
	}
}

/// Static axis and legend settings handed to the chart sink.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartOptions {
	pub legend: LegendPosition,
	pub x_axis: TimeAxis,
	pub y_axis: ValueAxis,
}

impl ChartOptions {
	/// Unbounded values starting at zero (throughput, speed).
	pub fn throughput() -> Self {
		Self {
			legend: LegendPosition::NorthWest,
			x_axis: TimeAxis {
				time_format: "%H:%M:%S".to_string(),
				local_time: true,
			},
			y_axis: ValueAxis {
				min: Some(0.0),
				max: None,
			},
		}
	}

	/// Percentages, fixed to 0..=100.
	pub fn cpu_percentage() -> Self {
		Self {
			y_axis: ValueAxis {
				min: Some(0.0),
				max: Some(100.0),
			},
			..Self::throughput()
		}
	}

	/// Options for the speed panel, which shows CPU unless speed is toggled on.
	pub fn speed_panel(toggles: DisplayToggles) -> Self {
		if toggles.show_speed_chart {
			Self::throughput()
		} else {
			Self::cpu_percentage()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn two_nodes() -> Snapshot {
		Snapshot::from_payload(json!({
			"time": "00:00:00",
			"nodes": [
				{
					"id": "n1",
					"speedChart": [[0, 54]],
					"cpuUsageChart": [[0, 10]],
					"cpuTotalUsageChart": [[0, 40]],
					"ioSendChart": [[0, 2]],
					"ioRecvChart": [[0, 3]],
					"ioTotalChart": [[0, 5]]
				},
				{
					"id": "n2",
					"speedChart": [[0, 11]],
					"cpuUsageChart": [[0, 20]],
					"cpuTotalUsageChart": [[0, 60]],
					"ioTotalChart": [[0, 7]]
				}
			],
			"edges": []
		}))
		.unwrap()
	}

	fn series(data: &[[f64; 2]], label: &str) -> ChartSeries {
		ChartSeries {
			data: data.to_vec(),
			label: label.to_string(),
		}
	}

	#[test]
	fn all_nodes_without_selection() {
		let feeds = build_series(&two_nodes(), &Selection::new(), DisplayToggles::default());
		assert_eq!(
			feeds.speed,
			vec![series(&[[0.0, 10.0]], "n1"), series(&[[0.0, 20.0]], "n2")]
		);
		assert_eq!(feeds.io, vec![series(&[[0.0, 5.0]], "n1"), series(&[[0.0, 7.0]], "n2")]);
	}

	#[test]
	fn selected_node_filters_and_splits_io() {
		let mut selection = Selection::new();
		selection.on_select_node("n1");
		let feeds = build_series(&two_nodes(), &selection, DisplayToggles::default());
		assert_eq!(feeds.speed, vec![series(&[[0.0, 10.0]], "n1")]);
		assert_eq!(
			feeds.io,
			vec![series(&[[0.0, 2.0]], SEND_LABEL), series(&[[0.0, 3.0]], RECEIVE_LABEL)]
		);
	}

	#[test]
	fn speed_toggle_wins_over_total_cpu() {
		let toggles = DisplayToggles {
			show_speed_chart: true,
			show_total_cpu_chart: true,
		};
		let feeds = build_series(&two_nodes(), &Selection::new(), toggles);
		assert_eq!(
			feeds.speed,
			vec![series(&[[0.0, 54.0]], "n1"), series(&[[0.0, 11.0]], "n2")]
		);
	}

	#[test]
	fn total_cpu_adds_second_series_per_node() {
		let toggles = DisplayToggles {
			show_speed_chart: false,
			show_total_cpu_chart: true,
		};
		let feeds = build_series(&two_nodes(), &Selection::new(), toggles);
		let labels: Vec<_> = feeds.speed.iter().map(|s| s.label.as_str()).collect();
		assert_eq!(labels, vec!["n1", "n1 total", "n2", "n2 total"]);
		assert_eq!(feeds.speed[3].data, vec![[0.0, 60.0]]);
	}

	#[test]
	fn edge_selection_does_not_affect_series() {
		let mut selection = Selection::new();
		selection.on_select_edge("n1_:_n2");
		let plain = build_series(&two_nodes(), &Selection::new(), DisplayToggles::default());
		assert_eq!(build_series(&two_nodes(), &selection, DisplayToggles::default()), plain);

		selection.on_select_node("n2");
		let feeds = build_series(&two_nodes(), &selection, DisplayToggles::default());
		assert_eq!(feeds.speed, vec![series(&[[0.0, 20.0]], "n2")]);
		assert_eq!(feeds.io.len(), 2);
		assert!(feeds.io[0].data.is_empty());
	}

	#[test]
	fn selection_missing_from_snapshot_yields_nothing() {
		let mut selection = Selection::new();
		selection.on_select_node("ghost");
		assert_eq!(
			build_series(&two_nodes(), &selection, DisplayToggles::default()),
			ChartFeeds::default()
		);
	}

	#[test]
	fn time_axis_formats_clock() {
		let axis = ChartOptions::throughput().x_axis;
		assert_eq!(axis.format(9, 5, 7), "09:05:07");
	}

	#[test]
	fn value_axis_bounds() {
		let data = vec![series(&[[0.0, 3.0], [1.0, 42.0]], "a")];
		assert_eq!(ChartOptions::throughput().y_axis.resolve(&data), (0.0, 42.0));
		assert_eq!(ChartOptions::cpu_percentage().y_axis.resolve(&data), (0.0, 100.0));
		assert_eq!(ChartOptions::throughput().y_axis.resolve(&[]), (0.0, 1.0));
		assert_eq!(
			ValueAxis { min: None, max: None }.resolve(&[series(&[[0.0, 5.0]], "a")]),
			(5.0, 6.0)
		);
	}

	#[test]
	fn speed_panel_bounds_follow_toggle() {
		assert_eq!(ChartOptions::speed_panel(DisplayToggles::default()), ChartOptions::cpu_percentage());
		let toggles = DisplayToggles {
			show_speed_chart: true,
			..Default::default()
		};
		assert_eq!(ChartOptions::speed_panel(toggles), ChartOptions::throughput());
	}
}
