//! Snapshot data structures as delivered by the monitor service.
//!
//! A snapshot is the full current picture of the network: every node the
//! service has heard from recently, every link between them, and a window of
//! chart samples per node. Field names follow the service's JSON keys.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::{MonitorError, Result};

/// A chart buffer: `[timestamp_ms, value]` pairs, oldest first.
pub type TimeSeries = Vec<[f64; 2]>;

/// The moment a snapshot describes.
///
/// The service formats it as a wall-clock string (`"%H:%M:%S"`), but a raw
/// millisecond timestamp is accepted too.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SnapshotTime {
	/// Pre-formatted clock time.
	Clock(String),
	/// Milliseconds since the Unix epoch.
	Millis(i64),
}

impl Default for SnapshotTime {
	fn default() -> Self {
		SnapshotTime::Clock(String::new())
	}
}

impl fmt::Display for SnapshotTime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SnapshotTime::Clock(text) => f.write_str(text),
			SnapshotTime::Millis(ms) => write!(f, "{ms}"),
		}
	}
}

/// One monitored machine.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
	/// Stable identifier (the node's network address).
	pub id: String,
	/// Status colour assigned by the service (CSS colour string).
	#[serde(default)]
	pub color: String,
	#[serde(default)]
	pub speed_chart: TimeSeries,
	#[serde(default)]
	pub cpu_usage_chart: TimeSeries,
	#[serde(default)]
	pub cpu_total_usage_chart: TimeSeries,
	#[serde(default)]
	pub io_send_chart: TimeSeries,
	#[serde(default)]
	pub io_recv_chart: TimeSeries,
	#[serde(default)]
	pub io_total_chart: TimeSeries,
	/// Every other field the node reported (status, label, counters, ...).
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// A link between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EdgeRecord {
	pub id: String,
	pub from: String,
	pub to: String,
	#[serde(default)]
	pub color: String,
	/// Arrowhead markers, e.g. `"to;"` or `"to;from;"`.
	#[serde(default)]
	pub arrows: String,
	/// Traffic counters and anything else the service attached.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// One complete update from the monitor service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Snapshot {
	#[serde(default)]
	pub time: SnapshotTime,
	pub nodes: Vec<NodeRecord>,
	pub edges: Vec<EdgeRecord>,
}

impl Snapshot {
	/// Parse a snapshot from its JSON text.
	pub fn from_json(text: &str) -> Result<Self> {
		serde_json::from_str(text).map_err(MonitorError::Snapshot)
	}

	/// Parse the `data` part of a `nodeData` message.
	///
	/// The service serialises the snapshot to a string before emitting it, so a
	/// string payload is decoded a second time. An object payload is used as-is.
	pub fn from_payload(payload: Value) -> Result<Self> {
		match payload {
			Value::String(text) => Self::from_json(&text),
			other => serde_json::from_value(other).map_err(MonitorError::Snapshot),
		}
	}

	pub fn node(&self, id: &str) -> Option<&NodeRecord> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn edge(&self, id: &str) -> Option<&EdgeRecord> {
		self.edges.iter().find(|e| e.id == id)
	}
}

/// Flatten extra record fields into display rows, sorted by key.
pub fn property_rows(extra: &Map<String, Value>) -> Vec<(String, String)> {
	let mut rows: Vec<(String, String)> = extra
		.iter()
		.map(|(k, v)| {
			let text = match v {
				Value::String(s) => s.clone(),
				other => other.to_string(),
			};
			(k.clone(), text)
		})
		.collect();
	rows.sort_by(|a, b| a.0.cmp(&b.0));
	rows
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn sample() -> Value {
		json!({
			"time": "12:30:05",
			"nodes": [{
				"id": "10.0.0.1",
				"label": "10.0.0.1",
				"color": "green",
				"status": "running",
				"cpuUsageChart": [[1000, 12.5], [1500, 14.0]],
				"ioTotalChart": [[1000, 300]]
			}],
			"edges": [{
				"id": "10.0.0.1_:_10.0.0.2",
				"from": "10.0.0.1",
				"to": "10.0.0.2",
				"arrows": "to;",
				"color": "green",
				"fromSend": 120,
				"fromReceive": 80
			}]
		})
	}

	#[test]
	fn parses_object_payload() {
		let snapshot = Snapshot::from_payload(sample()).unwrap();
		assert_eq!(snapshot.time, SnapshotTime::Clock("12:30:05".into()));
		assert_eq!(snapshot.nodes.len(), 1);

		let node = &snapshot.nodes[0];
		assert_eq!(node.color, "green");
		assert_eq!(node.cpu_usage_chart, vec![[1000.0, 12.5], [1500.0, 14.0]]);
		assert!(node.speed_chart.is_empty());
		assert_eq!(node.extra.get("status"), Some(&json!("running")));

		let edge = &snapshot.edges[0];
		assert_eq!(edge.arrows, "to;");
		assert_eq!(edge.extra.get("fromSend"), Some(&json!(120)));
	}

	#[test]
	fn decodes_double_encoded_payload() {
		let text = sample().to_string();
		let snapshot = Snapshot::from_payload(Value::String(text)).unwrap();
		assert_eq!(snapshot.nodes[0].id, "10.0.0.1");
	}

	#[test]
	fn accepts_millisecond_time() {
		let snapshot = Snapshot::from_json(r#"{"time": 1700000000000, "nodes": [], "edges": []}"#).unwrap();
		assert_eq!(snapshot.time, SnapshotTime::Millis(1_700_000_000_000));
		assert_eq!(snapshot.time.to_string(), "1700000000000");
	}

	#[test]
	fn rejects_incomplete_payloads() {
		assert!(matches!(
			Snapshot::from_json("{\"nodes\": []}"),
			Err(MonitorError::Snapshot(_))
		));
		assert!(Snapshot::from_json("not json").is_err());
		assert!(Snapshot::from_payload(json!({"nodes": [{"color": "red"}], "edges": []})).is_err());
		assert!(Snapshot::from_payload(json!(42)).is_err());
	}

	#[test]
	fn lookups_by_id() {
		let snapshot = Snapshot::from_payload(sample()).unwrap();
		assert!(snapshot.node("10.0.0.1").is_some());
		assert!(snapshot.node("10.0.0.9").is_none());
		assert!(snapshot.edge("10.0.0.1_:_10.0.0.2").is_some());
	}

	#[test]
	fn property_rows_are_sorted_and_unquoted() {
		let snapshot = Snapshot::from_payload(sample()).unwrap();
		let rows = property_rows(&snapshot.nodes[0].extra);
		assert_eq!(
			rows,
			vec![
				("label".to_string(), "10.0.0.1".to_string()),
				("status".to_string(), "running".to_string()),
			]
		);
	}
}
