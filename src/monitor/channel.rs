//! Message envelope exchanged with the monitor service.
//!
//! Frames are JSON objects tagged by `event`, with the payload under `data`:
//! `{"event":"reqData"}`, `{"event":"delay","data":1000}` going out and
//! `{"event":"nodeData","data":...}` coming in.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{MonitorError, Result};

/// Control signals sent to the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum OutboundMessage {
	/// Ask for a fresh snapshot.
	#[serde(rename = "reqData")]
	RequestData,
	/// Set the server-side lag, in milliseconds.
	#[serde(rename = "delay")]
	Delay(u64),
}

impl OutboundMessage {
	pub fn encode(&self) -> Result<String> {
		serde_json::to_string(self).map_err(MonitorError::Encode)
	}
}

/// Messages received from the service.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum InboundMessage {
	/// A snapshot, either as an object or as JSON text.
	#[serde(rename = "nodeData")]
	NodeData(Value),
}

impl InboundMessage {
	pub fn parse(frame: &str) -> Result<Self> {
		serde_json::from_str(frame).map_err(MonitorError::Frame)
	}
}

/// Outbound half of the transport.
///
/// Sends are fire-and-forget: delivery failures are the transport's business
/// and are never reported back.
pub trait MessageChannel {
	fn send(&self, message: OutboundMessage);
}
