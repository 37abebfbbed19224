//! Error type shared by the monitor engine and its browser adapters.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Everything that can go wrong between the channel and the rendering sinks.
///
/// None of these are fatal: the engine reports them through its diagnostic
/// hook and carries on with the state it already holds.
#[derive(Debug, Error)]
pub enum MonitorError {
	/// An inbound frame was not a recognised `{ event, data }` envelope.
	#[error("unrecognised channel frame: {0}")]
	Frame(#[source] serde_json::Error),

	/// A `nodeData` payload could not be parsed into a snapshot.
	#[error("malformed snapshot: {0}")]
	Snapshot(#[source] serde_json::Error),

	/// An outbound message could not be serialised.
	#[error("failed to encode outbound message: {0}")]
	Encode(#[source] serde_json::Error),

	/// Embedded configuration did not parse.
	#[error("invalid monitor config: {0}")]
	Config(#[source] serde_json::Error),

	/// The recurring request trigger could not be armed.
	#[error("scheduler error: {0}")]
	Scheduler(String),

	/// The transport could not be opened or written to.
	#[error("channel error: {0}")]
	Channel(String),
}
