//! Browser adapters for the engine's channel and scheduler seams.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, MessageEvent, WebSocket};

use crate::monitor::{MessageChannel, MonitorError, OutboundMessage, Result, Scheduler};

/// WebSocket connection to the monitor service.
///
/// Messages sent while the socket is still connecting are queued and flushed
/// once it opens. Inbound text frames are handed over unparsed.
pub struct WebSocketChannel {
	socket: WebSocket,
	pending: Rc<RefCell<Vec<String>>>,
	_on_open: Closure<dyn FnMut(Event)>,
	_on_message: Closure<dyn FnMut(MessageEvent)>,
	_on_error: Closure<dyn FnMut(Event)>,
	_on_close: Closure<dyn FnMut(Event)>,
}

impl WebSocketChannel {
	pub fn connect(url: &str, mut on_frame: impl FnMut(String) + 'static) -> Result<Self> {
		let socket = WebSocket::new(url).map_err(|e| MonitorError::Channel(format!("{e:?}")))?;
		let pending: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

		let (socket_open, pending_open, url_open) = (socket.clone(), pending.clone(), url.to_string());
		let on_open = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
			info!("adhoc-monitor: connected to {}", url_open);
			for text in pending_open.borrow_mut().drain(..) {
				if let Err(e) = socket_open.send_with_str(&text) {
					warn!("adhoc-monitor: failed to flush queued message: {:?}", e);
				}
			}
		});
		socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));

		let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
			match ev.data().as_string() {
				Some(text) => on_frame(text),
				None => warn!("adhoc-monitor: ignoring non-text frame"),
			}
		});
		socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

		let on_error = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
			warn!("adhoc-monitor: socket error");
		});
		socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

		let on_close = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
			info!("adhoc-monitor: connection closed");
		});
		socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

		Ok(Self {
			socket,
			pending,
			_on_open: on_open,
			_on_message: on_message,
			_on_error: on_error,
			_on_close: on_close,
		})
	}
}

impl MessageChannel for WebSocketChannel {
	fn send(&self, message: OutboundMessage) {
		let text = match message.encode() {
			Ok(text) => text,
			Err(e) => {
				warn!("adhoc-monitor: {}", e);
				return;
			}
		};
		match self.socket.ready_state() {
			WebSocket::OPEN => {
				if let Err(e) = self.socket.send_with_str(&text) {
					warn!("adhoc-monitor: send failed: {:?}", e);
				}
			}
			WebSocket::CONNECTING => self.pending.borrow_mut().push(text),
			_ => debug!("adhoc-monitor: socket closed, dropping {}", text),
		}
	}
}

/// A running `setInterval` timer. Dropping it without cancelling leaves the
/// timer firing into a freed callback, so always go through [`Scheduler::cancel`].
pub struct IntervalHandle {
	id: i32,
	_task: Closure<dyn FnMut()>,
}

/// [`Scheduler`] backed by `window.setInterval`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalScheduler;

impl Scheduler for IntervalScheduler {
	type Handle = IntervalHandle;

	fn every(&self, period: Duration, task: Box<dyn FnMut()>) -> Result<IntervalHandle> {
		let window = web_sys::window().ok_or_else(|| MonitorError::Scheduler("no window".to_string()))?;
		let task = Closure::wrap(task);
		let timeout = i32::try_from(period.as_millis()).unwrap_or(i32::MAX);
		let id = window
			.set_interval_with_callback_and_timeout_and_arguments_0(task.as_ref().unchecked_ref(), timeout)
			.map_err(|e| MonitorError::Scheduler(format!("{e:?}")))?;
		Ok(IntervalHandle { id, _task: task })
	}

	fn cancel(&self, handle: IntervalHandle) {
		if let Some(window) = web_sys::window() {
			window.clear_interval_with_handle(handle.id);
		}
	}
}
