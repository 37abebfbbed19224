//! Recurring snapshot requests and the user-set delay.
//!
//! The tick period (how often we ask) and the delay (how far behind real time
//! the service answers) are independent knobs. The controller never enforces
//! the delay itself; it only relays it.

use std::rc::Rc;
use std::time::Duration;

use log::{debug, info};

use super::channel::{MessageChannel, OutboundMessage};
use super::error::Result;

/// Something that can run a task on a fixed period until cancelled.
pub trait Scheduler {
	type Handle;

	fn every(&self, period: Duration, task: Box<dyn FnMut()>) -> Result<Self::Handle>;

	fn cancel(&self, handle: Self::Handle);
}

fn as_millis(duration: Duration) -> u64 {
	u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Owns the request trigger and the polling delay.
pub struct PollingController<S: Scheduler> {
	channel: Rc<dyn MessageChannel>,
	scheduler: S,
	delay: Duration,
	ticker: Option<S::Handle>,
}

impl<S: Scheduler> PollingController<S> {
	pub fn new(channel: Rc<dyn MessageChannel>, scheduler: S, delay: Duration) -> Self {
		Self {
			channel,
			scheduler,
			delay,
			ticker: None,
		}
	}

	/// Announce the current delay, then request a snapshot every `period`.
	///
	/// Starting an already running controller re-arms it with the new period.
	pub fn start(&mut self, period: Duration) -> Result<()> {
		self.stop();
		self.channel.send(OutboundMessage::Delay(as_millis(self.delay)));

		let channel = self.channel.clone();
		let handle = self.scheduler.every(
			period,
			Box::new(move || channel.send(OutboundMessage::RequestData)),
		)?;
		self.ticker = Some(handle);
		info!("adhoc-monitor: polling every {}ms", period.as_millis());
		Ok(())
	}

	/// Cancel the trigger. No further requests are sent.
	pub fn stop(&mut self) {
		if let Some(handle) = self.ticker.take() {
			self.scheduler.cancel(handle);
			info!("adhoc-monitor: polling stopped");
		}
	}

	pub fn is_running(&self) -> bool {
		self.ticker.is_some()
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Store `delay` and forward it to the service.
	pub fn set_delay(&mut self, delay: Duration) {
		self.delay = delay;
		debug!("adhoc-monitor: delay set to {}ms", delay.as_millis());
		self.channel.send(OutboundMessage::Delay(as_millis(delay)));
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};

	use super::*;

	#[derive(Default)]
	struct RecordingChannel {
		sent: RefCell<Vec<OutboundMessage>>,
	}

	impl MessageChannel for RecordingChannel {
		fn send(&self, message: OutboundMessage) {
			self.sent.borrow_mut().push(message);
		}
	}

	impl RecordingChannel {
		fn take(&self) -> Vec<OutboundMessage> {
			std::mem::take(&mut *self.sent.borrow_mut())
		}
	}

	type Task = (usize, Duration, Box<dyn FnMut()>);

	/// Scheduler whose tasks only run when the test fires them.
	#[derive(Clone, Default)]
	struct ManualScheduler {
		tasks: Rc<RefCell<Vec<Task>>>,
		next_id: Rc<Cell<usize>>,
	}

	impl ManualScheduler {
		fn fire(&self) {
			for (_, _, task) in self.tasks.borrow_mut().iter_mut() {
				task();
			}
		}

		fn periods(&self) -> Vec<Duration> {
			self.tasks.borrow().iter().map(|(_, p, _)| *p).collect()
		}
	}

	impl Scheduler for ManualScheduler {
		type Handle = usize;

		fn every(&self, period: Duration, task: Box<dyn FnMut()>) -> Result<usize> {
			let id = self.next_id.get();
			self.next_id.set(id + 1);
			self.tasks.borrow_mut().push((id, period, task));
			Ok(id)
		}

		fn cancel(&self, handle: usize) {
			self.tasks.borrow_mut().retain(|(id, _, _)| *id != handle);
		}
	}

	fn controller() -> (Rc<RecordingChannel>, ManualScheduler, PollingController<ManualScheduler>) {
		let channel = Rc::new(RecordingChannel::default());
		let scheduler = ManualScheduler::default();
		let controller = PollingController::new(channel.clone(), scheduler.clone(), Duration::ZERO);
		(channel, scheduler, controller)
	}

	#[test]
	fn start_announces_delay_then_requests_on_tick() {
		let (channel, scheduler, mut controller) = controller();
		controller.start(Duration::from_millis(500)).unwrap();
		assert!(controller.is_running());
		assert_eq!(channel.take(), vec![OutboundMessage::Delay(0)]);
		assert_eq!(scheduler.periods(), vec![Duration::from_millis(500)]);

		scheduler.fire();
		scheduler.fire();
		assert_eq!(
			channel.take(),
			vec![OutboundMessage::RequestData, OutboundMessage::RequestData]
		);
	}

	#[test]
	fn stop_cancels_trigger() {
		let (channel, scheduler, mut controller) = controller();
		controller.start(Duration::from_millis(500)).unwrap();
		channel.take();

		controller.stop();
		assert!(!controller.is_running());
		scheduler.fire();
		assert!(channel.take().is_empty());

		controller.stop();
	}

	#[test]
	fn restart_replaces_trigger() {
		let (channel, scheduler, mut controller) = controller();
		controller.start(Duration::from_millis(500)).unwrap();
		controller.start(Duration::from_millis(250)).unwrap();
		assert_eq!(scheduler.periods(), vec![Duration::from_millis(250)]);

		channel.take();
		scheduler.fire();
		assert_eq!(channel.take(), vec![OutboundMessage::RequestData]);
	}

	#[test]
	fn set_delay_relays_without_touching_ticks() {
		let (channel, scheduler, mut controller) = controller();
		controller.start(Duration::from_millis(500)).unwrap();
		channel.take();

		controller.set_delay(Duration::from_secs(30));
		assert_eq!(controller.delay(), Duration::from_secs(30));
		assert_eq!(channel.take(), vec![OutboundMessage::Delay(30_000)]);
		assert_eq!(scheduler.periods(), vec![Duration::from_millis(500)]);
	}

	#[test]
	fn delay_persists_across_restart() {
		let (channel, _scheduler, mut controller) = controller();
		controller.set_delay(Duration::from_secs(2));
		channel.take();
		controller.start(Duration::from_millis(500)).unwrap();
		assert_eq!(channel.take(), vec![OutboundMessage::Delay(2000)]);
	}
}
