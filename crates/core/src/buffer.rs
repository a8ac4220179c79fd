//! Ordered queue of outbound events awaiting (or mirrored to) a session.

use assurance_protocol::AssuranceEvent;

/// FIFO log of outbound events.
///
/// The orchestrator appends every admitted event here while the buffer is
/// alive. A new session receives a snapshot so nothing queued before it
/// existed is lost.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
	events: Vec<AssuranceEvent>,
}

impl EventBuffer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `event` after everything already queued.
	pub fn push(&mut self, event: AssuranceEvent) {
		self.events.push(event);
	}

	/// Copies the queued events in order.
	pub fn snapshot(&self) -> Vec<AssuranceEvent> {
		self.events.clone()
	}

	/// Removes every queued event, returning how many were dropped.
	pub fn clear(&mut self) -> usize {
		let dropped = self.events.len();
		self.events.clear();
		dropped
	}

	pub fn len(&self) -> usize {
		self.events.len()
	}

	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &AssuranceEvent> {
		self.events.iter()
	}
}
