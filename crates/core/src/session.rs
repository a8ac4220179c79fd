//! Session-facing seams: the live connection, its status callbacks and the
//! user-driven operations that steer it.

use std::sync::Arc;

use assurance_protocol::{AssuranceEvent, AuthorizingPresentationType, ConnectionError};

use crate::error::Result;

/// A live or authorizing connection to the debugging service.
///
/// Implementations own their transport. Every method is a non-blocking
/// handoff: `connect` and `disconnect` start work and return. The
/// orchestrator calls these while holding its state lock, so status and UI
/// callbacks must be delivered from the session's own context, never from
/// inside one of these calls.
pub trait AssuranceSession: Send + Sync {
	/// Starts connecting. `None` or an empty pin lets the session decide
	/// whether to prompt for one.
	fn connect(&self, pin: Option<&str>);

	fn disconnect(&self);

	fn register_status_listener(&self, listener: Arc<dyn SessionStatusListener>);

	/// Removes `listener`. Unknown listeners are ignored.
	fn unregister_status_listener(&self, listener: &Arc<dyn SessionStatusListener>);

	/// Enqueues `event` for delivery. Must not block or call back into the
	/// orchestrator.
	fn queue_outbound_event(&self, event: AssuranceEvent);

	fn authorizing_presentation_type(&self) -> AuthorizingPresentationType;
}

/// Status callbacks a session delivers to interested parties.
pub trait SessionStatusListener: Send + Sync {
	fn on_session_connected(&self) {}

	/// The session ended on its own initiative and will not reconnect.
	fn on_session_terminated(&self, error: Option<ConnectionError>);
}

/// Operations the connection UI triggers on behalf of the user.
pub trait SessionUiOperations: Send + Sync {
	/// User submitted `pin`. An empty pin means the user cancelled.
	fn on_connect(&self, pin: &str);

	/// User asked to end the session.
	fn on_disconnect(&self);

	/// Device was approved through quick connect and should join `session_id`.
	fn on_quick_connect(&self, session_id: &str, pin: &str, status_listener: Arc<dyn SessionStatusListener>) -> Result<()>;
}

/// Compares two listener handles by the object they point to.
pub fn same_listener(a: &Arc<dyn SessionStatusListener>, b: &Arc<dyn SessionStatusListener>) -> bool {
	std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
