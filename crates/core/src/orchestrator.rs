//! Lifecycle owner for the single active assurance session.
//!
//! The orchestrator is the one place that decides which session exists. It
//! owns two pieces of mutable state behind a single lock:
//!
//! - the active session, if any
//! - the outbound event buffer, if buffering is still enabled
//!
//! Every transition runs inside that lock, including the lifecycle calls on
//! collaborators (`connect`, `disconnect`, listener registration, shared
//! state). Those calls are non-blocking handoffs and must not call back into
//! the orchestrator on the calling thread; callbacks arrive later from the
//! collaborator's own context.
//!
//! # Teardown flavours
//!
//! | Trigger | Session | Shared state | Buffer |
//! |---------|---------|--------------|--------|
//! | `terminate_session(true)`, UI disconnect, UI cancel | detached | cleared | purged |
//! | `terminate_session(false)`, quick-connect retry | detached | cleared | kept |
//! | session reports termination | dropped | cleared | kept |
//! | replaced by `create_session` | detached | republished | kept |

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use assurance_protocol::{AssuranceEnvironment, AssuranceEvent, AuthorizingPresentationType, ConnectionError};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::buffer::EventBuffer;
use crate::config::OrchestratorConfig;
use crate::connection_url::ConnectionDescriptor;
use crate::error::Result;
use crate::factory::{SessionFactory, SessionRequest};
use crate::host::{ApplicationHandle, ConnectionStore, HostAppLifecycleObserver, PluginList, StateManager};
use crate::session::{AssuranceSession, SessionStatusListener, SessionUiOperations};

/// Collaborators injected into a [`SessionOrchestrator`].
pub struct OrchestratorParts {
	pub state_manager: Arc<dyn StateManager>,
	pub plugins: PluginList,
	pub connection_store: Arc<dyn ConnectionStore>,
	pub app_handle: Arc<dyn ApplicationHandle>,
	pub session_factory: Arc<dyn SessionFactory>,
}

type ForegroundHook = Arc<dyn Fn(&SessionOrchestrator) + Send + Sync>;

/// Coordinates creation, replacement and teardown of the active session and
/// routes outbound events.
///
/// Cloning yields another handle to the same orchestrator.
#[derive(Clone)]
pub struct SessionOrchestrator {
	inner: Arc<Inner>,
}

struct Inner {
	state: Mutex<OrchestratorState>,
	parts: OrchestratorParts,
	config: OrchestratorConfig,
	status_listener: Arc<dyn SessionStatusListener>,
	ui_operations: Arc<dyn SessionUiOperations>,
	foreground_hook: Mutex<Option<ForegroundHook>>,
	host_in_foreground: AtomicBool,
}

struct OrchestratorState {
	session: Option<Arc<dyn AssuranceSession>>,
	outbound_buffer: Option<EventBuffer>,
}

impl OrchestratorState {
	fn buffer_snapshot(&self) -> Vec<AssuranceEvent> {
		self.outbound_buffer.as_ref().map(EventBuffer::snapshot).unwrap_or_default()
	}

	fn purge_buffer(&mut self) {
		if let Some(mut buffer) = self.outbound_buffer.take() {
			let dropped = buffer.clear();
			debug!(target = "assurance.buffer", dropped, "outbound buffer purged");
		}
	}
}

impl SessionOrchestrator {
	/// Creates an orchestrator and registers its lifecycle observer with the
	/// application handle.
	pub fn new(parts: OrchestratorParts, config: OrchestratorConfig) -> Self {
		let outbound_buffer = config.buffer_on_startup.then(EventBuffer::new);
		let inner = Arc::new_cyclic(|weak: &Weak<Inner>| Inner {
			state: Mutex::new(OrchestratorState {
				session: None,
				outbound_buffer,
			}),
			parts,
			config,
			status_listener: Arc::new(StatusRelay { inner: weak.clone() }),
			ui_operations: Arc::new(UiRelay { inner: weak.clone() }),
			foreground_hook: Mutex::new(None),
			host_in_foreground: AtomicBool::new(false),
		});

		inner
			.parts
			.app_handle
			.register_lifecycle_observer(Arc::new(LifecycleRelay { inner: Arc::downgrade(&inner) }));

		Self { inner }
	}

	pub fn config(&self) -> &OrchestratorConfig {
		&self.inner.config
	}

	/// Creates a session, installs it as active and starts connecting.
	///
	/// The new session receives a copy of the outbound buffer. A previously
	/// active session is detached; the buffer is never cleared here. If the
	/// factory fails, the error is returned and nothing changes.
	pub fn create_session(
		&self,
		session_id: &str,
		environment: AssuranceEnvironment,
		pin: Option<&str>,
		status_listener: Option<Arc<dyn SessionStatusListener>>,
		presentation: AuthorizingPresentationType,
	) -> Result<()> {
		let mut state = self.inner.state.lock();
		self.inner
			.install(&mut state, session_id, environment, pin, status_listener, presentation)
	}

	/// Detaches the active session and clears shared state.
	///
	/// With `clear_buffer` the outbound buffer is purged and buffering stops;
	/// without it queued events survive for a replacement session.
	pub fn terminate_session(&self, clear_buffer: bool) {
		let mut state = self.inner.state.lock();
		self.inner.teardown(&mut state, clear_buffer);
	}

	/// Rejoins the session whose socket URL was persisted last.
	///
	/// Returns `Ok(false)` when nothing usable is stored. Factory failures
	/// are returned as errors.
	pub fn reconnect_to_stored_session(&self) -> Result<bool> {
		let Some(url) = self.inner.parts.connection_store.stored_connection_url() else {
			debug!(target = "assurance.session", "no stored connection url");
			return Ok(false);
		};

		let Some(descriptor) = ConnectionDescriptor::parse(&url) else {
			warn!(target = "assurance.session", "stored connection url lacks sessionId or token");
			return Ok(false);
		};

		info!(
			target = "assurance.session",
			session_id = %descriptor.session_id,
			environment = %descriptor.environment,
			"reconnecting to stored session"
		);
		self.create_session(
			&descriptor.session_id,
			descriptor.environment,
			None,
			None,
			self.inner.config.reconnect_presentation,
		)?;
		Ok(true)
	}

	/// Appends `event` to the buffer (if buffering) and forwards it to the
	/// active session (if any). With neither, the event is dropped.
	pub fn queue_event(&self, event: AssuranceEvent) {
		let mut guard = self.inner.state.lock();
		let state = &mut *guard;
		if state.outbound_buffer.is_none() && state.session.is_none() {
			trace!(target = "assurance.buffer", name = event.name(), "no buffer or session; event dropped");
			return;
		}

		if let Some(buffer) = state.outbound_buffer.as_mut() {
			buffer.push(event.clone());
		}
		if let Some(session) = &state.session {
			session.queue_outbound_event(event);
		}
	}

	/// Whether SDK events should be routed here at all.
	pub fn can_process_sdk_events(&self) -> bool {
		let state = self.inner.state.lock();
		state.outbound_buffer.is_some() || state.session.is_some()
	}

	pub fn active_session(&self) -> Option<Arc<dyn AssuranceSession>> {
		self.inner.state.lock().session.clone()
	}

	/// Listener the orchestrator registers on every session it owns.
	pub fn status_listener(&self) -> Arc<dyn SessionStatusListener> {
		Arc::clone(&self.inner.status_listener)
	}

	/// UI operations handle passed to sessions and connection UI.
	pub fn ui_operations(&self) -> Arc<dyn SessionUiOperations> {
		Arc::clone(&self.inner.ui_operations)
	}

	/// Copy of the buffered events, oldest first. Empty when not buffering.
	pub fn buffered_events(&self) -> Vec<AssuranceEvent> {
		self.inner.state.lock().buffer_snapshot()
	}

	pub fn is_buffering(&self) -> bool {
		self.inner.state.lock().outbound_buffer.is_some()
	}

	/// Whether the host app was last reported in the foreground.
	pub fn is_host_in_foreground(&self) -> bool {
		self.inner.host_in_foreground.load(Ordering::Acquire)
	}

	/// Installs a callback run each time the host app enters the foreground.
	///
	/// The hook receives the orchestrator rather than capturing it, which
	/// would keep the orchestrator alive forever.
	pub fn set_foreground_hook<F>(&self, hook: F)
	where
		F: Fn(&SessionOrchestrator) + Send + Sync + 'static,
	{
		*self.inner.foreground_hook.lock() = Some(Arc::new(hook));
	}

	pub fn clear_foreground_hook(&self) {
		self.inner.foreground_hook.lock().take();
	}

	/// Stops buffering and clears shared state if no session is active.
	///
	/// Returns `false` (and changes nothing) when a session exists.
	pub fn shutdown_if_idle(&self) -> bool {
		let mut state = self.inner.state.lock();
		if state.session.is_some() {
			return false;
		}
		state.purge_buffer();
		self.inner.parts.state_manager.clear_assurance_shared_state();
		info!(target = "assurance.session", "no session started; event buffering stopped");
		true
	}

	/// Runs [`shutdown_if_idle`](Self::shutdown_if_idle) after the configured
	/// idle delay. Must be called within a Tokio runtime.
	///
	/// The task holds only a weak reference; it resolves to `false` if the
	/// orchestrator is gone by then.
	pub fn schedule_idle_shutdown(&self) -> JoinHandle<bool> {
		let delay = self.inner.config.idle_shutdown_delay();
		let inner = Arc::downgrade(&self.inner);
		tokio::spawn(async move {
			tokio::time::sleep(delay).await;
			upgrade(&inner).is_some_and(|orchestrator| orchestrator.shutdown_if_idle())
		})
	}

	fn handle_connect(&self, pin: &str) {
		if pin.is_empty() {
			info!(target = "assurance.session", "connection cancelled by user");
			self.terminate_session(true);
			return;
		}

		let state = self.inner.state.lock();
		match &state.session {
			Some(session) => session.connect(Some(pin)),
			None => warn!(target = "assurance.session", "pin submitted without an active session"),
		}
	}

	fn handle_quick_connect(&self, session_id: &str, pin: &str, status_listener: Arc<dyn SessionStatusListener>) -> Result<()> {
		let mut state = self.inner.state.lock();
		let retry = state
			.session
			.as_ref()
			.is_some_and(|session| session.authorizing_presentation_type() == AuthorizingPresentationType::QuickConnect);
		if retry {
			debug!(target = "assurance.session", session_id, "retrying quick connect; keeping buffered events");
			self.inner.teardown(&mut state, false);
		}

		self.inner.install(
			&mut state,
			session_id,
			self.inner.config.default_environment,
			Some(pin),
			Some(status_listener),
			AuthorizingPresentationType::QuickConnect,
		)
	}

	fn handle_session_terminated(&self, error: Option<ConnectionError>) {
		let mut state = self.inner.state.lock();
		let Some(session) = state.session.take() else {
			debug!(target = "assurance.session", "termination reported without an active session");
			return;
		};

		session.unregister_status_listener(&self.inner.status_listener);
		self.inner.parts.state_manager.clear_assurance_shared_state();
		drop(state);

		match error {
			Some(error) => warn!(
				target = "assurance.session",
				error = %error,
				retryable = error.is_retryable(),
				"session terminated by remote"
			),
			None => info!(target = "assurance.session", "session terminated by remote"),
		}
	}

	fn handle_foreground(&self) {
		self.inner.host_in_foreground.store(true, Ordering::Release);
		let hook = self.inner.foreground_hook.lock().clone();
		if let Some(hook) = hook {
			debug!(target = "assurance.session", "host app entered foreground; running hook");
			hook(self);
		}
	}
}

impl Inner {
	/// Builds a session and makes it the active one. Runs entirely under the
	/// state lock so no other transition can observe a half-installed session.
	fn install(
		&self,
		state: &mut OrchestratorState,
		session_id: &str,
		environment: AssuranceEnvironment,
		pin: Option<&str>,
		status_listener: Option<Arc<dyn SessionStatusListener>>,
		presentation: AuthorizingPresentationType,
	) -> Result<()> {
		let buffered_events = state.buffer_snapshot();
		debug!(
			target = "assurance.buffer",
			session_id,
			buffered = buffered_events.len(),
			"handing buffered events to new session"
		);
		let request = SessionRequest {
			session_id: session_id.to_string(),
			environment,
			ui_operations: Arc::clone(&self.ui_operations),
			state_manager: Arc::clone(&self.parts.state_manager),
			plugins: Arc::clone(&self.parts.plugins),
			connection_store: Arc::clone(&self.parts.connection_store),
			app_handle: Arc::clone(&self.parts.app_handle),
			buffered_events,
			status_listener,
			presentation,
		};

		let session = self.parts.session_factory.create(request).inspect_err(|err| {
			warn!(target = "assurance.session", session_id, error = %err, "session factory failed");
		})?;

		if let Some(previous) = state.session.replace(Arc::clone(&session)) {
			debug!(target = "assurance.session", session_id, "detaching replaced session");
			self.detach(&previous);
		}

		session.register_status_listener(Arc::clone(&self.status_listener));
		self.parts.state_manager.share_assurance_shared_state(session_id);

		info!(
			target = "assurance.session",
			session_id,
			%environment,
			%presentation,
			pin_supplied = pin.is_some_and(|p| !p.is_empty()),
			"connecting session"
		);
		session.connect(pin);
		Ok(())
	}

	/// Detaches the active session, clears shared state and optionally purges
	/// the buffer.
	fn teardown(&self, state: &mut OrchestratorState, clear_buffer: bool) {
		if clear_buffer {
			state.purge_buffer();
		}
		let session = state.session.take();
		if let Some(session) = &session {
			self.detach(session);
		}
		self.parts.state_manager.clear_assurance_shared_state();

		info!(
			target = "assurance.session",
			had_session = session.is_some(),
			clear_buffer,
			"session terminated"
		);
	}

	fn detach(&self, session: &Arc<dyn AssuranceSession>) {
		session.unregister_status_listener(&self.status_listener);
		session.disconnect();
	}
}

impl fmt::Debug for SessionOrchestrator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("SessionOrchestrator")
			.field("has_session", &state.session.is_some())
			.field("buffered", &state.outbound_buffer.as_ref().map(EventBuffer::len))
			.field("config", &self.inner.config)
			.finish()
	}
}

fn upgrade(inner: &Weak<Inner>) -> Option<SessionOrchestrator> {
	inner.upgrade().map(|inner| SessionOrchestrator { inner })
}

struct StatusRelay {
	inner: Weak<Inner>,
}

impl SessionStatusListener for StatusRelay {
	fn on_session_connected(&self) {
		debug!(target = "assurance.session", "session connected");
	}

	fn on_session_terminated(&self, error: Option<ConnectionError>) {
		if let Some(orchestrator) = upgrade(&self.inner) {
			orchestrator.handle_session_terminated(error);
		}
	}
}

struct UiRelay {
	inner: Weak<Inner>,
}

impl SessionUiOperations for UiRelay {
	fn on_connect(&self, pin: &str) {
		if let Some(orchestrator) = upgrade(&self.inner) {
			orchestrator.handle_connect(pin);
		}
	}

	fn on_disconnect(&self) {
		if let Some(orchestrator) = upgrade(&self.inner) {
			info!(target = "assurance.session", "disconnect requested by user");
			orchestrator.terminate_session(true);
		}
	}

	fn on_quick_connect(&self, session_id: &str, pin: &str, status_listener: Arc<dyn SessionStatusListener>) -> Result<()> {
		match upgrade(&self.inner) {
			Some(orchestrator) => orchestrator.handle_quick_connect(session_id, pin, status_listener),
			None => Ok(()),
		}
	}
}

struct LifecycleRelay {
	inner: Weak<Inner>,
}

impl HostAppLifecycleObserver for LifecycleRelay {
	fn on_foreground(&self) {
		if let Some(orchestrator) = upgrade(&self.inner) {
			orchestrator.handle_foreground();
		}
	}

	fn on_background(&self) {
		if let Some(inner) = self.inner.upgrade() {
			inner.host_in_foreground.store(false, Ordering::Release);
		}
	}
}
