//! In-memory collaborators for exercising the orchestrator without a transport.
//!
//! # Example
//!
//! ```ignore
//! let (parts, controller) = FakeCollaboratorsBuilder::new().stored_url(url).build();
//! let orchestrator = SessionOrchestrator::new(parts, OrchestratorConfig::default());
//!
//! orchestrator.reconnect_to_stored_session()?;
//! let created = controller.factory.last().unwrap();
//! assert_eq!(created.session.connect_pins(), vec![None]);
//! ```

use std::sync::Arc;

use assurance_protocol::{AssuranceEnvironment, AssuranceEvent, AuthorizingPresentationType, ConnectionError};
use parking_lot::Mutex;

use crate::error::{AssuranceError, Result};
use crate::factory::{SessionFactory, SessionRequest};
use crate::host::{ApplicationHandle, ConnectionStore, HostAppLifecycleObserver, PluginList, StateManager};
use crate::orchestrator::OrchestratorParts;
use crate::session::{AssuranceSession, SessionStatusListener, SessionUiOperations, same_listener};

/// Builder for a full set of fake collaborators.
#[derive(Default)]
pub struct FakeCollaboratorsBuilder {
	stored_url: Option<String>,
}

impl FakeCollaboratorsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds the connection store with `url`.
	pub fn stored_url(mut self, url: impl Into<String>) -> Self {
		self.stored_url = Some(url.into());
		self
	}

	/// Builds [`OrchestratorParts`] and a [`FakeController`] sharing the same fakes.
	pub fn build(self) -> (OrchestratorParts, FakeController) {
		let controller = FakeController {
			state_manager: Arc::new(RecordingStateManager::default()),
			connection_store: Arc::new(MemoryConnectionStore::new(self.stored_url)),
			app_handle: Arc::new(FakeApplicationHandle::default()),
			factory: Arc::new(FakeSessionFactory::default()),
		};

		let plugins: PluginList = Arc::from(Vec::new());
		let parts = OrchestratorParts {
			state_manager: controller.state_manager.clone(),
			plugins,
			connection_store: controller.connection_store.clone(),
			app_handle: controller.app_handle.clone(),
			session_factory: controller.factory.clone(),
		};

		(parts, controller)
	}
}

/// Handles to the fakes behind an orchestrator, for driving and inspection.
pub struct FakeController {
	pub state_manager: Arc<RecordingStateManager>,
	pub connection_store: Arc<MemoryConnectionStore>,
	pub app_handle: Arc<FakeApplicationHandle>,
	pub factory: Arc<FakeSessionFactory>,
}

/// A call observed by a [`FakeSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
	Connect(Option<String>),
	Disconnect,
	RegisterListener,
	UnregisterListener,
	/// Carries the event id.
	QueueEvent(String),
}

/// Session that records every call and lets tests fire status callbacks.
pub struct FakeSession {
	session_id: String,
	environment: AssuranceEnvironment,
	presentation: AuthorizingPresentationType,
	initial_events: Vec<AssuranceEvent>,
	calls: Mutex<Vec<SessionCall>>,
	listeners: Mutex<Vec<Arc<dyn SessionStatusListener>>>,
	outbound: Mutex<Vec<AssuranceEvent>>,
}

impl FakeSession {
	pub fn new(session_id: &str, presentation: AuthorizingPresentationType) -> Self {
		Self {
			session_id: session_id.to_string(),
			environment: AssuranceEnvironment::Prod,
			presentation,
			initial_events: Vec::new(),
			calls: Mutex::new(Vec::new()),
			listeners: Mutex::new(Vec::new()),
			outbound: Mutex::new(Vec::new()),
		}
	}

	fn from_request(request: &SessionRequest) -> Self {
		Self {
			environment: request.environment,
			initial_events: request.buffered_events.clone(),
			..Self::new(&request.session_id, request.presentation)
		}
	}

	pub fn session_id(&self) -> &str {
		&self.session_id
	}

	pub fn environment(&self) -> AssuranceEnvironment {
		self.environment
	}

	/// Events handed over by the orchestrator at construction.
	pub fn initial_events(&self) -> &[AssuranceEvent] {
		&self.initial_events
	}

	pub fn calls(&self) -> Vec<SessionCall> {
		self.calls.lock().clone()
	}

	/// Pins passed to `connect`, in call order.
	pub fn connect_pins(&self) -> Vec<Option<String>> {
		self.calls
			.lock()
			.iter()
			.filter_map(|call| match call {
				SessionCall::Connect(pin) => Some(pin.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn count(&self, call: &SessionCall) -> usize {
		self.calls.lock().iter().filter(|c| *c == call).count()
	}

	pub fn has_listener(&self, listener: &Arc<dyn SessionStatusListener>) -> bool {
		self.listeners.lock().iter().any(|l| same_listener(l, listener))
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.lock().len()
	}

	/// Events received through `queue_outbound_event`.
	pub fn outbound_events(&self) -> Vec<AssuranceEvent> {
		self.outbound.lock().clone()
	}

	/// Reports a connection to every registered listener.
	pub fn report_connected(&self) {
		let listeners = self.listeners.lock().clone();
		for listener in listeners {
			listener.on_session_connected();
		}
	}

	/// Reports termination to every registered listener, as a transport would.
	pub fn terminate(&self, error: Option<ConnectionError>) {
		let listeners = self.listeners.lock().clone();
		for listener in listeners {
			listener.on_session_terminated(error);
		}
	}
}

impl AssuranceSession for FakeSession {
	fn connect(&self, pin: Option<&str>) {
		self.calls.lock().push(SessionCall::Connect(pin.map(str::to_string)));
	}

	fn disconnect(&self) {
		self.calls.lock().push(SessionCall::Disconnect);
	}

	fn register_status_listener(&self, listener: Arc<dyn SessionStatusListener>) {
		self.calls.lock().push(SessionCall::RegisterListener);
		self.listeners.lock().push(listener);
	}

	fn unregister_status_listener(&self, listener: &Arc<dyn SessionStatusListener>) {
		self.calls.lock().push(SessionCall::UnregisterListener);
		self.listeners.lock().retain(|l| !same_listener(l, listener));
	}

	fn queue_outbound_event(&self, event: AssuranceEvent) {
		self.calls.lock().push(SessionCall::QueueEvent(event.event_id().to_string()));
		self.outbound.lock().push(event);
	}

	fn authorizing_presentation_type(&self) -> AuthorizingPresentationType {
		self.presentation
	}
}

/// What a [`FakeSessionFactory`] was asked to build.
#[derive(Clone)]
pub struct CreatedSession {
	pub session: Arc<FakeSession>,
	pub session_id: String,
	pub environment: AssuranceEnvironment,
	pub presentation: AuthorizingPresentationType,
	pub buffered_events: Vec<AssuranceEvent>,
	pub status_listener: Option<Arc<dyn SessionStatusListener>>,
	pub ui_operations: Arc<dyn SessionUiOperations>,
}

/// Factory that builds [`FakeSession`]s and records each request.
#[derive(Default)]
pub struct FakeSessionFactory {
	created: Mutex<Vec<CreatedSession>>,
	failure: Mutex<Option<String>>,
}

impl FakeSessionFactory {
	/// Makes every following `create` fail with `reason`.
	pub fn fail_with(&self, reason: impl Into<String>) {
		*self.failure.lock() = Some(reason.into());
	}

	pub fn succeed(&self) {
		self.failure.lock().take();
	}

	pub fn created(&self) -> Vec<CreatedSession> {
		self.created.lock().clone()
	}

	pub fn last(&self) -> Option<CreatedSession> {
		self.created.lock().last().cloned()
	}

	pub fn create_count(&self) -> usize {
		self.created.lock().len()
	}
}

impl SessionFactory for FakeSessionFactory {
	fn create(&self, request: SessionRequest) -> Result<Arc<dyn AssuranceSession>> {
		if let Some(reason) = self.failure.lock().clone() {
			return Err(AssuranceError::session_creation(request.session_id, reason));
		}

		let session = Arc::new(FakeSession::from_request(&request));
		self.created.lock().push(CreatedSession {
			session: Arc::clone(&session),
			session_id: request.session_id,
			environment: request.environment,
			presentation: request.presentation,
			buffered_events: request.buffered_events,
			status_listener: request.status_listener,
			ui_operations: request.ui_operations,
		});
		Ok(session)
	}
}

/// A call observed by a [`RecordingStateManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedStateCall {
	Shared(String),
	Cleared,
}

#[derive(Default)]
pub struct RecordingStateManager {
	calls: Mutex<Vec<SharedStateCall>>,
}

impl RecordingStateManager {
	pub fn calls(&self) -> Vec<SharedStateCall> {
		self.calls.lock().clone()
	}

	pub fn shared_ids(&self) -> Vec<String> {
		self.calls
			.lock()
			.iter()
			.filter_map(|call| match call {
				SharedStateCall::Shared(id) => Some(id.clone()),
				SharedStateCall::Cleared => None,
			})
			.collect()
	}

	pub fn clear_count(&self) -> usize {
		self.calls.lock().iter().filter(|call| **call == SharedStateCall::Cleared).count()
	}
}

impl StateManager for RecordingStateManager {
	fn share_assurance_shared_state(&self, session_id: &str) {
		self.calls.lock().push(SharedStateCall::Shared(session_id.to_string()));
	}

	fn clear_assurance_shared_state(&self) {
		self.calls.lock().push(SharedStateCall::Cleared);
	}
}

/// Connection store held in memory.
#[derive(Default)]
pub struct MemoryConnectionStore {
	url: Mutex<Option<String>>,
}

impl MemoryConnectionStore {
	pub fn new(url: Option<String>) -> Self {
		Self { url: Mutex::new(url) }
	}

	pub fn set(&self, url: Option<&str>) {
		*self.url.lock() = url.map(str::to_string);
	}
}

impl ConnectionStore for MemoryConnectionStore {
	fn stored_connection_url(&self) -> Option<String> {
		self.url.lock().clone()
	}

	fn save_connection_url(&self, url: Option<&str>) -> Result<()> {
		self.set(url);
		Ok(())
	}
}

/// Application handle that lets tests drive lifecycle transitions.
#[derive(Default)]
pub struct FakeApplicationHandle {
	observers: Mutex<Vec<Arc<dyn HostAppLifecycleObserver>>>,
}

impl FakeApplicationHandle {
	pub fn observer_count(&self) -> usize {
		self.observers.lock().len()
	}

	pub fn enter_foreground(&self) {
		let observers = self.observers.lock().clone();
		for observer in observers {
			observer.on_foreground();
		}
	}

	pub fn enter_background(&self) {
		let observers = self.observers.lock().clone();
		for observer in observers {
			observer.on_background();
		}
	}
}

impl ApplicationHandle for FakeApplicationHandle {
	fn register_lifecycle_observer(&self, observer: Arc<dyn HostAppLifecycleObserver>) {
		self.observers.lock().push(observer);
	}
}

/// Status listener that records what it is told.
#[derive(Default)]
pub struct RecordingListener {
	connected: Mutex<usize>,
	terminations: Mutex<Vec<Option<ConnectionError>>>,
}

impl RecordingListener {
	pub fn connected_count(&self) -> usize {
		*self.connected.lock()
	}

	pub fn terminations(&self) -> Vec<Option<ConnectionError>> {
		self.terminations.lock().clone()
	}
}

impl SessionStatusListener for RecordingListener {
	fn on_session_connected(&self) {
		*self.connected.lock() += 1;
	}

	fn on_session_terminated(&self, error: Option<ConnectionError>) {
		self.terminations.lock().push(error);
	}
}
