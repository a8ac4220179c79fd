//! Session construction contract.

use std::sync::Arc;

use assurance_protocol::{AssuranceEnvironment, AssuranceEvent, AuthorizingPresentationType};

use crate::error::Result;
use crate::host::{ApplicationHandle, ConnectionStore, PluginList, StateManager};
use crate::session::{AssuranceSession, SessionStatusListener, SessionUiOperations};

/// Everything a factory needs to build a session.
pub struct SessionRequest {
	/// Identifier of the session to join.
	pub session_id: String,
	/// Backend environment hosting the session.
	pub environment: AssuranceEnvironment,
	/// Operations the session's UI invokes on the orchestrator.
	pub ui_operations: Arc<dyn SessionUiOperations>,
	/// Shared-state publisher of the host SDK.
	pub state_manager: Arc<dyn StateManager>,
	/// Plugins notified of session traffic.
	pub plugins: PluginList,
	/// Store the session persists its socket URL into.
	pub connection_store: Arc<dyn ConnectionStore>,
	/// Host application handle.
	pub app_handle: Arc<dyn ApplicationHandle>,
	/// Events queued before this session existed, oldest first.
	pub buffered_events: Vec<AssuranceEvent>,
	/// Caller-supplied listener for the authorizing presentation.
	pub status_listener: Option<Arc<dyn SessionStatusListener>>,
	/// How the session obtains authorization.
	pub presentation: AuthorizingPresentationType,
}

/// Builds sessions without starting any I/O.
///
/// The orchestrator calls [`SessionFactory::create`] while holding its state
/// lock, so implementations must not call back into the orchestrator.
pub trait SessionFactory: Send + Sync {
	fn create(&self, request: SessionRequest) -> Result<Arc<dyn AssuranceSession>>;
}

impl<F> SessionFactory for F
where
	F: Fn(SessionRequest) -> Result<Arc<dyn AssuranceSession>> + Send + Sync,
{
	fn create(&self, request: SessionRequest) -> Result<Arc<dyn AssuranceSession>> {
		self(request)
	}
}
