//! Host-side collaborators: the SDK's shared-state bus, persisted connection
//! data, the application lifecycle and registered plugins.

use std::sync::Arc;

use assurance_protocol::AssuranceEvent;

use crate::error::Result;

/// Publishes the active session identity to the host SDK.
///
/// Called under the orchestrator's state lock; must not call back into it.
pub trait StateManager: Send + Sync {
	fn share_assurance_shared_state(&self, session_id: &str);

	fn clear_assurance_shared_state(&self);
}

/// Persistence for the socket URL of the last connected session.
pub trait ConnectionStore: Send + Sync {
	/// Returns the stored URL. Read failures are reported as `None`.
	fn stored_connection_url(&self) -> Option<String>;

	/// Stores `url`, or removes the stored URL when `None`.
	fn save_connection_url(&self, url: Option<&str>) -> Result<()>;
}

/// Foreground/background transitions of the host application.
pub trait HostAppLifecycleObserver: Send + Sync {
	fn on_foreground(&self);

	fn on_background(&self);
}

/// Handle to the host application.
pub trait ApplicationHandle: Send + Sync {
	fn register_lifecycle_observer(&self, observer: Arc<dyn HostAppLifecycleObserver>);
}

/// Vendor plugin that reacts to session traffic.
///
/// Sessions drive these hooks; the orchestrator only hands the list to the
/// factory.
pub trait AssurancePlugin: Send + Sync {
	/// Vendor whose inbound events this plugin handles.
	fn vendor(&self) -> &str;

	fn on_event_received(&self, _event: &AssuranceEvent) {}

	fn on_session_connected(&self) {}

	fn on_session_disconnected(&self, _close_code: u16) {}

	fn on_session_terminated(&self) {}
}

/// Shared, immutable plugin list handed to every session.
pub type PluginList = Arc<[Arc<dyn AssurancePlugin>]>;
