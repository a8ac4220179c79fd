//! Orchestrator configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```json
//! {
//!   "defaultEnvironment": "prod",
//!   "reconnectPresentation": "pin",
//!   "idleShutdownMs": 5000,
//!   "bufferOnStartup": true
//! }
//! ```

use std::time::Duration;

use assurance_protocol::{AssuranceEnvironment, AuthorizingPresentationType};
use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULT_IDLE_SHUTDOWN_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrchestratorConfig {
	/// Environment for sessions started through quick connect.
	pub default_environment: AssuranceEnvironment,
	/// Presentation used when rejoining a stored session.
	pub reconnect_presentation: AuthorizingPresentationType,
	/// Delay before an idle orchestrator stops buffering events.
	pub idle_shutdown_ms: u64,
	/// Whether the outbound buffer exists from construction.
	pub buffer_on_startup: bool,
}

impl Default for OrchestratorConfig {
	fn default() -> Self {
		Self {
			default_environment: AssuranceEnvironment::Prod,
			reconnect_presentation: AuthorizingPresentationType::Pin,
			idle_shutdown_ms: DEFAULT_IDLE_SHUTDOWN_MS,
			buffer_on_startup: true,
		}
	}
}

impl OrchestratorConfig {
	/// Parses a JSON config, filling omitted fields with defaults.
	pub fn from_json_str(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn idle_shutdown_delay(&self) -> Duration {
		Duration::from_millis(self.idle_shutdown_ms)
	}

	pub fn with_buffer_on_startup(mut self, enabled: bool) -> Self {
		self.buffer_on_startup = enabled;
		self
	}

	pub fn with_default_environment(mut self, environment: AssuranceEnvironment) -> Self {
		self.default_environment = environment;
		self
	}

	pub fn with_reconnect_presentation(mut self, presentation: AuthorizingPresentationType) -> Self {
		self.reconnect_presentation = presentation;
		self
	}
}
