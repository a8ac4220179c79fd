//! Quick-connect device status polling.
//!
//! After a device has been registered, the device API reports a session id
//! and pin once an operator accepts the connection. [`DeviceStatusChecker`]
//! polls that endpoint and passes the result to the orchestrator's
//! quick-connect entry point.

use std::sync::Arc;
use std::time::Duration;

use assurance::{AssuranceError, SessionStatusListener, SessionUiOperations};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Production device API base URL.
pub const DEFAULT_DEVICE_API_URL: &str = "https://device.griffon.adobe.com/device";

const STATUS_PATH: &str = "status";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_MAX_ATTEMPTS: u32 = 150;

/// Failures of the quick-connect status flow.
#[derive(Debug, thiserror::Error)]
pub enum QuickConnectError {
	/// No usable response: transport failure or client setup error.
	#[error("Unexpected quick connect error: {0}")]
	Unexpected(String),

	#[error("Device status request failed with HTTP {status}")]
	RequestFailed { status: u16 },

	#[error("Session not ready after {attempts} attempts")]
	SessionNotReady { attempts: u32 },

	#[error("Invalid device status response: {0}")]
	Decode(#[from] serde_json::Error),

	/// The orchestrator rejected the ready session.
	#[error(transparent)]
	Session(#[from] AssuranceError),
}

/// A session the device may join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatus {
	pub session_uuid: String,
	pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusRequest<'a> {
	org_id: &'a str,
	client_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
	#[serde(default)]
	session_uuid: Option<String>,
	/// Sent as a number or a string depending on the backend.
	#[serde(default)]
	token: Option<Value>,
}

impl StatusResponse {
	fn into_status(self) -> Option<DeviceStatus> {
		let session_uuid = self.session_uuid.filter(|id| !id.is_empty())?;
		let token = match self.token? {
			Value::String(token) if !token.is_empty() => token,
			Value::Number(token) => token.to_string(),
			_ => return None,
		};
		Some(DeviceStatus { session_uuid, token })
	}
}

/// Polls the device status endpoint for one registered device.
#[derive(Debug, Clone)]
pub struct DeviceStatusChecker {
	client: reqwest::Client,
	status_url: String,
	org_id: String,
	client_id: String,
	poll_interval: Duration,
	max_attempts: u32,
}

impl DeviceStatusChecker {
	/// Creates a checker against `base_url` (e.g. [`DEFAULT_DEVICE_API_URL`]).
	pub fn new(
		base_url: &str,
		org_id: impl Into<String>,
		client_id: impl Into<String>,
	) -> Result<Self, QuickConnectError> {
		let client = reqwest::Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.map_err(|e| QuickConnectError::Unexpected(format!("Failed to create HTTP client: {e}")))?;

		Ok(Self {
			client,
			status_url: format!("{}/{STATUS_PATH}", base_url.trim_end_matches('/')),
			org_id: org_id.into(),
			client_id: client_id.into(),
			poll_interval: DEFAULT_POLL_INTERVAL,
			max_attempts: DEFAULT_MAX_ATTEMPTS,
		})
	}

	/// Overrides the delay between polls and the attempt limit (at least 1).
	pub fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
		self.poll_interval = interval;
		self.max_attempts = max_attempts.max(1);
		self
	}

	pub fn status_url(&self) -> &str {
		&self.status_url
	}

	/// Issues one status request.
	///
	/// Returns `Ok(None)` while the device is not yet attached to a session.
	pub async fn check(&self) -> Result<Option<DeviceStatus>, QuickConnectError> {
		let body = StatusRequest {
			org_id: &self.org_id,
			client_id: &self.client_id,
		};
		let response = self
			.client
			.post(&self.status_url)
			.header(reqwest::header::ACCEPT, "application/json")
			.json(&body)
			.send()
			.await
			.map_err(|e| QuickConnectError::Unexpected(e.to_string()))?;

		let status = response.status();
		if status != StatusCode::OK && status != StatusCode::CREATED {
			warn!(target = "assurance.quick_connect", status = status.as_u16(), "device status request failed");
			return Err(QuickConnectError::RequestFailed { status: status.as_u16() });
		}

		let text = response
			.text()
			.await
			.map_err(|e| QuickConnectError::Unexpected(e.to_string()))?;
		if text.trim().is_empty() {
			return Ok(None);
		}
		let parsed: StatusResponse = serde_json::from_str(&text)?;
		Ok(parsed.into_status())
	}

	/// Polls until a session is ready or the attempt limit is reached.
	///
	/// Request failures end polling immediately.
	pub async fn poll_until_ready(&self) -> Result<DeviceStatus, QuickConnectError> {
		for attempt in 1..=self.max_attempts {
			if let Some(status) = self.check().await? {
				info!(
					target = "assurance.quick_connect",
					session_id = %status.session_uuid,
					attempt,
					"device attached to session"
				);
				return Ok(status);
			}

			debug!(target = "assurance.quick_connect", attempt, "session not ready");
			if attempt < self.max_attempts {
				tokio::time::sleep(self.poll_interval).await;
			}
		}

		Err(QuickConnectError::SessionNotReady {
			attempts: self.max_attempts,
		})
	}

	/// Waits for a ready session, then starts it through `ui`.
	pub async fn connect_when_ready(
		&self,
		ui: &dyn SessionUiOperations,
		status_listener: Arc<dyn SessionStatusListener>,
	) -> Result<DeviceStatus, QuickConnectError> {
		let status = self.poll_until_ready().await?;
		ui.on_quick_connect(&status.session_uuid, &status.token, status_listener)?;
		Ok(status)
	}
}
