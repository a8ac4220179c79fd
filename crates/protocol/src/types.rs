//! Enumerations shared by session creation, reconnection and error reporting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend environment an assurance session connects to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssuranceEnvironment {
	#[default]
	Prod,
	Stage,
	Qa,
	Dev,
}

impl AssuranceEnvironment {
	pub const ALL: [AssuranceEnvironment; 4] = [Self::Prod, Self::Stage, Self::Qa, Self::Dev];

	/// Returns the lowercase token used in configuration and query strings.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Prod => "prod",
			Self::Stage => "stage",
			Self::Qa => "qa",
			Self::Dev => "dev",
		}
	}

	/// Returns the host suffix appended to `connect` in socket URLs.
	///
	/// Production uses the bare `connect` host, every other environment
	/// uses `connect-<env>`.
	pub fn url_format(self) -> &'static str {
		match self {
			Self::Prod => "",
			Self::Stage => "-stage",
			Self::Qa => "-qa",
			Self::Dev => "-dev",
		}
	}

	/// Resolves an environment from its token, ignoring ASCII case.
	///
	/// An empty token is production.
	pub fn from_token(token: &str) -> Option<Self> {
		if token.is_empty() {
			return Some(Self::Prod);
		}
		Self::ALL.into_iter().find(|env| env.as_str().eq_ignore_ascii_case(token))
	}
}

impl fmt::Display for AssuranceEnvironment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// How a session obtains its authorization from the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizingPresentationType {
	/// The user types a PIN shown in the debugging UI.
	#[default]
	Pin,
	/// The device is approved from the debugging UI without a typed PIN.
	QuickConnect,
}

impl fmt::Display for AuthorizingPresentationType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Pin => f.write_str("pin"),
			Self::QuickConnect => f.write_str("quick_connect"),
		}
	}
}

/// Reasons a session reports when it terminates on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionError {
	Generic,
	NoOrgId,
	OrgIdMismatch,
	ConnectionLimit,
	EventLimit,
	ClientError,
	SessionDeleted,
	UserCancelled,
}

impl ConnectionError {
	/// Short title shown to the user.
	pub fn title(self) -> &'static str {
		match self {
			Self::Generic => "Connection Error",
			Self::NoOrgId => "Invalid Configuration",
			Self::OrgIdMismatch => "Unauthorized Access",
			Self::ConnectionLimit => "Connection Limit Reached",
			Self::EventLimit => "Event Limit Reached",
			Self::ClientError => "Client Disconnected",
			Self::SessionDeleted => "Session Deleted",
			Self::UserCancelled => "Connection Cancelled",
		}
	}

	/// Longer explanation of what went wrong.
	pub fn description(self) -> &'static str {
		match self {
			Self::Generic => "The connection failed, possibly due to a network issue or an incorrect PIN.",
			Self::NoOrgId => "The mobile SDK is not configured with an organization identifier.",
			Self::OrgIdMismatch => "The session belongs to a different organization than the app.",
			Self::ConnectionLimit => "The session has reached its maximum number of connected clients.",
			Self::EventLimit => "The session has reached its maximum number of events.",
			Self::ClientError => "The client was disconnected by the debugging service.",
			Self::SessionDeleted => "The session was deleted from the debugging service.",
			Self::UserCancelled => "The user cancelled the connection.",
		}
	}

	/// Whether reconnecting could succeed without user intervention.
	pub fn is_retryable(self) -> bool {
		matches!(self, Self::Generic)
	}
}

impl fmt::Display for ConnectionError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.title(), self.description())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn environment_tokens_resolve_case_insensitively() {
		assert_eq!(AssuranceEnvironment::from_token("STAGE"), Some(AssuranceEnvironment::Stage));
		assert_eq!(AssuranceEnvironment::from_token("qa"), Some(AssuranceEnvironment::Qa));
		assert_eq!(AssuranceEnvironment::from_token(""), Some(AssuranceEnvironment::Prod));
		assert_eq!(AssuranceEnvironment::from_token("moon"), None);
	}

	#[test]
	fn production_has_no_url_suffix() {
		assert_eq!(AssuranceEnvironment::Prod.url_format(), "");
		assert_eq!(AssuranceEnvironment::Dev.url_format(), "-dev");
	}

	#[test]
	fn only_generic_errors_are_retryable() {
		assert!(ConnectionError::Generic.is_retryable());
		assert!(!ConnectionError::SessionDeleted.is_retryable());
		assert!(!ConnectionError::UserCancelled.is_retryable());
	}

	#[test]
	fn presentation_type_serializes_snake_case() {
		let json = serde_json::to_string(&AuthorizingPresentationType::QuickConnect).unwrap();
		assert_eq!(json, "\"quick_connect\"");
	}
}
