//! Error types for session orchestration.

/// Errors surfaced by the orchestrator and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AssuranceError {
	/// The session factory could not build a session.
	#[error("Failed to create session {session_id}: {reason}")]
	SessionCreation { session_id: String, reason: String },

	/// The connection store could not be written.
	#[error("Connection store error: {0}")]
	ConnectionStore(String),

	/// Configuration JSON could not be parsed.
	#[error("Invalid JSON: {0}")]
	Config(#[from] serde_json::Error),
}

impl AssuranceError {
	/// Builds a [`AssuranceError::SessionCreation`] for `session_id`.
	pub fn session_creation(session_id: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::SessionCreation {
			session_id: session_id.into(),
			reason: reason.into(),
		}
	}
}

pub type Result<T> = std::result::Result<T, AssuranceError>;
