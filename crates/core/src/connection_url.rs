//! Codec for persisted socket URLs.
//!
//! A connected session persists its socket URL so the app can rejoin it after
//! a restart:
//!
//! ```text
//! wss://connect-stage.example.com/client/v1?sessionId=<uuid>&token=<pin>&orgId=<org>&clientId=<uuid>
//! ```
//!
//! Only `sessionId` and `token` are required to reconnect. The environment is
//! carried by the host (`connect` for production, `connect-<env>` otherwise).

use assurance_protocol::AssuranceEnvironment;
use url::Url;
use url::form_urlencoded;

const HOST_PREFIX: &str = "connect";
const SOCKET_PATH: &str = "/client/v1";

const KEY_SESSION_ID: &str = "sessionId";
const KEY_TOKEN: &str = "token";
const KEY_ORG_ID: &str = "orgId";
const KEY_CLIENT_ID: &str = "clientId";

/// Identity of a session recovered from (or rendered into) a socket URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
	pub session_id: String,
	pub token: String,
	pub org_id: Option<String>,
	pub client_id: Option<String>,
	pub environment: AssuranceEnvironment,
}

impl ConnectionDescriptor {
	/// Parses a persisted socket URL.
	///
	/// Returns `None` for empty or malformed input and for URLs missing a
	/// non-empty `sessionId` or `token`.
	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();
		if raw.is_empty() {
			return None;
		}

		let url = Url::parse(raw).ok()?;

		let mut session_id = None;
		let mut token = None;
		let mut org_id = None;
		let mut client_id = None;
		for (key, value) in url.query_pairs() {
			let slot = match key.as_ref() {
				KEY_SESSION_ID => &mut session_id,
				KEY_TOKEN => &mut token,
				KEY_ORG_ID => &mut org_id,
				KEY_CLIENT_ID => &mut client_id,
				_ => continue,
			};
			if !value.is_empty() {
				*slot = Some(value.into_owned());
			}
		}

		Some(Self {
			session_id: session_id?,
			token: token?,
			org_id,
			client_id,
			environment: url.host_str().map(environment_from_host).unwrap_or_default(),
		})
	}

	/// Renders the socket URL for this descriptor under `domain`.
	pub fn socket_url(&self, domain: &str) -> String {
		let mut query = form_urlencoded::Serializer::new(String::new());
		query.append_pair(KEY_SESSION_ID, &self.session_id);
		query.append_pair(KEY_TOKEN, &self.token);
		if let Some(org_id) = &self.org_id {
			query.append_pair(KEY_ORG_ID, org_id);
		}
		if let Some(client_id) = &self.client_id {
			query.append_pair(KEY_CLIENT_ID, client_id);
		}

		format!(
			"wss://{HOST_PREFIX}{}.{domain}{SOCKET_PATH}?{}",
			self.environment.url_format(),
			query.finish()
		)
	}
}

/// Maps `connect-<env>.<domain>` to its environment. Unknown hosts are production.
fn environment_from_host(host: &str) -> AssuranceEnvironment {
	let label = host.split('.').next().unwrap_or_default();
	label
		.strip_prefix(HOST_PREFIX)
		.and_then(|suffix| if suffix.is_empty() { Some(suffix) } else { suffix.strip_prefix('-') })
		.and_then(AssuranceEnvironment::from_token)
		.unwrap_or_default()
}
