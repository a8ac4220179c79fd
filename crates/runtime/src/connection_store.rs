//! JSON file persistence for the last connected socket URL.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use assurance::{AssuranceError, ConnectionStore, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const STORE_SCHEMA_VERSION: u32 = 1;

/// On-disk format of a connection store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionStoreFile {
	schema: u32,
	connection_url: String,
	#[serde(default)]
	updated_at: Option<u64>,
}

/// [`ConnectionStore`] backed by a single JSON file.
///
/// A missing, unreadable or corrupt file reads as "nothing stored". Clearing
/// the URL removes the file.
#[derive(Debug, Clone)]
pub struct FileConnectionStore {
	path: PathBuf,
}

impl FileConnectionStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn store_error(&self, action: &str, err: impl std::fmt::Display) -> AssuranceError {
		AssuranceError::ConnectionStore(format!("Failed to {action} {}: {err}", self.path.display()))
	}

	fn load(&self) -> Option<ConnectionStoreFile> {
		let content = match fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(err) if err.kind() == ErrorKind::NotFound => return None,
			Err(err) => {
				warn!(target = "assurance.store", path = %self.path.display(), error = %err, "failed to read connection store");
				return None;
			}
		};

		match serde_json::from_str::<ConnectionStoreFile>(&content) {
			Ok(file) if file.schema == STORE_SCHEMA_VERSION => Some(file),
			Ok(file) => {
				warn!(
					target = "assurance.store",
					path = %self.path.display(),
					schema = file.schema,
					"unsupported connection store schema; ignoring"
				);
				None
			}
			Err(err) => {
				warn!(target = "assurance.store", path = %self.path.display(), error = %err, "corrupt connection store; ignoring");
				None
			}
		}
	}
}

impl ConnectionStore for FileConnectionStore {
	fn stored_connection_url(&self) -> Option<String> {
		self.load().map(|file| file.connection_url)
	}

	fn save_connection_url(&self, url: Option<&str>) -> Result<()> {
		let Some(url) = url else {
			match fs::remove_file(&self.path) {
				Ok(()) => debug!(target = "assurance.store", path = %self.path.display(), "connection url cleared"),
				Err(err) if err.kind() == ErrorKind::NotFound => {}
				Err(err) => return Err(self.store_error("remove", err)),
			}
			return Ok(());
		};

		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).map_err(|e| self.store_error("create directory for", e))?;
		}
		let file = ConnectionStoreFile {
			schema: STORE_SCHEMA_VERSION,
			connection_url: url.to_string(),
			updated_at: Some(now_secs()),
		};
		let json = serde_json::to_string_pretty(&file).map_err(|e| self.store_error("serialize", e))?;
		fs::write(&self.path, json).map_err(|e| self.store_error("write", e))?;
		debug!(target = "assurance.store", path = %self.path.display(), "connection url saved");
		Ok(())
	}
}

fn now_secs() -> u64 {
	SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
