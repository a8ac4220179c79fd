//! Outbound diagnostic events.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Vendor stamped on events that do not name one.
pub const DEFAULT_VENDOR: &str = "com.adobe.griffon.mobile";

/// A diagnostic event destined for the debugging service.
///
/// Events are immutable once built. The payload keeps insertion order.
///
/// Wire format:
/// ```json
/// {
///   "eventID": "0b5f2c1e-...",
///   "vendor": "com.adobe.griffon.mobile",
///   "type": "generic",
///   "payload": { "ACPExtensionEventName": "..." },
///   "timestamp": 1700000000000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssuranceEvent {
	#[serde(rename = "eventID")]
	event_id: String,
	vendor: String,
	#[serde(rename = "type")]
	name: String,
	#[serde(default)]
	payload: Map<String, Value>,
	timestamp: u64,
}

impl AssuranceEvent {
	/// Creates an event with the default vendor, a fresh id and the current time.
	pub fn new(name: impl Into<String>, payload: Map<String, Value>) -> Self {
		Self::with_vendor(DEFAULT_VENDOR, name, payload)
	}

	/// Creates an event attributed to `vendor`.
	pub fn with_vendor(vendor: impl Into<String>, name: impl Into<String>, payload: Map<String, Value>) -> Self {
		Self {
			event_id: Uuid::new_v4().to_string(),
			vendor: vendor.into(),
			name: name.into(),
			payload,
			timestamp: now_millis(),
		}
	}

	pub fn event_id(&self) -> &str {
		&self.event_id
	}

	pub fn vendor(&self) -> &str {
		&self.vendor
	}

	/// Event type name (serialized as `type`).
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn payload(&self) -> &Map<String, Value> {
		&self.payload
	}

	/// Milliseconds since the Unix epoch at construction.
	pub fn timestamp(&self) -> u64 {
		self.timestamp
	}
}

fn now_millis() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_millis() as u64)
		.unwrap_or(0)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn wire_format_uses_service_field_names() {
		let mut payload = Map::new();
		payload.insert("zeta".into(), json!(1));
		payload.insert("alpha".into(), json!("two"));
		let event = AssuranceEvent::new("generic", payload);

		let value = serde_json::to_value(&event).unwrap();
		assert_eq!(value["type"], "generic");
		assert_eq!(value["vendor"], DEFAULT_VENDOR);
		assert_eq!(value["eventID"], event.event_id());
		assert!(value["timestamp"].as_u64().unwrap() > 0);
	}

	#[test]
	fn payload_keeps_insertion_order() {
		let mut payload = Map::new();
		payload.insert("zeta".into(), json!(1));
		payload.insert("alpha".into(), json!(2));
		let event = AssuranceEvent::new("generic", payload);

		let text = serde_json::to_string(event.payload()).unwrap();
		assert_eq!(text, r#"{"zeta":1,"alpha":2}"#);
	}

	#[test]
	fn each_event_gets_a_distinct_id() {
		let a = AssuranceEvent::new("a", Map::new());
		let b = AssuranceEvent::new("a", Map::new());
		assert_ne!(a.event_id(), b.event_id());
	}
}
