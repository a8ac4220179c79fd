use std::sync::Arc;

use assurance::fake::FakeCollaboratorsBuilder;
use assurance::{AssuranceEnvironment, ConnectionStore, OrchestratorConfig, SessionOrchestrator};
use assurance_runtime::FileConnectionStore;

#[test]
fn orchestrator_reconnects_from_file_store() {
	let dir = tempfile::tempdir().unwrap();
	let store = Arc::new(FileConnectionStore::new(dir.path().join("assurance").join("connection.json")));
	store
		.save_connection_url(Some("wss://connect-dev.example.com/client/v1?sessionId=abc-123&token=4321"))
		.unwrap();

	let (mut parts, controller) = FakeCollaboratorsBuilder::new().build();
	parts.connection_store = store.clone();
	let orchestrator = SessionOrchestrator::new(parts, OrchestratorConfig::default());

	assert!(orchestrator.reconnect_to_stored_session().unwrap());
	let created = controller.factory.last().unwrap();
	assert_eq!(created.session_id, "abc-123");
	assert_eq!(created.environment, AssuranceEnvironment::Dev);
}

#[test]
fn cleared_file_store_does_not_reconnect() {
	let dir = tempfile::tempdir().unwrap();
	let store = Arc::new(FileConnectionStore::new(dir.path().join("connection.json")));
	store.save_connection_url(Some("wss://connect.example.com/client/v1?sessionId=abc&token=1")).unwrap();
	store.save_connection_url(None).unwrap();

	let (mut parts, controller) = FakeCollaboratorsBuilder::new().build();
	parts.connection_store = store;
	let orchestrator = SessionOrchestrator::new(parts, OrchestratorConfig::default());

	assert!(!orchestrator.reconnect_to_stored_session().unwrap());
	assert_eq!(controller.factory.create_count(), 0);
}
