//! Session lifecycle and event buffering for assurance debugging sessions.
//!
//! An assurance session is a remote-inspection channel a host application
//! opens to a cloud debugging service. This crate owns the part of that
//! feature that decides *which* session exists and *where* outbound
//! diagnostic events go:
//!
//! - [`SessionOrchestrator`] creates, replaces, reconnects and tears down the
//!   single active session, and routes events to it or to the outbound buffer.
//! - [`ConnectionDescriptor`] recovers a session from a persisted socket URL.
//! - [`EventBuffer`] keeps events queued before (and while) a session exists.
//!
//! Transport, UI prompts, persistence and the host SDK's shared-state bus are
//! collaborators reached through the traits in [`session`] and [`host`].

pub mod buffer;
pub mod config;
pub mod connection_url;
pub mod error;
pub mod factory;
pub mod fake;
pub mod host;
pub mod orchestrator;
pub mod session;

pub use assurance_protocol::{AssuranceEnvironment, AssuranceEvent, AuthorizingPresentationType, ConnectionError};
pub use buffer::EventBuffer;
pub use config::OrchestratorConfig;
pub use connection_url::ConnectionDescriptor;
pub use error::{AssuranceError, Result};
pub use factory::{SessionFactory, SessionRequest};
pub use host::{ApplicationHandle, AssurancePlugin, ConnectionStore, HostAppLifecycleObserver, PluginList, StateManager};
pub use orchestrator::{OrchestratorParts, SessionOrchestrator};
pub use session::{AssuranceSession, SessionStatusListener, SessionUiOperations};
