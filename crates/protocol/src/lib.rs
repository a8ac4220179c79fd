//! Wire types for assurance debugging sessions.
//!
//! This crate contains the serde-serializable types exchanged between the
//! host SDK, the session orchestrator and the remote debugging service.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization and small lookups
//! * Stable: Changes only when the wire format changes
//!
//! Session lifecycle and orchestration are built on top of these types in
//! `assurance-rs`.

pub mod event;
pub mod types;

pub use event::*;
pub use types::*;
