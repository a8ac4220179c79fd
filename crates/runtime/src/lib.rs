//! Concrete collaborators for the assurance session orchestrator.
//!
//! - [`FileConnectionStore`] persists the last socket URL as JSON on disk.
//! - [`DeviceStatusChecker`] polls the device API until a quick-connect
//!   session is ready and hands it to the orchestrator.
//! - [`logging::init_logging`] installs the tracing subscriber.

pub mod connection_store;
pub mod device_status;
pub mod logging;

pub use connection_store::FileConnectionStore;
pub use device_status::{DEFAULT_DEVICE_API_URL, DeviceStatus, DeviceStatusChecker, QuickConnectError};
