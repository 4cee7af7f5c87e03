//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - The sync coordinator and its connection manager

mod logger;

use crate::config::Config;
use crate::storage::{ConnectionManager, Endpoint};
use crate::sync::SyncCoordinator;

// Re-export public API
pub use logger::init_logger_with;

/// Builds a coordinator over a fresh connection manager bound to Local.
///
/// No connection is opened until the first operation.
pub fn init_coordinator(config: &Config) -> SyncCoordinator {
    let manager = ConnectionManager::new(config.connection_config(), Endpoint::Local);
    SyncCoordinator::new(manager, config.sync_options())
}
