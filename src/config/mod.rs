//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoint defaults, queue table, timeouts)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Command, Config, InsertArgs, LogFormat, LogLevel, Opt, SyncArgs};
