//! Error handling and sync statistics.
//!
//! This module provides:
//! - Error type definitions for start-up and database access
//! - The connection/statement/serialization error taxonomy
//! - Thread-safe counters for write and sync events

mod stats;
mod types;

// Re-export public API
pub use stats::SyncStats;
pub use types::{DatabaseError, DbErrorKind, InitializationError, SyncEvent};
