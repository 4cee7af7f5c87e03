//! hotel_sync library: local-first SQL writes with deferred online sync
//!
//! Inserts always land in the local database. When dual-write is enabled the
//! same insert is then attempted against the online database; if that fails,
//! the row is queued in the local `PendingSync` table and replayed later by
//! [`SyncCoordinator::sync_pending_records`].
//!
//! # Example
//!
//! ```no_run
//! use hotel_sync::{init_coordinator, Config, FieldMap, SqlValue};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut coordinator = init_coordinator(&config);
//!
//! let guest = FieldMap::from([
//!     ("name".to_string(), SqlValue::from("Alice")),
//!     ("age".to_string(), SqlValue::from(30)),
//! ]);
//! let outcome = coordinator.insert_with_sync("tbl_Guest", &guest).await?;
//! println!("{}", outcome.as_str());
//!
//! // Later, once the online database is reachable again
//! let report = coordinator.sync_pending_records().await?;
//! println!("replayed {} record(s)", report.replayed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The async API requires a Tokio runtime. Synchronous callers can use
//! [`BlockingConnectionManager`] instead.

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod storage;
pub mod sync;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{DatabaseError, DbErrorKind, InitializationError, SyncStats};
pub use initialization::{init_coordinator, init_logger_with};
pub use storage::{
    run_migrations, BlockingConnectionManager, ConnectionConfig, ConnectionManager, Endpoint,
    FieldMap, SqlValue, Statement, Table,
};
pub use sync::{
    deserialize_field_map, serialize_field_map, InsertOutcome, PendingRecord, SyncCoordinator,
    SyncError, SyncOptions, SyncReport,
};
