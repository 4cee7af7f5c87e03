//! Configuration constants.
//!
//! Defaults for endpoints, the pending queue and connection behaviour.

use std::time::Duration;

/// Default local database (the system of record).
pub const DEFAULT_LOCAL_URL: &str = "sqlite:./hotel_local.db";
/// Default online database.
pub const DEFAULT_ONLINE_URL: &str = "sqlite:./hotel_online.db";

/// Environment variable overriding the local connection string.
pub const LOCAL_URL_ENV: &str = "HOTEL_SYNC_LOCAL_URL";
/// Environment variable overriding the online connection string.
pub const ONLINE_URL_ENV: &str = "HOTEL_SYNC_ONLINE_URL";

/// Local table holding writes that have not reached the online database.
pub const PENDING_SYNC_TABLE: &str = "PendingSync";

/// How long SQLite waits on a locked database before failing a statement.
/// This is the only timeout applied to database calls.
pub const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default period between drains in `sync --watch` mode.
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;
