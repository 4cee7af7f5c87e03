//! Shared test helpers for storage and sync tests.
//!
//! Every test gets its own temporary directory holding file-backed SQLite
//! databases; in-memory databases would vanish each time the manager closes
//! its handle.

#[cfg(test)]
use tempfile::TempDir;

#[cfg(test)]
use crate::storage::ConnectionConfig;

/// Local and online databases inside `dir`.
#[cfg(test)]
pub fn test_config(dir: &TempDir) -> ConnectionConfig {
    ConnectionConfig::new(
        format!("sqlite:{}", dir.path().join("local.db").display()),
        format!("sqlite:{}", dir.path().join("online.db").display()),
    )
}

/// Same local database as `test_config`, but an online endpoint that can
/// never be opened.
#[cfg(test)]
pub fn unreachable_config(dir: &TempDir) -> ConnectionConfig {
    ConnectionConfig::new(
        format!("sqlite:{}", dir.path().join("local.db").display()),
        format!(
            "sqlite:{}",
            dir.path().join("missing").join("online.db").display()
        ),
    )
}
