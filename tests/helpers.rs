// Shared test helpers for database setup and inspection.
//
// Each test owns a TempDir holding file-backed local and online databases.

use tempfile::TempDir;

use hotel_sync::{
    run_migrations, ConnectionConfig, ConnectionManager, Endpoint, FieldMap, SqlValue, Statement,
    SyncCoordinator, SyncOptions,
};

pub const GUEST_DDL: &str =
    "CREATE TABLE IF NOT EXISTS tbl_Guest (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER)";

/// Local and online database URLs inside `dir`.
pub fn reachable_config(dir: &TempDir) -> ConnectionConfig {
    ConnectionConfig::new(
        format!("sqlite:{}", dir.path().join("local.db").display()),
        format!("sqlite:{}", dir.path().join("online.db").display()),
    )
}

/// Same local database, but the online URL points into a missing directory
/// so it can never be opened.
#[allow(dead_code)] // Used by other test files
pub fn unreachable_config(dir: &TempDir) -> ConnectionConfig {
    ConnectionConfig::new(
        format!("sqlite:{}", dir.path().join("local.db").display()),
        format!(
            "sqlite:{}",
            dir.path().join("offline").join("online.db").display()
        ),
    )
}

/// Migrates the local database and creates `tbl_Guest` on the endpoints
/// listed in `targets`.
pub async fn prepare(config: &ConnectionConfig, targets: &[Endpoint]) {
    let mut manager = ConnectionManager::new(config.clone(), Endpoint::Local);
    run_migrations(&mut manager)
        .await
        .expect("Failed to run migrations");
    for endpoint in targets {
        manager.select_endpoint(*endpoint).await;
        manager
            .execute_non_query(&Statement::new(GUEST_DDL))
            .await
            .expect("Failed to create tbl_Guest");
    }
    manager.close().await.expect("Failed to close manager");
}

pub fn coordinator(config: &ConnectionConfig) -> SyncCoordinator {
    SyncCoordinator::new(
        ConnectionManager::new(config.clone(), Endpoint::Local),
        SyncOptions { dual_write: true },
    )
}

/// Counts rows in `table` at `endpoint`.
pub async fn count_rows(config: &ConnectionConfig, endpoint: Endpoint, table: &str) -> i64 {
    let mut manager = ConnectionManager::new(config.clone(), endpoint);
    manager
        .execute_scalar(&Statement::new(format!("SELECT COUNT(*) FROM {table}")))
        .await
        .expect("Failed to count rows")
        .and_then(|v| v.as_i64())
        .expect("COUNT(*) should be an integer")
}

pub fn guest(name: &str, age: i64) -> FieldMap {
    FieldMap::from([
        ("name".to_string(), SqlValue::from(name)),
        ("age".to_string(), SqlValue::from(age)),
    ])
}
