// storage/migrations.rs
// Database migration management

use sqlx::migrate::Migrator;

use crate::error_handling::DatabaseError;

use super::connection::ConnectionManager;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Runs the embedded SQLx migrations against the manager's selected endpoint.
pub async fn run_migrations(manager: &mut ConnectionManager) -> Result<(), DatabaseError> {
    manager.apply_migrations(&MIGRATOR).await
}
