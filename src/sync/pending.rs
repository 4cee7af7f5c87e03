//! The `PendingSync` queue in the local database.
//!
//! Rows are `(TableName, Data)` where `Data` is the JSON-encoded field map of
//! a write that reached the local store but not the online one. The implicit
//! `rowid` gives the read order.

use serde::Serialize;

use crate::config::PENDING_SYNC_TABLE;
use crate::error_handling::DatabaseError;
use crate::storage::{ConnectionManager, FieldMap, SqlValue, Statement};

use super::codec::{deserialize_field_map, serialize_field_map};

/// One queued write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingRecord {
    /// SQLite rowid; insertion order.
    pub rowid: i64,
    pub table_name: String,
    /// Serialized field map.
    pub data: String,
}

impl PendingRecord {
    /// Decodes the queued field map.
    pub fn fields(&self) -> Result<FieldMap, DatabaseError> {
        deserialize_field_map(&self.data)
    }
}

/// Queues a write for later replay. Runs against the manager's current
/// endpoint, which callers set to Local.
pub(crate) async fn enqueue(
    manager: &mut ConnectionManager,
    table_name: &str,
    fields: &FieldMap,
) -> Result<(), DatabaseError> {
    let data = serialize_field_map(fields)?;
    let statement = Statement::new(format!(
        "INSERT INTO {PENDING_SYNC_TABLE} (TableName, Data) VALUES (@TableName, @Data)"
    ))
    .param("@TableName", table_name)
    .param("@Data", data);
    manager.execute_non_query(&statement).await?;
    Ok(())
}

/// Reads the whole queue in insertion order.
pub(crate) async fn load_pending(
    manager: &mut ConnectionManager,
) -> Result<Vec<PendingRecord>, DatabaseError> {
    let table = manager
        .fill_table(&Statement::new(format!(
            "SELECT rowid AS rowid, TableName, Data FROM {PENDING_SYNC_TABLE} ORDER BY rowid"
        )))
        .await?;

    table
        .rows
        .into_iter()
        .map(|mut row| {
            let rowid = match row.remove("rowid") {
                Some(SqlValue::Int(v)) => v,
                other => return Err(malformed("rowid", other)),
            };
            let table_name = match row.remove("TableName") {
                Some(SqlValue::Text(v)) => v,
                other => return Err(malformed("TableName", other)),
            };
            let data = match row.remove("Data") {
                Some(SqlValue::Text(v)) => v,
                other => return Err(malformed("Data", other)),
            };
            Ok(PendingRecord {
                rowid,
                table_name,
                data,
            })
        })
        .collect()
}

/// Counts queued writes.
pub(crate) async fn count_pending(manager: &mut ConnectionManager) -> Result<u64, DatabaseError> {
    let count = manager
        .execute_scalar(&Statement::new(format!(
            "SELECT COUNT(*) FROM {PENDING_SYNC_TABLE}"
        )))
        .await?;
    match count {
        Some(SqlValue::Int(n)) => Ok(u64::try_from(n).unwrap_or(0)),
        other => Err(malformed("COUNT(*)", other)),
    }
}

/// Deletes every queued write up to and including `max_rowid` in one statement.
pub(crate) async fn clear_through(
    manager: &mut ConnectionManager,
    max_rowid: i64,
) -> Result<u64, DatabaseError> {
    let statement = Statement::new(format!(
        "DELETE FROM {PENDING_SYNC_TABLE} WHERE rowid <= @MaxRowId"
    ))
    .param("@MaxRowId", max_rowid);
    manager.execute_non_query(&statement).await
}

fn malformed(column: &str, value: Option<SqlValue>) -> DatabaseError {
    DatabaseError::UnsupportedType(format!(
        "{PENDING_SYNC_TABLE}.{column} held unexpected value {value:?}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::test_config;
    use crate::storage::{run_migrations, Endpoint};
    use tempfile::TempDir;

    async fn migrated(dir: &TempDir) -> ConnectionManager {
        let mut manager = ConnectionManager::new(test_config(dir), Endpoint::Local);
        run_migrations(&mut manager).await.unwrap();
        manager
    }

    #[tokio::test]
    async fn test_enqueue_and_load_in_order() {
        let dir = TempDir::new().unwrap();
        let mut manager = migrated(&dir).await;

        for n in 1..=3 {
            let fields = FieldMap::from([("n".to_string(), SqlValue::Int(n))]);
            enqueue(&mut manager, "tbl_Item", &fields).await.unwrap();
        }

        let records = load_pending(&mut manager).await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|w| w[0].rowid < w[1].rowid));
        assert_eq!(records[0].table_name, "tbl_Item");
        assert_eq!(records[2].data, r#"{"n":3}"#);
        assert_eq!(records[1].fields().unwrap()["n"], SqlValue::Int(2));
        assert_eq!(count_pending(&mut manager).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_clear_through_keeps_later_rows() {
        let dir = TempDir::new().unwrap();
        let mut manager = migrated(&dir).await;
        let fields = FieldMap::from([("n".to_string(), SqlValue::Int(1))]);
        enqueue(&mut manager, "tbl_Item", &fields).await.unwrap();
        enqueue(&mut manager, "tbl_Item", &fields).await.unwrap();

        let first = load_pending(&mut manager).await.unwrap()[0].rowid;
        let deleted = clear_through(&mut manager, first).await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(count_pending(&mut manager).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_load_empty_queue() {
        let dir = TempDir::new().unwrap();
        let mut manager = migrated(&dir).await;
        assert!(load_pending(&mut manager).await.unwrap().is_empty());
        assert_eq!(count_pending(&mut manager).await.unwrap(), 0);
    }
}
