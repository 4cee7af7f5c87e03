//! Dual-write coordinator.
//!
//! Every insert lands in the local database first. When dual-write is on, the
//! same insert is then attempted online; if that fails for any reason the
//! field map is queued in `PendingSync` and the call still succeeds. A
//! separate drain replays the queue against the online database.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::error_handling::{DatabaseError, SyncEvent, SyncStats};
use crate::storage::{ConnectionManager, Endpoint, FieldMap, Statement};

use super::pending::{self, PendingRecord};
use super::SyncError;

/// Behaviour switches for the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Mirror local inserts to the online database.
    pub dual_write: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { dual_write: true }
    }
}

/// What happened to an insert beyond the local write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertOutcome {
    /// Dual-write is off; only the local write was made.
    LocalOnly,
    /// The online write succeeded too.
    Replicated,
    /// The online write failed and the insert was queued for sync.
    Queued,
}

impl InsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertOutcome::LocalOnly => "written locally",
            InsertOutcome::Replicated => "written locally and online",
            InsertOutcome::Queued => "written locally, queued for online sync",
        }
    }
}

/// Result of a successful drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Records inserted into the online database.
    pub replayed: usize,
    /// Queue rows deleted afterwards.
    pub cleared: u64,
}

/// Local-first writer with a durable pending queue.
///
/// Owns its `ConnectionManager`; build one coordinator per logical session.
/// Drains must not run concurrently against the same databases, since
/// replays carry no idempotency key.
pub struct SyncCoordinator {
    manager: ConnectionManager,
    options: SyncOptions,
    stats: Arc<SyncStats>,
}

impl SyncCoordinator {
    pub fn new(manager: ConnectionManager, options: SyncOptions) -> Self {
        Self {
            manager,
            options,
            stats: Arc::new(SyncStats::new()),
        }
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    pub fn stats(&self) -> Arc<SyncStats> {
        Arc::clone(&self.stats)
    }

    /// Direct access for plain queries outside the sync path.
    pub fn manager_mut(&mut self) -> &mut ConnectionManager {
        &mut self.manager
    }

    pub fn into_manager(self) -> ConnectionManager {
        self.manager
    }

    /// Inserts `fields` into `table` locally, then best-effort online.
    ///
    /// # Errors
    ///
    /// A failed local write is returned as-is, with no fallback. A failed
    /// online write is not an error; it yields `InsertOutcome::Queued`. Only
    /// a failure to write the queue row itself surfaces from that path.
    pub async fn insert_with_sync(
        &mut self,
        table: &str,
        fields: &FieldMap,
    ) -> Result<InsertOutcome, DatabaseError> {
        let statement = Statement::insert_into(table, fields)?;

        self.manager.select_endpoint(Endpoint::Local).await;
        self.manager
            .execute_non_query(&statement)
            .await
            .inspect_err(|e| self.stats.increment_error(e.kind()))?;
        self.stats.increment_event(SyncEvent::LocalWrite);

        if !self.options.dual_write {
            return Ok(InsertOutcome::LocalOnly);
        }

        self.manager.select_endpoint(Endpoint::Online).await;
        let online = self.manager.execute_non_query(&statement).await;
        self.manager.select_endpoint(Endpoint::Local).await;

        match online {
            Ok(_) => {
                self.stats.increment_event(SyncEvent::OnlineWrite);
                debug!("Inserted data into online database: {table}");
                Ok(InsertOutcome::Replicated)
            }
            Err(e) => {
                warn!("Error inserting into online database, queuing {table} for sync: {e}");
                self.stats.increment_error(e.kind());
                pending::enqueue(&mut self.manager, table, fields)
                    .await
                    .inspect_err(|e| self.stats.increment_error(e.kind()))?;
                self.stats.increment_event(SyncEvent::Queued);
                Ok(InsertOutcome::Queued)
            }
        }
    }

    /// Replays every queued write against the online database.
    ///
    /// All or nothing: the queue is cleared only after every record replayed.
    /// On the first failure the loop stops and the whole queue stays in
    /// place, including records that were already replayed in this pass.
    pub async fn sync_pending_records(&mut self) -> Result<SyncReport, SyncError> {
        self.stats.increment_event(SyncEvent::DrainPass);
        let result = self.drain().await;
        self.manager.select_endpoint(Endpoint::Local).await;

        match &result {
            Ok(report) if report.replayed > 0 => {
                self.stats.add_event(SyncEvent::Replayed, report.replayed);
                info!(
                    "Synced {} pending record(s), cleared {} from queue",
                    report.replayed, report.cleared
                );
            }
            Ok(_) => debug!("No pending records to sync"),
            Err(e) => {
                self.stats.increment_event(SyncEvent::DrainFailed);
                self.stats.increment_error(e.kind());
                warn!("Error in pending sync, queue kept for retry: {e}");
            }
        }
        result
    }

    /// Lists queued writes in replay order.
    pub async fn pending_records(&mut self) -> Result<Vec<PendingRecord>, DatabaseError> {
        self.manager.select_endpoint(Endpoint::Local).await;
        pending::load_pending(&mut self.manager).await
    }

    /// Number of queued writes.
    pub async fn pending_count(&mut self) -> Result<u64, DatabaseError> {
        self.manager.select_endpoint(Endpoint::Local).await;
        pending::count_pending(&mut self.manager).await
    }

    async fn drain(&mut self) -> Result<SyncReport, SyncError> {
        self.manager.select_endpoint(Endpoint::Local).await;
        let records = pending::load_pending(&mut self.manager)
            .await
            .map_err(SyncError::Load)?;
        let Some(max_rowid) = records.iter().map(|r| r.rowid).max() else {
            return Ok(SyncReport::default());
        };

        self.manager.select_endpoint(Endpoint::Online).await;
        for (position, record) in records.iter().enumerate() {
            let fields = record.fields().map_err(|source| SyncError::Decode {
                position,
                table: record.table_name.clone(),
                source,
            })?;
            let statement = Statement::insert_into(&record.table_name, &fields).map_err(
                |source| SyncError::Replay {
                    position,
                    table: record.table_name.clone(),
                    source,
                },
            )?;
            self.manager
                .execute_non_query(&statement)
                .await
                .map_err(|source| SyncError::Replay {
                    position,
                    table: record.table_name.clone(),
                    source,
                })?;
            debug!("Synced pending data for table {}", record.table_name);
        }

        self.manager.select_endpoint(Endpoint::Local).await;
        let cleared = pending::clear_through(&mut self.manager, max_rowid)
            .await
            .map_err(SyncError::Clear)?;
        Ok(SyncReport {
            replayed: records.len(),
            cleared,
        })
    }
}
