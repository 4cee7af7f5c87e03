//! Local-first dual writes with a pending queue.
//!
//! - `codec`: JSON text form of a field map
//! - `pending`: the `PendingSync` table
//! - `coordinator`: insert-with-fallback and the queue drain

pub mod codec;
pub mod coordinator;
pub mod pending;

use thiserror::Error;

use crate::error_handling::{DatabaseError, DbErrorKind};

pub use codec::{deserialize_field_map, serialize_field_map};
pub use coordinator::{InsertOutcome, SyncCoordinator, SyncOptions, SyncReport};
pub use pending::PendingRecord;

/// Why a drain stopped. The queue is left untouched in every case.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The queue could not be read from the local database.
    #[error("Failed to load pending records: {0}")]
    Load(#[source] DatabaseError),

    /// A queued field map could not be decoded.
    #[error("Pending record {position} for {table} could not be decoded: {source}")]
    Decode {
        position: usize,
        table: String,
        #[source]
        source: DatabaseError,
    },

    /// A queued insert failed against the online database.
    #[error("Replay of pending record {position} into {table} failed: {source}")]
    Replay {
        position: usize,
        table: String,
        #[source]
        source: DatabaseError,
    },

    /// Every record replayed but the queue could not be cleared.
    #[error("Failed to clear pending records: {0}")]
    Clear(#[source] DatabaseError),
}

impl SyncError {
    /// Kind of the underlying database error.
    pub fn kind(&self) -> DbErrorKind {
        match self {
            SyncError::Load(e) | SyncError::Clear(e) => e.kind(),
            SyncError::Decode { source, .. } | SyncError::Replay { source, .. } => source.kind(),
        }
    }
}
