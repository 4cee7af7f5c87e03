//! Error type definitions.
//!
//! This module defines the error types used by the connection manager, the
//! sync coordinator and application start-up.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::storage::Endpoint;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the runtime behind the blocking connection manager.
    #[error("Runtime initialization error: {0}")]
    RuntimeError(#[from] std::io::Error),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The endpoint could not be reached, rejected the connection, or the
    /// handle broke mid-statement.
    #[error("Connection error ({endpoint} database): {source}")]
    ConnectionError {
        endpoint: Endpoint,
        #[source]
        source: sqlx::Error,
    },

    /// Malformed SQL, constraint violation or type mismatch.
    #[error("Statement error: {0}")]
    StatementError(#[from] sqlx::Error),

    /// Statement parameters could not be bound to the SQL text.
    #[error("Parameter binding error: {0}")]
    BindError(String),

    /// A result column holds a value with no scalar representation.
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    /// A field map could not be encoded to or decoded from its stored text.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Schema migration failed.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl DatabaseError {
    /// Maps the error onto the connection/statement/serialization taxonomy.
    pub fn kind(&self) -> DbErrorKind {
        match self {
            DatabaseError::ConnectionError { .. } => DbErrorKind::Connection,
            DatabaseError::StatementError(_)
            | DatabaseError::BindError(_)
            | DatabaseError::UnsupportedType(_)
            | DatabaseError::MigrationError(_) => DbErrorKind::Statement,
            DatabaseError::SerializationError(_) => DbErrorKind::Serialization,
        }
    }

    /// Classifies a driver error raised while a statement was running.
    ///
    /// I/O and worker failures mean the handle itself is gone, so they count
    /// as connection errors. Everything else is the statement's fault.
    pub(crate) fn from_execution(endpoint: Endpoint, error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::WorkerCrashed => {
                DatabaseError::ConnectionError {
                    endpoint,
                    source: error,
                }
            }
            other => DatabaseError::StatementError(other),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(e: serde_json::Error) -> Self {
        DatabaseError::SerializationError(e.to_string())
    }
}

/// Coarse categories of database failure, used for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum DbErrorKind {
    Connection,
    Statement,
    Serialization,
}

impl std::fmt::Display for DbErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DbErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbErrorKind::Connection => "Connection error",
            DbErrorKind::Statement => "Statement error",
            DbErrorKind::Serialization => "Serialization error",
        }
    }
}

/// Events counted while writing and syncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum SyncEvent {
    LocalWrite,
    OnlineWrite,
    Queued,
    Replayed,
    DrainPass,
    DrainFailed,
}

impl std::fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SyncEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncEvent::LocalWrite => "Local writes",
            SyncEvent::OnlineWrite => "Online writes",
            SyncEvent::Queued => "Queued for sync",
            SyncEvent::Replayed => "Replayed from queue",
            SyncEvent::DrainPass => "Drain passes",
            SyncEvent::DrainFailed => "Failed drains",
        }
    }
}
