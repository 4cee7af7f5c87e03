//! Connection management for the local and online databases.
//!
//! A `ConnectionManager` owns at most one open handle at a time and knows the
//! connection strings for both endpoints. Every execute operation opens the
//! handle if needed, runs the statement and closes the handle again,
//! whether or not the statement succeeded.
//!
//! The manager does no internal synchronization. Operations take `&mut self`,
//! so sharing one instance across tasks needs an explicit lock in the caller.

use std::str::FromStr;

use log::{debug, error, info, warn};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Row, TypeInfo, ValueRef};

use crate::config::SQLITE_BUSY_TIMEOUT;
use crate::error_handling::DatabaseError;

use super::endpoint::{ConnectionConfig, Endpoint};
use super::statement::Statement;
use super::value::{FieldMap, SqlValue};

/// Fully buffered result of a SELECT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in result order. Empty when the query returned no rows.
    pub columns: Vec<String>,
    pub rows: Vec<FieldMap>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Single-handle access to one of two relational endpoints.
pub struct ConnectionManager {
    config: ConnectionConfig,
    endpoint: Endpoint,
    conn: Option<SqliteConnection>,
}

impl ConnectionManager {
    /// Creates a manager bound to `endpoint`. No connection is opened yet.
    pub fn new(config: ConnectionConfig, endpoint: Endpoint) -> Self {
        debug!("Initialized connection manager with {endpoint} database");
        Self {
            config,
            endpoint,
            conn: None,
        }
    }

    /// The endpoint the next operation will run against.
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Opens a handle to the selected endpoint. Does nothing if one is open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ConnectionError` if the endpoint cannot be
    /// reached or rejects the connection.
    pub async fn open(&mut self) -> Result<(), DatabaseError> {
        self.connection().await.map(|_| ())
    }

    /// Closes the handle if one is open.
    pub async fn close(&mut self) -> Result<(), DatabaseError> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|source| DatabaseError::ConnectionError {
                    endpoint: self.endpoint,
                    source,
                })?;
            debug!("Closed connection to {} database", self.endpoint);
        }
        Ok(())
    }

    /// Closes any open handle and rebinds to `endpoint`.
    ///
    /// The new handle is opened lazily by the next operation.
    pub async fn select_endpoint(&mut self, endpoint: Endpoint) {
        self.release().await;
        if self.endpoint != endpoint {
            info!("Switched connection to {} database", endpoint);
        }
        self.endpoint = endpoint;
    }

    /// Executes a statement and returns the number of affected rows.
    pub async fn execute_non_query(&mut self, statement: &Statement) -> Result<u64, DatabaseError> {
        debug!("ExecuteNonQuery [{}]: {}", self.endpoint, statement.sql());
        let bound = statement.bind()?;
        let endpoint = self.endpoint;
        let conn = self.connection().await?;
        let result = bound.to_query().execute(&mut *conn).await;
        self.release().await;

        let done = result.map_err(|e| {
            error!("Error in ExecuteNonQuery [{endpoint}]: {e}");
            DatabaseError::from_execution(endpoint, e)
        })?;
        Ok(done.rows_affected())
    }

    /// Executes a statement and returns the first column of the first row.
    ///
    /// `None` means the statement produced no rows; a NULL column comes back
    /// as `Some(SqlValue::Null)`.
    pub async fn execute_scalar(
        &mut self,
        statement: &Statement,
    ) -> Result<Option<SqlValue>, DatabaseError> {
        debug!("ExecuteScalar [{}]: {}", self.endpoint, statement.sql());
        let bound = statement.bind()?;
        let endpoint = self.endpoint;
        let conn = self.connection().await?;
        let result = bound.to_query().fetch_optional(&mut *conn).await;
        self.release().await;

        let row = result.map_err(|e| {
            error!("Error in ExecuteScalar [{endpoint}]: {e}");
            DatabaseError::from_execution(endpoint, e)
        })?;
        match row {
            Some(row) if !row.columns().is_empty() => column_value(&row, 0).map(Some),
            _ => Ok(None),
        }
    }

    /// Executes a SELECT and buffers every row in memory.
    pub async fn fill_table(&mut self, statement: &Statement) -> Result<Table, DatabaseError> {
        debug!("FillTable [{}]: {}", self.endpoint, statement.sql());
        let bound = statement.bind()?;
        let endpoint = self.endpoint;
        let conn = self.connection().await?;
        let result = bound.to_query().fetch_all(&mut *conn).await;
        self.release().await;

        let rows = result.map_err(|e| {
            error!("Error in FillTable [{endpoint}]: {e}");
            DatabaseError::from_execution(endpoint, e)
        })?;

        let columns: Vec<String> = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let rows = rows
            .iter()
            .map(row_to_fields)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Table { columns, rows })
    }

    /// Applies a set of migrations to the selected endpoint.
    pub(crate) async fn apply_migrations(
        &mut self,
        migrator: &sqlx::migrate::Migrator,
    ) -> Result<(), DatabaseError> {
        debug!("Running migrations [{}]", self.endpoint);
        let conn = self.connection().await?;
        let result = migrator.run(&mut *conn).await;
        self.release().await;
        result.map_err(DatabaseError::from)
    }

    /// Returns the open handle, connecting first if there is none.
    async fn connection(&mut self) -> Result<&mut SqliteConnection, DatabaseError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.connect().await?,
        };
        Ok(self.conn.insert(conn))
    }

    async fn connect(&self) -> Result<SqliteConnection, DatabaseError> {
        let endpoint = self.endpoint;
        let url = self.config.url_for(endpoint);
        let to_connection_error = |source: sqlx::Error| {
            error!("Failed to connect to {endpoint} database: {source}");
            DatabaseError::ConnectionError { endpoint, source }
        };

        let mut options = SqliteConnectOptions::from_str(url).map_err(to_connection_error)?;
        // An explicit mode= in the URL decides whether the file may be created.
        if !url.contains("mode=") {
            options = options.create_if_missing(true);
        }
        let conn = options
            .busy_timeout(SQLITE_BUSY_TIMEOUT)
            .disable_statement_logging()
            .connect()
            .await
            .map_err(to_connection_error)?;
        debug!("Opened connection to {endpoint} database");
        Ok(conn)
    }

    /// Closes the handle after an operation. A failed close is logged only;
    /// the statement outcome has already been decided.
    async fn release(&mut self) {
        if let Err(e) = self.close().await {
            warn!("Failed to close connection cleanly: {e}");
        }
    }
}

fn row_to_fields(row: &SqliteRow) -> Result<FieldMap, DatabaseError> {
    let mut fields = FieldMap::new();
    for (index, column) in row.columns().iter().enumerate() {
        fields.insert(column.name().to_string(), column_value(row, index)?);
    }
    Ok(fields)
}

/// Converts one column using the storage class of the value actually held.
fn column_value(row: &SqliteRow, index: usize) -> Result<SqlValue, DatabaseError> {
    let type_name = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(SqlValue::Null);
        }
        raw.type_info().name().to_string()
    };

    let value = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => SqlValue::Int(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" | "NUMERIC" => SqlValue::Decimal(row.try_get_unchecked::<f64, _>(index)?),
        "TEXT" | "DATE" | "TIME" | "DATETIME" => {
            SqlValue::Text(row.try_get_unchecked::<String, _>(index)?)
        }
        other => {
            return Err(DatabaseError::UnsupportedType(format!(
                "column {index} holds {other}"
            )))
        }
    };
    Ok(value)
}
