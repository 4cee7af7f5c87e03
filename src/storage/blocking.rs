//! Synchronous facade over `ConnectionManager`.
//!
//! Runs the async operations on a private current-thread runtime. Must not be
//! called from inside another tokio runtime.

use tokio::runtime::{Builder, Runtime};

use crate::error_handling::{DatabaseError, InitializationError};

use super::connection::{ConnectionManager, Table};
use super::endpoint::{ConnectionConfig, Endpoint};
use super::statement::Statement;
use super::value::SqlValue;

/// Blocking counterpart of `ConnectionManager`.
pub struct BlockingConnectionManager {
    inner: ConnectionManager,
    runtime: Runtime,
}

impl BlockingConnectionManager {
    pub fn new(config: ConnectionConfig, endpoint: Endpoint) -> Result<Self, InitializationError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            inner: ConnectionManager::new(config, endpoint),
            runtime,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        self.inner.endpoint()
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    pub fn open(&mut self) -> Result<(), DatabaseError> {
        self.runtime.block_on(self.inner.open())
    }

    pub fn close(&mut self) -> Result<(), DatabaseError> {
        self.runtime.block_on(self.inner.close())
    }

    pub fn select_endpoint(&mut self, endpoint: Endpoint) {
        self.runtime.block_on(self.inner.select_endpoint(endpoint))
    }

    pub fn execute_non_query(&mut self, statement: &Statement) -> Result<u64, DatabaseError> {
        self.runtime.block_on(self.inner.execute_non_query(statement))
    }

    pub fn execute_scalar(&mut self, statement: &Statement) -> Result<Option<SqlValue>, DatabaseError> {
        self.runtime.block_on(self.inner.execute_scalar(statement))
    }

    pub fn fill_table(&mut self, statement: &Statement) -> Result<Table, DatabaseError> {
        self.runtime.block_on(self.inner.fill_table(statement))
    }

    /// Hands back the async manager, dropping the private runtime.
    pub fn into_inner(self) -> ConnectionManager {
        self.inner
    }
}
