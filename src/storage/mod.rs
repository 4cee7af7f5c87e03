// storage/mod.rs
// Database access: endpoints, statements, connection lifecycle

pub mod blocking;
pub mod connection;
pub mod endpoint;
pub mod migrations;
pub mod statement;
pub mod test_helpers;
pub mod value;

// Re-export commonly used items
pub use blocking::BlockingConnectionManager;
pub use connection::{ConnectionManager, Table};
pub use endpoint::{ConnectionConfig, Endpoint};
pub use migrations::run_migrations;
pub use statement::Statement;
pub use value::{FieldMap, SqlValue};
