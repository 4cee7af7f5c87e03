//! Main application modules.
//!
//! Periodic draining, shutdown signals and statistics output used by the CLI.

pub mod shutdown;
pub mod statistics;
pub mod watch;

// Re-export public API
pub use shutdown::{ctrl_c_signal, wait_for_signal};
pub use statistics::{print_sync_statistics, summary_line};
pub use watch::run_periodic_sync;
