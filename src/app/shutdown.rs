//! Shutdown signal handling for the watch loop.

use std::future::Future;
use std::io;

use log::warn;

/// Resolves on Ctrl-C.
///
/// If the handler cannot be installed the future never resolves, so the
/// watch loop keeps running instead of stopping at once.
pub async fn ctrl_c_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` does. A signal that fails to install is logged and
/// then waits forever.
pub async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Failed to listen for shutdown signal, stop the process to exit: {e}");
        std::future::pending::<()>().await;
    }
}
