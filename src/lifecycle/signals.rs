//! OS signal handling.
//!
//! Ctrl-C (SIGINT) cancels the run at the next step boundary or suspension
//! point. A transaction already submitted stays submitted.

use std::sync::Arc;

use crate::lifecycle::shutdown::Shutdown;

/// Spawn a task that triggers `shutdown` on Ctrl-C.
pub fn spawn_ctrl_c_handler(shutdown: Arc<Shutdown>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received, cancelling run");
                shutdown.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
        }
    })
}
