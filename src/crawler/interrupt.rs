//! Cooperative shutdown on SIGINT / SIGTERM
//!
//! The signal task only raises a flag. The coordinator polls it between
//! pages, so a page is never abandoned halfway through.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared "stop after the current page" flag
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag
    ///
    /// Returns true if it was already raised.
    pub fn trigger(&self) -> bool {
        self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Spawns a task that raises `flag` on every SIGINT or SIGTERM
///
/// Must be called from within a tokio runtime.
pub fn install_signal_handlers(flag: InterruptFlag) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(e) = wait_for_signal().await {
                tracing::error!("Failed to listen for shutdown signals: {}", e);
                return;
            }

            if flag.trigger() {
                tracing::warn!("Already shutting down. Please wait...");
            } else {
                tracing::warn!("Shutdown signal received. Saving state and exiting gracefully...");
            }
        }
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
