//! Signal handling for graceful shutdown

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Cancel `shutdown` on Ctrl+C, or SIGTERM on unix.
///
/// Listeners only flip the token; whoever holds it decides when to stop. An
/// in-flight HTTP call or store write is left to finish.
pub fn setup_signal_handlers(shutdown: CancellationToken) -> Result<()> {
    // Handle Ctrl+C (SIGINT)
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        error!("Failed to listen for Ctrl+C signal: {}", e);
                        return;
                    }
                    info!("Ctrl+C received, stopping by user request...");
                    shutdown.cancel();
                }
                _ = shutdown.cancelled() => {}
            }
        });
    }

    // Handle SIGTERM (Unix only)
    #[cfg(unix)]
    {
        use signal_hook::consts::SIGTERM;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let terminated = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGTERM, Arc::clone(&terminated))?;

        tokio::spawn(async move {
            loop {
                if terminated.load(Ordering::Relaxed) {
                    info!("SIGTERM received, stopping...");
                    shutdown.cancel();
                    break;
                }
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(tokio::time::Duration::from_millis(100)) => {}
                }
            }
        });
    }

    Ok(())
}
