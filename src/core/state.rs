//! Process lifecycle state for the host loop.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Shutdown signal sender for the host loop
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Before `register_shutdown()`: exit immediately, nothing to unwind
/// - After `register_shutdown()`: notify the host loop, which drains and exits
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        match SHUTDOWN_TX.get() {
            Some(tx) => {
                crate::log!("shell"; "shutting down...");
                let _ = tx.send(());
            }
            None => std::process::exit(0),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the host loop's shutdown channel.
pub fn register_shutdown(shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
