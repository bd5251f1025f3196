//! Process-wide shutdown state.
//!
//! `SHUTDOWN` is set by the Ctrl+C handler and polled by pipeline
//! workers between files, so an interrupted build stops before writing
//! more output.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The first Ctrl+C sets the SHUTDOWN flag and lets workers drain.
/// A second one exits immediately.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        crate::log!("build"; "interrupted, stopping...");
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Check if shutdown has been requested
///
/// Relaxed: workers may finish a few more files before they notice.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_default() {
        assert!(!is_shutdown());
    }
}
