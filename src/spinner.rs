//! Progress spinner
//!
//! Minimal stderr spinner for long-running fetches. Suppressed entirely in
//! porcelain mode so machine-readable output stays clean.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
const TICK: Duration = Duration::from_millis(100);

/// A spinner running on its own tokio task until stopped.
pub struct Spinner {
    active: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Spinner {
    /// Start spinning with the given message on stderr.
    pub fn start(message: &str) -> Self {
        let active = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&active);
        let message = message.to_string();

        let handle = tokio::spawn(async move {
            let mut frame = 0usize;
            let mut ticker = tokio::time::interval(TICK);
            while flag.load(Ordering::Relaxed) {
                ticker.tick().await;
                eprint!("\r{} {}", FRAMES[frame], message);
                let _ = std::io::stderr().flush();
                frame = (frame + 1) % FRAMES.len();
            }
        });

        Self { active, handle }
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(self) {
        self.active.store(false, Ordering::Relaxed);
        let _ = self.handle.await;
        eprint!("\r\x1b[K");
        let _ = std::io::stderr().flush();
    }
}

/// Start a spinner unless porcelain mode is on.
pub fn maybe_start(message: &str, porcelain: bool) -> Option<Spinner> {
    if porcelain {
        None
    } else {
        Some(Spinner::start(message))
    }
}
