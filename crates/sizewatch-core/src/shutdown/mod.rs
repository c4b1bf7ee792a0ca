/// Shutdown coordination — one idempotent stop trigger for the whole process.
///
/// The original design had two independent termination paths (a signal
/// handler and an exit hook); here both the `ctrlc` handler in the binary
/// and programmatic [`crate::monitor::MonitorHandle::stop`] route through a
/// single [`ShutdownSignal`]. The first trigger wakes the monitor loop, any
/// repeat is a no-op, so a double Ctrl-C can never double-stop anything.
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Cloneable handle that requests a stop exactly once.
#[derive(Clone)]
pub struct ShutdownSignal {
    triggered: Arc<AtomicBool>,
    tx: Sender<()>,
}

/// Create a linked signal/receiver pair. The receiver side is owned by the
/// monitor loop, which waits on it between ticks so a stop request is seen
/// promptly rather than at the next tick boundary.
pub fn shutdown_channel() -> (ShutdownSignal, Receiver<()>) {
    let (tx, rx) = bounded(1);
    (
        ShutdownSignal {
            triggered: Arc::new(AtomicBool::new(false)),
            tx,
        },
        rx,
    )
}

impl ShutdownSignal {
    /// Request a stop. Non-blocking; repeat calls are no-ops.
    pub fn trigger(&self) {
        if self.triggered.swap(true, Ordering::SeqCst) {
            debug!("shutdown already requested, ignoring repeat trigger");
            return;
        }
        // Capacity 1 and only the first trigger reaches this send, so the
        // channel can never be full here. A dropped receiver means the
        // monitor loop already exited, which is fine.
        let _ = self.tx.try_send(());
    }

    /// Whether a stop has been requested.
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}
