/// Poll scheduler — drives aggregation and change detection at a fixed
/// cadence on a dedicated background thread.
///
/// # Scheduling policy
///
/// Fixed-rate: tick deadlines sit on the grid `start + n * period`. Because
/// every tick runs on the single monitor thread, ticks can never overlap.
/// If a tick overruns its period, the deadlines it missed are **skipped**
/// and the loop realigns to the next future grid point — a sustained slow
/// walk degrades to back-to-back ticks, never to an execution backlog.
///
/// # Cancellation
///
/// The loop waits between ticks on the shutdown receiver, so a stop request
/// interrupts the wait immediately instead of being noticed at the next
/// tick. An in-flight walk runs to completion; no new tick starts after a
/// stop has been requested. The final event on the channel is always
/// [`MonitorEvent::Stopped`].
///
/// # Usage
///
/// ```ignore
/// let handle = start_monitor(MonitorConfig::new(PathBuf::from("/var/log")))?;
/// // receive events on handle.receiver
/// handle.stop();
/// ```
pub mod events;

pub use events::MonitorEvent;

use crate::aggregate;
use crate::detect::ChangeDetector;
use crate::shutdown::{shutdown_channel, ShutdownSignal};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default poll cadence.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);

/// Maximum number of events that may queue up in the channel.
///
/// The output layer is a println loop, so the channel rarely holds more
/// than one event. Sends block when it is full, which preserves tick order
/// and bounds memory instead of dropping or reordering diagnostics.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Errors surfaced when starting a monitor.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("failed to spawn monitor thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// What to monitor and how often.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// File or directory whose aggregate size is watched. Existence is
    /// checked at every tick, not up front — the target may come and go.
    pub target: PathBuf,
    /// Tick period.
    pub period: Duration,
}

impl MonitorConfig {
    pub fn new(target: PathBuf) -> Self {
        Self {
            target,
            period: DEFAULT_PERIOD,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }
}

/// Handle to a running monitor.
///
/// Call [`MonitorHandle::stop`] to shut down the background thread; it
/// finishes any in-flight tick, emits [`MonitorEvent::Stopped`], and exits.
pub struct MonitorHandle {
    /// Receive [`MonitorEvent`]s from the background thread, in tick order.
    pub receiver: Receiver<MonitorEvent>,
    shutdown: ShutdownSignal,
    thread: Option<thread::JoinHandle<()>>,
}

impl MonitorHandle {
    /// Request the monitor to stop. Non-blocking and idempotent.
    pub fn stop(&self) {
        self.shutdown.trigger();
    }

    /// A cloneable stop trigger, suitable for handing to a signal handler.
    /// It shares idempotence with [`MonitorHandle::stop`].
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Wait for the background thread to exit. Call after a stop request
    /// (or after receiving [`MonitorEvent::Stopped`]) to not block forever.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Start monitoring on a background thread.
///
/// The first tick runs immediately; subsequent ticks follow the fixed-rate
/// grid described in the module docs.
pub fn start_monitor(config: MonitorConfig) -> Result<MonitorHandle, MonitorError> {
    let (event_tx, event_rx) = bounded::<MonitorEvent>(EVENT_CHANNEL_CAPACITY);
    let (shutdown, stop_rx) = shutdown_channel();

    let thread = thread::Builder::new()
        .name("sizewatch-monitor".to_owned())
        .spawn(move || {
            run_monitor(config, stop_rx, event_tx);
        })
        .map_err(MonitorError::Spawn)?;

    Ok(MonitorHandle {
        receiver: event_rx,
        shutdown,
        thread: Some(thread),
    })
}

// ─── Background thread ──────────────────────────────────────────────────────

/// Tick at the fixed rate until a stop request or a dropped event receiver.
fn run_monitor(config: MonitorConfig, stop_rx: Receiver<()>, tx: Sender<MonitorEvent>) {
    debug!("monitor: starting on {:?}", config.target);

    // Detector state lives on this thread only and is threaded through the
    // ticks by ownership. No other code can observe or mutate it.
    let mut detector = ChangeDetector::new();

    let started = Instant::now();
    let mut next_tick = started;

    loop {
        if !run_tick(&config.target, &mut detector, &tx) {
            debug!("monitor: event receiver dropped, exiting");
            return;
        }

        // Advance along the fixed-rate grid, skipping any deadline that
        // already passed while the tick ran.
        next_tick += config.period;
        let now = Instant::now();
        while next_tick <= now {
            next_tick += config.period;
        }

        match stop_rx.recv_deadline(next_tick) {
            // Stop requested, or every ShutdownSignal (including the
            // handle's) is gone. Either way, no further tick may start.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => continue,
        }
    }

    let _ = tx.send(MonitorEvent::Stopped);
    debug!("monitor: stopped for {:?}", config.target);
}

/// Run one poll cycle: aggregate, then compare-and-report.
///
/// Returns `false` once the event receiver is gone and emitting has become
/// pointless; all other failures are contained within the tick.
fn run_tick(target: &Path, detector: &mut ChangeDetector, tx: &Sender<MonitorEvent>) -> bool {
    let mut delivered = true;

    let computed = {
        let mut on_entry_error = |path: Option<PathBuf>, message: String| {
            delivered &= tx.send(MonitorEvent::EntrySkipped { path, message }).is_ok();
        };
        aggregate::compute_size(target, &mut on_entry_error)
    };

    match computed {
        None => {
            // Missing target: the tick is skipped entirely. In particular the
            // detector is not fed a zero, so a target recreated at its old
            // size stays silent.
            warn!("monitor: target {:?} does not exist, skipping tick", target);
            delivered
                && tx
                    .send(MonitorEvent::TargetMissing {
                        path: target.to_path_buf(),
                    })
                    .is_ok()
        }
        Some(size) => {
            if let Some(event) = detector.observe(size) {
                delivered &= tx
                    .send(MonitorEvent::SizeChanged { size: event.size })
                    .is_ok();
            }
            delivered
        }
    }
}
