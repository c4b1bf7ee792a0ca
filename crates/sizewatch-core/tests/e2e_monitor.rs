//! End-to-end monitor integration tests.
//!
//! These tests exercise the real `start_monitor` code path against a real
//! temporary filesystem: a named background thread, a fixed-rate tick loop,
//! a `jwalk` traversal per tick, and events delivered over the crossbeam
//! channel.
//!
//! **Why a `tests/` integration test (not unit test)?**
//!
//! The monitor spawns an OS thread and observes genuine filesystem mutation
//! between ticks (files growing, disappearing, reappearing). Testing that in
//! isolation would require mocking the filesystem and the clock; with
//! `tempfile` and a short tick period every code path runs for real.

use sizewatch_core::monitor::{start_monitor, MonitorConfig, MonitorEvent, MonitorHandle};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// Short cadence so a whole scenario fits in well under a second of waiting.
const PERIOD: Duration = Duration::from_millis(25);

/// Generous ceiling for any single expected event — far more than any
/// tmpdir tick needs on a loaded CI machine, short enough that a genuinely
/// stuck test does not block the suite.
const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

fn start(path: &Path) -> MonitorHandle {
    start_monitor(MonitorConfig::new(path.to_path_buf()).with_period(PERIOD))
        .expect("failed to start monitor")
}

/// Wait up to `timeout` for an event satisfying `pred`, discarding others.
fn wait_for(
    handle: &MonitorHandle,
    timeout: Duration,
    mut pred: impl FnMut(&MonitorEvent) -> bool,
) -> MonitorEvent {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match handle.receiver.recv_timeout(remaining) {
            Ok(event) if pred(&event) => return event,
            Ok(_) => continue,
            Err(err) => panic!("expected event did not arrive within {timeout:?}: {err}"),
        }
    }
}

/// Assert that no change notice arrives within `window`. Other event kinds
/// (missing-target warnings, skip diagnostics) are ignored.
fn assert_no_change(handle: &MonitorHandle, window: Duration) {
    let deadline = Instant::now() + window;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return;
        }
        match handle.receiver.recv_timeout(remaining) {
            Ok(MonitorEvent::SizeChanged { size }) => {
                panic!("unexpected change notice for {size} bytes")
            }
            Ok(_) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => return,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                panic!("monitor exited unexpectedly")
            }
        }
    }
}

fn stop_and_join(handle: MonitorHandle) {
    handle.stop();
    wait_for(&handle, EVENT_TIMEOUT, |e| {
        matches!(e, MonitorEvent::Stopped)
    });
    handle.join();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// An empty directory matches the initial remembered size of 0, so the
/// first tick stays silent; the first real content then fires a notice.
#[test]
fn empty_directory_is_silent_until_content_appears() {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    let handle = start(tmp.path());

    assert_no_change(&handle, PERIOD * 10);

    write_bytes(&tmp.path().join("fresh.dat"), 100);
    let event = wait_for(&handle, EVENT_TIMEOUT, |e| {
        matches!(e, MonitorEvent::SizeChanged { .. })
    });
    assert!(matches!(event, MonitorEvent::SizeChanged { size: 100 }));

    stop_and_join(handle);
}

/// A single file reports its size on the first tick (50 differs from the
/// initial 0) and again after it grows.
#[test]
fn single_file_reports_initial_size_and_growth() {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    let file = tmp.path().join("grows.log");
    write_bytes(&file, 50);

    let handle = start(&file);
    wait_for(&handle, EVENT_TIMEOUT, |e| {
        matches!(e, MonitorEvent::SizeChanged { size: 50 })
    });

    write_bytes(&file, 75);
    wait_for(&handle, EVENT_TIMEOUT, |e| {
        matches!(e, MonitorEvent::SizeChanged { size: 75 })
    });

    stop_and_join(handle);
}

/// The total for a nested tree is the exact sum of its regular files.
#[test]
fn nested_tree_reports_exact_sum() {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    let alpha = tmp.path().join("alpha");
    let beta = tmp.path().join("beta");
    fs::create_dir_all(&alpha).unwrap();
    fs::create_dir_all(&beta).unwrap();
    write_bytes(&alpha.join("a.txt"), 100);
    write_bytes(&alpha.join("b.rs"), 200);
    write_bytes(&beta.join("c.png"), 300);
    write_bytes(&tmp.path().join("d.zip"), 400);

    let handle = start(tmp.path());
    wait_for(&handle, EVENT_TIMEOUT, |e| {
        matches!(e, MonitorEvent::SizeChanged { size: 1_000 })
    });

    stop_and_join(handle);
}

/// Deleting the target yields missing-target warnings, not change notices,
/// and recreating it at the identical size stays silent because the
/// remembered size was never reset. A subsequent genuine change still fires.
#[test]
fn deleted_target_warns_and_identical_recreation_is_silent() {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    let file = tmp.path().join("volatile.bin");
    write_bytes(&file, 64);

    let handle = start(&file);
    wait_for(&handle, EVENT_TIMEOUT, |e| {
        matches!(e, MonitorEvent::SizeChanged { size: 64 })
    });

    fs::remove_file(&file).unwrap();
    wait_for(&handle, EVENT_TIMEOUT, |e| {
        matches!(e, MonitorEvent::TargetMissing { .. })
    });

    // Same size as before the deletion: no observable aggregate change.
    write_bytes(&file, 64);
    assert_no_change(&handle, PERIOD * 12);

    write_bytes(&file, 65);
    wait_for(&handle, EVENT_TIMEOUT, |e| {
        matches!(e, MonitorEvent::SizeChanged { size: 65 })
    });

    stop_and_join(handle);
}

/// A stop request interrupts the between-tick wait immediately; with a one
/// minute period the monitor must still wind down within a couple seconds.
#[test]
fn stop_interrupts_a_long_wait() {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    write_bytes(&tmp.path().join("x"), 10);

    let handle = start_monitor(
        MonitorConfig::new(tmp.path().to_path_buf()).with_period(Duration::from_secs(60)),
    )
    .expect("failed to start monitor");

    // First tick runs immediately; after it the loop sleeps for a minute.
    wait_for(&handle, EVENT_TIMEOUT, |e| {
        matches!(e, MonitorEvent::SizeChanged { size: 10 })
    });

    let asked = Instant::now();
    handle.stop();
    wait_for(&handle, Duration::from_secs(2), |e| {
        matches!(e, MonitorEvent::Stopped)
    });
    assert!(asked.elapsed() < Duration::from_secs(2));

    handle.join();
}

/// Stopping twice is a no-op the second time: exactly one Stopped event,
/// then the channel disconnects.
#[test]
fn double_stop_is_idempotent() {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    let handle = start(tmp.path());

    handle.stop();
    handle.stop();

    wait_for(&handle, EVENT_TIMEOUT, |e| {
        matches!(e, MonitorEvent::Stopped)
    });
    // The loop has exited, so the sender side is gone and no second
    // Stopped can ever arrive.
    assert!(handle.receiver.recv_timeout(PERIOD * 4).is_err());

    handle.join();
}
