/// sizewatch Core — polling, aggregation, and change detection.
///
/// This crate contains all monitoring logic with zero CLI dependencies.
/// It is designed to be reusable across different frontends (CLI, TUI).
///
/// # Modules
///
/// - [`aggregate`] — Recursive size computation over a file or subtree.
/// - [`detect`] — Stateful change detection against the last reported size.
/// - [`monitor`] — Fixed-rate poll loop on a background thread, with its
///   event channel.
/// - [`shutdown`] — Idempotent stop signal shared by signal handlers and
///   programmatic stops.
/// - [`format`] — Human-readable byte formatting for notices.
pub mod aggregate;
pub mod detect;
pub mod format;
pub mod monitor;
pub mod shutdown;
