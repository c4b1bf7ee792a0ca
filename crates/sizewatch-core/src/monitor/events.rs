/// Monitor event reporting — lightweight messages sent from the tick
/// thread to the output layer via a crossbeam channel.
use std::path::PathBuf;

/// Events emitted by the monitor loop, in tick order.
///
/// Within one tick, `TargetMissing` and `SizeChanged` are mutually
/// exclusive; `EntrySkipped` may precede a `SizeChanged` when parts of a
/// subtree were unreadable but the rest still summed.
#[derive(Debug)]
pub enum MonitorEvent {
    /// The aggregate size differs from the last reported value.
    SizeChanged {
        /// New total size in bytes.
        size: u64,
    },
    /// The monitored path did not exist at tick time. The tick was skipped
    /// and the remembered size left untouched; the target may reappear.
    TargetMissing { path: PathBuf },
    /// One entry inside the walked subtree could not be read and
    /// contributed zero bytes. The walk continued.
    EntrySkipped {
        /// Offending sub-path, when the walker could name it.
        path: Option<PathBuf>,
        message: String,
    },
    /// The monitor loop has exited. Always the final event.
    Stopped,
}
