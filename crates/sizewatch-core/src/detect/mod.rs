/// Change detection — remembers the last reported size and decides when a
/// new observation is worth announcing.
///
/// The detector is owned by value by the tick loop; it is never shared
/// across threads, so no atomics or locks are involved. The remembered size
/// only ever moves to values that were actually reported as changes.

/// A size change worth announcing: the aggregate size differs from the last
/// reported value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The newly observed total size in bytes.
    pub size: u64,
}

/// Stateful comparator for successive size observations.
///
/// Starts with a remembered size of 0, so the first observation of a
/// non-empty target fires an event and the first observation of an empty
/// one does not.
///
/// The remembered size is never reset — not even across missing-target
/// ticks, which must not call [`ChangeDetector::observe`] at all. A target
/// that is deleted and later recreated at its old size therefore fires no
/// event; that is intended, since the aggregate never observably changed.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    previous: u64,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `new_size` against the last reported size.
    ///
    /// Equal: no event, no state change. Different: returns the event and
    /// remembers `new_size` as the new baseline.
    pub fn observe(&mut self, new_size: u64) -> Option<ChangeEvent> {
        if new_size == self.previous {
            return None;
        }
        self.previous = new_size;
        Some(ChangeEvent { size: new_size })
    }
}
