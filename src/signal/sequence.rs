//! Per-source sequence numbers with last-write-wins admission.

use std::sync::atomic::{AtomicU64, Ordering};

/// An inbound signal source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// The engine's processing flag.
    Processing,
    /// The panel content fingerprint.
    ContentIdentity,
    /// The panel's chat-active flag.
    ChatActive,
}

impl Source {
    /// Number of distinct sources.
    pub const COUNT: usize = 3;

    #[inline]
    const fn index(self) -> usize {
        match self {
            Self::Processing => 0,
            Self::ContentIdentity => 1,
            Self::ChatActive => 2,
        }
    }
}

/// A value tagged with its source-local sequence number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sequenced<T> {
    /// Monotonic per-source sequence number (first is 1).
    pub seq: u64,
    /// The notified value.
    pub value: T,
}

impl<T> Sequenced<T> {
    /// Tag a value.
    pub const fn new(seq: u64, value: T) -> Self {
        Self { seq, value }
    }
}

/// Admission gate that discards stale notifications.
///
/// A notification is admitted only if its sequence number is strictly
/// greater than the last one admitted for the same source.
#[derive(Debug, Default, Clone)]
pub struct SequenceGate {
    last: [Option<u64>; Source::COUNT],
}

impl SequenceGate {
    /// Create an empty gate.
    pub const fn new() -> Self {
        Self {
            last: [None; Source::COUNT],
        }
    }

    /// Admit `seq` for `source` if it is newer than anything seen so far.
    pub fn admit(&mut self, source: Source, seq: u64) -> bool {
        let slot = &mut self.last[source.index()];
        match *slot {
            Some(last) if seq <= last => false,
            _ => {
                *slot = Some(seq);
                true
            }
        }
    }

    /// The last admitted sequence number for `source`.
    pub const fn last(&self, source: Source) -> Option<u64> {
        self.last[source.index()]
    }

    /// The sequence number an in-order local update for `source` would use.
    pub fn next(&self, source: Source) -> u64 {
        self.last(source).map_or(1, |last| last + 1)
    }
}

/// Shared stamping clock used by producers on any thread.
#[derive(Debug, Default)]
pub struct SequenceClock {
    counters: [AtomicU64; Source::COUNT],
}

impl SequenceClock {
    /// Create a clock with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the next sequence number for `source`.
    pub fn stamp(&self, source: Source) -> u64 {
        self.counters[source.index()].fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_rejects_stale_and_duplicate() {
        let mut gate = SequenceGate::new();

        assert!(gate.admit(Source::ContentIdentity, 2));
        assert!(!gate.admit(Source::ContentIdentity, 1));
        assert!(!gate.admit(Source::ContentIdentity, 2));
        assert!(gate.admit(Source::ContentIdentity, 3));
        assert_eq!(gate.last(Source::ContentIdentity), Some(3));
    }

    #[test]
    fn test_gate_sources_are_independent() {
        let mut gate = SequenceGate::new();

        assert!(gate.admit(Source::Processing, 10));
        assert!(gate.admit(Source::ChatActive, 1));
        assert_eq!(gate.next(Source::Processing), 11);
        assert_eq!(gate.next(Source::ContentIdentity), 1);
    }

    #[test]
    fn test_clock_is_monotonic_per_source() {
        let clock = SequenceClock::new();

        assert_eq!(clock.stamp(Source::Processing), 1);
        assert_eq!(clock.stamp(Source::Processing), 2);
        assert_eq!(clock.stamp(Source::ChatActive), 1);
    }
}
