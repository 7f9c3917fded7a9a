#![forbid(unsafe_code)]

//! An [`ItemPool`] that keeps a ledger of every acquire and release.
//!
//! Handles are move-only tokens carrying a serial number, so a handle can
//! only be released once by construction. The pool still records anything
//! the engine gets wrong (an item acquired while already live, a release
//! for a serial it never handed out) as a [`PoolViolation`] instead of
//! panicking, so tests can assert on the full ledger.

use std::collections::BTreeMap;

use timetable_layout::ItemPool;

/// Move-only renderable token.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordedHandle {
    pub item_index: usize,
    pub serial: u64,
}

/// One ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolEvent {
    Acquire { item_index: usize, serial: u64 },
    Release { item_index: usize, serial: u64 },
}

/// Something the engine should never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolViolation {
    /// `item_index` was acquired while a handle for it was still live.
    DoubleAcquire { item_index: usize },
    /// A handle came back that is not live.
    UnknownRelease { item_index: usize, serial: u64 },
}

#[derive(Debug, Default)]
pub struct RecordingPool {
    live: BTreeMap<usize, u64>,
    events: Vec<PoolEvent>,
    violations: Vec<PoolViolation>,
    next_serial: u64,
    acquired: usize,
    released: usize,
}

impl RecordingPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles currently out.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Item indices with a handle out, ascending.
    pub fn live_items(&self) -> Vec<usize> {
        self.live.keys().copied().collect()
    }

    pub fn is_live(&self, item_index: usize) -> bool {
        self.live.contains_key(&item_index)
    }

    pub fn acquired(&self) -> usize {
        self.acquired
    }

    pub fn released(&self) -> usize {
        self.released
    }

    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Drop the event history; counters and live handles are kept.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Items acquired since the last [`clear_events`](Self::clear_events).
    pub fn acquired_items(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PoolEvent::Acquire { item_index, .. } => Some(*item_index),
                PoolEvent::Release { .. } => None,
            })
            .collect()
    }

    /// Items released since the last [`clear_events`](Self::clear_events).
    pub fn released_items(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PoolEvent::Release { item_index, .. } => Some(*item_index),
                PoolEvent::Acquire { .. } => None,
            })
            .collect()
    }

    pub fn violations(&self) -> &[PoolViolation] {
        &self.violations
    }

    /// Every acquire has been matched by a release and nothing went wrong.
    pub fn is_balanced(&self) -> bool {
        self.live.is_empty() && self.violations.is_empty() && self.acquired == self.released
    }
}

impl ItemPool for RecordingPool {
    type Handle = RecordedHandle;

    fn acquire(&mut self, item_index: usize) -> RecordedHandle {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.acquired += 1;
        if self.live.insert(item_index, serial).is_some() {
            tracing::warn!(item_index, "item acquired while already live");
            self.violations
                .push(PoolViolation::DoubleAcquire { item_index });
        }
        self.events.push(PoolEvent::Acquire { item_index, serial });
        RecordedHandle { item_index, serial }
    }

    fn release(&mut self, handle: RecordedHandle) {
        let RecordedHandle { item_index, serial } = handle;
        self.released += 1;
        if self.live.get(&item_index) == Some(&serial) {
            self.live.remove(&item_index);
        } else {
            tracing::warn!(item_index, serial, "release of a handle that is not live");
            self.violations
                .push(PoolViolation::UnknownRelease { item_index, serial });
        }
        self.events.push(PoolEvent::Release { item_index, serial });
    }
}
