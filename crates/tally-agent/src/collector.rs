//! Per-identity traffic accumulator and kick markers.
//!
//! Counters and kick markers live behind one lock: consuming a kick and
//! deciding whether to count the traffic is a single atomic step.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

/// Accumulated traffic for a single identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterEntry {
    pub tx: u64,
    pub rx: u64,
}

impl CounterEntry {
    pub fn new(tx: u64, rx: u64) -> Self {
        Self { tx, rx }
    }

    /// Add to both directions, saturating at `u64::MAX`.
    #[inline]
    pub fn add(&mut self, tx: u64, rx: u64) {
        self.tx = self.tx.saturating_add(tx);
        self.rx = self.rx.saturating_add(rx);
    }
}

/// Outcome of a traffic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Counted,
    /// A kick marker was pending and has been consumed.
    Kicked,
    /// The admission check refused the key.
    Refused,
}

/// Drained counters, keyed by identity.
pub type Snapshot = HashMap<String, CounterEntry>;

#[derive(Debug, Default)]
struct State {
    counters: Snapshot,
    kicks: HashSet<String>,
}

/// Thread-safe per-identity traffic accumulator.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct CounterStore {
    inner: Arc<Mutex<State>>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account `tx`/`rx` bytes to `key`.
    ///
    /// If a kick marker is pending for `key` it is consumed, nothing is
    /// counted, and `false` is returned.
    pub fn record(&self, key: &str, tx: u64, rx: u64) -> bool {
        self.record_with(key, tx, rx, |_| true) == Recorded::Counted
    }

    /// Like [`record`](Self::record), with an extra admission check.
    ///
    /// The kick marker is consulted first. `admit` runs under the store
    /// lock and must not block.
    pub fn record_with<F>(&self, key: &str, tx: u64, rx: u64, admit: F) -> Recorded
    where
        F: FnOnce(&str) -> bool,
    {
        let mut state = self.inner.lock();
        if state.kicks.remove(key) {
            return Recorded::Kicked;
        }
        if !admit(key) {
            return Recorded::Refused;
        }
        match state.counters.get_mut(key) {
            Some(entry) => entry.add(tx, rx),
            None => {
                state
                    .counters
                    .insert(key.to_string(), CounterEntry::new(tx, rx));
            }
        }
        Recorded::Counted
    }

    /// Mark `key` so its next traffic event is rejected.
    ///
    /// Marking an already marked key is a no-op; the marker still fires once.
    pub fn mark_kick(&self, key: impl Into<String>) {
        self.inner.lock().kicks.insert(key.into());
    }

    /// Mark several keys under a single lock acquisition.
    pub fn mark_kick_batch<I, K>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut state = self.inner.lock();
        let mut marked = 0;
        for key in keys {
            state.kicks.insert(key.into());
            marked += 1;
        }
        marked
    }

    /// Whether a kick marker is pending for `key`.
    pub fn is_kicked(&self, key: &str) -> bool {
        self.inner.lock().kicks.contains(key)
    }

    /// Take all counters and reset the store to empty.
    ///
    /// Kick markers are untouched.
    pub fn take_snapshot(&self) -> Snapshot {
        std::mem::take(&mut self.inner.lock().counters)
    }

    /// Copy the live counters, draining them when `clear` is set.
    pub fn snapshot(&self, clear: bool) -> Snapshot {
        let mut state = self.inner.lock();
        if clear {
            std::mem::take(&mut state.counters)
        } else {
            state.counters.clone()
        }
    }

    /// Add a previously taken snapshot back into the store.
    ///
    /// Entries for keys that are live again are summed. Entries for other
    /// keys are re-inserted unless that would grow the store beyond
    /// `max_keys`, in which case they are dropped. Returns
    /// `(merged, dropped)` entry counts.
    pub fn merge_back(&self, snapshot: Snapshot, max_keys: Option<usize>) -> (usize, usize) {
        let mut state = self.inner.lock();
        let mut merged = 0;
        let mut dropped = 0;
        for (key, old) in snapshot {
            if let Some(live) = state.counters.get_mut(&key) {
                live.add(old.tx, old.rx);
                merged += 1;
            } else if max_keys.is_some_and(|max| state.counters.len() >= max) {
                dropped += 1;
            } else {
                state.counters.insert(key, old);
                merged += 1;
            }
        }
        (merged, dropped)
    }

    /// Number of identities with pending counters.
    pub fn len(&self) -> usize {
        self.inner.lock().counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().counters.is_empty()
    }
}
