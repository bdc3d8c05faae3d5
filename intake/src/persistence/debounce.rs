//! Per-source debounce timers.
//!
//! Each source (a control name) holds at most one pending deadline. A new
//! event from the same source cancels and reschedules it. Deadlines are also
//! indexed by time so firing due timers only walks the expired range.

use std::collections::{BTreeMap, HashMap};

/// Pending deferred actions keyed by source.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u64,
    // Primary storage: source -> deadline
    pending: HashMap<String, u64>,
    // Deadline index: deadline -> sources
    deadlines: BTreeMap<u64, Vec<String>>,
}

impl Debouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pending: HashMap::new(),
            deadlines: BTreeMap::new(),
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// (Re)arm the timer for `source`; fires `window_ms` after `now_ms`.
    pub fn schedule(&mut self, source: &str, now_ms: u64) {
        self.cancel(source);
        let deadline = now_ms.saturating_add(self.window_ms);
        self.pending.insert(source.to_string(), deadline);
        self.deadlines
            .entry(deadline)
            .or_default()
            .push(source.to_string());
    }

    /// Drop the pending timer for `source`. Returns whether one existed.
    pub fn cancel(&mut self, source: &str) -> bool {
        let Some(deadline) = self.pending.remove(source) else {
            return false;
        };
        if let Some(sources) = self.deadlines.get_mut(&deadline) {
            sources.retain(|s| s != source);
            if sources.is_empty() {
                self.deadlines.remove(&deadline);
            }
        }
        true
    }

    /// Drop every pending timer.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }

    /// Remove and return every source whose deadline is at or before
    /// `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<String> {
        let due_times: Vec<u64> = self.deadlines.range(..=now_ms).map(|(&t, _)| t).collect();

        let mut due = Vec::new();
        for time in due_times {
            if let Some(sources) = self.deadlines.remove(&time) {
                for source in sources {
                    self.pending.remove(&source);
                    due.push(source);
                }
            }
        }
        due
    }

    /// Whether `source` has a pending timer.
    pub fn is_pending(&self, source: &str) -> bool {
        self.pending.contains_key(source)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.deadlines.keys().next().copied()
    }
}
