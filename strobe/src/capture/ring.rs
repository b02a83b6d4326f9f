//! Fixed-capacity per-context event buffer
//!
//! One buffer per execution context, written only by that context and read
//! exactly once after the writer has stopped. `record` never blocks and
//! never fails: on overflow it evicts per the configured [`OverflowPolicy`]
//! and counts the loss, so the writer always sees an O(1) success.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What to evict when the buffer is full
///
/// The default drops the oldest entry (FIFO), keeping the most recent
/// window of events. Drop-newest keeps the session prefix instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    #[default]
    DropOldest,
    DropNewest,
}

/// Bounded event store with overflow accounting
#[derive(Debug)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
    policy: OverflowPolicy,
    dropped: u64,
}

impl<T> RingBuffer<T> {
    /// Create a buffer with the default drop-oldest policy (panics if capacity is 0)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, OverflowPolicy::DropOldest)
    }

    /// Create a buffer with an explicit overflow policy (panics if capacity is 0)
    #[must_use]
    pub fn with_policy(capacity: usize, policy: OverflowPolicy) -> Self {
        assert!(capacity > 0, "Ring buffer capacity must be non-zero");
        Self { buf: VecDeque::with_capacity(capacity), capacity, policy, dropped: 0 }
    }

    /// Store an event. Never blocks, never fails; overflow evicts and counts.
    pub fn record(&mut self, item: T) {
        if self.buf.len() == self.capacity {
            self.dropped += 1;
            match self.policy {
                OverflowPolicy::DropOldest => {
                    self.buf.pop_front();
                }
                OverflowPolicy::DropNewest => return,
            }
        }
        self.buf.push_back(item);
    }

    /// Consume all stored events in write order and reset the drop counter
    ///
    /// Only valid once the writing context is quiescent; the single-owner
    /// lifecycle makes that a type-system guarantee rather than a lock.
    pub fn drain(&mut self) -> (Vec<T>, u64) {
        let events = self.buf.drain(..).collect();
        let dropped = self.dropped;
        self.dropped = 0;
        (events, dropped)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events evicted since the last drain; monotonically increasing between drains
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }
}
