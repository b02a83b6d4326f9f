//! Drain-time k-way event merge
//!
//! Combines per-thread buffers and kernel-delivered record streams into one
//! globally time-ordered stream. The merge is stable and deterministic: ties
//! on `timestamp_ns` break by `(thread_id, sequence-within-source, source)`,
//! so identical input always produces byte-identical output order.
//!
//! Correct ordering across hardware threads assumes a timestamp source that
//! is consistent across cores; the merge imposes a total order but cannot
//! repair clock skew.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::event::TraceEvent;

/// Heap entry: the event plus its total-order sort key
struct Head {
    /// (timestamp_ns, thread_id, sequence-within-source, source index)
    key: (u64, u32, usize, usize),
    event: TraceEvent,
}

impl PartialEq for Head {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Head {}

impl PartialOrd for Head {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Head {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Merge pre-sorted per-source streams into one time-ordered stream
///
/// Each input stream must be in its own program/delivery order (which is
/// already timestamp-ascending for a single context). O(N log k) for N
/// total events over k sources.
#[must_use]
pub fn merge_streams(streams: Vec<Vec<TraceEvent>>) -> Vec<TraceEvent> {
    let total: usize = streams.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);

    let mut iters: Vec<std::vec::IntoIter<TraceEvent>> =
        streams.into_iter().map(Vec::into_iter).collect();
    let mut next_seq = vec![0usize; iters.len()];

    let mut heap: BinaryHeap<Reverse<Head>> = BinaryHeap::with_capacity(iters.len());
    for (source, iter) in iters.iter_mut().enumerate() {
        if let Some(event) = iter.next() {
            let key = (event.timestamp_ns(), event.thread_id(), 0, source);
            next_seq[source] = 1;
            heap.push(Reverse(Head { key, event }));
        }
    }

    while let Some(Reverse(head)) = heap.pop() {
        let source = head.key.3;
        merged.push(head.event);
        if let Some(event) = iters[source].next() {
            let key = (event.timestamp_ns(), event.thread_id(), next_seq[source], source);
            next_seq[source] += 1;
            heap.push(Reverse(Head { key, event }));
        }
    }

    merged
}
