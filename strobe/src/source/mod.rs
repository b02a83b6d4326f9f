//! Kernel-delivered record streams
//!
//! Syscall and sample records are produced host-side (perf sampling,
//! syscall tracepoints) and delivered already decoded; the core only pulls.
//! [`RecordSource`] is that pull interface: `poll` until `None`, then read
//! the producer's lost-record count. How records physically arrive is the
//! producer's business; [`ChannelSource`] covers the common in-process
//! transport.
//!
//! Opening a producer can fail (insufficient privilege, missing kernel
//! facility). That is reported once, at session start, as
//! [`TraceError::SourceUnavailable`] by the producer's constructor; a
//! session without kernel sources still traces functions, which is a valid
//! degraded mode.

pub mod decode;

use crossbeam_channel::Receiver;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use strobe_common::{SampleRecord, SyscallRecord};

#[allow(unused_imports)] // referenced by module docs
use crate::domain::TraceError;

pub use decode::RecordDecoder;

/// One decoded record from the kernel-side producer
#[derive(Debug, Clone, Copy)]
pub enum KernelRecord {
    Sample(SampleRecord),
    Syscall(SyscallRecord),
}

/// Pull interface over an external record producer
pub trait RecordSource {
    /// Next available record, or `None` when the stream is currently empty
    fn poll(&mut self) -> Option<KernelRecord>;

    /// Records the producer discarded on overflow instead of blocking
    ///
    /// Surfaced into the final trace stats; must never be silently lost.
    fn lost_records(&self) -> u64;
}

/// Record source backed by a crossbeam channel
///
/// The producer holds the `Sender` and a [`LostCounter`] handle; dropping
/// the sender ends the stream.
pub struct ChannelSource {
    rx: Receiver<KernelRecord>,
    lost: Arc<AtomicU64>,
}

/// Producer-side handle for reporting overflow drops
#[derive(Debug, Clone, Default)]
pub struct LostCounter(Arc<AtomicU64>);

impl LostCounter {
    /// Count records the producer had to discard
    pub fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }
}

impl ChannelSource {
    #[must_use]
    pub fn new(rx: Receiver<KernelRecord>) -> (Self, LostCounter) {
        let lost = LostCounter::default();
        (Self { rx, lost: Arc::clone(&lost.0) }, lost)
    }
}

impl RecordSource for ChannelSource {
    fn poll(&mut self) -> Option<KernelRecord> {
        self.rx.try_recv().ok()
    }

    fn lost_records(&self) -> u64 {
        self.lost.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn sample_record(ts: u64) -> SampleRecord {
        SampleRecord {
            pid: 1,
            tid: 2,
            timestamp_ns: ts,
            ip: 0x10,
            depth: 1,
            _padding: 0,
            stack: {
                let mut stack = [0u64; strobe_common::MAX_STACK_DEPTH];
                stack[0] = 0x10;
                stack
            },
        }
    }

    #[test]
    fn test_channel_source_drains_in_order() {
        let (tx, rx) = unbounded();
        let (mut source, _lost) = ChannelSource::new(rx);

        tx.send(KernelRecord::Sample(sample_record(10))).unwrap();
        tx.send(KernelRecord::Sample(sample_record(20))).unwrap();
        drop(tx);

        let first = source.poll().unwrap();
        let second = source.poll().unwrap();
        assert!(source.poll().is_none());
        match (first, second) {
            (KernelRecord::Sample(a), KernelRecord::Sample(b)) => {
                assert_eq!(a.timestamp_ns, 10);
                assert_eq!(b.timestamp_ns, 20);
            }
            other => panic!("unexpected records {other:?}"),
        }
    }

    #[test]
    fn test_lost_counter_is_surfaced() {
        let (_tx, rx) = unbounded::<KernelRecord>();
        let (mut source, lost) = ChannelSource::new(rx);
        lost.add(3);
        lost.add(4);
        assert_eq!(source.lost_records(), 7);
        assert!(source.poll().is_none());
    }
}
