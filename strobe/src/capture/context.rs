//! Per-thread capture context
//!
//! One [`ThreadContext`] per execution context, created at thread start via
//! [`crate::session::TraceSession::register_thread`] and owned by that
//! thread for its whole life. All capture state (ring buffer, policy
//! counters, open-call stack) lives inside it, so the hot path touches no
//! shared cells and takes no locks.
//!
//! Teardown is tied to thread lifecycle: `finish()` (or `Drop`) drains the
//! buffer and hands the batch to the session over a channel. That send is
//! the single cross-thread hand-off the contract allows, and it happens
//! exactly once, after the writer has stopped.

use crossbeam_channel::Sender;
use std::time::Instant;

use super::policy::CapturePolicy;
use super::ring::RingBuffer;
use crate::event::{SourceLocation, TraceEvent, TypedValue};

/// A drained buffer handed from a thread context to its session
#[derive(Debug)]
pub(crate) struct DrainedBatch {
    pub tid: u32,
    /// Events in program order for this thread
    pub events: Vec<TraceEvent>,
    /// Buffer evictions plus unmatched exits seen by this context
    pub dropped: u64,
}

/// An entered-but-not-yet-exited function
///
/// Frames suppressed by policy are still pushed so enter/exit pairing
/// survives filtering: the exit of an untraced enter is silently dropped
/// instead of being attributed to the wrong frame.
#[derive(Debug)]
struct OpenFrame {
    name: String,
    enter_ns: u64,
    traced: bool,
}

/// Capture handle owned by exactly one thread
pub struct ThreadContext {
    tid: u32,
    buffer: RingBuffer<TraceEvent>,
    policy: CapturePolicy,
    frames: Vec<OpenFrame>,
    unmatched_exits: u64,
    tx: Sender<DrainedBatch>,
    epoch: Instant,
    finished: bool,
}

impl ThreadContext {
    pub(crate) fn new(
        tid: u32,
        buffer: RingBuffer<TraceEvent>,
        policy: CapturePolicy,
        tx: Sender<DrainedBatch>,
        epoch: Instant,
    ) -> Self {
        Self { tid, buffer, policy, frames: Vec::new(), unmatched_exits: 0, tx, epoch, finished: false }
    }

    /// Record a function entry. O(1), non-blocking, cannot fail.
    ///
    /// Policy is evaluated before the event is constructed; a filtered-out
    /// call pays only the check and a frame push.
    pub fn function_enter(&mut self, name: &str, args: Vec<TypedValue>, location: SourceLocation) {
        let traced = self.policy.should_trace(name);
        let now = self.now_ns();
        self.frames.push(OpenFrame { name: name.to_string(), enter_ns: now, traced });
        if traced {
            self.buffer.record(TraceEvent::function_enter(name, args, location, now, self.tid));
        }
    }

    /// Record a function exit; duration is measured from the matching enter.
    ///
    /// Unwound frames between the top and the named frame are discarded
    /// (an exception path skipped their exits). An exit with no matching
    /// enter is counted, never propagated.
    pub fn function_exit(&mut self, name: &str, return_value: Option<TypedValue>) {
        let now = self.now_ns();
        while let Some(frame) = self.frames.pop() {
            if frame.name == name {
                if frame.traced {
                    self.buffer.record(TraceEvent::function_exit(
                        name,
                        return_value,
                        now.saturating_sub(frame.enter_ns),
                        now,
                        self.tid,
                    ));
                }
                return;
            }
        }
        self.unmatched_exits += 1;
    }

    /// Current call depth (open frames, including filtered ones)
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Thread ID this context records under
    #[must_use]
    pub fn tid(&self) -> u32 {
        self.tid
    }

    /// Nanoseconds on the session clock
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn now_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Drain the buffer and hand the batch to the session
    ///
    /// Also performed on `Drop`, so a context that simply goes out of scope
    /// at thread exit still delivers its events.
    pub fn finish(mut self) {
        self.hand_off();
    }

    fn hand_off(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let (events, dropped) = self.buffer.drain();
        log::debug!(
            "context tid={} drained {} events ({} dropped)",
            self.tid,
            events.len(),
            dropped + self.unmatched_exits
        );
        // The session may already be finalized on abnormal exit; a closed
        // channel just means the batch has nowhere to go.
        let _ = self.tx.send(DrainedBatch {
            tid: self.tid,
            events,
            dropped: dropped + self.unmatched_exits,
        });
    }
}

impl Drop for ThreadContext {
    fn drop(&mut self) {
        self.hand_off();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn test_context(capacity: usize, policy: CapturePolicy) -> (ThreadContext, crossbeam_channel::Receiver<DrainedBatch>) {
        let (tx, rx) = unbounded();
        let ctx = ThreadContext::new(7, RingBuffer::new(capacity), policy, tx, Instant::now());
        (ctx, rx)
    }

    fn loc() -> SourceLocation {
        SourceLocation::new("main.x", 1, 1)
    }

    #[test]
    fn test_enter_exit_pair_recorded_in_order() {
        let (mut ctx, rx) = test_context(16, CapturePolicy::trace_all());
        ctx.function_enter("work", vec![TypedValue::int(3)], loc());
        ctx.function_exit("work", Some(TypedValue::bool(true)));
        ctx.finish();

        let batch = rx.try_recv().unwrap();
        assert_eq!(batch.tid, 7);
        assert_eq!(batch.events.len(), 2);
        assert!(matches!(batch.events[0], TraceEvent::FunctionEnter { ref name, .. } if name == "work"));
        match &batch.events[1] {
            TraceEvent::FunctionExit { name, return_value, .. } => {
                assert_eq!(name, "work");
                assert_eq!(*return_value, Some(TypedValue::bool(true)));
            }
            other => panic!("expected exit, got {other:?}"),
        }
    }

    #[test]
    fn test_exit_duration_spans_matching_enter() {
        let (mut ctx, rx) = test_context(16, CapturePolicy::trace_all());
        ctx.function_enter("f", vec![], loc());
        ctx.function_exit("f", None);
        ctx.finish();

        let batch = rx.try_recv().unwrap();
        let (enter_ts, exit) = match (&batch.events[0], &batch.events[1]) {
            (
                TraceEvent::FunctionEnter { timestamp_ns, .. },
                TraceEvent::FunctionExit { timestamp_ns: exit_ts, duration_ns, .. },
            ) => (*timestamp_ns, (*exit_ts, *duration_ns)),
            other => panic!("unexpected events {other:?}"),
        };
        assert_eq!(exit.0 - enter_ts, exit.1);
    }

    #[test]
    fn test_filtered_enter_suppresses_matching_exit() {
        let policy = CapturePolicy::new(1, Some("io_*")).unwrap();
        let (mut ctx, rx) = test_context(16, policy);
        ctx.function_enter("compute", vec![], loc());
        ctx.function_enter("io_read", vec![], loc());
        ctx.function_exit("io_read", None);
        ctx.function_exit("compute", None);
        ctx.finish();

        let batch = rx.try_recv().unwrap();
        // Only the io_read pair survives, and its exit paired correctly
        assert_eq!(batch.events.len(), 2);
        assert!(batch.events.iter().all(|e| e.thread_id() == 7));
        assert_eq!(batch.dropped, 0);
    }

    #[test]
    fn test_unmatched_exit_is_counted_not_recorded() {
        let (mut ctx, rx) = test_context(16, CapturePolicy::trace_all());
        ctx.function_exit("never_entered", None);
        ctx.finish();

        let batch = rx.try_recv().unwrap();
        assert!(batch.events.is_empty());
        assert_eq!(batch.dropped, 1);
    }

    #[test]
    fn test_drop_delivers_batch() {
        let (mut ctx, rx) = test_context(16, CapturePolicy::trace_all());
        ctx.function_enter("f", vec![], loc());
        drop(ctx);
        let batch = rx.try_recv().unwrap();
        assert_eq!(batch.events.len(), 1);
    }

    #[test]
    fn test_overflow_surfaces_in_batch_dropped() {
        let (mut ctx, rx) = test_context(4, CapturePolicy::trace_all());
        for _ in 0..6 {
            ctx.function_enter("f", vec![], loc());
        }
        ctx.finish();
        let batch = rx.try_recv().unwrap();
        assert_eq!(batch.events.len(), 4);
        assert_eq!(batch.dropped, 2);
    }
}
