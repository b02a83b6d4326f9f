//! Instrumentation entry points with compile-time toggling
//!
//! Compiler-injected call sites go through these functions rather than
//! calling [`crate::capture::ThreadContext`] directly. The `capture`
//! feature statically selects which body they get: the enabled variants
//! forward to the context, the disabled variants are empty
//! `#[inline(always)]` functions, so with the feature off every call site
//! compiles to nothing. The selection is a build-time code path choice,
//! never a runtime branch.

#[cfg(feature = "capture")]
mod enabled;
#[cfg(feature = "capture")]
pub use enabled::{function_enter, function_exit};

#[cfg(not(feature = "capture"))]
mod disabled;
#[cfg(not(feature = "capture"))]
pub use disabled::{function_enter, function_exit};

#[cfg(test)]
mod tests {
    use crate::capture::{CapturePolicy, RingBuffer, ThreadContext};
    use crate::event::SourceLocation;
    use crossbeam_channel::unbounded;
    use std::time::Instant;

    #[test]
    fn test_hooks_compile_against_both_paths() {
        // With `capture` on, the pair records; with it off, the same code
        // compiles to nothing and the batch is empty.
        let (tx, rx) = unbounded();
        let mut ctx =
            ThreadContext::new(1, RingBuffer::new(8), CapturePolicy::trace_all(), tx, Instant::now());
        super::function_enter(&mut ctx, "f", Vec::new(), SourceLocation::new("t.x", 1, 1));
        super::function_exit(&mut ctx, "f", None);
        ctx.finish();

        let batch = rx.try_recv().unwrap();
        if cfg!(feature = "capture") {
            assert_eq!(batch.events.len(), 2);
        } else {
            assert!(batch.events.is_empty());
        }
    }
}
