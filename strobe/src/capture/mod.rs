//! Capture-time machinery: per-thread ring buffers and sampling policy
//!
//! Everything in this module runs on the instrumented program's threads and
//! must stay O(1), lock-free and non-blocking. Concurrency safety rests on
//! exclusive ownership (one writer per buffer, one reader after the writer
//! has stopped), not on synchronization primitives.

pub mod context;
pub mod policy;
pub mod ring;

pub use context::ThreadContext;
pub use policy::CapturePolicy;
pub use ring::{OverflowPolicy, RingBuffer};
