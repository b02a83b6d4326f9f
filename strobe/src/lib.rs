//! # Strobe - Runtime Tracing & Statistical Profiling Core
//!
//! Strobe is the low-overhead tracing and profiling core of a compiled
//! language runtime: function-level tracing, kernel syscall tracing, and
//! statistical CPU profiling, correlated into a single timeline and
//! rendered as a structured document, an strace-style text trace, or
//! flame-graph data.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Instrumented Program                         │
//! │        (compiler-injected enter/exit hooks, any threads)        │
//! └───────────────┬─────────────────────────────────────────────────┘
//!                 │ function_enter / function_exit
//!                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Per-Thread Capture (this crate)                                │
//! │  • CapturePolicy: stride sampling + glob name filter            │
//! │  • RingBuffer: O(1) writes, counted FIFO eviction               │
//! └───────────────┬─────────────────────────────────────────────────┘
//!                 │ drained batches (one hand-off per thread)
//!                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  TraceSession::finalize                                         │
//! │                                                                 │
//! │  kernel records ──► decode ──┐                                  │
//! │  (RecordSource)              ├──► k-way merge ──► correlate     │
//! │  thread batches ─────────────┘         │                        │
//! │                                        ▼                        │
//! │                                   TraceFile                     │
//! └───────────────┬─────────────────────────────────────────────────┘
//!                 │
//!       ┌─────────┼──────────────┐
//!       ▼         ▼              ▼
//!   JSON doc   text trace   flame graph / hotspots
//! ```
//!
//! ## Module Structure
//!
//! - [`capture`]: per-thread ring buffers, sampling policy, capture contexts
//! - [`session`]: bounded trace lifecycle (init → capture → finalize)
//! - [`source`]: pull interface over kernel-delivered syscall/sample records
//! - [`merge`]: deterministic k-way merge into one time-ordered stream
//! - [`correlate`]: attaches syscalls/samples to the active function frame
//! - [`analysis`]: flame-graph aggregation and hotspot ranking
//! - [`symbolization`]: address-to-name resolution (DWARF by default)
//! - [`export`]: JSON, strace-style text, and folded flame-graph output
//! - [`hooks`]: instrumentation entry points, compile-time toggleable
//! - [`config`] / [`domain`]: configuration surface, newtypes, errors
//!
//! ## Overhead Model
//!
//! Capture never blocks, never locks, and never fails: each thread owns its
//! buffer outright and the only cross-thread hand-off happens once, at
//! finalize. With the `capture` feature disabled the hook entry points are
//! empty inlined functions and instrumented call sites compile to nothing.

pub mod analysis;
pub mod capture;
pub mod config;
pub mod correlate;
pub mod domain;
pub mod event;
pub mod export;
pub mod hooks;
pub mod merge;
pub mod session;
pub mod source;
pub mod symbolization;
pub mod trace_file;

pub use analysis::{rank_hotspots, FlameGraph, Hotspot};
pub use capture::{CapturePolicy, OverflowPolicy, RingBuffer, ThreadContext};
pub use config::{OutputFormat, TraceConfig};
pub use domain::{Pid, Tid, TraceError};
pub use event::{SourceLocation, TraceEvent, TypeInfo, TypedValue, Value};
pub use session::TraceSession;
pub use source::{ChannelSource, KernelRecord, RecordSource};
pub use trace_file::{TraceFile, TraceMetadata, TraceStats};
