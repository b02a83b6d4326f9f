//! Trace session lifecycle
//!
//! A session is bounded: init → capture → finalize. Init validates the
//! configuration and anchors the monotonic clock. Capture happens on the
//! instrumented program's threads through [`ThreadContext`]s created by
//! [`TraceSession::register_thread`]. Finalize is the single barrier:
//! it collects every handed-off buffer, drains the attached kernel record
//! sources, merges, correlates, and produces the immutable [`TraceFile`].
//!
//! Finalize never blocks on a context that is still conceptually in use
//! (abnormal exit, signal): batches that were not handed off are simply
//! absent, yielding a best-effort partial trace.

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::capture::context::DrainedBatch;
use crate::capture::{CapturePolicy, RingBuffer, ThreadContext};
use crate::config::TraceConfig;
use crate::correlate::attach_parents;
use crate::domain::{Tid, TraceError};
use crate::event::TraceEvent;
use crate::merge::merge_streams;
use crate::source::{RecordDecoder, RecordSource};
use crate::trace_file::{TraceFile, TraceMetadata, TraceStats};

/// A bounded tracing session
pub struct TraceSession {
    config: TraceConfig,
    program: String,
    /// Policy template; each registered context clones a fresh counter
    policy: CapturePolicy,
    epoch: Instant,
    start_unix_ms: u64,
    tx: Sender<DrainedBatch>,
    rx: Receiver<DrainedBatch>,
    sources: Vec<Box<dyn RecordSource>>,
}

impl TraceSession {
    /// Initialize a session for the named program
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration fails validation
    pub fn new(program: impl Into<String>, config: TraceConfig) -> Result<Self, TraceError> {
        config.validate()?;
        let policy = CapturePolicy::new(config.sample_rate, config.name_filter.as_deref())?;
        let (tx, rx) = unbounded();
        #[allow(clippy::cast_possible_truncation)]
        let start_unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Ok(Self {
            config,
            program: program.into(),
            policy,
            epoch: Instant::now(),
            start_unix_ms,
            tx,
            rx,
            sources: Vec::new(),
        })
    }

    /// Create the capture context for one execution context
    ///
    /// `tid` must be the kernel thread ID the context runs on; kernel
    /// records carry kernel TIDs, and correlation matches on them. The
    /// returned context is owned by its thread and must not be shared.
    #[must_use]
    pub fn register_thread(&self, tid: Tid) -> ThreadContext {
        ThreadContext::new(
            tid.0,
            RingBuffer::with_policy(self.config.buffer_capacity, self.config.overflow_policy),
            self.policy.clone(),
            self.tx.clone(),
            self.epoch,
        )
    }

    /// Attach an already-opened kernel record source
    ///
    /// Opening the producer is where unavailability surfaces (a privilege
    /// error from its constructor); a session with no sources attached is
    /// the degraded, function-tracing-only mode.
    pub fn attach_source(&mut self, source: Box<dyn RecordSource>) {
        self.sources.push(source);
    }

    /// Session configuration
    #[must_use]
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Collect, merge, correlate, and seal the trace
    ///
    /// # Errors
    /// Currently infallible in practice; the signature leaves room for
    /// sink-producing variants that can fail loudly
    pub fn finalize(self) -> Result<TraceFile, TraceError> {
        let TraceSession { config: _, program, epoch: _, start_unix_ms, tx, rx, sources, .. } =
            self;
        // Close our end so contexts finishing after this point see a dead
        // channel instead of filling an unread queue.
        drop(tx);

        let mut batches: Vec<DrainedBatch> = rx.try_iter().collect();
        // Stable source order regardless of hand-off timing: contexts by
        // TID, then kernel sources in attach order.
        batches.sort_by_key(|batch| batch.tid);

        let mut dropped_events: u64 = 0;
        let mut streams = Vec::with_capacity(batches.len() + sources.len());
        for batch in batches {
            debug!("collected batch tid={} ({} events)", batch.tid, batch.events.len());
            dropped_events += batch.dropped;
            streams.push(batch.events);
        }

        let mut decoder = RecordDecoder::new();
        let mut lost_kernel_records: u64 = 0;
        for mut source in sources {
            let mut stream = Vec::new();
            while let Some(record) = source.poll() {
                if let Some(event) = decoder.decode(record) {
                    stream.push(event);
                }
            }
            let lost = source.lost_records();
            if lost > 0 {
                warn!("kernel source reported {lost} lost records");
            }
            lost_kernel_records += lost;
            // Producer queues are expected to be time-ordered, but a stable
            // sort tolerates slightly out-of-order delivery; ties keep
            // delivery order so the merge stays deterministic.
            stream.sort_by_key(TraceEvent::timestamp_ns);
            streams.push(stream);
        }
        dropped_events += decoder.skipped();

        let mut events = merge_streams(streams);
        attach_parents(&mut events);

        let duration_ns = match (events.first(), events.last()) {
            (Some(first), Some(last)) => last.timestamp_ns() - first.timestamp_ns(),
            _ => 0,
        };

        let mut versions = std::collections::BTreeMap::new();
        versions.insert("strobe".to_string(), env!("CARGO_PKG_VERSION").to_string());
        versions.insert("trace_format".to_string(), "1".to_string());

        Ok(TraceFile {
            metadata: TraceMetadata { program, start_time: start_unix_ms, versions },
            stats: TraceStats {
                total_events: events.len() as u64,
                dropped_events,
                lost_kernel_records,
                duration_ns,
            },
            events,
        })
    }
}
