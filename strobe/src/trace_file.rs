//! Trace document model
//!
//! [`TraceFile`] is the single artifact a trace session produces: metadata,
//! the time-ordered merged event stream, and session-level statistics. It is
//! built once at finalize and immutable thereafter; everything here derives
//! `PartialEq` so round-trip decoding can be checked with `==`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::event::TraceEvent;

/// Session metadata captured at init time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceMetadata {
    /// Name of the traced program
    pub program: String,
    /// Wall-clock session start, milliseconds since the Unix epoch
    pub start_time: u64,
    /// Component versions (tracer, trace format), sorted for stable output
    pub versions: BTreeMap<String, String>,
}

/// Session-level statistics
///
/// `dropped_events` counts buffer evictions plus malformed records skipped
/// during decoding; `lost_kernel_records` is the producer-reported overflow
/// count, surfaced here so it is never silently discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraceStats {
    pub total_events: u64,
    pub dropped_events: u64,
    #[serde(default)]
    pub lost_kernel_records: u64,
    pub duration_ns: u64,
}

/// The complete trace artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFile {
    pub metadata: TraceMetadata,
    /// Merged event stream, ordered by timestamp with deterministic ties
    pub events: Vec<TraceEvent>,
    pub stats: TraceStats,
}

impl TraceFile {
    /// Decode a trace document from a JSON string
    ///
    /// # Errors
    /// Returns an error if the document is not valid trace JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse trace JSON")
    }

    /// Decode a trace document from a reader
    ///
    /// # Errors
    /// Returns an error if reading fails or the document is not valid trace JSON
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("Failed to parse trace JSON")
    }

    /// Load a trace document from a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
        Self::from_json(&content)
    }
}
