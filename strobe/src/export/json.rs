//! Structured (JSON) trace serialization
//!
//! Serializes a [`TraceFile`] verbatim; the decoded value compares equal to
//! the encoded one, nested typed values included. Pretty mode is for human
//! eyes, compact for tooling.

use anyhow::{Context, Result};
use std::io::Write;

use crate::trace_file::TraceFile;

/// Trace document writer
#[derive(Debug, Clone, Copy)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    /// Indented output
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Single-line output
    #[must_use]
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Serialize the trace to any writer (file, stdout, buffer)
    ///
    /// # Errors
    /// Returns an error if serialization or the underlying write fails
    pub fn export<W: Write>(&self, trace: &TraceFile, writer: W) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, trace).context("Failed to write trace JSON")
        } else {
            serde_json::to_writer(writer, trace).context("Failed to write trace JSON")
        }
    }

    /// Serialize the trace to a string
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_string(&self, trace: &TraceFile) -> Result<String> {
        let mut buffer = Vec::new();
        self.export(trace, &mut buffer)?;
        String::from_utf8(buffer).context("Trace JSON was not valid UTF-8")
    }
}
