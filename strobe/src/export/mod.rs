//! Output formatters
//!
//! Formatters are pure functions over the merged stream: they perform no
//! correlation or aggregation of their own. Writing the final artifact is
//! the one operation in the system allowed to fail loudly, so everything
//! here returns `Result` and propagates I/O errors synchronously.

pub mod folded;
pub mod json;
pub mod text;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;

pub use folded::write_folded;
pub use json::JsonExporter;
pub use text::TextFormatter;

use crate::config::{OutputFormat, TraceConfig};
use crate::trace_file::TraceFile;

/// Write the trace artifact to the configured path in the configured format
///
/// # Errors
/// Returns an error if the output file cannot be created or written
pub fn write_artifact(trace: &TraceFile, config: &TraceConfig) -> Result<()> {
    let file = File::create(&config.output_path)
        .with_context(|| format!("Failed to create {}", config.output_path))?;
    let writer = BufWriter::new(file);
    match config.format {
        OutputFormat::Json => JsonExporter::pretty().export(trace, writer),
        OutputFormat::Text => TextFormatter.write_stream(&trace.events, writer),
    }
}
