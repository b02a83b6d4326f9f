//! Human-readable strace-style trace output
//!
//! One line per event, nesting implied by call order rather than
//! indentation, matching conventional syscall-tracer output:
//!
//! ```text
//! [0.000123] -> compress(bytes=4096) <codec.x:41:5>
//! [0.000140] :: write(1, 140211, 64, 0, 0, 0) = 64 [0.009ms]
//! [0.000151] <- compress() = 512 [0.028ms]
//! ```
//!
//! Samples carry no useful line-level rendering (they feed the flame
//! graph) and are skipped.

use anyhow::{Context, Result};
use std::io::Write;

use crate::domain::{DurationNs, Timestamp};
use crate::event::{TraceEvent, TypedValue};

/// Strace-style line formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

fn render_args(args: &[TypedValue]) -> String {
    args.iter()
        .map(|arg| format!("{}={}", arg.type_info.name, arg.render()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl TextFormatter {
    /// Render one event, or `None` for events with no text form
    #[must_use]
    pub fn format_event(&self, event: &TraceEvent) -> Option<String> {
        match event {
            TraceEvent::FunctionEnter { name, args, location, timestamp_ns, .. } => Some(format!(
                "[{}] -> {name}({}) <{location}>",
                Timestamp(*timestamp_ns),
                render_args(args),
            )),
            TraceEvent::FunctionExit { name, return_value, duration_ns, timestamp_ns, .. } => {
                let value =
                    return_value.as_ref().map_or_else(|| "()".to_string(), TypedValue::render);
                Some(format!(
                    "[{}] <- {name}() = {value} [{}]",
                    Timestamp(*timestamp_ns),
                    DurationNs(*duration_ns),
                ))
            }
            TraceEvent::Syscall {
                name, args, return_value, duration_ns, timestamp_ns, ..
            } => {
                let rendered: Vec<String> = args.iter().map(TypedValue::render).collect();
                Some(format!(
                    "[{}] :: {name}({}) = {return_value} [{}]",
                    Timestamp(*timestamp_ns),
                    rendered.join(", "),
                    DurationNs(*duration_ns),
                ))
            }
            TraceEvent::Sample { .. } => None,
        }
    }

    /// Write the whole stream, one line per formattable event
    ///
    /// # Errors
    /// Returns an error if the underlying write fails
    pub fn write_stream<W: Write>(&self, events: &[TraceEvent], mut writer: W) -> Result<()> {
        for event in events {
            if let Some(line) = self.format_event(event) {
                writeln!(writer, "{line}").context("Failed to write trace text")?;
            }
        }
        Ok(())
    }
}
