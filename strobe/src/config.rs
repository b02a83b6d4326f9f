//! Session configuration
//!
//! The config surface is produced by an external CLI layer and consumed
//! here as a serde document. Validation happens once at session init so
//! nothing on the capture path ever has to re-check it.

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::capture::OverflowPolicy;
use crate::domain::TraceError;

/// Output encoding for the final artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Tracing session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Trace every Nth matching call; 1 traces everything
    pub sample_rate: u64,
    /// Optional glob pattern; only matching function names are traced
    pub name_filter: Option<String>,
    /// Where the final artifact is written
    pub output_path: String,
    pub format: OutputFormat,
    /// Per-thread ring buffer capacity, in events
    pub buffer_capacity: usize,
    pub overflow_policy: OverflowPolicy,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            sample_rate: 1,
            name_filter: None,
            output_path: "trace.json".to_string(),
            format: OutputFormat::Json,
            buffer_capacity: 10_000,
            overflow_policy: OverflowPolicy::DropOldest,
        }
    }
}

impl TraceConfig {
    /// Check the configuration for values the core cannot operate with
    ///
    /// # Errors
    /// Returns `InvalidConfig` naming the offending field
    pub fn validate(&self) -> Result<(), TraceError> {
        if self.sample_rate == 0 {
            return Err(TraceError::InvalidConfig("sample_rate must be >= 1".to_string()));
        }
        if self.buffer_capacity == 0 {
            return Err(TraceError::InvalidConfig("buffer_capacity must be >= 1".to_string()));
        }
        if self.output_path.is_empty() {
            return Err(TraceError::InvalidConfig("output_path must not be empty".to_string()));
        }
        if let Some(ref pattern) = self.name_filter {
            Pattern::new(pattern).map_err(|e| {
                TraceError::InvalidConfig(format!("bad name_filter pattern {pattern:?}: {e}"))
            })?;
        }
        Ok(())
    }
}
