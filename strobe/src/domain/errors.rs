//! Structured error types for the tracing core
//!
//! Using thiserror for automatic Display implementation and error chaining.
//!
//! The capture path never returns these: capacity exhaustion and correlation
//! ambiguity are counted conditions, not errors. Errors exist only at the
//! session edges (configuration, source attachment, artifact I/O).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Record source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Symbol resolution failed: {0}")]
    SymbolizationFailed(String),

    #[error("No memory range found for binary {0}")]
    NoMemoryRangeFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
