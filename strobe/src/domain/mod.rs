//! Core domain types and error taxonomy

pub mod errors;
pub mod types;

pub use errors::TraceError;
pub use types::{DurationNs, Pid, Tid, Timestamp};
