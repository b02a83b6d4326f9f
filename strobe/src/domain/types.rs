//! Domain newtypes for identifiers and time values
//!
//! These wrappers prevent mixups like passing a PID where a TID is expected
//! and keep unit conversions (ns → ms/s/µs) in one place.

use std::fmt;

/// Process ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID:{}", self.0)
    }
}

impl From<i32> for Pid {
    fn from(pid: i32) -> Self {
        Pid(pid as u32)
    }
}

/// Thread ID
///
/// This is the kernel-assigned TID of an execution context. Function events
/// and kernel-delivered records must agree on it for correlation to attach
/// syscalls and samples to the right call stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tid(pub u32);

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TID:{}", self.0)
    }
}

/// Timestamp in nanoseconds
///
/// An absolute point in time on the session's monotonic clock. Ordering
/// across threads is only as trustworthy as the underlying clock source;
/// cross-core consistency is an external guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Whole seconds component
    #[must_use]
    pub fn seconds(self) -> u64 {
        self.0 / 1_000_000_000
    }

    /// Microseconds within the current second
    #[must_use]
    pub fn subsec_micros(self) -> u64 {
        (self.0 % 1_000_000_000) / 1_000
    }

    /// Convert to seconds (f64)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.seconds(), self.subsec_micros())
    }
}

/// Duration in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DurationNs(pub u64);

impl DurationNs {
    /// Convert to milliseconds (f64)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_millis(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Convert to seconds (f64)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }
}

impl fmt::Display for DurationNs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}ms", self.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_display() {
        assert_eq!(Pid(1234).to_string(), "PID:1234");
        assert_eq!(Pid::from(42i32), Pid(42));
    }

    #[test]
    fn test_tid_display() {
        assert_eq!(Tid(7).to_string(), "TID:7");
    }

    #[test]
    fn test_timestamp_components() {
        let ts = Timestamp(1_500_000_000); // 1.5 seconds
        assert_eq!(ts.seconds(), 1);
        assert_eq!(ts.subsec_micros(), 500_000);
        assert_eq!(ts.to_string(), "1.500000");
    }

    #[test]
    fn test_timestamp_as_seconds() {
        assert_eq!(Timestamp(2_250_000_000).as_seconds(), 2.25);
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(DurationNs(5_000_000).to_string(), "5.000ms");
        assert_eq!(DurationNs(1_234_567).to_string(), "1.235ms");
    }
}
