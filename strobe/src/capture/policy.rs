//! Capture-time sampling and filtering policy
//!
//! Two knobs, evaluated at the call site before any event is constructed so
//! filtered-out calls pay only the cost of the check:
//!
//! - a fixed-stride sample rate (every Nth matching invocation fires), and
//! - a glob pattern matched against the function name.
//!
//! AND semantics: an event is emitted only if the name matches *and* the
//! stride counter fires. The counter only advances on matching names, so the
//! stride is exact over the filtered population: 1,000,000 matching calls at
//! stride 1000 emit exactly 1000 events.

use glob::Pattern;

use crate::domain::TraceError;

/// Per-context capture decision state
///
/// Owned by a single thread context; the stride counter is a plain integer,
/// never a shared cell.
#[derive(Debug, Clone)]
pub struct CapturePolicy {
    stride: u64,
    filter: Option<Pattern>,
    counter: u64,
}

impl CapturePolicy {
    /// Build a policy from a sample rate and an optional glob filter
    ///
    /// # Errors
    /// Returns `InvalidConfig` for a zero sample rate or a malformed pattern
    pub fn new(sample_rate: u64, name_filter: Option<&str>) -> Result<Self, TraceError> {
        if sample_rate == 0 {
            return Err(TraceError::InvalidConfig("sample_rate must be >= 1".to_string()));
        }
        let filter = name_filter
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| {
                    TraceError::InvalidConfig(format!("bad name_filter pattern {pattern:?}: {e}"))
                })
            })
            .transpose()?;
        Ok(Self { stride: sample_rate, filter, counter: 0 })
    }

    /// Trace-everything policy
    #[must_use]
    pub fn trace_all() -> Self {
        Self { stride: 1, filter: None, counter: 0 }
    }

    /// Decide whether this invocation is traced; advances the stride counter
    /// only when the name passes the filter. The first matching invocation
    /// always fires.
    pub fn should_trace(&mut self, name: &str) -> bool {
        if let Some(ref pattern) = self.filter {
            if !pattern.matches(name) {
                return false;
            }
        }
        let fire = self.counter % self.stride == 0;
        self.counter += 1;
        fire
    }

    #[must_use]
    pub fn sample_rate(&self) -> u64 {
        self.stride
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_one_traces_every_call() {
        let mut policy = CapturePolicy::new(1, None).unwrap();
        assert!((0..100).all(|_| policy.should_trace("f")));
    }

    #[test]
    fn test_stride_fires_every_nth() {
        let mut policy = CapturePolicy::new(3, None).unwrap();
        let fired: Vec<bool> = (0..9).map(|_| policy.should_trace("f")).collect();
        assert_eq!(fired, vec![true, false, false, true, false, false, true, false, false]);
    }

    #[test]
    fn test_sampling_proportionality_is_exact() {
        let mut policy = CapturePolicy::new(1000, None).unwrap();
        let emitted = (0..1_000_000).filter(|_| policy.should_trace("hot_loop")).count();
        assert_eq!(emitted, 1000);
    }

    #[test]
    fn test_filter_rejects_non_matching_names() {
        let mut policy = CapturePolicy::new(1, Some("io_*")).unwrap();
        assert!(policy.should_trace("io_read"));
        assert!(!policy.should_trace("compute"));
        assert!(policy.should_trace("io_write"));
    }

    #[test]
    fn test_filter_and_stride_combine() {
        // Stride counts only filtered-in calls
        let mut policy = CapturePolicy::new(2, Some("io_*")).unwrap();
        assert!(policy.should_trace("io_read")); // match #1: fires
        assert!(!policy.should_trace("compute")); // no match, counter untouched
        assert!(!policy.should_trace("io_read")); // match #2: stride skip
        assert!(policy.should_trace("io_read")); // match #3: fires
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert!(CapturePolicy::new(0, None).is_err());
    }

    #[test]
    fn test_bad_pattern_rejected() {
        assert!(CapturePolicy::new(1, Some("[")).is_err());
    }
}
