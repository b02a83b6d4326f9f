//! Flame-graph aggregation
//!
//! Folds statistical samples into a frequency table keyed by the exact
//! call-stack sequence (outermost → innermost). Two samples with identical
//! frame sequences collapse into one counter increment; ordering is
//! significant, so `[a,b]` and `[b,a]` are distinct keys.
//!
//! Address stacks arrive leaf-first (the order kernel stack walkers emit,
//! see `strobe_common::SampleRecord`) and are reversed into flame order
//! here. Degenerate samples (empty or all-null stacks) are recorded under
//! `["<unknown>"]` so total-sample accounting stays exact.

use std::collections::HashMap;

use crate::symbolization::FrameResolver;

/// Placeholder frame for samples with no resolvable stack
pub const UNKNOWN_FRAME: &str = "<unknown>";

/// Stack-keyed sample frequency table
#[derive(Debug, Default)]
pub struct FlameGraph {
    counts: HashMap<Vec<String>, u64>,
    total_samples: u64,
}

impl FlameGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one raw sample into the table
    ///
    /// `stack` is the raw leaf-first address stack; addresses the resolver
    /// cannot name are rendered as hex, matching how unresolved frames are
    /// displayed elsewhere.
    pub fn record_sample<R: FrameResolver + ?Sized>(&mut self, stack: &[u64], resolver: &R) {
        let mut frames: Vec<String> = stack
            .iter()
            .filter(|&&addr| addr != 0)
            .map(|&addr| resolver.resolve(addr).unwrap_or_else(|| format!("0x{addr:x}")))
            .collect();
        frames.reverse(); // leaf-first → outermost-first
        self.record_stack(frames);
    }

    /// Fold one already-symbolized stack (outermost → innermost)
    pub fn record_stack(&mut self, mut frames: Vec<String>) {
        if frames.is_empty() {
            frames.push(UNKNOWN_FRAME.to_string());
        }
        *self.counts.entry(frames).or_insert(0) += 1;
        self.total_samples += 1;
    }

    /// Total samples folded in, including `<unknown>` ones
    #[must_use]
    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    /// Number of distinct stack keys
    #[must_use]
    pub fn unique_stacks(&self) -> usize {
        self.counts.len()
    }

    /// Iterate `(stack, count)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&[String], u64)> {
        self.counts.iter().map(|(stack, &count)| (stack.as_slice(), count))
    }

    /// Folded flame-graph lines: `frame1;frame2;...;frameN <count>`
    ///
    /// Lines are sorted lexicographically so output is deterministic; the
    /// textual form is a compatibility contract with flame-graph renderers.
    #[must_use]
    pub fn folded(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .counts
            .iter()
            .map(|(stack, count)| format!("{} {count}", stack.join(";")))
            .collect();
        lines.sort_unstable();
        lines
    }
}
