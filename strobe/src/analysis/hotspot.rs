//! Hotspot ranking
//!
//! Hotspots are derived, never stored: each call recomputes from the
//! flame-graph table by grouping samples on their leaf (innermost) frame.
//! Ties on sample count order by name ascending so the ranking is
//! deterministic.

// Percentage calculations intentionally convert u64 to f64
#![allow(clippy::cast_precision_loss)]

use std::cmp::Reverse;
use std::collections::HashMap;

use super::flame::{FlameGraph, UNKNOWN_FRAME};

/// A function ranked by aggregated sample count
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    /// Leaf frame name
    pub name: String,
    /// Samples whose innermost frame was this function
    pub sample_count: u64,
    /// Share of all samples, 0.0 - 100.0
    pub percentage_of_total: f64,
}

/// Rank the top-N leaf frames by sample count
#[must_use]
pub fn rank_hotspots(flame: &FlameGraph, top_n: usize) -> Vec<Hotspot> {
    let total = flame.total_samples();
    if total == 0 {
        return Vec::new();
    }

    let mut by_leaf: HashMap<&str, u64> = HashMap::new();
    for (stack, count) in flame.iter() {
        let leaf = stack.last().map_or(UNKNOWN_FRAME, String::as_str);
        *by_leaf.entry(leaf).or_insert(0) += count;
    }

    let mut ranked: Vec<(&str, u64)> = by_leaf.into_iter().collect();
    ranked.sort_unstable_by_key(|&(name, count)| (Reverse(count), name));
    ranked.truncate(top_n);

    ranked
        .into_iter()
        .map(|(name, count)| Hotspot {
            name: name.to_string(),
            sample_count: count,
            percentage_of_total: (count as f64 / total as f64) * 100.0,
        })
        .collect()
}
