//! Statistical-profile aggregation: flame-graph table and hotspot ranking

pub mod flame;
pub mod hotspot;

pub use flame::FlameGraph;
pub use hotspot::{rank_hotspots, Hotspot};
