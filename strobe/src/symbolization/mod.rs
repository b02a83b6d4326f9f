//! Address-to-name resolution
//!
//! The aggregation layer is agnostic to how addresses become frame names:
//! it takes anything implementing [`FrameResolver`]. The default
//! implementation, [`DwarfResolver`], reads the profiled binary's DWARF
//! debug info; tests and embedders can pass a plain closure instead.

pub mod memory_maps;
pub mod symbolizer;

pub use memory_maps::{parse_memory_maps, MemoryRange};
pub use symbolizer::DwarfResolver;

/// Resolve a raw instruction-pointer address to a frame name
///
/// `None` means the address is not resolvable (stripped binary, shared
/// library without debug info); callers decide how to render that.
pub trait FrameResolver {
    fn resolve(&self, addr: u64) -> Option<String>;
}

impl<F> FrameResolver for F
where
    F: Fn(u64) -> Option<String>,
{
    fn resolve(&self, addr: u64) -> Option<String> {
        self(addr)
    }
}
