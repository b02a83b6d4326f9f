//! Memory mapping utilities for process address space analysis
//!
//! Sample stacks carry runtime addresses, but DWARF debug info is keyed by
//! file offset. For position-independent executables the two differ by the
//! load base, so the resolver needs the binary's mapped range to translate.

use log::info;
use std::fs;

use crate::domain::TraceError;

/// Memory range of a loaded binary in a process's address space
#[derive(Debug, Clone, Copy)]
pub struct MemoryRange {
    pub start: u64,
    pub end: u64,
}

impl MemoryRange {
    /// Check if an address falls within this memory range
    #[must_use]
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }

    /// Extract the mapped range of a binary from maps-format text
    /// (`start-end perms offset dev inode pathname` per line)
    ///
    /// All mappings of the binary are folded into one range from the
    /// minimum start to the maximum end.
    ///
    /// # Errors
    /// Returns `NoMemoryRangeFound` if no line references the binary
    pub fn from_maps(maps: &str, binary_path: &str) -> Result<Self, TraceError> {
        let mut start_addr: Option<u64> = None;
        let mut end_addr: Option<u64> = None;

        for line in maps.lines() {
            if !line.contains(binary_path) {
                continue;
            }
            let Some(range) = line.split_whitespace().next() else {
                continue;
            };
            let Some((start, end)) = range.split_once('-') else {
                continue;
            };
            let (Ok(start), Ok(end)) =
                (u64::from_str_radix(start, 16), u64::from_str_radix(end, 16))
            else {
                continue;
            };
            start_addr = Some(start_addr.map_or(start, |s| s.min(start)));
            end_addr = Some(end_addr.map_or(end, |e| e.max(end)));
        }

        match (start_addr, end_addr) {
            (Some(start), Some(end)) => Ok(MemoryRange { start, end }),
            _ => Err(TraceError::NoMemoryRangeFound(binary_path.to_string())),
        }
    }
}

/// Parse /proc/pid/maps to find the memory range of a specific binary
///
/// # Errors
/// Returns an error if /proc/pid/maps cannot be read or the binary is not mapped
pub fn parse_memory_maps(pid: u32, binary_path: &str) -> Result<MemoryRange, TraceError> {
    let maps = fs::read_to_string(format!("/proc/{pid}/maps"))?;
    let range = MemoryRange::from_maps(&maps, binary_path)?;
    info!(
        "Executable memory range: 0x{:x} - 0x{:x} (size: {} KB)",
        range.start,
        range.end,
        (range.end - range.start) / 1024
    );
    Ok(range)
}
