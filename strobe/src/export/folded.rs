//! Folded flame-graph output
//!
//! One line per unique stack: frames joined with semicolons, outermost to
//! innermost, then a space and the sample count. The exact textual form is
//! a compatibility contract with third-party flame-graph renderers, so
//! nothing else goes on the line.

use anyhow::{Context, Result};
use std::io::Write;

use crate::analysis::FlameGraph;

/// Write the flame-graph table in folded line format
///
/// # Errors
/// Returns an error if the underlying write fails
pub fn write_folded<W: Write>(flame: &FlameGraph, mut writer: W) -> Result<()> {
    for line in flame.folded() {
        writeln!(writer, "{line}").context("Failed to write folded stacks")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folded_line_protocol() {
        let mut flame = FlameGraph::new();
        flame.record_stack(vec!["main".to_string(), "foo".to_string(), "bar".to_string()]);
        flame.record_stack(vec!["main".to_string(), "foo".to_string(), "bar".to_string()]);
        flame.record_stack(vec!["main".to_string(), "foo".to_string(), "baz".to_string()]);

        let mut buffer = Vec::new();
        write_folded(&flame, &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "main;foo;bar 2\nmain;foo;baz 1\n"
        );
    }
}
