//! Reduction file parsing.
//!
//! ```text
//! <independent node> ...        (may be empty)
//! <separator, ignored>
//! <component node> ...          (one biconnected component per non-empty line)
//! ```

use std::path::{Path, PathBuf};

use super::parse_indices;
use crate::error::{PlacementError, Result};
use crate::reduction::Reductions;

/// Parses reduction hints for an instance with `n` nodes.
pub fn parse_reductions(text: &str, n: usize) -> Result<Reductions> {
    let lines: Vec<&str> = text.lines().collect();
    let first = lines
        .first()
        .ok_or_else(|| PlacementError::reductions(None, "empty reduction file"))?;

    let independent = parse_line(first, 1, n)?;
    let mut components = Vec::new();
    for (offset, line) in lines.iter().enumerate().skip(2) {
        if line.trim().is_empty() {
            continue;
        }
        components.push(parse_line(line, offset + 1, n)?);
    }

    let reductions = Reductions::new(independent, components);
    tracing::debug!(
        event = "reductions_loaded",
        independent_count = reductions.independent_nodes.len(),
        component_count = reductions.biconnected_components.len(),
    );
    Ok(reductions)
}

/// Reads and parses a reduction file.
pub fn read_reductions(path: impl AsRef<Path>, n: usize) -> Result<Reductions> {
    let text = std::fs::read_to_string(path)?;
    parse_reductions(&text, n)
}

/// Location of the reduction file that accompanies an instance file
/// (`net.routes` → `net.rdc`).
pub fn reductions_path_for(instance: impl AsRef<Path>) -> PathBuf {
    instance.as_ref().with_extension("rdc")
}

fn parse_line(line: &str, line_no: usize, n: usize) -> Result<Vec<usize>> {
    let nodes = parse_indices(line, |reason| PlacementError::reductions(Some(line_no), reason))?;
    match nodes.iter().find(|&&v| v >= n) {
        Some(&bad) => Err(PlacementError::reductions(
            Some(line_no),
            format!("node {} outside 0..{}", bad, n),
        )),
        None => Ok(nodes),
    }
}
