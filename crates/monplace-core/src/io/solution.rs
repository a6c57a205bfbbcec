//! Solution output.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::topology::Topology;

/// Monitors in ascending order, each followed by a space.
pub fn format_monitors(monitors: &BTreeSet<usize>) -> String {
    monitors.iter().fold(String::new(), |mut out, m| {
        let _ = write!(out, "{} ", m);
        out
    })
}

/// Writes [`format_monitors`] to `path`.
pub fn write_monitors(path: impl AsRef<Path>, monitors: &BTreeSet<usize>) -> Result<()> {
    std::fs::write(path, format_monitors(monitors))?;
    Ok(())
}

/// The node count, then one `"<start> <end> | <nodes> "` line per active route.
pub fn format_measurement_paths(topology: &Topology, active: &BTreeSet<usize>) -> String {
    let mut out = format!("{}\n", topology.num_nodes());
    for route in active.iter().filter_map(|&j| topology.route(j)) {
        let _ = write!(out, "{} {} | ", route.start(), route.end());
        for node in route.nodes() {
            let _ = write!(out, "{} ", node);
        }
        out.push('\n');
    }
    out
}
