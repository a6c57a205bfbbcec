//! Reduction hints computed ahead of time from the network graph.

use std::collections::BTreeSet;

use crate::error::{PlacementError, Result};

/// Precomputed structural facts that force or relax monitor placement.
///
/// - every independent node must be a monitor;
/// - every listed biconnected component (a 2-connected subgraph with exactly one
///   articulation point, the articulation point itself excluded) must contain
///   at least one monitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reductions {
    pub independent_nodes: BTreeSet<usize>,
    pub biconnected_components: Vec<Vec<usize>>,
}

impl Reductions {
    pub fn new(
        independent_nodes: impl IntoIterator<Item = usize>,
        biconnected_components: Vec<Vec<usize>>,
    ) -> Self {
        Self {
            independent_nodes: independent_nodes.into_iter().collect(),
            biconnected_components,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.independent_nodes.is_empty() && self.biconnected_components.is_empty()
    }

    /// Checks that every referenced node lies in `[0, n)`.
    pub fn validate(&self, n: usize) -> Result<()> {
        if let Some(&node) = self.independent_nodes.iter().find(|&&v| v >= n) {
            return Err(PlacementError::reductions(
                None,
                format!("independent node {} outside 0..{}", node, n),
            ));
        }
        for (index, component) in self.biconnected_components.iter().enumerate() {
            if let Some(&node) = component.iter().find(|&&v| v >= n) {
                return Err(PlacementError::reductions(
                    None,
                    format!("component {} lists node {} outside 0..{}", index, node, n),
                ));
            }
        }
        Ok(())
    }

    /// True if `monitors` satisfies every hint.
    pub fn is_satisfied_by(&self, monitors: &BTreeSet<usize>) -> bool {
        self.independent_nodes.is_subset(monitors)
            && self
                .biconnected_components
                .iter()
                .all(|c| c.iter().any(|v| monitors.contains(v)))
    }
}
