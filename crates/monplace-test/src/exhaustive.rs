//! Brute-force optimum for tiny instances.

use std::collections::BTreeSet;

use monplace_core::ConstraintSet;

/// Smallest monitor set satisfying `constraints`, lowest bitmask first among ties.
///
/// Enumerates all `2^n` subsets; keep `n` small.
pub fn brute_force_optimum(constraints: &ConstraintSet<'_>) -> Option<BTreeSet<usize>> {
    let n = constraints.num_nodes();
    assert!(n < 20, "exhaustive search over {} nodes", n);
    let mut best: Option<BTreeSet<usize>> = None;
    for mask in 0u32..(1 << n) {
        let size = mask.count_ones() as usize;
        if best.as_ref().is_some_and(|b| b.len() <= size) {
            continue;
        }
        let monitors: BTreeSet<usize> = (0..n).filter(|v| mask & (1 << v) != 0).collect();
        if constraints.is_satisfied_by(&monitors) {
            best = Some(monitors);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{line_topology, three_node};
    use monplace_core::Goal;

    #[test]
    fn test_three_node_needs_every_monitor() {
        let topology = three_node();
        for goal in [Goal::Cover, Goal::OneId] {
            let constraints = ConstraintSet::new(&topology, goal, None).unwrap();
            assert_eq!(brute_force_optimum(&constraints).map(|m| m.len()), Some(3));
        }
    }

    #[test]
    fn test_line_cover_uses_the_ends() {
        let topology = line_topology(5);
        let constraints = ConstraintSet::new(&topology, Goal::Cover, None).unwrap();
        let best = brute_force_optimum(&constraints).unwrap();
        assert_eq!(best.into_iter().collect::<Vec<_>>(), vec![0, 4]);
    }
}
