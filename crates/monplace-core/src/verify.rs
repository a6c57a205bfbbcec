//! Solver-independent verification of a candidate placement.
//!
//! The checks work on symptom sets and a set of *active route indices* only.
//! Deriving the active routes from a monitor set is left to the caller
//! ([`Topology::active_routes`](crate::Topology::active_routes)).
//! A node without an entry in `symptoms` has an empty symptom set.

use std::collections::BTreeSet;

use crate::constraint::Goal;

/// True iff every node is crossed by at least one active route.
pub fn verify_cover(n: usize, symptoms: &[Vec<usize>], active: &BTreeSet<usize>) -> bool {
    first_uncovered(n, symptoms, active).is_none()
}

/// True iff every pair of nodes is separated by at least one active route.
pub fn verify_1id(n: usize, symptoms: &[Vec<usize>], active: &BTreeSet<usize>) -> bool {
    first_indistinguishable(n, symptoms, active).is_none()
}

/// Dispatches to [`verify_cover`] or [`verify_1id`].
pub fn verify_goal(
    goal: Goal,
    n: usize,
    symptoms: &[Vec<usize>],
    active: &BTreeSet<usize>,
) -> bool {
    match goal {
        Goal::Cover => verify_cover(n, symptoms, active),
        Goal::OneId => verify_1id(n, symptoms, active),
    }
}

/// Smallest node whose symptom set has no active route.
pub fn first_uncovered(n: usize, symptoms: &[Vec<usize>], active: &BTreeSet<usize>) -> Option<usize> {
    (0..n).find(|&v| {
        !symptoms
            .get(v)
            .is_some_and(|s| s.iter().any(|j| active.contains(j)))
    })
}

/// First pair `(a, b)`, `a < b`, in row order, that no active route separates.
pub fn first_indistinguishable(
    n: usize,
    symptoms: &[Vec<usize>],
    active: &BTreeSet<usize>,
) -> Option<(usize, usize)> {
    // a and b are indistinguishable iff their symptoms agree on the active routes.
    let restricted: Vec<Vec<usize>> = (0..n)
        .map(|v| {
            symptoms.get(v).map_or_else(Vec::new, |s| {
                s.iter().copied().filter(|j| active.contains(j)).collect()
            })
        })
        .collect();
    for a in 0..n {
        for b in a + 1..n {
            if restricted[a] == restricted[b] {
                return Some((a, b));
            }
        }
    }
    None
}
