//! Topology model: routes, per-node symptom sets and endpoints.
//!
//! A [`Topology`] is built once from the node count and the route list and is
//! immutable afterwards. Every downstream component identifies a route by its
//! [`Route::index`].

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{PlacementError, Result};
use crate::pair::PairIndex;

#[cfg(test)]
mod tests;

/// A candidate measurement path between two potential monitors.
///
/// # Example
///
/// ```
/// use monplace_core::Route;
///
/// let route = Route::new(0, 3, [3, 1, 0, 1], 7);
/// assert_eq!(route.nodes(), &[0, 1, 3]);
/// assert!(route.crosses(1));
/// assert!(route.is_interior(1));
/// assert!(!route.is_interior(3));
/// assert!(route.distinguishes(1, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    start: usize,
    end: usize,
    nodes: Vec<usize>,
    index: usize,
}

impl Route {
    /// Creates a route. The traversed nodes are sorted and de-duplicated.
    pub fn new(start: usize, end: usize, nodes: impl IntoIterator<Item = usize>, index: usize) -> Self {
        let nodes: BTreeSet<usize> = nodes.into_iter().collect();
        Self {
            start,
            end,
            nodes: nodes.into_iter().collect(),
            index,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Traversed nodes in ascending order.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Position of the route in the global route numbering.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn crosses(&self, node: usize) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }

    /// True if the route crosses `node` without ending there.
    pub fn is_interior(&self, node: usize) -> bool {
        node != self.start && node != self.end && self.crosses(node)
    }

    /// True if the route crosses exactly one of `a` and `b`.
    pub fn distinguishes(&self, a: usize, b: usize) -> bool {
        self.crosses(a) != self.crosses(b)
    }

    /// True if both endpoints belong to `monitors`.
    pub fn is_active(&self, monitors: &BTreeSet<usize>) -> bool {
        monitors.contains(&self.start) && monitors.contains(&self.end)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} {} | {:?}", self.index, self.start, self.end, self.nodes)
    }
}

/// Routes of a network together with the symptom set of every node.
///
/// Invariant: `j ∈ symptoms(v)` iff route `j` crosses `v`.
#[derive(Debug, Clone)]
pub struct Topology {
    n: usize,
    routes: Vec<Route>,
    symptoms: Vec<Vec<usize>>,
}

impl Topology {
    /// Validates the routes and computes the symptom sets.
    ///
    /// Routes may be given in any order; they are stored by index.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::MalformedInstance`] if `n == 0`, if route
    /// indices are duplicated or do not form `[0, m)`, or if an endpoint or a
    /// traversed node is outside `[0, n)`, or if `n` is too large to allocate.
    pub fn build(n: usize, mut routes: Vec<Route>) -> Result<Self> {
        if n == 0 {
            return Err(PlacementError::instance(None, "instance has no nodes"));
        }
        routes.sort_by_key(|r| r.index);
        for (expected, route) in routes.iter().enumerate() {
            if route.index != expected {
                return Err(PlacementError::instance(
                    None,
                    format!(
                        "route indices must form 0..{} without duplicates, found {} at position {}",
                        routes.len(),
                        route.index,
                        expected
                    ),
                ));
            }
            if route.start >= n || route.end >= n {
                return Err(PlacementError::instance(
                    None,
                    format!(
                        "route {} has endpoint outside 0..{}: {} {}",
                        route.index, n, route.start, route.end
                    ),
                ));
            }
            if let Some(&node) = route.nodes.last().filter(|&&v| v >= n) {
                return Err(PlacementError::instance(
                    None,
                    format!("route {} crosses node {} outside 0..{}", route.index, node, n),
                ));
            }
        }

        let mut symptoms: Vec<Vec<usize>> = Vec::new();
        symptoms.try_reserve_exact(n).map_err(|_| {
            PlacementError::instance(None, format!("cannot allocate symptoms for {} nodes", n))
        })?;
        symptoms.resize_with(n, Vec::new);
        for route in &routes {
            for &node in &route.nodes {
                symptoms[node].push(route.index);
            }
        }

        tracing::debug!(
            event = "topology_built",
            node_count = n,
            route_count = routes.len(),
        );

        Ok(Self {
            n,
            routes,
            symptoms,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.n
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    /// Indices of the routes crossing `node`, ascending.
    ///
    /// # Panics
    ///
    /// Panics if `node >= num_nodes()`.
    pub fn symptoms(&self, node: usize) -> &[usize] {
        &self.symptoms[node]
    }

    pub fn all_symptoms(&self) -> &[Vec<usize>] {
        &self.symptoms
    }

    /// `(start, end)` of every route, by route index.
    pub fn endpoints(&self) -> impl ExactSizeIterator<Item = (usize, usize)> + '_ {
        self.routes.iter().map(|r| (r.start, r.end))
    }

    /// Routes crossing exactly one of `a` and `b`, ascending.
    pub fn symmetric_difference(&self, a: usize, b: usize) -> Vec<usize> {
        symmetric_difference(&self.symptoms[a], &self.symptoms[b])
    }

    /// Routes whose endpoints are both in `monitors`.
    pub fn active_routes(&self, monitors: &BTreeSet<usize>) -> BTreeSet<usize> {
        self.routes
            .iter()
            .filter(|r| r.is_active(monitors))
            .map(|r| r.index)
            .collect()
    }

    /// Nodes that are never crossed as an interior node of a route.
    ///
    /// Such a node can only be covered by a route ending at it.
    pub fn leaf_nodes(&self) -> BTreeSet<usize> {
        let mut interior = vec![false; self.n];
        for route in &self.routes {
            for &node in &route.nodes {
                if route.is_interior(node) {
                    interior[node] = true;
                }
            }
        }
        (0..self.n).filter(|&v| !interior[v]).collect()
    }

    /// Pair indices of the node pairs that `route` separates.
    pub fn distinguished_pairs(&self, route: &Route, pairs: &PairIndex) -> Vec<usize> {
        let mut separated = Vec::new();
        for &inside in &route.nodes {
            for other in (0..self.n).filter(|&v| !route.crosses(v)) {
                if let Ok(idx) = pairs.index(inside, other) {
                    separated.push(idx);
                }
            }
        }
        separated.sort_unstable();
        separated
    }
}

/// Symmetric difference of two ascending index sequences, ascending.
pub fn symmetric_difference(left: &[usize], right: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => {
                out.push(left[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(right[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    out
}
