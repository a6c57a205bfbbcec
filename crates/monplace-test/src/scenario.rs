//! Hand-written topologies.
//!
//! # Example
//!
//! ```
//! use monplace_test::scenario::three_node;
//!
//! let topology = three_node();
//! assert_eq!(topology.symptoms(1), &[0, 1]);
//! ```

use monplace_core::{Route, Topology};

/// Text form of [`three_node`].
pub const THREE_NODE_TEXT: &str = "3 2\n0 1 | 0 1\n1 2 | 1 2\n";

/// Nodes `0 - 1 - 2` with routes `0→1` and `1→2`.
///
/// Symptoms `[{0}, {0,1}, {1}]`. Both goals need all three monitors.
pub fn three_node() -> Topology {
    Topology::build(
        3,
        vec![Route::new(0, 1, [0, 1], 0), Route::new(1, 2, [1, 2], 1)],
    )
    .expect("three-node fixture is valid")
}

/// Nodes on a line with one route per pair `i < j` crossing `i..=j`.
pub fn line_topology(n: usize) -> Topology {
    let mut routes = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            let index = routes.len();
            routes.push(Route::new(i, j, i..=j, index));
        }
    }
    Topology::build(n, routes).expect("line fixture is valid")
}

/// Hub `0` with `leaves` spokes; one route per pair of leaves through the hub.
///
/// A leaf is only crossed by routes it ends, so every leaf is a monitor.
pub fn star_topology(leaves: usize) -> Topology {
    let n = leaves + 1;
    let mut routes = Vec::new();
    for a in 1..n {
        for b in a + 1..n {
            let index = routes.len();
            routes.push(Route::new(a, b, [a, 0, b], index));
        }
    }
    Topology::build(n, routes).expect("star fixture is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_route_count() {
        let topology = line_topology(5);
        assert_eq!(topology.num_routes(), 10);
        assert_eq!(topology.leaf_nodes().into_iter().collect::<Vec<_>>(), vec![0, 4]);
    }

    #[test]
    fn test_star_hub_is_interior() {
        let topology = star_topology(4);
        assert_eq!(topology.num_routes(), 6);
        assert!(!topology.leaf_nodes().contains(&0));
        assert_eq!(topology.symptoms(0).len(), 6);
    }
}
