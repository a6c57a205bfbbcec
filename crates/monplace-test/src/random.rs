//! Reproducible random instances.

use monplace_core::{Reductions, Route, Topology};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A random topology with `n` nodes and `m` routes.
///
/// Each route picks two distinct endpoints (when `n > 1`) and crosses every
/// other node with probability 0.4.
pub fn random_instance(seed: u64, n: usize, m: usize) -> Topology {
    assert!(n > 0, "at least one node");
    let mut rng = StdRng::seed_from_u64(seed);
    let routes = (0..m)
        .map(|index| {
            let start = rng.random_range(0..n);
            let mut end = rng.random_range(0..n);
            if n > 1 {
                while end == start {
                    end = rng.random_range(0..n);
                }
            }
            let interior: Vec<usize> = (0..n)
                .filter(|&v| v != start && v != end && rng.random_bool(0.4))
                .collect();
            Route::new(start, end, [start, end].into_iter().chain(interior), index)
        })
        .collect();
    Topology::build(n, routes).expect("random instance is valid")
}

/// Random reduction hints for `n` nodes: a few independent nodes and components.
pub fn random_reductions(seed: u64, n: usize) -> Reductions {
    let mut rng = StdRng::seed_from_u64(seed);
    let independent: Vec<usize> = (0..n).filter(|_| rng.random_bool(0.15)).collect();
    let components = (0..rng.random_range(0..3))
        .map(|_| {
            let mut component: Vec<usize> = (0..n).filter(|_| rng.random_bool(0.3)).collect();
            if component.is_empty() {
                component.push(rng.random_range(0..n));
            }
            component
        })
        .collect();
    Reductions::new(independent, components)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_instance() {
        let a = random_instance(7, 6, 5);
        let b = random_instance(7, 6, 5);
        assert_eq!(a.all_symptoms(), b.all_symptoms());
    }

    #[test]
    fn test_endpoints_are_distinct() {
        let topology = random_instance(11, 5, 20);
        assert!(topology.endpoints().all(|(s, d)| s != d));
    }

    #[test]
    fn test_reductions_fit_node_count() {
        for seed in 0..20 {
            assert!(random_reductions(seed, 6).validate(6).is_ok());
        }
    }
}
