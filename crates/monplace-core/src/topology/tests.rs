//! Tests for the topology model.

use super::*;

fn two_route_line() -> Topology {
    Topology::build(
        3,
        vec![Route::new(0, 1, [0, 1], 0), Route::new(1, 2, [1, 2], 1)],
    )
    .unwrap()
}

#[test]
fn test_symptoms_of_line() {
    let topology = two_route_line();
    assert_eq!(topology.all_symptoms(), &[vec![0], vec![0, 1], vec![1]]);
    assert_eq!(topology.num_routes(), 2);
    assert_eq!(topology.endpoints().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
}

#[test]
fn test_symptom_invariant() {
    let routes = vec![
        Route::new(0, 4, [0, 1, 2, 4], 0),
        Route::new(3, 4, [3, 2, 4], 1),
        Route::new(0, 3, [0, 1, 2, 3], 2),
        Route::new(1, 1, [1], 3),
    ];
    let topology = Topology::build(5, routes).unwrap();
    for v in 0..topology.num_nodes() {
        for route in topology.routes() {
            assert_eq!(
                topology.symptoms(v).contains(&route.index()),
                route.crosses(v),
                "node {} route {}",
                v,
                route.index()
            );
        }
    }
}

#[test]
fn test_routes_sorted_by_index() {
    let topology = Topology::build(
        3,
        vec![Route::new(1, 2, [1, 2], 1), Route::new(0, 1, [0, 1], 0)],
    )
    .unwrap();
    assert_eq!(topology.route(0).unwrap().start(), 0);
    assert_eq!(topology.route(1).unwrap().start(), 1);
}

#[test]
fn test_rejects_zero_nodes() {
    assert!(matches!(
        Topology::build(0, Vec::new()),
        Err(PlacementError::MalformedInstance { line: None, .. })
    ));
}

#[test]
fn test_rejects_unallocatable_node_count() {
    let err = Topology::build(usize::MAX, Vec::new()).unwrap_err();
    assert!(matches!(err, PlacementError::MalformedInstance { line: None, .. }));
}

#[test]
fn test_rejects_gap_in_indices() {
    let result = Topology::build(
        3,
        vec![Route::new(0, 1, [0, 1], 0), Route::new(1, 2, [1, 2], 2)],
    );
    assert!(matches!(result, Err(PlacementError::MalformedInstance { .. })));
}

#[test]
fn test_rejects_duplicate_indices() {
    let result = Topology::build(
        3,
        vec![Route::new(0, 1, [0, 1], 0), Route::new(1, 2, [1, 2], 0)],
    );
    assert!(result.is_err());
}

#[test]
fn test_rejects_out_of_range_nodes() {
    assert!(Topology::build(3, vec![Route::new(0, 3, [0], 0)]).is_err());
    assert!(Topology::build(3, vec![Route::new(0, 1, [0, 1, 5], 0)]).is_err());
}

#[test]
fn test_empty_route_list() {
    let topology = Topology::build(2, Vec::new()).unwrap();
    assert_eq!(topology.num_routes(), 0);
    assert!(topology.symptoms(0).is_empty());
    assert!(topology.symmetric_difference(0, 1).is_empty());
}

#[test]
fn test_symmetric_difference_matches_definition() {
    let routes = vec![
        Route::new(0, 4, [0, 1, 2, 4], 0),
        Route::new(3, 4, [3, 2, 4], 1),
        Route::new(0, 3, [0, 1, 2, 3], 2),
        Route::new(1, 2, [1, 2], 3),
    ];
    let topology = Topology::build(5, routes).unwrap();
    for a in 0..5 {
        for b in 0..5 {
            let expected: Vec<usize> = topology
                .routes()
                .iter()
                .filter(|r| r.distinguishes(a, b))
                .map(|r| r.index())
                .collect();
            assert_eq!(topology.symmetric_difference(a, b), expected, "({}, {})", a, b);
        }
    }
}

#[test]
fn test_symmetric_difference_merge() {
    assert_eq!(symmetric_difference(&[0, 2, 4], &[1, 2, 5]), vec![0, 1, 4, 5]);
    assert_eq!(symmetric_difference(&[], &[3]), vec![3]);
    assert!(symmetric_difference(&[1, 2], &[1, 2]).is_empty());
}

#[test]
fn test_active_routes() {
    let topology = two_route_line();
    let all: BTreeSet<usize> = [0, 1, 2].into_iter().collect();
    assert_eq!(topology.active_routes(&all), [0, 1].into_iter().collect());

    let middle: BTreeSet<usize> = [1].into_iter().collect();
    assert!(topology.active_routes(&middle).is_empty());
}

#[test]
fn test_leaf_nodes() {
    let topology = Topology::build(
        4,
        vec![
            Route::new(0, 2, [0, 1, 2], 0),
            Route::new(3, 2, [3, 2], 1),
        ],
    )
    .unwrap();
    assert_eq!(topology.leaf_nodes(), [0, 2, 3].into_iter().collect());
}

#[test]
fn test_distinguished_pairs() {
    let topology = two_route_line();
    let pairs = PairIndex::new(3);
    let route = topology.route(0).unwrap();
    // route 0 crosses {0, 1}; it separates (0, 2) and (1, 2)
    assert_eq!(
        topology.distinguished_pairs(route, &pairs),
        vec![pairs.index(0, 2).unwrap(), pairs.index(1, 2).unwrap()]
    );
}

#[test]
fn test_route_display() {
    let route = Route::new(2, 0, [2, 1, 0], 4);
    assert_eq!(route.to_string(), "4 | 2 0 | [0, 1, 2]");
}
