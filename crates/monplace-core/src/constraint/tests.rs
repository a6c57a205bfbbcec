//! Tests for constraint semantics.

use super::*;
use crate::topology::Route;

fn line() -> Topology {
    Topology::build(
        3,
        vec![Route::new(0, 1, [0, 1], 0), Route::new(1, 2, [1, 2], 1)],
    )
    .unwrap()
}

fn monitors(nodes: &[usize]) -> BTreeSet<usize> {
    nodes.iter().copied().collect()
}

#[test]
fn test_goal_parse_and_display() {
    assert_eq!("cover".parse::<Goal>().unwrap(), Goal::Cover);
    assert_eq!("1id".parse::<Goal>().unwrap(), Goal::OneId);
    assert!("2id".parse::<Goal>().is_err());
    assert_eq!(Goal::OneId.to_string(), "1id");
}

#[test]
fn test_activations_follow_route_order() {
    let topology = line();
    let constraints = ConstraintSet::new(&topology, Goal::Cover, None).unwrap();
    let activations: Vec<Activation> = constraints.activations().collect();
    assert_eq!(
        activations,
        vec![
            Activation { route: 0, start: 0, end: 1 },
            Activation { route: 1, start: 1, end: 2 },
        ]
    );
}

#[test]
fn test_cover_requirements() {
    let topology = line();
    let constraints = ConstraintSet::new(&topology, Goal::Cover, None).unwrap();
    let reqs: Vec<Requirement> = constraints.requirements().collect();
    assert_eq!(reqs.len(), 3);
    assert_eq!(reqs[1].origin, Origin::Cover { node: 1 });
    assert_eq!(reqs[1].vars, vec![Var::Route(0), Var::Route(1)]);
    assert_eq!(constraints.distinguishing_rows().count(), 0);
}

#[test]
fn test_one_id_rows() {
    let topology = line();
    let constraints = ConstraintSet::new(&topology, Goal::OneId, None).unwrap();
    let rows: Vec<Vec<Requirement>> = constraints
        .distinguishing_rows()
        .map(|row| row.collect())
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].len(), 2);
    assert_eq!(rows[1].len(), 1);
    assert!(rows[2].is_empty());

    // symptoms [{0}, {0,1}, {1}]
    assert_eq!(rows[0][0].origin, Origin::Distinguish { a: 0, b: 1 });
    assert_eq!(rows[0][0].vars, vec![Var::Route(1)]);
    assert_eq!(rows[0][1].vars, vec![Var::Route(0), Var::Route(1)]);
    assert_eq!(rows[1][0].vars, vec![Var::Route(0)]);
}

#[test]
fn test_reduction_requirements() {
    let topology = line();
    let reductions = Reductions::new([2, 0], vec![vec![1, 2]]);
    let constraints = ConstraintSet::new(&topology, Goal::Cover, Some(&reductions)).unwrap();
    let reqs: Vec<Requirement> = constraints.reduction_requirements().collect();
    assert_eq!(
        reqs,
        vec![
            Requirement {
                origin: Origin::Independent { node: 0 },
                vars: vec![Var::Monitor(0)],
            },
            Requirement {
                origin: Origin::Independent { node: 2 },
                vars: vec![Var::Monitor(2)],
            },
            Requirement {
                origin: Origin::Component { index: 0 },
                vars: vec![Var::Monitor(1), Var::Monitor(2)],
            },
        ]
    );
    assert_eq!(constraints.requirement_count(), 6);
    assert_eq!(constraints.requirements().count(), 6);
}

#[test]
fn test_rejects_reductions_outside_topology() {
    let topology = line();
    let reductions = Reductions::new([3], Vec::new());
    assert!(ConstraintSet::new(&topology, Goal::Cover, Some(&reductions)).is_err());
}

#[test]
fn test_requirement_count_matches_iteration() {
    let topology = Topology::build(
        5,
        vec![
            Route::new(0, 4, [0, 1, 2, 3, 4], 0),
            Route::new(0, 2, [0, 1, 2], 1),
            Route::new(2, 4, [2, 3, 4], 2),
        ],
    )
    .unwrap();
    for goal in [Goal::Cover, Goal::OneId] {
        let constraints = ConstraintSet::new(&topology, goal, None).unwrap();
        assert_eq!(constraints.requirements().count(), constraints.requirement_count());
    }
}

#[test]
fn test_satisfaction() {
    let topology = line();
    let cover = ConstraintSet::new(&topology, Goal::Cover, None).unwrap();
    assert!(cover.is_satisfied_by(&monitors(&[0, 1, 2])));
    assert_eq!(
        cover.first_violation(&monitors(&[1])),
        Some(Origin::Cover { node: 0 })
    );
    assert_eq!(
        cover.first_violation(&monitors(&[0, 1])),
        Some(Origin::Cover { node: 2 })
    );

    let one_id = ConstraintSet::new(&topology, Goal::OneId, None).unwrap();
    assert!(one_id.is_satisfied_by(&monitors(&[0, 1, 2])));
}

#[test]
fn test_empty_route_list_is_unsatisfiable_not_a_crash() {
    let topology = Topology::build(2, Vec::new()).unwrap();
    let constraints = ConstraintSet::new(&topology, Goal::OneId, None).unwrap();
    let reqs: Vec<Requirement> = constraints.requirements().collect();
    assert_eq!(reqs.len(), 3);
    assert!(reqs.iter().all(|r| r.vars.is_empty()));
    assert!(!constraints.is_satisfied_by(&monitors(&[0, 1])));
}

#[test]
fn test_single_node() {
    let topology = Topology::build(1, vec![Route::new(0, 0, [0], 0)]).unwrap();
    let constraints = ConstraintSet::new(&topology, Goal::OneId, None).unwrap();
    assert_eq!(constraints.requirement_count(), 1);
    assert!(constraints.is_satisfied_by(&monitors(&[0])));
    assert!(!constraints.is_satisfied_by(&monitors(&[])));
}

#[test]
fn test_check_monitors() {
    let topology = line();
    let constraints = ConstraintSet::new(&topology, Goal::Cover, None).unwrap();
    assert!(constraints.check_monitors(&monitors(&[0, 2])).is_ok());
    assert!(constraints.check_monitors(&monitors(&[3])).is_err());
}
