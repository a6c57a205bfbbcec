//! Exact in-process backend: branch and bound over the monitor variables.
//!
//! Route variables are never branched on. A requirement is evaluated through
//! the endpoints of its routes, so a route literal that becomes the last live
//! option of a requirement forces both endpoints to be monitors.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use monplace_config::PlacementConfig;
use monplace_core::{ConstraintSet, Result, Var};
use tracing::{debug, info};

use super::SolverAdapter;
use crate::status::{SolveOutcome, SolveStatus};

type Assignment = Vec<Option<bool>>;

enum ReqState {
    Satisfied,
    Conflict,
    Unit(Var),
    Open(usize),
}

struct Model {
    endpoints: Vec<(usize, usize)>,
    requirements: Vec<Vec<Var>>,
}

impl Model {
    fn new(constraints: &ConstraintSet<'_>) -> Self {
        Self {
            endpoints: constraints.topology().endpoints().collect(),
            requirements: constraints.requirements().map(|r| r.vars).collect(),
        }
    }

    fn value(&self, x: &Assignment, var: Var) -> Option<bool> {
        match var {
            Var::Monitor(v) => x[v],
            Var::Route(j) => {
                let (s, d) = self.endpoints[j];
                match (x[s], x[d]) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                }
            }
        }
    }

    fn state(&self, x: &Assignment, vars: &[Var]) -> ReqState {
        let mut live = 0;
        let mut last = None;
        for &var in vars {
            match self.value(x, var) {
                Some(true) => return ReqState::Satisfied,
                Some(false) => {}
                None => {
                    live += 1;
                    last = Some(var);
                }
            }
        }
        match (live, last) {
            (0, _) => ReqState::Conflict,
            (1, Some(var)) => ReqState::Unit(var),
            _ => ReqState::Open(live),
        }
    }

    fn force(&self, x: &mut Assignment, var: Var) {
        match var {
            Var::Monitor(v) => x[v] = Some(true),
            Var::Route(j) => {
                let (s, d) = self.endpoints[j];
                x[s] = Some(true);
                x[d] = Some(true);
            }
        }
    }

    /// Unit propagation to a fixpoint. Returns false on conflict.
    fn propagate(&self, x: &mut Assignment) -> bool {
        loop {
            let mut changed = false;
            for vars in &self.requirements {
                match self.state(x, vars) {
                    ReqState::Conflict => return false,
                    ReqState::Unit(var) => {
                        self.force(x, var);
                        changed = true;
                    }
                    ReqState::Satisfied | ReqState::Open(_) => {}
                }
            }
            if !changed {
                return true;
            }
        }
    }

    /// Unassigned node of the open requirement with the fewest live options.
    fn pick_branch(&self, x: &Assignment) -> Option<usize> {
        let mut best: Option<(usize, &[Var])> = None;
        for vars in &self.requirements {
            if let ReqState::Open(live) = self.state(x, vars) {
                if best.map_or(true, |(fewest, _)| live < fewest) {
                    best = Some((live, vars.as_slice()));
                }
            }
        }
        let (_, vars) = best?;
        vars.iter().find_map(|&var| match var {
            Var::Monitor(v) => x[v].is_none().then_some(v),
            Var::Route(j) => {
                let (s, d) = self.endpoints[j];
                if self.value(x, var).is_some() {
                    None
                } else if x[s].is_none() {
                    Some(s)
                } else {
                    Some(d)
                }
            }
        })
    }
}

struct Search<'m> {
    model: &'m Model,
    deadline: Instant,
    best: Option<BTreeSet<usize>>,
    nodes: u64,
    timed_out: bool,
}

impl Search<'_> {
    fn bound_reached(&self, cost: usize) -> bool {
        self.best.as_ref().is_some_and(|b| cost >= b.len())
    }

    fn branch(&mut self, mut x: Assignment) {
        if self.timed_out {
            return;
        }
        if Instant::now() >= self.deadline {
            self.timed_out = true;
            return;
        }
        self.nodes += 1;

        if !self.model.propagate(&mut x) {
            return;
        }
        let cost = x.iter().filter(|v| **v == Some(true)).count();
        if self.bound_reached(cost) {
            return;
        }

        match self.model.pick_branch(&x) {
            None => {
                let monitors: BTreeSet<usize> = x
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| **v == Some(true))
                    .map(|(i, _)| i)
                    .collect();
                debug!(event = "incumbent", monitors = monitors.len(), nodes = self.nodes);
                self.best = Some(monitors);
            }
            // an open requirement costs at least one more monitor
            Some(_) if self.bound_reached(cost + 1) => {}
            Some(node) => {
                let mut with = x.clone();
                with[node] = Some(true);
                self.branch(with);
                x[node] = Some(false);
                self.branch(x);
            }
        }
    }
}

/// Deterministic, single-threaded exact search.
///
/// Complete search yields [`SolveStatus::Optimal`] or
/// [`SolveStatus::Infeasible`]; hitting the deadline yields
/// [`SolveStatus::Timeout`] with the best set found so far.
#[derive(Debug, Clone)]
pub struct PropagationAdapter {
    time_limit: Duration,
}

impl PropagationAdapter {
    pub fn new(config: &PlacementConfig) -> Self {
        Self::with_time_limit(config.time_limit())
    }

    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self { time_limit }
    }
}

impl SolverAdapter for PropagationAdapter {
    fn name(&self) -> &'static str {
        "cp"
    }

    fn solve(&self, constraints: &ConstraintSet<'_>) -> Result<SolveOutcome> {
        let start = Instant::now();
        let model = Model::new(constraints);
        info!(
            event = "engine_start",
            engine = self.name(),
            requirements = model.requirements.len(),
            time_limit_secs = self.time_limit.as_secs(),
        );

        let search_start = Instant::now();
        let mut search = Search {
            model: &model,
            deadline: search_start + self.time_limit,
            best: None,
            nodes: 0,
            timed_out: false,
        };
        search.branch(vec![None; constraints.num_nodes()]);
        let solving_time = search_start.elapsed();

        let status = match (&search.best, search.timed_out) {
            (_, true) => SolveStatus::Timeout,
            (Some(_), false) => SolveStatus::Optimal,
            (None, false) => SolveStatus::Infeasible,
        };
        info!(
            event = "engine_end",
            engine = self.name(),
            status = %status,
            nodes = search.nodes,
            duration_ms = solving_time.as_millis() as u64,
        );

        Ok(SolveOutcome {
            monitors: search.best.unwrap_or_default(),
            total_time: start.elapsed(),
            solving_time: Some(solving_time),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monplace_core::{Goal, Reductions, Topology};
    use monplace_test::{line_topology, star_topology, three_node};

    fn solve(constraints: &ConstraintSet<'_>) -> SolveOutcome {
        PropagationAdapter::with_time_limit(Duration::from_secs(30))
            .solve(constraints)
            .unwrap()
    }

    #[test]
    fn test_three_node_needs_all_monitors() {
        let topology = three_node();
        for goal in [Goal::Cover, Goal::OneId] {
            let constraints = ConstraintSet::new(&topology, goal, None).unwrap();
            let outcome = solve(&constraints);
            assert_eq!(outcome.status, SolveStatus::Optimal);
            assert_eq!(outcome.monitors.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_line_cover_picks_the_ends() {
        let topology = line_topology(6);
        let constraints = ConstraintSet::new(&topology, Goal::Cover, None).unwrap();
        let outcome = solve(&constraints);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.monitors.into_iter().collect::<Vec<_>>(), vec![0, 5]);
    }

    #[test]
    fn test_star_forces_every_leaf() {
        let topology = star_topology(4);
        let constraints = ConstraintSet::new(&topology, Goal::Cover, None).unwrap();
        let outcome = solve(&constraints);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.monitors.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_reductions_are_respected() {
        let topology = line_topology(4);
        let reductions = Reductions::new([1], vec![vec![2]]);
        let constraints =
            ConstraintSet::new(&topology, Goal::Cover, Some(&reductions)).unwrap();
        let outcome = solve(&constraints);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.monitors.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_no_routes_is_infeasible() {
        let topology = Topology::build(3, Vec::new()).unwrap();
        let constraints = ConstraintSet::new(&topology, Goal::Cover, None).unwrap();
        let outcome = solve(&constraints);
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.monitors.is_empty());
    }

    #[test]
    fn test_zero_budget_times_out() {
        let topology = line_topology(5);
        let constraints = ConstraintSet::new(&topology, Goal::OneId, None).unwrap();
        let outcome = PropagationAdapter::with_time_limit(Duration::ZERO)
            .solve(&constraints)
            .unwrap();
        assert_eq!(outcome.status, SolveStatus::Timeout);
    }
}
