//! End-to-end placement: constraints, engine, verification, report.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use monplace_core::{
    verify_1id, verify_cover, ConstraintSet, Goal, Reductions, Result, Topology,
};
use tracing::{error, info};

use crate::adapter::SolverAdapter;
use crate::status::SolveOutcome;

/// Result of one placement run, verified independently of the engine.
#[derive(Debug, Clone)]
pub struct PlacementRun {
    pub goal: Goal,
    pub outcome: SolveOutcome,
    /// Routes with both endpoints among the returned monitors.
    pub active_routes: BTreeSet<usize>,
    pub covered: bool,
    pub one_id: bool,
}

impl PlacementRun {
    /// Verifier verdict for the requested goal.
    pub fn satisfies_goal(&self) -> bool {
        match self.goal {
            Goal::Cover => self.covered,
            Goal::OneId => self.one_id,
        }
    }

    /// False if the engine claims a solution the verifier rejects.
    pub fn is_consistent(&self) -> bool {
        !self.outcome.status.has_solution() || self.satisfies_goal()
    }
}

/// Solves `topology` for `goal` with `adapter` and verifies the answer.
pub fn solve_placement(
    topology: &Topology,
    goal: Goal,
    reductions: Option<&Reductions>,
    adapter: &dyn SolverAdapter,
) -> Result<PlacementRun> {
    let constraints = ConstraintSet::new(topology, goal, reductions)?;
    info!(
        event = "solve_start",
        engine = adapter.name(),
        goal = %goal,
        nodes = topology.num_nodes(),
        routes = topology.num_routes(),
        reductions = reductions.is_some(),
    );

    let outcome = adapter.solve(&constraints)?;
    constraints.check_monitors(&outcome.monitors)?;

    let active_routes = topology.active_routes(&outcome.monitors);
    let n = topology.num_nodes();
    let run = PlacementRun {
        goal,
        covered: verify_cover(n, topology.all_symptoms(), &active_routes),
        one_id: verify_1id(n, topology.all_symptoms(), &active_routes),
        active_routes,
        outcome,
    };

    if !run.is_consistent() {
        error!(
            event = "verification_failed",
            engine = adapter.name(),
            goal = %goal,
            status = %run.outcome.status,
            monitors = run.outcome.monitor_count(),
        );
    }
    info!(
        event = "solve_end",
        engine = adapter.name(),
        status = %run.outcome.status,
        monitors = run.outcome.monitor_count(),
        duration_ms = run.outcome.total_time.as_millis() as u64,
    );
    Ok(run)
}

/// Printable summary of a run.
#[derive(Debug, Clone)]
pub struct PlacementReport<'r> {
    pub input: String,
    pub solver: &'static str,
    pub reductions: bool,
    pub run: &'r PlacementRun,
}

fn seconds(d: Duration) -> String {
    format!("{:.3}", d.as_secs_f64())
}

impl PlacementReport<'_> {
    /// `input;solver;goal;reductions;monitors;solving_time;total_time;status;covered;one_id`
    pub fn csv_line(&self) -> String {
        let outcome = &self.run.outcome;
        format!(
            "{};{};{};{};{};{};{};{};{};{}",
            self.input,
            self.solver,
            self.run.goal,
            self.reductions,
            outcome.monitor_count(),
            outcome.solving_time.map(seconds).unwrap_or_default(),
            seconds(outcome.total_time),
            outcome.status,
            self.run.covered,
            self.run.one_id,
        )
    }
}

impl fmt::Display for PlacementReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = &self.run.outcome;
        writeln!(f, "Status : {}", outcome.status)?;
        writeln!(f, "Number of monitors : {}", outcome.monitor_count())?;
        match outcome.solving_time {
            Some(t) => writeln!(f, "Solving Time (s) : {}", seconds(t))?,
            None => writeln!(f, "Solving Time (s) : n/a")?,
        }
        writeln!(f, "Total Time (s) : {}", seconds(outcome.total_time))?;
        writeln!(f, "Coverage : {}", self.run.covered)?;
        write!(f, "1id : {}", self.run.one_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{GreedyAdapter, PropagationAdapter};
    use crate::status::SolveStatus;
    use monplace_core::PlacementError;
    use monplace_test::{line_topology, three_node};

    #[derive(Debug)]
    struct Fixed(SolveOutcome);

    impl SolverAdapter for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn solve(&self, _constraints: &ConstraintSet<'_>) -> Result<SolveOutcome> {
            Ok(self.0.clone())
        }
    }

    fn fixed(monitors: &[usize], status: SolveStatus) -> Fixed {
        Fixed(SolveOutcome {
            monitors: monitors.iter().copied().collect(),
            total_time: Duration::from_millis(20),
            solving_time: Some(Duration::from_millis(10)),
            status,
        })
    }

    #[test]
    fn test_three_node_all_monitors() {
        let topology = three_node();
        let adapter = PropagationAdapter::with_time_limit(Duration::from_secs(10));
        let run = solve_placement(&topology, Goal::OneId, None, &adapter).unwrap();
        assert_eq!(run.outcome.status, SolveStatus::Optimal);
        assert_eq!(run.active_routes, BTreeSet::from([0, 1]));
        assert!(run.covered && run.one_id);
        assert!(run.is_consistent());
    }

    #[test]
    fn test_inconsistent_claim_is_flagged() {
        let topology = three_node();
        let run = solve_placement(
            &topology,
            Goal::Cover,
            None,
            &fixed(&[0, 1], SolveStatus::Optimal),
        )
        .unwrap();
        assert!(!run.covered);
        assert!(!run.is_consistent());
    }

    #[test]
    fn test_timeout_without_solution_is_consistent() {
        let topology = three_node();
        let run =
            solve_placement(&topology, Goal::Cover, None, &fixed(&[], SolveStatus::Timeout))
                .unwrap();
        assert!(run.is_consistent());
        assert!(run.active_routes.is_empty());
    }

    #[test]
    fn test_out_of_range_monitor_is_an_engine_error() {
        let topology = three_node();
        let err = solve_placement(
            &topology,
            Goal::Cover,
            None,
            &fixed(&[0, 7], SolveStatus::Feasible),
        )
        .unwrap_err();
        assert!(matches!(err, PlacementError::Engine(_)));
    }

    #[test]
    fn test_report_formats() {
        let topology = line_topology(4);
        let run = solve_placement(
            &topology,
            Goal::Cover,
            None,
            &fixed(&[0, 3], SolveStatus::Optimal),
        )
        .unwrap();
        let report = PlacementReport {
            input: "line.routes".to_string(),
            solver: "fixed",
            reductions: false,
            run: &run,
        };
        assert_eq!(
            report.csv_line(),
            "line.routes;fixed;cover;false;2;0.010;0.020;Optimal;true;false"
        );
        let text = report.to_string();
        assert!(text.starts_with("Status : Optimal\nNumber of monitors : 2\n"));
        assert!(text.ends_with("Coverage : true\n1id : false"));
    }

    #[test]
    fn test_greedy_run_verifies() {
        let topology = line_topology(5);
        let run = solve_placement(
            &topology,
            Goal::OneId,
            None,
            &GreedyAdapter::with_pruning(true),
        )
        .unwrap();
        assert_eq!(run.outcome.status, SolveStatus::Feasible);
        assert!(run.is_consistent());
    }
}
