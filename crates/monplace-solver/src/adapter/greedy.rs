//! Greedy placement heuristic.
//!
//! Leaf nodes and independent nodes are placed first. The cover phase then
//! adds, one at a time, the non-monitor whose new active routes reach the most
//! uncovered nodes; for `1id` a second phase does the same for pairs that no
//! active route separates yet. Uncovered biconnected components get their first
//! node, and redundant monitors are finally removed in ascending order.

use std::collections::BTreeSet;
use std::time::Instant;

use monplace_config::PlacementConfig;
use monplace_core::{verify_1id, verify_cover, ConstraintSet, Goal, PairIndex, Result, Topology};
use tracing::{debug, info};

use super::SolverAdapter;
use crate::status::{SolveOutcome, SolveStatus};

/// Monitor set under construction with the routes it activates.
struct Placement<'t> {
    topology: &'t Topology,
    /// Routes ending at each node.
    routes_at: Vec<Vec<usize>>,
    is_monitor: Vec<bool>,
    active: Vec<bool>,
}

impl<'t> Placement<'t> {
    fn new(topology: &'t Topology) -> Self {
        let n = topology.num_nodes();
        let mut routes_at = vec![Vec::new(); n];
        for route in topology.routes() {
            routes_at[route.start()].push(route.index());
            if route.end() != route.start() {
                routes_at[route.end()].push(route.index());
            }
        }
        Self {
            topology,
            routes_at,
            is_monitor: vec![false; n],
            active: vec![false; topology.num_routes()],
        }
    }

    fn monitors(&self) -> BTreeSet<usize> {
        (0..self.is_monitor.len()).filter(|&v| self.is_monitor[v]).collect()
    }

    /// Routes that adding `v` would activate.
    fn activated_by(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.routes_at[v].iter().copied().filter(move |&j| {
            let route = &self.topology.routes()[j];
            let other = if route.start() == v { route.end() } else { route.start() };
            !self.active[j] && (other == v || self.is_monitor[other])
        })
    }

    /// Makes `v` a monitor and returns the routes that became active.
    fn add(&mut self, v: usize) -> Vec<usize> {
        if self.is_monitor[v] {
            return Vec::new();
        }
        let newly: Vec<usize> = self.activated_by(v).collect();
        self.is_monitor[v] = true;
        for &j in &newly {
            self.active[j] = true;
        }
        newly
    }

    /// Non-monitor with the largest gain, lowest index among ties.
    fn best_candidate(&self, mut gain: impl FnMut(usize) -> usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for v in (0..self.is_monitor.len()).filter(|&v| !self.is_monitor[v]) {
            let g = gain(v);
            if best.map_or(true, |(_, top)| g > top) {
                best = Some((v, g));
            }
        }
        best.map(|(v, _)| v)
    }
}

/// Counts of monitors added by each phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyTrace {
    pub seeded: usize,
    pub cover: usize,
    pub one_id: usize,
    pub components: usize,
    pub pruned: usize,
}

fn cover_phase(placement: &mut Placement<'_>, trace: &mut GreedyTrace) -> bool {
    let topology = placement.topology;
    let n = topology.num_nodes();
    if let Some(v) = (0..n).find(|&v| topology.symptoms(v).is_empty()) {
        debug!(event = "uncoverable_node", node = v);
        return false;
    }

    let mut covered = vec![false; n];
    for route in topology.routes().iter().filter(|r| placement.active[r.index()]) {
        for &v in route.nodes() {
            covered[v] = true;
        }
    }
    // stamp[v] == round: v already counted for the candidate being scored
    let mut stamp = vec![0usize; n];
    let mut round = 0usize;

    while covered.iter().any(|c| !c) {
        let choice = placement.best_candidate(|c| {
            round += 1;
            let mut gain = 0;
            for j in placement.activated_by(c) {
                for &v in topology.routes()[j].nodes() {
                    if !covered[v] && stamp[v] != round {
                        stamp[v] = round;
                        gain += 1;
                    }
                }
            }
            gain
        });
        let Some(choice) = choice else {
            return false;
        };
        for j in placement.add(choice) {
            for &v in topology.routes()[j].nodes() {
                covered[v] = true;
            }
        }
        trace.cover += 1;
    }
    true
}

/// Marks the pairs `route` separates; returns how many were new.
fn separate(topology: &Topology, pairs: &PairIndex, route: usize, separated: &mut [bool]) -> usize {
    let mut fresh = 0;
    for p in topology.distinguished_pairs(&topology.routes()[route], pairs) {
        if !separated[p] {
            separated[p] = true;
            fresh += 1;
        }
    }
    fresh
}

fn one_id_phase(placement: &mut Placement<'_>, trace: &mut GreedyTrace) -> bool {
    let topology = placement.topology;
    let pairs = PairIndex::new(topology.num_nodes());
    let mut separated = vec![false; pairs.len()];
    let mut remaining = pairs.len();
    for j in (0..topology.num_routes()).filter(|&j| placement.active[j]) {
        remaining -= separate(topology, &pairs, j, &mut separated);
    }

    loop {
        if remaining == 0 {
            return true;
        }
        let choice = placement.best_candidate(|c| {
            placement
                .activated_by(c)
                .map(|j| {
                    topology
                        .distinguished_pairs(&topology.routes()[j], &pairs)
                        .into_iter()
                        .filter(|&p| !separated[p])
                        .count()
                })
                .sum()
        });
        let Some(choice) = choice else {
            return false;
        };
        for j in placement.add(choice) {
            remaining -= separate(topology, &pairs, j, &mut separated);
        }
        trace.one_id += 1;
    }
}

/// Fast check of the goal and reduction hints for `monitors`.
fn satisfies(constraints: &ConstraintSet<'_>, monitors: &BTreeSet<usize>) -> bool {
    let topology = constraints.topology();
    let n = topology.num_nodes();
    let active = topology.active_routes(monitors);
    verify_cover(n, topology.all_symptoms(), &active)
        && (constraints.goal() == Goal::Cover || verify_1id(n, topology.all_symptoms(), &active))
        && constraints
            .reductions()
            .map_or(true, |r| r.is_satisfied_by(monitors))
}

/// Greedy backend; always fast, never proves optimality.
#[derive(Debug, Clone)]
pub struct GreedyAdapter {
    prune_redundant: bool,
}

impl GreedyAdapter {
    pub fn new(config: &PlacementConfig) -> Self {
        Self::with_pruning(config.greedy.prune_redundant)
    }

    pub fn with_pruning(prune_redundant: bool) -> Self {
        Self { prune_redundant }
    }

    /// Runs every phase; `None` if the goal cannot be met with all nodes as monitors.
    pub fn place(
        &self,
        constraints: &ConstraintSet<'_>,
    ) -> Option<(BTreeSet<usize>, GreedyTrace)> {
        let topology = constraints.topology();
        let mut placement = Placement::new(topology);
        let mut trace = GreedyTrace::default();

        let independent = constraints
            .reductions()
            .map(|r| r.independent_nodes.clone())
            .unwrap_or_default();
        for v in topology.leaf_nodes().into_iter().chain(independent.iter().copied()) {
            placement.add(v);
        }
        trace.seeded = placement.monitors().len();

        if !cover_phase(&mut placement, &mut trace) {
            return None;
        }
        if constraints.goal() == Goal::OneId && !one_id_phase(&mut placement, &mut trace) {
            return None;
        }

        for component in constraints
            .reductions()
            .into_iter()
            .flat_map(|r| r.biconnected_components.iter())
        {
            if !component.iter().any(|&v| placement.is_monitor[v]) {
                let &first = component.first()?;
                placement.add(first);
                trace.components += 1;
            }
        }

        let mut monitors = placement.monitors();
        if self.prune_redundant {
            let snapshot: Vec<usize> = monitors.iter().copied().collect();
            for m in snapshot {
                if independent.contains(&m) {
                    continue;
                }
                monitors.remove(&m);
                if satisfies(constraints, &monitors) {
                    trace.pruned += 1;
                } else {
                    monitors.insert(m);
                }
            }
        }
        Some((monitors, trace))
    }
}

impl SolverAdapter for GreedyAdapter {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&self, constraints: &ConstraintSet<'_>) -> Result<SolveOutcome> {
        let start = Instant::now();
        info!(event = "engine_start", engine = self.name(), goal = %constraints.goal());

        let placed = self.place(constraints);
        let elapsed = start.elapsed();

        let outcome = match placed {
            Some((monitors, trace)) => {
                info!(
                    event = "engine_end",
                    engine = self.name(),
                    monitors = monitors.len(),
                    seeded = trace.seeded,
                    cover = trace.cover,
                    one_id = trace.one_id,
                    components = trace.components,
                    pruned = trace.pruned,
                    duration_ms = elapsed.as_millis() as u64,
                );
                SolveOutcome {
                    monitors,
                    total_time: start.elapsed(),
                    solving_time: Some(elapsed),
                    status: SolveStatus::Feasible,
                }
            }
            None => {
                info!(event = "engine_end", engine = self.name(), status = "Infeasible");
                SolveOutcome::without_solution(SolveStatus::Infeasible, start.elapsed())
            }
        };
        Ok(outcome)
    }
}
