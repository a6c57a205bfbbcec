//! Backend-agnostic constraint semantics.
//!
//! A [`ConstraintSet`] states what a monitor placement must satisfy, in terms of
//! two families of boolean decision variables:
//!
//! - `x[i]`: node `i` is a monitor ([`Var::Monitor`]);
//! - `y[j]`: route `j` is active, i.e. `x[start(j)] ∧ x[end(j)]` ([`Var::Route`]).
//!
//! Every goal and reduction constraint is a [`Requirement`]: a disjunction
//! "at least one of these variables is true". The link between `y` and `x` is
//! an [`Activation`] equivalence. Backends lower these into their own formalism
//! (weighted clauses, linear rows, propagators) without re-deriving them.
//!
//! Requirements are produced lazily from the borrowed [`Topology`]; the
//! quadratic family of the 1-identifiability goal is never materialized.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::reduction::Reductions;
use crate::topology::Topology;

#[cfg(test)]
mod tests;

/// What the active routes must achieve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Goal {
    /// Every node is crossed by at least one active route.
    #[default]
    #[serde(rename = "cover")]
    Cover,
    /// Every pair of nodes is separated by at least one active route.
    #[serde(rename = "1id")]
    OneId,
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Cover => "cover",
            Goal::OneId => "1id",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cover" => Ok(Goal::Cover),
            "1id" => Ok(Goal::OneId),
            other => Err(format!("unknown goal '{}', expected 'cover' or '1id'", other)),
        }
    }
}

/// A boolean decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Var {
    /// `x[i]`: node `i` hosts a monitor.
    Monitor(usize),
    /// `y[j]`: both endpoints of route `j` host a monitor.
    Route(usize),
}

/// Where a requirement comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Node must be crossed by an active route.
    Cover { node: usize },
    /// Nodes `a < b` must be separated by an active route.
    Distinguish { a: usize, b: usize },
    /// Independent node must be a monitor.
    Independent { node: usize },
    /// Biconnected component (by list position) must contain a monitor.
    Component { index: usize },
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Cover { node } => write!(f, "cover({})", node),
            Origin::Distinguish { a, b } => write!(f, "distinguish({}, {})", a, b),
            Origin::Independent { node } => write!(f, "independent({})", node),
            Origin::Component { index } => write!(f, "component({})", index),
        }
    }
}

/// At least one of `vars` must be true.
///
/// An empty `vars` can never be satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub origin: Origin,
    pub vars: Vec<Var>,
}

impl Requirement {
    fn routes(origin: Origin, routes: &[usize]) -> Self {
        Self {
            origin,
            vars: routes.iter().map(|&j| Var::Route(j)).collect(),
        }
    }

    /// Evaluates the disjunction with `y` derived from `monitors`.
    pub fn is_satisfied_by(&self, topology: &Topology, monitors: &BTreeSet<usize>) -> bool {
        self.vars.iter().any(|var| match *var {
            Var::Monitor(v) => monitors.contains(&v),
            Var::Route(j) => topology.route(j).is_some_and(|r| r.is_active(monitors)),
        })
    }
}

/// `y[route] ⟺ x[start] ∧ x[end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub route: usize,
    pub start: usize,
    pub end: usize,
}

/// Optimization direction shared by all backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    /// Minimize `Σ x[i]`.
    #[default]
    MinimizeMonitors,
}

/// The complete, backend-agnostic model of one placement instance.
///
/// # Example
///
/// ```
/// use monplace_core::{ConstraintSet, Goal, Route, Topology};
///
/// let topology = Topology::build(
///     3,
///     vec![Route::new(0, 1, [0, 1], 0), Route::new(1, 2, [1, 2], 1)],
/// ).unwrap();
///
/// let constraints = ConstraintSet::new(&topology, Goal::OneId, None).unwrap();
/// assert_eq!(constraints.activations().count(), 2);
/// // 3 cover requirements + 3 pairs
/// assert_eq!(constraints.requirement_count(), 6);
/// assert!(constraints.is_satisfied_by(&[0, 1, 2].into_iter().collect()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConstraintSet<'a> {
    topology: &'a Topology,
    goal: Goal,
    reductions: Option<&'a Reductions>,
}

impl<'a> ConstraintSet<'a> {
    /// Creates the model, checking reduction hints against the node count.
    pub fn new(
        topology: &'a Topology,
        goal: Goal,
        reductions: Option<&'a Reductions>,
    ) -> Result<Self> {
        if let Some(reductions) = reductions {
            reductions.validate(topology.num_nodes())?;
        }
        Ok(Self {
            topology,
            goal,
            reductions,
        })
    }

    pub fn topology(&self) -> &'a Topology {
        self.topology
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn reductions(&self) -> Option<&'a Reductions> {
        self.reductions
    }

    pub fn objective(&self) -> Objective {
        Objective::MinimizeMonitors
    }

    pub fn num_nodes(&self) -> usize {
        self.topology.num_nodes()
    }

    pub fn num_routes(&self) -> usize {
        self.topology.num_routes()
    }

    /// `n + m` decision variables.
    pub fn num_variables(&self) -> usize {
        self.num_nodes() + self.num_routes()
    }

    /// One activation equivalence per route, by route index.
    pub fn activations(&self) -> impl ExactSizeIterator<Item = Activation> + 'a {
        self.topology
            .routes()
            .iter()
            .map(|r| Activation {
                route: r.index(),
                start: r.start(),
                end: r.end(),
            })
    }

    /// One requirement per node: some route of its symptom set is active.
    pub fn coverage(&self) -> impl Iterator<Item = Requirement> + 'a {
        self.topology
            .all_symptoms()
            .iter()
            .enumerate()
            .map(|(node, symptom)| Requirement::routes(Origin::Cover { node }, symptom))
    }

    /// 1-identifiability requirements grouped by the smaller node of each pair.
    ///
    /// Empty for [`Goal::Cover`].
    pub fn distinguishing_rows(&self) -> impl Iterator<Item = DistinguishingRow<'a>> + 'a {
        let topology = self.topology;
        let rows = match self.goal {
            Goal::OneId => topology.num_nodes(),
            Goal::Cover => 0,
        };
        (0..rows).map(move |a| DistinguishingRow {
            topology,
            a,
            next: a + 1,
        })
    }

    /// Independent nodes (ascending), then biconnected components (list order).
    pub fn reduction_requirements(&self) -> impl Iterator<Item = Requirement> + 'a {
        let reductions = self.reductions;
        let independent = reductions
            .into_iter()
            .flat_map(|r| r.independent_nodes.iter())
            .map(|&node| Requirement {
                origin: Origin::Independent { node },
                vars: vec![Var::Monitor(node)],
            });
        let components = reductions
            .into_iter()
            .flat_map(|r| r.biconnected_components.iter().enumerate())
            .map(|(index, component)| Requirement {
                origin: Origin::Component { index },
                vars: component.iter().map(|&v| Var::Monitor(v)).collect(),
            });
        independent.chain(components)
    }

    /// Every requirement, in the order cover, 1-identifiability, reductions.
    pub fn requirements(&self) -> impl Iterator<Item = Requirement> + 'a {
        self.coverage()
            .chain(self.distinguishing_rows().flatten())
            .chain(self.reduction_requirements())
    }

    /// Number of items [`requirements`](Self::requirements) yields.
    pub fn requirement_count(&self) -> usize {
        let n = self.num_nodes();
        let pairs = match self.goal {
            Goal::OneId => n * n.saturating_sub(1) / 2,
            Goal::Cover => 0,
        };
        let reductions = self.reductions.map_or(0, |r| {
            r.independent_nodes.len() + r.biconnected_components.len()
        });
        n + pairs + reductions
    }

    /// First requirement violated by `monitors`, if any.
    pub fn first_violation(&self, monitors: &BTreeSet<usize>) -> Option<Origin> {
        self.requirements()
            .find(|req| !req.is_satisfied_by(self.topology, monitors))
            .map(|req| req.origin)
    }

    /// True if `monitors` satisfies every requirement.
    pub fn is_satisfied_by(&self, monitors: &BTreeSet<usize>) -> bool {
        self.first_violation(monitors).is_none()
    }

    /// Checks that `monitors` only names existing nodes.
    pub fn check_monitors(&self, monitors: &BTreeSet<usize>) -> Result<()> {
        match monitors.iter().find(|&&v| v >= self.num_nodes()) {
            Some(&v) => Err(PlacementError::Engine(format!(
                "monitor {} outside 0..{}",
                v,
                self.num_nodes()
            ))),
            None => Ok(()),
        }
    }
}

/// The requirements `distinguish(a, b)` for a fixed `a` and every `b > a`.
#[derive(Debug, Clone)]
pub struct DistinguishingRow<'a> {
    topology: &'a Topology,
    a: usize,
    next: usize,
}

impl DistinguishingRow<'_> {
    /// The smaller node shared by every pair of this row.
    pub fn outer(&self) -> usize {
        self.a
    }
}

impl Iterator for DistinguishingRow<'_> {
    type Item = Requirement;

    fn next(&mut self) -> Option<Requirement> {
        if self.next >= self.topology.num_nodes() {
            return None;
        }
        let (a, b) = (self.a, self.next);
        self.next += 1;
        Some(Requirement::routes(
            Origin::Distinguish { a, b },
            &self.topology.symmetric_difference(a, b),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.topology.num_nodes().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for DistinguishingRow<'_> {}
