//! Optimization backends.
//!
//! Every backend consumes the same [`ConstraintSet`] and reports a
//! [`SolveOutcome`] in the shared status taxonomy. Each call is independent and
//! owns its own scratch resources.

use std::fmt;
use std::str::FromStr;

use monplace_config::PlacementConfig;
use monplace_core::{ConstraintSet, Result};
use serde::{Deserialize, Serialize};

use crate::status::SolveOutcome;

pub mod greedy;
pub mod ilp;
pub mod maxsat;
pub mod process;
pub mod propagation;


pub use greedy::GreedyAdapter;
pub use ilp::GurobiAdapter;
pub use maxsat::MaxSatAdapter;
pub use propagation::PropagationAdapter;

/// A monitor-placement engine.
pub trait SolverAdapter: fmt::Debug + Send {
    /// Short name used in reports.
    fn name(&self) -> &'static str;

    /// Minimizes the number of monitors subject to `constraints`.
    ///
    /// A missing or unlicensed engine fails with
    /// [`PlacementError::EngineUnavailable`](monplace_core::PlacementError::EngineUnavailable);
    /// everything the engine itself reports is mapped onto the outcome status.
    fn solve(&self, constraints: &ConstraintSet<'_>) -> Result<SolveOutcome>;
}

/// Backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Integer programming through `gurobi_cl`.
    Gurobi,
    /// In-process constraint propagation.
    #[serde(alias = "ortools")]
    Cp,
    /// Weighted MaxSAT through an external engine.
    NuwlsC,
    /// Greedy heuristic.
    Greedy,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Gurobi => "gurobi",
            Backend::Cp => "cp",
            Backend::NuwlsC => "nuwls-c",
            Backend::Greedy => "greedy",
        }
    }

    /// True for backends that prove optimality on completion.
    pub fn is_exact(self) -> bool {
        !matches!(self, Backend::Greedy)
    }

    /// Builds the adapter configured by `config`.
    pub fn adapter(self, config: &PlacementConfig) -> Box<dyn SolverAdapter> {
        match self {
            Backend::Gurobi => Box::new(GurobiAdapter::new(config)),
            Backend::Cp => Box::new(PropagationAdapter::new(config)),
            Backend::NuwlsC => Box::new(MaxSatAdapter::new(config)),
            Backend::Greedy => Box::new(GreedyAdapter::new(config)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "gurobi" => Ok(Backend::Gurobi),
            "cp" | "ortools" => Ok(Backend::Cp),
            "nuwls-c" => Ok(Backend::NuwlsC),
            "greedy" => Ok(Backend::Greedy),
            other => Err(format!(
                "unknown solver '{}', expected one of gurobi, cp, nuwls-c, greedy",
                other
            )),
        }
    }
}
