//! Normalized engine outcomes.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Closed status taxonomy shared by every backend.
///
/// Engine-specific codes are mapped onto these values inside each adapter so
/// callers never branch on a backend's own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven minimal monitor set.
    Optimal,
    /// Valid monitor set without an optimality proof.
    Feasible,
    /// No monitor set satisfies the constraints.
    Infeasible,
    /// Time budget exhausted; a best-so-far set may be attached.
    Timeout,
    /// Memory ceiling reached.
    MemoryError,
    /// Engine failed or produced output that could not be interpreted.
    Error,
}

impl SolveStatus {
    /// Returns the status as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Feasible => "Feasible",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Timeout => "Timeout",
            SolveStatus::MemoryError => "MemoryError",
            SolveStatus::Error => "Error",
        }
    }

    /// True if the engine claims its monitor set satisfies every constraint.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a backend returns for one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// Selected monitors; empty when the engine returned no assignment.
    pub monitors: BTreeSet<usize>,
    /// Wall time of the whole call, model loading included.
    pub total_time: Duration,
    /// Solving time as reported by the engine, when it reports one.
    pub solving_time: Option<Duration>,
    pub status: SolveStatus,
}

impl SolveOutcome {
    /// An outcome without any monitor set.
    pub fn without_solution(status: SolveStatus, total_time: Duration) -> Self {
        Self {
            monitors: BTreeSet::new(),
            total_time,
            solving_time: None,
            status,
        }
    }

    pub fn monitor_count(&self) -> usize {
        self.monitors.len()
    }
}
