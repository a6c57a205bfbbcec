//! Monplace - Minimal Monitor Placement
//!
//! Select the fewest network nodes to host monitors so that the routes between
//! monitors cover every node, or tell every pair of nodes apart.
//!
//! # Example
//!
//! ```rust
//! use monplace::prelude::*;
//!
//! let topology = parse_instance("3 2\n0 1 | 0 1\n1 2 | 1 2\n").unwrap();
//! let adapter = Backend::Greedy.adapter(&PlacementConfig::default());
//!
//! let run = solve_placement(&topology, Goal::OneId, None, adapter.as_ref()).unwrap();
//! assert_eq!(run.outcome.status, SolveStatus::Feasible);
//! assert!(run.one_id);
//! ```

// Problem model
pub use monplace_core::{
    ConstraintSet, Goal, PairIndex, PlacementError, Reductions, Result, Route, Topology,
};

// Text formats
pub use monplace_core::io;

// Verification
pub use monplace_core::{verify_1id, verify_cover, verify_goal};

// Configuration
pub use monplace_config::{ConfigError, PlacementConfig};

// Engines and pipeline
pub use monplace_solver::{
    solve_placement, Backend, PlacementReport, PlacementRun, SolveOutcome, SolveStatus,
    SolverAdapter,
};

pub mod logging;

pub mod prelude {
    pub use super::io::{parse_instance, read_instance, read_reductions, reductions_path_for};
    pub use super::{solve_placement, Backend, PlacementReport, SolveStatus};
    pub use super::{Goal, PlacementConfig, Reductions, Topology};
}
