//! Monplace Solver - encodings and engines for monitor placement
//!
//! - [`encoder`]: weighted partial MaxSAT clause stream
//! - [`lp`]: CPLEX LP model for integer-programming engines
//! - [`adapter`]: backends sharing one status taxonomy
//! - [`pipeline`]: solve, verify and report
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use monplace_core::{Goal, Route, Topology};
//! use monplace_solver::{solve_placement, PropagationAdapter, SolveStatus};
//!
//! let topology = Topology::build(
//!     3,
//!     vec![Route::new(0, 1, [0, 1], 0), Route::new(1, 2, [1, 2], 1)],
//! ).unwrap();
//!
//! let adapter = PropagationAdapter::with_time_limit(Duration::from_secs(5));
//! let run = solve_placement(&topology, Goal::Cover, None, &adapter).unwrap();
//! assert_eq!(run.outcome.status, SolveStatus::Optimal);
//! assert_eq!(run.outcome.monitors.len(), 3);
//! ```

pub mod adapter;
pub mod encoder;
pub mod lp;
pub mod pipeline;
pub mod scratch;
pub mod status;

pub use adapter::{
    Backend, GreedyAdapter, GurobiAdapter, MaxSatAdapter, PropagationAdapter, SolverAdapter,
};
pub use encoder::{encode, encode_to_path, Clause, ClauseSink, EncodeStats, WcnfWriter, Weight};
pub use lp::write_lp;
pub use pipeline::{solve_placement, PlacementReport, PlacementRun};
pub use scratch::ScratchDir;
pub use status::{SolveOutcome, SolveStatus};
