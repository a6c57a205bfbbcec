//! Monplace Core - problem model for minimal monitor placement
//!
//! This crate provides the solver-independent layer of monitor placement:
//! - Topology model (routes, symptom sets, endpoints)
//! - Pair index for flat per-pair storage
//! - Reduction hints (independent nodes, biconnected components)
//! - Constraint semantics shared by every backend
//! - Solution verification
//! - Instance, reduction and solution text formats

pub mod constraint;
pub mod error;
pub mod io;
pub mod pair;
pub mod reduction;
pub mod topology;
pub mod verify;

pub use constraint::{
    Activation, ConstraintSet, DistinguishingRow, Goal, Objective, Origin, Requirement, Var,
};
pub use error::{PlacementError, Result};
pub use pair::PairIndex;
pub use reduction::Reductions;
pub use topology::{Route, Topology};
pub use verify::{first_indistinguishable, first_uncovered, verify_1id, verify_cover, verify_goal};
