//! Shared test fixtures for monplace crates.
//!
//! This crate only depends on `monplace-core` so every other crate can take it
//! as a dev-dependency without cycles.
//!
//! - [`scenario`] - small hand-written topologies with known optima
//! - [`random`] - reproducible random instances
//! - [`exhaustive`] - brute-force optimum over every monitor subset
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! monplace-test = { workspace = true }
//! ```

pub mod exhaustive;
pub mod random;
pub mod scenario;

pub use exhaustive::brute_force_optimum;
pub use random::{random_instance, random_reductions};
pub use scenario::{line_topology, star_topology, three_node, THREE_NODE_TEXT};
