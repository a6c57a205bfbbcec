//! Text formats: instance files, reduction files and solution output.
//!
//! Parsers fail fast on the first offending line and never return a partial
//! result. Line numbers in errors are 1-based.

mod instance;
mod reductions;
mod solution;

pub use instance::{parse_instance, read_instance};
pub use reductions::{parse_reductions, read_reductions, reductions_path_for};
pub use solution::{format_measurement_paths, format_monitors, write_monitors};

use std::str::FromStr;

/// Parses every whitespace-separated token of `text` as a node index.
fn parse_indices<F>(text: &str, on_error: F) -> crate::Result<Vec<usize>>
where
    F: Fn(String) -> crate::PlacementError,
{
    text.split_whitespace()
        .map(|token| {
            usize::from_str(token)
                .map_err(|_| on_error(format!("invalid node index '{}'", token)))
        })
        .collect()
}
