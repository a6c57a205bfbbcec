//! Error types for monitor placement

use thiserror::Error;

/// Main error type for monitor placement operations
#[derive(Debug, Error)]
pub enum PlacementError {
    /// Instance data is inconsistent or cannot be parsed
    #[error("Malformed instance{}: {reason}", at_line(.line))]
    MalformedInstance { line: Option<usize>, reason: String },

    /// Reduction hints cannot be parsed or reference unknown nodes
    #[error("Malformed reductions{}: {reason}", at_line(.line))]
    MalformedReductions { line: Option<usize>, reason: String },

    /// Pair lookup with equal nodes or a node outside `[0, n)`
    #[error("Invalid pair ({a}, {b}) for {n} nodes")]
    InvalidPair { a: usize, b: usize, n: usize },

    /// Optimization engine missing, unlicensed or otherwise unusable
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Engine ran but its output could not be interpreted
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacementError {
    /// Shorthand for [`PlacementError::MalformedInstance`].
    pub fn instance(line: Option<usize>, reason: impl Into<String>) -> Self {
        PlacementError::MalformedInstance {
            line,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`PlacementError::MalformedReductions`].
    pub fn reductions(line: Option<usize>, reason: impl Into<String>) -> Self {
        PlacementError::MalformedReductions {
            line,
            reason: reason.into(),
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

/// Result type alias for monitor placement operations
pub type Result<T> = std::result::Result<T, PlacementError>;
