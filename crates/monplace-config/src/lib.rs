//! Configuration system for monitor placement.
//!
//! Load engine budgets and engine locations from TOML or YAML files instead of
//! hard-coding them in the driver.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use monplace_config::PlacementConfig;
//! use std::time::Duration;
//!
//! let config = PlacementConfig::from_toml_str(r#"
//!     time_limit_seconds = 60
//!     memory_limit_mb = 4000
//!
//!     [maxsat]
//!     runner = "/opt/nuwls/bin/run"
//!     engine = "/opt/nuwls/bin/NuWLS-c_static"
//!
//!     [greedy]
//!     prune_redundant = false
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_secs(60));
//! assert_eq!(config.maxsat.verbosity, 3);
//! assert!(!config.greedy.prune_redundant);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use monplace_config::PlacementConfig;
//!
//! let config = PlacementConfig::load("monplace.toml").unwrap_or_default();
//! assert_eq!(config.time_limit_seconds, 1800);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Default wall-clock budget per solve, in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 1800;

/// Default memory ceiling per solve, in megabytes.
pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 20_000;

/// Default seed handed to engines that accept one.
pub const DEFAULT_RANDOM_SEED: u64 = 1_863_947;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main placement configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct PlacementConfig {
    /// Wall-clock budget for one solve, in seconds.
    pub time_limit_seconds: u64,

    /// Memory ceiling for one solve, in megabytes.
    pub memory_limit_mb: u64,

    /// Seed for engines that accept one.
    pub random_seed: u64,

    /// Directory in which per-solve scratch directories are created.
    /// Falls back to the system temporary directory.
    pub scratch_dir: Option<PathBuf>,

    /// Weighted-clause engine configuration.
    pub maxsat: MaxSatConfig,

    /// Integer linear programming engine configuration.
    pub ilp: IlpConfig,

    /// Greedy heuristic configuration.
    pub greedy: GreedyConfig,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECS,
            memory_limit_mb: DEFAULT_MEMORY_LIMIT_MB,
            random_seed: DEFAULT_RANDOM_SEED,
            scratch_dir: None,
            maxsat: MaxSatConfig::default(),
            ilp: IlpConfig::default(),
            greedy: GreedyConfig::default(),
        }
    }
}

impl PlacementConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the time limit.
    pub fn with_time_limit_seconds(mut self, seconds: u64) -> Self {
        self.time_limit_seconds = seconds;
        self
    }

    /// Sets the memory ceiling.
    pub fn with_memory_limit_mb(mut self, megabytes: u64) -> Self {
        self.memory_limit_mb = megabytes;
        self
    }

    /// Sets the scratch directory root.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Returns the time limit as a Duration.
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_seconds)
    }

    /// Memory ceiling in gigabytes, for engines that take it in that unit.
    pub fn memory_limit_gb(&self) -> f64 {
        self.memory_limit_mb as f64 / 1000.0
    }

    /// Rejects budgets that would make every solve fail immediately.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit_seconds == 0 {
            return Err(ConfigError::Invalid(
                "time_limit_seconds must be positive".to_string(),
            ));
        }
        if self.memory_limit_mb == 0 {
            return Err(ConfigError::Invalid(
                "memory_limit_mb must be positive".to_string(),
            ));
        }
        if self.maxsat.runner.as_os_str().is_empty() || self.maxsat.engine.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(
                "maxsat.runner and maxsat.engine must be set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Weighted-clause engine, run under a resource-watching runner.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct MaxSatConfig {
    /// Resource-watching runner that enforces time and memory limits.
    pub runner: PathBuf,

    /// Engine binary, passed to the runner.
    pub engine: PathBuf,

    /// Runner verbosity level.
    pub verbosity: u32,
}

impl Default for MaxSatConfig {
    fn default() -> Self {
        Self {
            runner: PathBuf::from("sat_solver/NuWLS-c-2023/bin/run"),
            engine: PathBuf::from("sat_solver/NuWLS-c-2023/bin/NuWLS-c_static"),
            verbosity: 3,
        }
    }
}

/// Integer linear programming engine, driven through its command-line tool.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct IlpConfig {
    /// Command-line executable of the engine.
    pub gurobi_cl: PathBuf,
}

impl Default for IlpConfig {
    fn default() -> Self {
        Self {
            gurobi_cl: PathBuf::from("gurobi_cl"),
        }
    }
}

/// Greedy heuristic configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct GreedyConfig {
    /// Drop monitors whose removal keeps the goal satisfied.
    pub prune_redundant: bool,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            prune_redundant: true,
        }
    }
}
