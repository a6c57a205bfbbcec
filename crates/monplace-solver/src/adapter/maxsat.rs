//! MaxSAT backend: clause stream on disk, engine under a resource-limiting runner.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use monplace_config::PlacementConfig;
use monplace_core::{ConstraintSet, PlacementError, Result};
use tracing::{info, warn};

use super::process::run_engine;
use super::SolverAdapter;
use crate::encoder::encode_to_path;
use crate::scratch::ScratchDir;
use crate::status::{SolveOutcome, SolveStatus};

const CLAUSES_FILE: &str = "instance.wcnf";
const STATS_FILE: &str = "runner.stats";
const WATCH_FILE: &str = "runner.watch";

/// What the engine printed on stdout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Text after the last `s ` line.
    pub status: Option<String>,
    /// Monitors decoded from the last `v ` line.
    pub monitors: Option<BTreeSet<usize>>,
}

/// Extracts the status line and the assignment bitstring.
///
/// Positions `0..n` of the bitstring are the node variables; a `1` there is a
/// monitor. Route positions are ignored.
pub fn parse_engine_output(stdout: &str, n: usize) -> EngineOutput {
    let mut output = EngineOutput::default();
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("s ") {
            output.status = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("v ") {
            let bits = rest.trim();
            output.monitors = Some(
                bits.chars()
                    .take(n)
                    .enumerate()
                    .filter(|&(_, c)| c == '1')
                    .map(|(i, _)| i)
                    .collect(),
            );
        }
    }
    output
}

/// `KEY=VALUE` statistics written by the runner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunnerStats {
    /// Wall-clock time of the engine in seconds (`WCTIME`).
    pub wall_time: Option<f64>,
    pub timeout: bool,
    pub memout: bool,
}

impl RunnerStats {
    /// `WCTIME` as a duration; negative or non-finite values are dropped.
    pub fn solving_time(&self) -> Option<Duration> {
        self.wall_time.and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

pub fn parse_runner_stats(text: &str) -> RunnerStats {
    let mut stats = RunnerStats::default();
    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "WCTIME" => stats.wall_time = value.parse().ok(),
            "TIMEOUT" => stats.timeout = value == "true",
            "MEMOUT" => stats.memout = value == "true",
            _ => {}
        }
    }
    stats
}

/// Maps the engine's status token and the runner's verdict onto [`SolveStatus`].
pub fn classify(status: Option<&str>, stats: &RunnerStats) -> SolveStatus {
    match status {
        Some("OPTIMUM FOUND") => SolveStatus::Optimal,
        Some("UNSATISFIABLE") => SolveStatus::Infeasible,
        _ if stats.memout => SolveStatus::MemoryError,
        _ if stats.timeout => SolveStatus::Timeout,
        Some("SATISFIABLE") => SolveStatus::Feasible,
        _ => SolveStatus::Error,
    }
}

/// Runs a weighted-MaxSAT engine through a runner such as `runsolver`.
#[derive(Debug, Clone)]
pub struct MaxSatAdapter {
    runner: PathBuf,
    engine: PathBuf,
    verbosity: u32,
    time_limit: Duration,
    memory_limit_mb: u64,
    scratch_root: Option<PathBuf>,
}

impl MaxSatAdapter {
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            runner: config.maxsat.runner.clone(),
            engine: config.maxsat.engine.clone(),
            verbosity: config.maxsat.verbosity,
            time_limit: config.time_limit(),
            memory_limit_mb: config.memory_limit_mb,
            scratch_root: config.scratch_dir.clone(),
        }
    }

    fn runner_args(&self, scratch: &ScratchDir) -> Vec<OsString> {
        vec![
            "-W".into(),
            self.time_limit.as_secs().to_string().into(),
            "-d".into(),
            self.verbosity.to_string().into(),
            "-v".into(),
            scratch.file(STATS_FILE).into(),
            "-w".into(),
            scratch.file(WATCH_FILE).into(),
            "-M".into(),
            self.memory_limit_mb.to_string().into(),
            self.engine.clone().into(),
            scratch.file(CLAUSES_FILE).into(),
        ]
    }
}

impl SolverAdapter for MaxSatAdapter {
    fn name(&self) -> &'static str {
        "nuwls-c"
    }

    fn solve(&self, constraints: &ConstraintSet<'_>) -> Result<SolveOutcome> {
        let start = Instant::now();
        if !self.engine.exists() {
            return Err(PlacementError::EngineUnavailable(format!(
                "MaxSAT engine not found at {}",
                self.engine.display()
            )));
        }

        let scratch = ScratchDir::create(self.scratch_root.as_deref())?;
        let encoded = encode_to_path(constraints, &scratch.file(CLAUSES_FILE))?;
        info!(
            event = "engine_start",
            engine = self.name(),
            clauses = encoded.total(),
            time_limit_secs = self.time_limit.as_secs(),
        );

        let run = run_engine(&self.runner, &self.runner_args(&scratch), self.time_limit)?;
        if run.timed_out() {
            warn!(event = "engine_killed", engine = self.name());
            return Ok(SolveOutcome::without_solution(
                SolveStatus::Timeout,
                start.elapsed(),
            ));
        }

        let output = parse_engine_output(&run.stdout, constraints.num_nodes());
        let stats = match fs::read_to_string(scratch.file(STATS_FILE)) {
            Ok(text) => parse_runner_stats(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => RunnerStats::default(),
            Err(e) => return Err(e.into()),
        };
        let status = classify(output.status.as_deref(), &stats);
        if status == SolveStatus::Error {
            warn!(
                event = "engine_error",
                engine = self.name(),
                exit = ?run.status,
                stderr = %run.stderr.trim(),
            );
        }

        Ok(SolveOutcome {
            monitors: output.monitors.unwrap_or_default(),
            total_time: start.elapsed(),
            solving_time: stats.solving_time(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_engine_output() {
        let stdout = "c NuWLS-c\no 3\ns OPTIMUM FOUND\nv 11100\n";
        let output = parse_engine_output(stdout, 3);
        assert_eq!(output.status.as_deref(), Some("OPTIMUM FOUND"));
        assert_eq!(
            output.monitors.unwrap().into_iter().collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_route_positions_are_ignored() {
        let output = parse_engine_output("s SATISFIABLE\nv 0101111\n", 4);
        assert_eq!(
            output.monitors.unwrap().into_iter().collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_last_lines_win() {
        let output = parse_engine_output("s UNKNOWN\nv 10\ns SATISFIABLE\nv 01\n", 2);
        assert_eq!(output.status.as_deref(), Some("SATISFIABLE"));
        assert_eq!(output.monitors.unwrap().into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_missing_lines() {
        assert_eq!(parse_engine_output("c nothing\n", 3), EngineOutput::default());
    }

    #[test]
    fn test_parse_runner_stats() {
        let stats = parse_runner_stats("WCTIME=1.25\nCPUTIME=1.2\nTIMEOUT=false\nMEMOUT=true\n");
        assert_eq!(stats.wall_time, Some(1.25));
        assert!(!stats.timeout);
        assert!(stats.memout);
    }

    #[test]
    fn test_unusable_wall_time_is_dropped() {
        for text in ["WCTIME=-0.01\n", "WCTIME=nan\n", "WCTIME=inf\n"] {
            let stats = parse_runner_stats(text);
            assert_eq!(stats.solving_time(), None, "stats {:?}", text);
        }
        let stats = parse_runner_stats("WCTIME=1.25\n");
        assert_eq!(stats.solving_time(), Some(Duration::from_millis(1250)));
    }

    #[test]
    fn test_classify() {
        let clean = RunnerStats::default();
        let timeout = RunnerStats {
            timeout: true,
            ..RunnerStats::default()
        };
        let memout = RunnerStats {
            memout: true,
            ..RunnerStats::default()
        };
        assert_eq!(classify(Some("OPTIMUM FOUND"), &timeout), SolveStatus::Optimal);
        assert_eq!(classify(Some("UNSATISFIABLE"), &clean), SolveStatus::Infeasible);
        assert_eq!(classify(Some("SATISFIABLE"), &clean), SolveStatus::Feasible);
        assert_eq!(classify(Some("SATISFIABLE"), &timeout), SolveStatus::Timeout);
        assert_eq!(classify(None, &memout), SolveStatus::MemoryError);
        assert_eq!(classify(Some("UNKNOWN"), &clean), SolveStatus::Error);
        assert_eq!(classify(None, &clean), SolveStatus::Error);
    }
}
