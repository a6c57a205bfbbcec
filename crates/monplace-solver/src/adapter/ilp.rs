//! Integer-programming backend driving the `gurobi_cl` command line.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use monplace_config::PlacementConfig;
use monplace_core::{ConstraintSet, PlacementError, Result};
use tracing::{info, warn};

use super::process::run_engine;
use super::SolverAdapter;
use crate::lp::write_lp;
use crate::scratch::ScratchDir;
use crate::status::{SolveOutcome, SolveStatus};

const MODEL_FILE: &str = "model.lp";
const RESULT_FILE: &str = "model.sol";
const LOG_FILE: &str = "gurobi.log";

/// Maps a solver log onto [`SolveStatus`].
pub fn classify_log(log: &str) -> SolveStatus {
    if log.contains("Optimal solution found") {
        SolveStatus::Optimal
    } else if log.contains("Time limit reached") {
        SolveStatus::Timeout
    } else if log.contains("Model is infeasible") || log.contains("Infeasible model") {
        SolveStatus::Infeasible
    } else if log.contains("Out of memory") || log.contains("Memory limit reached") {
        SolveStatus::MemoryError
    } else {
        SolveStatus::Error
    }
}

/// Runtime from the `Explored ... in <t> seconds` summary line.
pub fn parse_runtime(log: &str) -> Option<Duration> {
    log.lines()
        .filter(|line| line.starts_with("Explored"))
        .filter_map(|line| line.split(" in ").nth(1))
        .filter_map(|rest| rest.split_whitespace().next())
        .filter_map(|secs| secs.parse::<f64>().ok())
        .last()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

/// Monitors from a result file of `<column> <value>` lines.
pub fn parse_result_file(text: &str) -> BTreeSet<usize> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let value: f64 = fields.next()?.parse().ok()?;
            let node: usize = name.strip_prefix('x')?.parse().ok()?;
            (value > 0.5).then_some(node)
        })
        .collect()
}

fn license_failure(log: &str) -> Option<&str> {
    log.lines()
        .find(|line| line.to_ascii_lowercase().contains("license"))
        .map(str::trim)
}

/// Solves the LP lowering with Gurobi's command-line tool.
#[derive(Debug, Clone)]
pub struct GurobiAdapter {
    executable: PathBuf,
    time_limit: Duration,
    memory_limit_gb: f64,
    seed: u64,
    scratch_root: Option<PathBuf>,
}

impl GurobiAdapter {
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            executable: config.ilp.gurobi_cl.clone(),
            time_limit: config.time_limit(),
            memory_limit_gb: config.memory_limit_gb(),
            seed: config.random_seed,
            scratch_root: config.scratch_dir.clone(),
        }
    }

    fn args(&self, scratch: &ScratchDir) -> Vec<OsString> {
        let mut result_file = OsString::from("ResultFile=");
        result_file.push(scratch.file(RESULT_FILE));
        let mut log_file = OsString::from("LogFile=");
        log_file.push(scratch.file(LOG_FILE));
        // Seed accepts 0..=i32::MAX
        vec![
            "Threads=1".into(),
            format!("Seed={}", self.seed % (i32::MAX as u64)).into(),
            format!("TimeLimit={}", self.time_limit.as_secs()).into(),
            format!("SoftMemLimit={}", self.memory_limit_gb).into(),
            result_file,
            log_file,
            scratch.file(MODEL_FILE).into(),
        ]
    }
}

impl SolverAdapter for GurobiAdapter {
    fn name(&self) -> &'static str {
        "gurobi"
    }

    fn solve(&self, constraints: &ConstraintSet<'_>) -> Result<SolveOutcome> {
        let start = Instant::now();
        let scratch = ScratchDir::create(self.scratch_root.as_deref())?;

        let mut model = BufWriter::new(File::create(scratch.file(MODEL_FILE))?);
        let lp = write_lp(constraints, &mut model)?;
        model.flush()?;
        drop(model);

        if lp.empty_rows > 0 {
            info!(event = "engine_skipped", engine = self.name(), empty_rows = lp.empty_rows);
            return Ok(SolveOutcome::without_solution(
                SolveStatus::Infeasible,
                start.elapsed(),
            ));
        }

        info!(
            event = "engine_start",
            engine = self.name(),
            rows = lp.rows,
            time_limit_secs = self.time_limit.as_secs(),
        );
        let run = run_engine(&self.executable, &self.args(&scratch), self.time_limit)?;
        if run.timed_out() {
            warn!(event = "engine_killed", engine = self.name());
            return Ok(SolveOutcome::without_solution(
                SolveStatus::Timeout,
                start.elapsed(),
            ));
        }

        let log = match fs::read_to_string(scratch.file(LOG_FILE)) {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => run.stdout.clone(),
            Err(e) if e.kind() == ErrorKind::NotFound => run.stdout.clone(),
            Err(e) => return Err(e.into()),
        };

        if !run.success() {
            let combined = format!("{}\n{}", log, run.stderr);
            if let Some(line) = license_failure(&combined) {
                return Err(PlacementError::EngineUnavailable(line.to_string()));
            }
        }

        let status = classify_log(&log);
        let monitors = match fs::read_to_string(scratch.file(RESULT_FILE)) {
            Ok(text) => parse_result_file(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => return Err(e.into()),
        };
        if status == SolveStatus::Error {
            warn!(
                event = "engine_error",
                engine = self.name(),
                exit = ?run.status,
                stderr = %run.stderr.trim(),
            );
        }

        Ok(SolveOutcome {
            monitors,
            total_time: start.elapsed(),
            solving_time: parse_runtime(&log),
            status,
        })
    }
}
