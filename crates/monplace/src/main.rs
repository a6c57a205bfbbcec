//! Command-line driver.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use monplace::io::{
    format_measurement_paths, read_instance, read_reductions, reductions_path_for, write_monitors,
};
use monplace::{
    logging, solve_placement, Backend, ConfigError, Goal, PlacementConfig, PlacementError,
    PlacementReport,
};
use thiserror::Error;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Minimal monitor placement for network tomography")]
struct Cli {
    /// Instance file (`<n> <m>` header, then `<start> <end> | <nodes>` per route)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Backend: gurobi, cp (alias ortools), nuwls-c or greedy
    #[arg(short, long)]
    solver: Backend,

    /// Goal: cover or 1id
    #[arg(short, long)]
    goal: Goal,

    /// Use the reduction hints stored next to the instance (`.rdc`)
    #[arg(short, long)]
    reductions: bool,

    /// Print one `;`-separated line instead of the summary
    #[arg(short, long)]
    csv: bool,

    /// Write the selected monitors to FILE
    #[arg(long, value_name = "FILE")]
    solution: Option<PathBuf>,

    /// Write the measurement paths between monitors to FILE
    #[arg(long, value_name = "FILE")]
    paths: Option<PathBuf>,

    /// Time limit in seconds, overriding the configuration
    #[arg(short, long, value_name = "SECS")]
    timelimit: Option<u64>,

    /// Configuration file (TOML, or YAML by extension)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Placement(#[from] PlacementError),
}

fn load_config(path: Option<&Path>) -> Result<PlacementConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(PlacementConfig::default());
    };
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => {
            let config = PlacementConfig::from_yaml_file(path)?;
            config.validate()?;
            Ok(config)
        }
        _ => PlacementConfig::load(path),
    }
}

/// Runs one placement; `Ok(false)` if the verifier rejects a claimed solution.
fn run(cli: &Cli) -> Result<bool, AppError> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(seconds) = cli.timelimit {
        config = config.with_time_limit_seconds(seconds);
        config.validate()?;
    }

    let topology = read_instance(&cli.input)?;
    let reductions = if cli.reductions {
        let path = reductions_path_for(&cli.input);
        info!(event = "reductions_loaded", path = %path.display());
        Some(read_reductions(path, topology.num_nodes())?)
    } else {
        None
    };

    let adapter = cli.solver.adapter(&config);
    let run = solve_placement(&topology, cli.goal, reductions.as_ref(), adapter.as_ref())?;

    if let Some(path) = &cli.solution {
        write_monitors(path, &run.outcome.monitors)?;
    }
    if let Some(path) = &cli.paths {
        fs::write(path, format_measurement_paths(&topology, &run.active_routes))
            .map_err(PlacementError::from)?;
    }

    let report = PlacementReport {
        input: cli.input.display().to_string(),
        solver: cli.solver.as_str(),
        reductions: cli.reductions,
        run: &run,
    };
    if cli.csv {
        println!("{}", report.csv_line());
    } else {
        println!("{}", report);
    }
    Ok(run.is_consistent())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
