//! Bounded execution of external engine processes.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use monplace_core::{PlacementError, Result};
use tokio::process::Command;
use tracing::debug;

/// Extra wall time granted on top of the engine's own limit.
pub const GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Captured result of one engine process.
#[derive(Debug)]
pub struct EngineRun {
    /// Exit status; `None` if the process was killed at the outer timeout.
    pub status: Option<ExitStatus>,
    pub stdout: String,
    pub stderr: String,
}

impl EngineRun {
    pub fn timed_out(&self) -> bool {
        self.status.is_none()
    }

    pub fn success(&self) -> bool {
        self.status.is_some_and(|s| s.success())
    }
}

/// Runs `program args...` to completion or until `limit + GRACE_PERIOD`.
///
/// The process is killed when the outer timeout fires. A program that cannot
/// be started maps to [`PlacementError::EngineUnavailable`].
pub fn run_engine(program: &Path, args: &[OsString], limit: Duration) -> Result<EngineRun> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_engine_async(program, args, limit))
}

async fn run_engine_async(program: &Path, args: &[OsString], limit: Duration) -> Result<EngineRun> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => PlacementError::EngineUnavailable(
                format!("cannot start {}: {}", program.display(), e),
            ),
            _ => PlacementError::Io(e),
        })?;

    debug!(event = "engine_spawned", program = %program.display(), args = args.len());

    match tokio::time::timeout(limit + GRACE_PERIOD, child.wait_with_output()).await {
        Ok(output) => {
            let output = output?;
            Ok(EngineRun {
                status: Some(output.status),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
        // dropping the wait future kills the child
        Err(_) => Ok(EngineRun {
            status: None,
            stdout: String::new(),
            stderr: String::new(),
        }),
    }
}
