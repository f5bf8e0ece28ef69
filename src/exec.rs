//! Invocation of external CLI processes with captured output.
//!
//! Both the hub CLI and the volume CLI are driven through here so failure
//! reporting (exit code plus trailing stderr) is uniform.

use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    /// The binary could not be started at all (missing, not executable).
    #[error("could not start process: {0}")]
    Spawn(#[source] std::io::Error),

    /// The process ran but exited non-zero.
    #[error("exit code {}: {stderr}", .code.map(|c| c.to_string()).unwrap_or_else(|| "killed".to_string()))]
    Exit { code: Option<i32>, stderr: String },
}

/// Run a command to completion with stdin closed and output captured.
/// Success is exit code 0; stderr is kept for diagnostics on failure.
pub fn run_quiet(cmd: &mut Command) -> Result<(), ExecError> {
    let output = cmd.stdin(Stdio::null()).output().map_err(ExecError::Spawn)?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Err(ExecError::Exit {
        code: output.status.code(),
        stderr,
    })
}
