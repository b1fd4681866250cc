//! Shared subprocess runner for all external tools.
//!
//! Every wrapper in this crate funnels through here so spawn failures,
//! exit-status mapping, and logging behave the same for docker, kind,
//! kubectl and git.

use std::io::ErrorKind;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ToolError;

/// Run a command to completion and return its captured stdout.
///
/// Exit codes other than zero become [`ToolError::NonZeroExit`] carrying
/// the trimmed stderr. Stdout is decoded lossily; none of the wrapped
/// tools emit non-UTF-8 output in practice.
pub async fn run_capture(program: &str, mut cmd: Command) -> Result<String, ToolError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(program = %program, command = ?cmd, "Running external tool");

    let output = cmd.output().await.map_err(|e| spawn_error(program, e))?;
    finish(program, output)
}

/// Run a command with the given bytes streamed to its stdin.
pub async fn run_with_stdin(
    program: &str,
    mut cmd: Command,
    input: &[u8],
) -> Result<String, ToolError> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(program = %program, command = ?cmd, input_len = input.len(), "Running external tool with stdin");

    let mut child = cmd.spawn().map_err(|e| spawn_error(program, e))?;

    // stdin is piped above, so the handle is always present
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input).await?;
        stdin.shutdown().await?;
    }

    let output = child.wait_with_output().await?;
    finish(program, output)
}

/// Check that a tool is reachable by asking it for its version.
pub async fn probe(program: &str) -> Result<String, ToolError> {
    let mut cmd = Command::new(program);
    cmd.arg("--version");
    let stdout = run_capture(program, cmd).await?;
    Ok(stdout.lines().next().unwrap_or_default().to_string())
}

fn spawn_error(program: &str, err: std::io::Error) -> ToolError {
    if err.kind() == ErrorKind::NotFound {
        ToolError::NotFound(program.to_string())
    } else {
        ToolError::Spawn(err)
    }
}

fn finish(program: &str, output: std::process::Output) -> Result<String, ToolError> {
    let code = output.status.code().unwrap_or(-1);
    debug!(program = %program, exit_code = code, "External tool exited");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(program = %program, exit_code = code, stderr = %stderr, "External tool failed");
        return Err(ToolError::NonZeroExit {
            program: program.to_string(),
            code,
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
