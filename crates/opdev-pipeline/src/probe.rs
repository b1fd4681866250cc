//! Eager presence check for the required external tools.
//!
//! Runs once, before any other work. `git` is deliberately not probed:
//! its only consumer is tag derivation, whose failure path is the designed
//! `latest` fallback.

use tracing::debug;

use opdev_tools::command;

use crate::error::PipelineError;

/// Tools that must answer `--version` before the pipeline starts.
pub const REQUIRED_TOOLS: [&str; 3] = ["docker", "kind", "kubectl"];

/// Verify all required tools are reachable.
pub async fn check_dependencies() -> Result<(), PipelineError> {
    for tool in REQUIRED_TOOLS {
        let version = command::probe(tool)
            .await
            .map_err(|source| PipelineError::DependencyMissing {
                tool: tool.to_string(),
                source,
            })?;
        debug!(tool = %tool, version = %version, "Dependency present");
    }
    Ok(())
}
