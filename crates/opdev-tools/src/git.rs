//! Source-control revision lookup via the git CLI.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::command::run_capture;
use crate::error::ToolError;
use crate::traits::RevisionLookup;

/// [`RevisionLookup`] backed by `git rev-parse`.
#[derive(Debug, Clone)]
pub struct GitRevision {
    /// Path to the git executable.
    binary: String,
}

impl GitRevision {
    /// Create a lookup using the given git executable.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for GitRevision {
    fn default() -> Self {
        Self::new("git")
    }
}

#[async_trait]
impl RevisionLookup for GitRevision {
    async fn short_head(&self, dir: &Path) -> Result<String, ToolError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-C")
            .arg(dir)
            .arg("rev-parse")
            .arg("--short")
            .arg("HEAD");

        let stdout = run_capture(&self.binary, cmd).await?;
        Ok(stdout.trim().to_string())
    }
}
