//! Cluster queries and manifest application via the kubectl CLI.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::command::{run_capture, run_with_stdin};
use crate::error::ToolError;
use crate::traits::ClusterClient;

/// [`ClusterClient`] backed by the kubectl CLI.
#[derive(Debug, Clone)]
pub struct KubectlClient {
    /// Path to the kubectl executable.
    binary: String,
}

impl KubectlClient {
    /// Create a client using the given kubectl executable.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for KubectlClient {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

#[async_trait]
impl ClusterClient for KubectlClient {
    async fn use_context(&self, context: &str) -> Result<(), ToolError> {
        info!(context = %context, "Selecting kubectl context");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("config").arg("use-context").arg(context);

        run_capture(&self.binary, cmd).await?;
        Ok(())
    }

    async fn list_workloads(
        &self,
        context: &str,
        selector: &str,
    ) -> Result<Vec<String>, ToolError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("get")
            .arg("pods")
            .arg("--context")
            .arg(context)
            .arg("-l")
            .arg(selector)
            .arg("-o")
            .arg("name");

        let stdout = run_capture(&self.binary, cmd).await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn apply(&self, manifest: &[u8]) -> Result<(), ToolError> {
        info!(manifest_len = manifest.len(), "Applying manifest");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("apply").arg("-f").arg("-");

        run_with_stdin(&self.binary, cmd, manifest).await?;
        Ok(())
    }
}
