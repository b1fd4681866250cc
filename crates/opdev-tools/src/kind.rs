//! Cluster provisioning via the kind CLI.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use opdev_core::{ClusterContext, ImageRef};

use crate::command::run_capture;
use crate::error::ToolError;
use crate::traits::ClusterProvisioner;

/// [`ClusterProvisioner`] backed by the kind CLI.
#[derive(Debug, Clone)]
pub struct KindProvisioner {
    /// Path to the kind executable.
    binary: String,
}

impl KindProvisioner {
    /// Create a provisioner using the given kind executable.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for KindProvisioner {
    fn default() -> Self {
        Self::new("kind")
    }
}

#[async_trait]
impl ClusterProvisioner for KindProvisioner {
    async fn list_clusters(&self) -> Result<Vec<String>, ToolError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("get").arg("clusters");

        let stdout = run_capture(&self.binary, cmd).await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn create_cluster(
        &self,
        name: &ClusterContext,
        topology_config: Option<&Path>,
    ) -> Result<(), ToolError> {
        info!(cluster = %name, "Creating cluster");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("create").arg("cluster").arg("--name").arg(name.as_str());

        if let Some(config) = topology_config {
            cmd.arg("--config").arg(config);
        }

        run_capture(&self.binary, cmd).await?;
        Ok(())
    }

    async fn delete_cluster(&self, name: &ClusterContext) -> Result<(), ToolError> {
        info!(cluster = %name, "Deleting cluster");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("delete").arg("cluster").arg("--name").arg(name.as_str());

        run_capture(&self.binary, cmd).await?;
        Ok(())
    }

    async fn load_image(&self, name: &ClusterContext, image: &ImageRef) -> Result<(), ToolError> {
        info!(cluster = %name, image = %image, "Loading image into cluster");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("load")
            .arg("docker-image")
            .arg("--name")
            .arg(name.as_str())
            .arg(image.to_string());

        run_capture(&self.binary, cmd).await?;
        Ok(())
    }
}
