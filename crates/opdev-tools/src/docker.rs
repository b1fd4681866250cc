//! Container builds via the docker CLI.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use opdev_core::{BuildArgs, ImageRef};

use crate::command::run_capture;
use crate::error::ToolError;
use crate::traits::ContainerBuilder;

/// [`ContainerBuilder`] backed by `docker build`.
#[derive(Debug, Clone)]
pub struct DockerBuilder {
    /// Path to the docker executable.
    binary: String,
}

impl DockerBuilder {
    /// Create a builder using the given docker executable.
    ///
    /// The path can be just "docker" to use PATH lookup, or a full path.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for DockerBuilder {
    fn default() -> Self {
        Self::new("docker")
    }
}

#[async_trait]
impl ContainerBuilder for DockerBuilder {
    async fn build(
        &self,
        context_dir: &Path,
        dockerfile: Option<&Path>,
        build_args: &BuildArgs,
        image: &ImageRef,
    ) -> Result<(), ToolError> {
        info!(image = %image, context = %context_dir.display(), "Building image");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("build");

        if let Some(dockerfile) = dockerfile {
            cmd.arg("-f").arg(dockerfile);
        }

        for (key, value) in build_args {
            cmd.arg("--build-arg").arg(format!("{}={}", key, value));
        }

        cmd.arg("-t").arg(image.to_string());
        cmd.arg(context_dir);

        run_capture(&self.binary, cmd).await?;
        Ok(())
    }
}
