//! The image pipeline: build all three images, then load all three.
//!
//! Both phases walk the fixed role order sequentially and abort on the
//! first failure. No retry, no partial continuation: a half-populated
//! disposable cluster is abandoned, not repaired.

use tracing::info;

use opdev_core::{ImageRef, ImageRole, RunConfig};
use opdev_tools::{ClusterProvisioner, ContainerBuilder};

use crate::error::PipelineError;

/// Build all role images from the working tree at the run's tag.
pub async fn build_images(
    builder: &dyn ContainerBuilder,
    config: &RunConfig,
) -> Result<(), PipelineError> {
    let build_args = config.platform.build_args();

    for role in ImageRole::ALL {
        let image = ImageRef::for_role(role, config.tag.clone());
        let dockerfile = role.dockerfile().map(std::path::Path::new);

        builder
            .build(&config.workdir, dockerfile, &build_args, &image)
            .await
            .map_err(|source| PipelineError::ImageBuild { role, source })?;

        info!(role = %role, image = %image, "Image built");
    }

    Ok(())
}

/// Load all built images into the run's cluster.
pub async fn load_images(
    provisioner: &dyn ClusterProvisioner,
    config: &RunConfig,
) -> Result<(), PipelineError> {
    for role in ImageRole::ALL {
        let image = ImageRef::for_role(role, config.tag.clone());

        provisioner
            .load_image(&config.context, &image)
            .await
            .map_err(|source| PipelineError::ImageLoad {
                role,
                context: config.context.clone(),
                source,
            })?;

        info!(role = %role, image = %image, "Image loaded");
    }

    Ok(())
}
