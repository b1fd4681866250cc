//! The pipeline driver: runs the stages strictly in order and folds the
//! result into a terminal [`RunOutcome`].

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use opdev_core::{ClusterContext, RunConfig};
use opdev_tools::{ClusterClient, ClusterProvisioner, ContainerBuilder};

use crate::error::PipelineError;
use crate::outcome::RunOutcome;
use crate::{cluster, deploy, guard, images};

/// One deployment run over a resolved configuration.
///
/// Stages execute sequentially; each completes (or fails fatally) before
/// the next begins. The configuration is read-only for the whole run.
pub struct Pipeline {
    config: RunConfig,
    builder: Arc<dyn ContainerBuilder>,
    provisioner: Arc<dyn ClusterProvisioner>,
    cluster: Arc<dyn ClusterClient>,
}

impl Pipeline {
    /// Create a pipeline over the given collaborators.
    pub fn new(
        config: RunConfig,
        builder: Arc<dyn ContainerBuilder>,
        provisioner: Arc<dyn ClusterProvisioner>,
        cluster: Arc<dyn ClusterClient>,
    ) -> Self {
        Self {
            config,
            builder,
            provisioner,
            cluster,
        }
    }

    /// The resolved configuration this pipeline runs with.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the full deployment pipeline to its terminal state.
    pub async fn run(&self) -> RunOutcome {
        let started = Instant::now();

        match self.run_inner().await {
            Ok(()) => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    cluster = %self.config.context,
                    tag = %self.config.tag,
                    "Deployment complete"
                );
                RunOutcome::Deployed {
                    context: self.config.context.clone(),
                    tag: self.config.tag.clone(),
                }
            }
            Err(error) => RunOutcome::from_error(error),
        }
    }

    async fn run_inner(&self) -> Result<(), PipelineError> {
        cluster::ensure_cluster(self.provisioner.as_ref(), &self.config).await?;
        images::build_images(self.builder.as_ref(), &self.config).await?;
        images::load_images(self.provisioner.as_ref(), &self.config).await?;
        guard::check_conflicts(self.cluster.as_ref(), &self.config).await?;
        deploy::deploy_bundle(self.cluster.as_ref(), &self.config).await?;
        Ok(())
    }
}

/// The teardown path: deletes the named cluster and nothing else.
pub async fn tear_down(
    provisioner: &dyn ClusterProvisioner,
    context: &ClusterContext,
) -> RunOutcome {
    match cluster::tear_down(provisioner, context).await {
        Ok(()) => RunOutcome::TornDown {
            context: context.clone(),
        },
        Err(error) => RunOutcome::from_error(error),
    }
}
