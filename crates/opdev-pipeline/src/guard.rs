//! Conflict guard: refuse to deploy over a running instance.

use tracing::{info, warn};

use opdev_core::config::APP_NAME_SELECTOR;
use opdev_core::RunConfig;
use opdev_tools::ClusterClient;

use crate::error::PipelineError;

/// Abort if the application is already running in the cluster.
///
/// A failing query is its own error kind; it is never taken as "no
/// conflict found". When the skip flag is set the guard permits
/// continuation without querying at all.
pub async fn check_conflicts(
    cluster: &dyn ClusterClient,
    config: &RunConfig,
) -> Result<(), PipelineError> {
    if config.skip_conflict_check {
        warn!("Conflict check skipped by configuration");
        return Ok(());
    }

    let workloads = cluster
        .list_workloads(&config.context.kube_context(), APP_NAME_SELECTOR)
        .await
        .map_err(|source| PipelineError::ClusterQuery {
            context: config.context.clone(),
            source,
        })?;

    if !workloads.is_empty() {
        return Err(PipelineError::Conflict {
            context: config.context.clone(),
            workloads,
        });
    }

    info!(selector = %APP_NAME_SELECTOR, "No running instance found");
    Ok(())
}
