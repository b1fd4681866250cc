//! Cluster lifecycle: idempotent ensure, unconditional teardown.

use tracing::{info, warn};

use opdev_core::{ClusterContext, RunConfig};
use opdev_tools::ClusterProvisioner;

use crate::error::PipelineError;

/// Create the run's cluster, replacing any pre-existing one of the same name.
///
/// Fail-closed: if a colliding cluster was already removed and the
/// recreation then fails, no cluster is left behind rather than a stale one.
pub async fn ensure_cluster(
    provisioner: &dyn ClusterProvisioner,
    config: &RunConfig,
) -> Result<(), PipelineError> {
    let context = &config.context;

    let existing = provisioner
        .list_clusters()
        .await
        .map_err(|source| PipelineError::ClusterProvision {
            context: context.clone(),
            source,
        })?;

    if existing.iter().any(|name| name == context.as_str()) {
        warn!(cluster = %context, "Cluster already exists, recreating it");
        provisioner
            .delete_cluster(context)
            .await
            .map_err(|source| PipelineError::ClusterProvision {
                context: context.clone(),
                source,
            })?;
    }

    provisioner
        .create_cluster(context, config.topology_config.as_deref())
        .await
        .map_err(|source| PipelineError::ClusterProvision {
            context: context.clone(),
            source,
        })?;

    info!(cluster = %context, "Cluster ready");
    Ok(())
}

/// Delete the named cluster. Terminal: nothing runs after this.
pub async fn tear_down(
    provisioner: &dyn ClusterProvisioner,
    context: &ClusterContext,
) -> Result<(), PipelineError> {
    provisioner
        .delete_cluster(context)
        .await
        .map_err(|source| PipelineError::ClusterTeardown {
            context: context.clone(),
            source,
        })?;

    info!(cluster = %context, "Cluster torn down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sample_config, MockProvisioner};

    #[tokio::test]
    async fn test_ensure_cluster_is_idempotent() {
        let provisioner = MockProvisioner::new();
        let config = sample_config();

        ensure_cluster(&provisioner, &config).await.unwrap();
        ensure_cluster(&provisioner, &config).await.unwrap();

        let registered = provisioner.clusters();
        let count = registered
            .iter()
            .filter(|name| *name == config.context.as_str())
            .count();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_ensure_cluster_recreates_existing() {
        let provisioner = MockProvisioner::with_cluster("opflow-dev");
        let config = sample_config();

        ensure_cluster(&provisioner, &config).await.unwrap();

        assert_eq!(provisioner.delete_calls(), 1);
        assert_eq!(provisioner.create_calls(), 1);
        assert_eq!(provisioner.clusters(), vec!["opflow-dev".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_recreation_is_fail_closed() {
        let provisioner = MockProvisioner::with_cluster("opflow-dev").fail_create();
        let config = sample_config();

        let err = ensure_cluster(&provisioner, &config).await.unwrap_err();
        assert!(matches!(err, PipelineError::ClusterProvision { .. }));
        // The colliding cluster was removed and nothing replaced it.
        assert!(provisioner.clusters().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_missing_cluster_surfaces_teardown_error() {
        let provisioner = MockProvisioner::new();
        let context = ClusterContext::new("no-such-cluster");

        let err = tear_down(&provisioner, &context).await.unwrap_err();
        assert!(matches!(err, PipelineError::ClusterTeardown { .. }));
    }

    #[tokio::test]
    async fn test_teardown_deletes_cluster() {
        let provisioner = MockProvisioner::with_cluster("opflow-dev");
        let context = ClusterContext::new("opflow-dev");

        tear_down(&provisioner, &context).await.unwrap();
        assert!(provisioner.clusters().is_empty());
    }
}
