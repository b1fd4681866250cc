//! Bundle deployment: rewrite released image tags to the run's tag and
//! stream the result to the cluster.
//!
//! The bundle file is never modified on disk; the transformed document
//! exists only as the byte stream handed to the apply call.

use tracing::info;

use opdev_core::config::{REGISTRY_HOST, VERSION_MARKER};
use opdev_core::RunConfig;
use opdev_tools::ClusterClient;

use crate::error::PipelineError;

/// Extract the declared version from the bundle's version-label line.
///
/// Surrounding quotes are tolerated; only the first marker line counts.
pub fn discover_version(bundle: &str) -> Option<String> {
    bundle.lines().find_map(|line| {
        let (_, rest) = line.split_once(VERSION_MARKER)?;
        let version = rest.trim().trim_matches(|c| c == '"' || c == '\'');
        if version.is_empty() {
            None
        } else {
            Some(version.to_string())
        }
    })
}

/// Rewrite the released tag to the run's tag, line-locally.
///
/// Only lines containing the registry host are candidates; every other
/// line passes through byte-identical, and line endings are preserved.
pub fn rewrite_bundle(bundle: &str, version: &str, tag: &str) -> String {
    let released = if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    };

    bundle
        .split_inclusive('\n')
        .map(|line| {
            if line.contains(REGISTRY_HOST) {
                line.replace(&released, tag)
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Read, transform, and apply the bundle to the run's cluster.
pub async fn deploy_bundle(
    cluster: &dyn ClusterClient,
    config: &RunConfig,
) -> Result<(), PipelineError> {
    let bundle = tokio::fs::read_to_string(&config.bundle_path)
        .await
        .map_err(|e| {
            PipelineError::Configuration(format!(
                "cannot read bundle '{}': {}",
                config.bundle_path.display(),
                e
            ))
        })?;

    deploy_rendered(cluster, config, &bundle).await
}

/// Transform an already-read bundle document and apply it.
pub async fn deploy_rendered(
    cluster: &dyn ClusterClient,
    config: &RunConfig,
    bundle: &str,
) -> Result<(), PipelineError> {
    let version = discover_version(bundle).ok_or_else(|| PipelineError::VersionDiscovery {
        bundle: config.bundle_path.clone(),
    })?;

    info!(version = %version, tag = %config.tag, "Rewriting bundle image references");
    let transformed = rewrite_bundle(bundle, &version, &config.tag);

    let kube_context = config.context.kube_context();
    cluster
        .use_context(&kube_context)
        .await
        .map_err(|source| PipelineError::ContextSelection {
            context: kube_context,
            source,
        })?;

    cluster
        .apply(transformed.as_bytes())
        .await
        .map_err(|source| PipelineError::DeploymentApply {
            context: config.context.clone(),
            source,
        })?;

    info!(cluster = %config.context, "Bundle applied");
    Ok(())
}
