//! Configuration resolution: validated options in, immutable RunConfig out.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use opdev_core::config::{DEFAULT_BUNDLE_PATH, DEFAULT_WORKDIR};
use opdev_core::{ClusterContext, Platform, RunConfig, Verbosity};
use opdev_tools::RevisionLookup;

use crate::error::PipelineError;

/// Validated command-line options, before derivation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Working tree root; defaults to the operator source directory.
    pub workdir: Option<PathBuf>,

    /// Cluster context name.
    pub context: String,

    /// Optional multi-node topology descriptor.
    pub topology_config: Option<PathBuf>,

    /// Logging verbosity.
    pub verbosity: Verbosity,

    /// Skip the running-instance conflict check.
    pub skip_conflict_check: bool,
}

/// Resolve options into the immutable run configuration.
///
/// Side effect: the working directory becomes the process working
/// directory, so every later filesystem-relative operation (build
/// contexts, the bundle path) resolves against it. The tag is derived
/// here, exactly once; revision lookup failure silently yields `latest`.
pub async fn resolve(
    options: RunOptions,
    revision: &dyn RevisionLookup,
) -> Result<RunConfig, PipelineError> {
    let workdir = options
        .workdir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKDIR));

    let workdir = workdir.canonicalize().map_err(|e| {
        PipelineError::Configuration(format!(
            "working directory '{}' is not usable: {}",
            workdir.display(),
            e
        ))
    })?;

    let topology_config = match options.topology_config {
        Some(path) => Some(path.canonicalize().map_err(|e| {
            PipelineError::Configuration(format!(
                "cluster topology config '{}' is not readable: {}",
                path.display(),
                e
            ))
        })?),
        None => None,
    };

    std::env::set_current_dir(&workdir).map_err(|e| {
        PipelineError::Configuration(format!(
            "cannot enter working directory '{}': {}",
            workdir.display(),
            e
        ))
    })?;

    let tag = derive_tag(revision, &workdir).await;
    let platform = Platform::host();

    info!(
        workdir = %workdir.display(),
        context = %options.context,
        tag = %tag,
        goarch = %platform.goarch,
        "Configuration resolved"
    );

    Ok(RunConfig {
        workdir,
        context: ClusterContext::new(options.context),
        topology_config,
        tag,
        platform,
        verbosity: options.verbosity,
        skip_conflict_check: options.skip_conflict_check,
        bundle_path: PathBuf::from(DEFAULT_BUNDLE_PATH),
    })
}

/// Short revision hash of the working tree, or `latest` when unavailable.
async fn derive_tag(revision: &dyn RevisionLookup, workdir: &Path) -> String {
    match revision.short_head(workdir).await {
        Ok(hash) if !hash.is_empty() => hash,
        Ok(_) => "latest".to_string(),
        Err(e) => {
            debug!(error = %e, "Revision lookup failed, tagging as 'latest'");
            "latest".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockRevision;

    fn options_in(dir: &Path) -> RunOptions {
        RunOptions {
            workdir: Some(dir.to_path_buf()),
            context: "opflow-dev".to_string(),
            ..RunOptions::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_derives_tag_from_revision() {
        let dir = std::env::temp_dir();
        let revision = MockRevision::ok("abc1234");

        let config = resolve(options_in(&dir), &revision).await.unwrap();
        assert_eq!(config.tag, "abc1234");
        assert_eq!(config.context.as_str(), "opflow-dev");
    }

    #[tokio::test]
    async fn test_revision_failure_falls_back_to_latest() {
        let dir = std::env::temp_dir();
        let revision = MockRevision::failing();

        let config = resolve(options_in(&dir), &revision).await.unwrap();
        assert_eq!(config.tag, "latest");
    }

    #[tokio::test]
    async fn test_missing_workdir_is_configuration_error() {
        let options = RunOptions {
            workdir: Some(PathBuf::from("/nonexistent/opdev-workdir")),
            context: "opflow-dev".to_string(),
            ..RunOptions::default()
        };
        let revision = MockRevision::ok("abc1234");

        let err = resolve(options, &revision).await.unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_missing_topology_config_is_configuration_error() {
        let dir = std::env::temp_dir();
        let mut options = options_in(&dir);
        options.topology_config = Some(PathBuf::from("/nonexistent/topology.yaml"));
        let revision = MockRevision::ok("abc1234");

        let err = resolve(options, &revision).await.unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }
}
