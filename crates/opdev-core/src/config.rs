//! Resolved run configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::context::ClusterContext;
use crate::image::{ImageRef, ImageRole, Platform};

/// Label selector identifying the application's own workloads in a cluster.
pub const APP_NAME_SELECTOR: &str = "app.kubernetes.io/name=opflow";

/// Version-label marker line inside the manifest bundle.
pub const VERSION_MARKER: &str = "app.kubernetes.io/version:";

/// Registry host whose lines are candidates for tag rewriting.
pub const REGISTRY_HOST: &str = "ghcr.io/opflow";

/// Default working directory: the operator source tree.
pub const DEFAULT_WORKDIR: &str = "operator";

/// Default cluster context name.
pub const DEFAULT_CONTEXT: &str = "opflow-dev";

/// Released manifest bundle, relative to the working directory.
pub const DEFAULT_BUNDLE_PATH: &str = "deploy/opflow-bundle.yaml";

/// Logging verbosity of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Warnings and the final outcome only.
    #[default]
    Default,
    /// Stage-by-stage progress.
    Info,
}

/// Fully resolved configuration for one deployment run.
///
/// Built exactly once by the configuration resolver and treated as
/// read-only by every stage after that. The tag is derived before the
/// image pipeline runs and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Working tree root; the process working directory for the run.
    pub workdir: PathBuf,

    /// Name of the ephemeral cluster.
    pub context: ClusterContext,

    /// Optional multi-node topology descriptor passed to the provisioner.
    pub topology_config: Option<PathBuf>,

    /// Image tag for this run (short revision hash, or `latest`).
    pub tag: String,

    /// Target platform for all image builds.
    pub platform: Platform,

    /// Logging verbosity.
    pub verbosity: Verbosity,

    /// Skip the running-instance conflict check.
    pub skip_conflict_check: bool,

    /// Manifest bundle path, relative to the working directory.
    pub bundle_path: PathBuf,
}

impl RunConfig {
    /// Image references for all three roles at this run's tag.
    pub fn images(&self) -> Vec<ImageRef> {
        ImageRole::ALL
            .iter()
            .map(|role| ImageRef::for_role(*role, self.tag.clone()))
            .collect()
    }
}
