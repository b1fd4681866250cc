//! The pipeline error taxonomy.
//!
//! Every stage failure is fatal; errors propagate with `?` straight out of
//! the pipeline and carry the originating stage, the cluster context where
//! it applies, and the underlying tool failure.

use std::path::PathBuf;

use thiserror::Error;

use opdev_core::{ClusterContext, ImageRole};
use opdev_tools::ToolError;

use crate::outcome::Stage;

/// Fatal pipeline errors, one kind per failure mode.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad flag value, unreachable working directory, or unreadable input.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required external tool is not reachable.
    #[error("Required tool '{tool}' is missing: {source}")]
    DependencyMissing {
        tool: String,
        #[source]
        source: ToolError,
    },

    /// Cluster creation (or removal of a colliding predecessor) failed.
    #[error("Failed to provision cluster '{context}': {source}")]
    ClusterProvision {
        context: ClusterContext,
        #[source]
        source: ToolError,
    },

    /// Cluster deletion failed during teardown.
    #[error("Failed to tear down cluster '{context}': {source}")]
    ClusterTeardown {
        context: ClusterContext,
        #[source]
        source: ToolError,
    },

    /// An image build failed.
    #[error("Failed to build {role} image: {source}")]
    ImageBuild {
        role: ImageRole,
        #[source]
        source: ToolError,
    },

    /// Loading a built image into the cluster failed.
    #[error("Failed to load {role} image into cluster '{context}': {source}")]
    ImageLoad {
        role: ImageRole,
        context: ClusterContext,
        #[source]
        source: ToolError,
    },

    /// The running-instance query itself could not be completed.
    #[error("Failed to query cluster '{context}' for running workloads: {source}")]
    ClusterQuery {
        context: ClusterContext,
        #[source]
        source: ToolError,
    },

    /// An instance of the application is already running.
    #[error(
        "An opflow instance is already running in cluster '{context}' ({workloads:?}). \
         Re-run with --skip-conflict-check if deploying over it is intended."
    )]
    Conflict {
        context: ClusterContext,
        workloads: Vec<String>,
    },

    /// The bundle carries no version-label line.
    #[error("No version label found in bundle '{bundle}'")]
    VersionDiscovery { bundle: PathBuf },

    /// The kubectl context could not be activated.
    #[error("Failed to select kubectl context '{context}': {source}")]
    ContextSelection {
        context: String,
        #[source]
        source: ToolError,
    },

    /// The manifest apply call was rejected.
    #[error("Failed to apply bundle to cluster '{context}': {source}")]
    DeploymentApply {
        context: ClusterContext,
        #[source]
        source: ToolError,
    },
}

impl PipelineError {
    /// The stage this error originates from.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Configuration(_) => Stage::Resolve,
            PipelineError::DependencyMissing { .. } => Stage::Probe,
            PipelineError::ClusterProvision { .. } => Stage::Cluster,
            PipelineError::ClusterTeardown { .. } => Stage::Teardown,
            PipelineError::ImageBuild { .. } | PipelineError::ImageLoad { .. } => Stage::Images,
            PipelineError::ClusterQuery { .. } | PipelineError::Conflict { .. } => Stage::Guard,
            PipelineError::VersionDiscovery { .. }
            | PipelineError::ContextSelection { .. }
            | PipelineError::DeploymentApply { .. } => Stage::Deploy,
        }
    }

    /// Process exit code for this failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Configuration(_) => 2,
            PipelineError::DependencyMissing { .. } => 3,
            PipelineError::ClusterProvision { .. } => 4,
            PipelineError::ClusterTeardown { .. } => 5,
            PipelineError::ImageBuild { .. } => 6,
            PipelineError::ImageLoad { .. } => 7,
            PipelineError::ClusterQuery { .. } => 8,
            PipelineError::Conflict { .. } => 9,
            PipelineError::VersionDiscovery { .. } => 10,
            PipelineError::ContextSelection { .. } => 11,
            PipelineError::DeploymentApply { .. } => 12,
        }
    }
}
