//! Trait seams for the external collaborators.
//!
//! The pipeline depends only on these traits; the subprocess-backed
//! implementations live beside them in this crate, and tests substitute
//! in-memory fakes.

use std::path::Path;

use async_trait::async_trait;

use opdev_core::{BuildArgs, ClusterContext, ImageRef};

use crate::error::ToolError;

/// Builds container images from a local source tree.
#[async_trait]
pub trait ContainerBuilder: Send + Sync {
    /// Build an image from `context_dir`, tagging it as `image`.
    ///
    /// `dockerfile` overrides the default `Dockerfile` inside the context.
    async fn build(
        &self,
        context_dir: &Path,
        dockerfile: Option<&Path>,
        build_args: &BuildArgs,
        image: &ImageRef,
    ) -> Result<(), ToolError>;
}

/// Creates, deletes, and feeds images into ephemeral clusters.
#[async_trait]
pub trait ClusterProvisioner: Send + Sync {
    /// Names of all clusters currently registered with the provisioner.
    async fn list_clusters(&self) -> Result<Vec<String>, ToolError>;

    /// Create a cluster, optionally from a multi-node topology descriptor.
    async fn create_cluster(
        &self,
        name: &ClusterContext,
        topology_config: Option<&Path>,
    ) -> Result<(), ToolError>;

    /// Delete the named cluster.
    async fn delete_cluster(&self, name: &ClusterContext) -> Result<(), ToolError>;

    /// Push a locally built image into the named cluster's image store.
    async fn load_image(&self, name: &ClusterContext, image: &ImageRef) -> Result<(), ToolError>;
}

/// Queries and applies manifests against a cluster's API server.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Make `context` the active kubeconfig context.
    async fn use_context(&self, context: &str) -> Result<(), ToolError>;

    /// Workload references matching a label selector, scoped to `context`.
    async fn list_workloads(&self, context: &str, selector: &str)
        -> Result<Vec<String>, ToolError>;

    /// Apply a manifest document to the active context.
    async fn apply(&self, manifest: &[u8]) -> Result<(), ToolError>;
}

/// Looks up the current source-control revision.
#[async_trait]
pub trait RevisionLookup: Send + Sync {
    /// Short form of the current revision hash of `dir`.
    async fn short_head(&self, dir: &Path) -> Result<String, ToolError>;
}
