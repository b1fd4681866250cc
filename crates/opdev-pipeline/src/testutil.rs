//! In-memory collaborator fakes shared by the stage test modules.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use opdev_core::config::DEFAULT_BUNDLE_PATH;
use opdev_core::{
    BuildArgs, ClusterContext, ImageRef, ImageRole, Platform, RunConfig, Verbosity,
};
use opdev_tools::{
    ClusterClient, ClusterProvisioner, ContainerBuilder, RevisionLookup, ToolError,
};

/// A resolved configuration for tests, context `opflow-dev`, tag `abc1234`.
pub fn sample_config() -> RunConfig {
    RunConfig {
        workdir: PathBuf::from("."),
        context: ClusterContext::new("opflow-dev"),
        topology_config: None,
        tag: "abc1234".to_string(),
        platform: Platform::from_arch("x86_64"),
        verbosity: Verbosity::Default,
        skip_conflict_check: false,
        bundle_path: PathBuf::from(DEFAULT_BUNDLE_PATH),
    }
}

fn tool_failure(program: &str, stderr: &str) -> ToolError {
    ToolError::NonZeroExit {
        program: program.to_string(),
        code: 1,
        stderr: stderr.to_string(),
    }
}

/// Records builds; optionally fails on one role's image.
#[derive(Default)]
pub struct MockBuilder {
    built: Mutex<Vec<ImageRef>>,
    fail_role: Option<ImageRole>,
}

impl MockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(mut self, role: ImageRole) -> Self {
        self.fail_role = Some(role);
        self
    }

    pub fn built(&self) -> Vec<ImageRef> {
        self.built.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContainerBuilder for MockBuilder {
    async fn build(
        &self,
        _context_dir: &Path,
        _dockerfile: Option<&Path>,
        _build_args: &BuildArgs,
        image: &ImageRef,
    ) -> Result<(), ToolError> {
        if let Some(role) = self.fail_role {
            if image.repository == role.repository() {
                return Err(tool_failure("docker", "build failed"));
            }
        }
        self.built.lock().unwrap().push(image.clone());
        Ok(())
    }
}

/// Tracks registered clusters by name, like the external provisioner does.
#[derive(Default)]
pub struct MockProvisioner {
    clusters: Mutex<Vec<String>>,
    loaded: Mutex<Vec<ImageRef>>,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_create: bool,
    fail_load: bool,
}

impl MockProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(name: &str) -> Self {
        let provisioner = Self::default();
        provisioner.clusters.lock().unwrap().push(name.to_string());
        provisioner
    }

    pub fn fail_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn fail_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub fn clusters(&self) -> Vec<String> {
        self.clusters.lock().unwrap().clone()
    }

    pub fn loaded(&self) -> Vec<ImageRef> {
        self.loaded.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterProvisioner for MockProvisioner {
    async fn list_clusters(&self) -> Result<Vec<String>, ToolError> {
        Ok(self.clusters())
    }

    async fn create_cluster(
        &self,
        name: &ClusterContext,
        _topology_config: Option<&Path>,
    ) -> Result<(), ToolError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(tool_failure("kind", "create failed"));
        }
        self.clusters.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn delete_cluster(&self, name: &ClusterContext) -> Result<(), ToolError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut clusters = self.clusters.lock().unwrap();
        let before = clusters.len();
        clusters.retain(|cluster| cluster != name.as_str());
        if clusters.len() == before {
            return Err(tool_failure("kind", "no such cluster"));
        }
        Ok(())
    }

    async fn load_image(
        &self,
        _name: &ClusterContext,
        image: &ImageRef,
    ) -> Result<(), ToolError> {
        if self.fail_load {
            return Err(tool_failure("kind", "load failed"));
        }
        self.loaded.lock().unwrap().push(image.clone());
        Ok(())
    }
}

/// Answers workload queries and records applies.
#[derive(Default)]
pub struct MockCluster {
    workloads: Vec<String>,
    applied: Mutex<Vec<Vec<u8>>>,
    contexts_used: Mutex<Vec<String>>,
    query_calls: AtomicUsize,
    fail_query: bool,
    fail_use_context: bool,
    fail_apply: bool,
}

impl MockCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workloads(workloads: Vec<String>) -> Self {
        Self {
            workloads,
            ..Self::default()
        }
    }

    pub fn fail_query(mut self) -> Self {
        self.fail_query = true;
        self
    }

    pub fn fail_use_context(mut self) -> Self {
        self.fail_use_context = true;
        self
    }

    pub fn fail_apply(mut self) -> Self {
        self.fail_apply = true;
        self
    }

    pub fn applied(&self) -> Vec<Vec<u8>> {
        self.applied.lock().unwrap().clone()
    }

    pub fn contexts_used(&self) -> Vec<String> {
        self.contexts_used.lock().unwrap().clone()
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterClient for MockCluster {
    async fn use_context(&self, context: &str) -> Result<(), ToolError> {
        if self.fail_use_context {
            return Err(tool_failure("kubectl", "no such context"));
        }
        self.contexts_used.lock().unwrap().push(context.to_string());
        Ok(())
    }

    async fn list_workloads(
        &self,
        _context: &str,
        _selector: &str,
    ) -> Result<Vec<String>, ToolError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_query {
            return Err(tool_failure("kubectl", "connection refused"));
        }
        Ok(self.workloads.clone())
    }

    async fn apply(&self, manifest: &[u8]) -> Result<(), ToolError> {
        if self.fail_apply {
            return Err(tool_failure("kubectl", "manifest rejected"));
        }
        self.applied.lock().unwrap().push(manifest.to_vec());
        Ok(())
    }
}

/// Fixed or failing revision lookup.
pub struct MockRevision {
    hash: Option<String>,
}

impl MockRevision {
    pub fn ok(hash: &str) -> Self {
        Self {
            hash: Some(hash.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { hash: None }
    }
}

#[async_trait]
impl RevisionLookup for MockRevision {
    async fn short_head(&self, _dir: &Path) -> Result<String, ToolError> {
        match &self.hash {
            Some(hash) => Ok(hash.clone()),
            None => Err(tool_failure("git", "not a git repository")),
        }
    }
}
