//! Newtype wrapper for the cluster context name to ensure type safety.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of one ephemeral cluster.
///
/// The cluster is never held as a live connection; every provisioner and
/// kubectl operation re-queries the external tools by this name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterContext(String);

impl ClusterContext {
    /// Create a new ClusterContext from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The kubectl context name for this cluster.
    ///
    /// kind registers clusters in the kubeconfig under a `kind-` prefix.
    pub fn kube_context(&self) -> String {
        format!("kind-{}", self.0)
    }
}

impl fmt::Display for ClusterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClusterContext {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ClusterContext {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
