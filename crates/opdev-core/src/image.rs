//! Image roles, references, and the build platform triple.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three images one deployment run produces, in build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    /// The operator itself.
    Operator,
    /// Companion reloader sidecar.
    Reloader,
    /// Admission webhook server.
    Webhook,
}

impl ImageRole {
    /// All roles in their fixed build/load order.
    pub const ALL: [ImageRole; 3] = [ImageRole::Operator, ImageRole::Reloader, ImageRole::Webhook];

    /// Registry repository path for this role.
    pub fn repository(&self) -> &'static str {
        match self {
            ImageRole::Operator => "ghcr.io/opflow/operator",
            ImageRole::Reloader => "ghcr.io/opflow/reloader",
            ImageRole::Webhook => "ghcr.io/opflow/webhook",
        }
    }

    /// Dockerfile override relative to the working tree root, if any.
    ///
    /// The operator builds from the default `Dockerfile`; the companion
    /// images carry their own.
    pub fn dockerfile(&self) -> Option<&'static str> {
        match self {
            ImageRole::Operator => None,
            ImageRole::Reloader => Some("Dockerfile.reloader"),
            ImageRole::Webhook => Some("Dockerfile.webhook"),
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageRole::Operator => "operator",
            ImageRole::Reloader => "reloader",
            ImageRole::Webhook => "webhook",
        };
        write!(f, "{}", name)
    }
}

/// A fully qualified image reference: repository plus tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef {
    /// Registry repository path (e.g. `ghcr.io/opflow/operator`).
    pub repository: String,

    /// Image tag (short revision hash, or `latest`).
    pub tag: String,
}

impl ImageRef {
    /// Create a reference for a role at the given tag.
    pub fn for_role(role: ImageRole, tag: impl Into<String>) -> Self {
        Self {
            repository: role.repository().to_string(),
            tag: tag.into(),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

/// Target platform passed to every image build as {ARCH, GOARCH, OS}.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Machine architecture name (e.g. `x86_64`).
    pub arch: String,

    /// Go architecture name (e.g. `amd64`).
    pub goarch: String,

    /// Target operating system. Always `linux` for cluster images.
    pub os: String,
}

impl Platform {
    /// Derive the platform from the host architecture.
    pub fn host() -> Self {
        Self::from_arch(std::env::consts::ARCH)
    }

    /// Map a machine architecture to its Go name.
    pub fn from_arch(arch: &str) -> Self {
        let goarch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            other => other,
        };
        Self {
            arch: arch.to_string(),
            goarch: goarch.to_string(),
            os: "linux".to_string(),
        }
    }

    /// Build arguments for the container builder.
    pub fn build_args(&self) -> BuildArgs {
        vec![
            ("ARCH".to_string(), self.arch.clone()),
            ("GOARCH".to_string(), self.goarch.clone()),
            ("OS".to_string(), self.os.clone()),
        ]
    }
}

/// Key/value build arguments handed to the container builder.
pub type BuildArgs = Vec<(String, String)>;
