//! Terminal states of one invocation.

use std::fmt;

use serde::{Deserialize, Serialize};

use opdev_core::ClusterContext;

use crate::error::PipelineError;

/// Pipeline stage, used for error attribution and progress logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// External tool presence check.
    Probe,
    /// Configuration resolution.
    Resolve,
    /// Cluster lifecycle (ensure).
    Cluster,
    /// Image build and load.
    Images,
    /// Running-instance conflict check.
    Guard,
    /// Bundle rewrite and apply.
    Deploy,
    /// Cluster teardown.
    Teardown,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Probe => "probe",
            Stage::Resolve => "resolve",
            Stage::Cluster => "cluster",
            Stage::Images => "images",
            Stage::Guard => "guard",
            Stage::Deploy => "deploy",
            Stage::Teardown => "teardown",
        };
        write!(f, "{}", name)
    }
}

/// Terminal state of one invocation. Exactly one of these is produced.
#[derive(Debug)]
pub enum RunOutcome {
    /// The bundle was applied to a freshly provisioned cluster.
    Deployed { context: ClusterContext, tag: String },

    /// An already-running instance was found and the skip flag was not set.
    AbortedConflict {
        context: ClusterContext,
        workloads: Vec<String>,
    },

    /// A stage failed; the pipeline stopped there.
    Failed { stage: Stage, error: PipelineError },

    /// The cluster was deleted via the teardown path.
    TornDown { context: ClusterContext },
}

impl RunOutcome {
    /// Fold a pipeline result into its terminal state.
    ///
    /// A conflict abort is its own outcome rather than a generic failure.
    pub fn from_error(error: PipelineError) -> Self {
        match error {
            PipelineError::Conflict { context, workloads } => {
                RunOutcome::AbortedConflict { context, workloads }
            }
            other => RunOutcome::Failed {
                stage: other.stage(),
                error: other,
            },
        }
    }

    /// True for the two non-error terminal states.
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Deployed { .. } | RunOutcome::TornDown { .. })
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Deployed { .. } | RunOutcome::TornDown { .. } => 0,
            // Same code the underlying Conflict error maps to.
            RunOutcome::AbortedConflict { .. } => 9,
            RunOutcome::Failed { error, .. } => error.exit_code(),
        }
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        match self {
            RunOutcome::Deployed { context, tag } => {
                format!("Deployed tag '{}' to cluster '{}'", tag, context)
            }
            RunOutcome::AbortedConflict { context, workloads } => format!(
                "Aborted: {} running opflow workload(s) found in cluster '{}'",
                workloads.len(),
                context
            ),
            RunOutcome::Failed { stage, error } => {
                format!("Failed during {}: {}", stage, error)
            }
            RunOutcome::TornDown { context } => {
                format!("Tore down cluster '{}'", context)
            }
        }
    }
}
