//! Opdev Deployment Pipeline
//!
//! The ordered, fail-fast sequence of stages that takes a working tree to a
//! running instance of the application inside a disposable cluster:
//!
//! 1. probe - required external tools are reachable
//! 2. resolve - immutable run configuration, tag derived once
//! 3. cluster - delete-then-create the named ephemeral cluster
//! 4. images - build all three images, then load all three
//! 5. guard - refuse to deploy over a running instance
//! 6. deploy - rewrite the bundle's image tags and apply it
//!
//! Teardown is a separate terminal path that only deletes the cluster.
//! Every stage failure is fatal; there is no retry anywhere in this crate.

pub mod cluster;
pub mod deploy;
pub mod error;
pub mod guard;
pub mod images;
pub mod outcome;
pub mod pipeline;
pub mod probe;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use error::PipelineError;
pub use outcome::{RunOutcome, Stage};
pub use pipeline::{tear_down, Pipeline};
pub use resolver::RunOptions;
