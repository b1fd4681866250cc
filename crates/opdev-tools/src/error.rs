//! Error types for external tool invocations.

use thiserror::Error;

/// Errors that can occur when invoking an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool executable was not found on PATH.
    #[error("'{0}' not found on PATH. Ensure it is installed.")]
    NotFound(String),

    /// Failed to spawn the tool process.
    #[error("Failed to spawn process: {0}")]
    Spawn(#[from] std::io::Error),

    /// The tool exited with a nonzero status.
    #[error("'{program}' exited with code {code}: {stderr}")]
    NonZeroExit {
        program: String,
        code: i32,
        stderr: String,
    },
}
