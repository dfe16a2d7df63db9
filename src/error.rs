//! Build failure types.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a build run.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A tool ran and exited with a non-zero status.
    #[error("Error code {code} returned for: {command}")]
    ToolFailed { command: String, code: i32 },

    /// A tool could not be started at all.
    #[error("Failed to launch: {command}")]
    Launch {
        command: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Every pass succeeded but the expected PDF is not there.
    #[error("Toolchain finished but `{0}` was not produced")]
    MissingArtifact(PathBuf),
}
