//! Error types for the frame pipeline.

use renderer::RenderError;
use snapshot_common::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Run-level failures. Per-timestep failures are recorded in the run report
/// instead (see [`snapshot_common::FrameError`]).
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The snapshot directory does not exist.
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// No output directory with the requested prefix exists.
    #[error("no directory starting with '{prefix}' found in {}", .root.display())]
    NoOutputDirectory { root: PathBuf, prefix: String },

    /// Filesystem error outside of a timestep task.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Invalid pipeline configuration.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failure of the external video encoder.
///
/// Fatal to the encode phase only; frames already written stay valid.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to start encoder '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("encoder exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

impl EncodeError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Encode
    }
}
