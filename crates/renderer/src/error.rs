//! Error types for rendering.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Render configuration is unusable.
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    /// Frame has no pixels to render.
    #[error("cannot render an empty {width}x{height} frame")]
    EmptyFrame { width: usize, height: usize },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encoding(String),

    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}
