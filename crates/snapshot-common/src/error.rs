//! Error types for snapshot decoding, assembly and per-timestep processing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::{RankIndex, TimestepIndex};

/// Result type alias using FrameError.
pub type FrameResult<T> = Result<T, FrameError>;

/// Malformed content in a snapshot file or a set of rank tiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The file ended before a record was fully read.
    #[error("record {record} truncated: needed {expected} bytes, only {found} left")]
    Truncated {
        record: usize,
        expected: usize,
        found: usize,
    },

    /// Leading and trailing byte-count markers of a record disagree.
    #[error("record {record} marker mismatch: leading {leading}, trailing {trailing}")]
    MarkerMismatch {
        record: usize,
        leading: u32,
        trailing: u32,
    },

    /// A metadata record does not hold the expected number of values.
    #[error("metadata record {record} is {found} bytes, expected {expected}")]
    MetadataShape {
        record: usize,
        expected: usize,
        found: usize,
    },

    /// Data record length is not a whole number of 32-bit values.
    #[error("record {record} length {len} is not a multiple of 4")]
    Misaligned { record: usize, len: usize },

    /// Data record holds a different number of values than nx*ny*nvar.
    #[error("data record holds {found} values, expected nx*ny*nvar = {expected}")]
    PayloadLength { expected: usize, found: usize },

    /// Dimensions read from the metadata record are unusable.
    #[error("invalid dimensions nx={nx} ny={ny} nvar={nvar}")]
    InvalidDimensions { nx: i32, ny: i32, nvar: i32 },

    /// A rank tile disagrees with the rank 0 tile of the same timestep.
    #[error("rank {rank} has {field}={found}, rank 0 has {field}={expected}")]
    TileMismatch {
        rank: RankIndex,
        field: &'static str,
        expected: i32,
        found: i32,
    },

    /// A rank tile has no cells to render.
    #[error("rank {rank} tile is empty: nx={nx} ny={ny} nvar={nvar}")]
    EmptyTile {
        rank: RankIndex,
        nx: i32,
        ny: i32,
        nvar: i32,
    },

    /// A record body exceeds what a 32-bit byte-count marker can describe.
    #[error("record of {len} bytes does not fit a 32-bit marker")]
    RecordTooLarge { len: usize },
}

/// Failure while reconstructing and rendering a single timestep.
///
/// These are caught at the task boundary and recorded against the timestep;
/// they never abort other timesteps.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("format error in {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("timestep {timestep}: rank {rank} file missing ({})", .path.display())]
    MissingTile {
        timestep: TimestepIndex,
        rank: RankIndex,
        path: PathBuf,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rendering failed: {0}")]
    Render(String),
}

impl FrameError {
    pub fn format(path: impl Into<PathBuf>, source: FormatError) -> Self {
        Self::Format {
            path: path.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The reportable kind of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FrameError::Format { .. } => ErrorKind::Format,
            FrameError::MissingTile { .. } => ErrorKind::MissingTile,
            // Rendering only fails on buffer compression while producing the output file.
            FrameError::Io { .. } | FrameError::Render(_) => ErrorKind::Io,
        }
    }
}

/// Error kinds surfaced in run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Format,
    MissingTile,
    Io,
    Encode,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Format => "FormatError",
            ErrorKind::MissingTile => "MissingTileError",
            ErrorKind::Io => "IOError",
            ErrorKind::Encode => "EncodeError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
