//! Common types and utilities shared across the snapshot animation crates.

pub mod error;
pub mod naming;

pub use error::{ErrorKind, FormatError, FrameError, FrameResult};
pub use naming::{
    frame_file_name, frame_path, frame_sequence_pattern, parse_frame_file_name,
    snapshot_file_name, snapshot_path, DEFAULT_FRAME_PREFIX,
    DEFAULT_SNAPSHOT_PREFIX, FRAME_EXTENSION, MAX_INDEX,
};

/// Index of a simulation timestep as encoded in file names.
pub type TimestepIndex = u32;

/// Index of a compute rank (0 is the master file of a timestep).
pub type RankIndex = u32;
