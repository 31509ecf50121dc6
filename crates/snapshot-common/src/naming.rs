//! File naming convention for rank snapshots and rendered frames.
//!
//! Snapshot files are named `<prefix>_<timestep>.<rank>` and frames
//! `<prefix>_<timestep>.png`, every index zero-padded to five digits so that
//! lexicographic order equals temporal order.

use std::path::{Path, PathBuf};

use crate::{RankIndex, TimestepIndex};

/// Prefix the simulation writer uses for snapshot dumps.
pub const DEFAULT_SNAPSHOT_PREFIX: &str = "output";

/// Prefix for rendered frame files.
pub const DEFAULT_FRAME_PREFIX: &str = "frame";

/// File extension of rendered frames.
pub const FRAME_EXTENSION: &str = "png";

/// Number of digits of every index in a file name.
pub const INDEX_WIDTH: usize = 5;

/// Largest index that still fits the fixed-width naming scheme.
pub const MAX_INDEX: u32 = 99_999;

pub fn snapshot_file_name(prefix: &str, timestep: TimestepIndex, rank: RankIndex) -> String {
    format!("{prefix}_{timestep:05}.{rank:05}")
}

pub fn snapshot_path(
    dir: &Path,
    prefix: &str,
    timestep: TimestepIndex,
    rank: RankIndex,
) -> PathBuf {
    dir.join(snapshot_file_name(prefix, timestep, rank))
}

pub fn frame_file_name(prefix: &str, timestep: TimestepIndex) -> String {
    format!("{prefix}_{timestep:05}.{FRAME_EXTENSION}")
}

pub fn frame_path(dir: &Path, prefix: &str, timestep: TimestepIndex) -> PathBuf {
    dir.join(frame_file_name(prefix, timestep))
}

/// printf-style input pattern matching every frame file, e.g. `frame_%05d.png`.
pub fn frame_sequence_pattern(prefix: &str) -> String {
    format!("{prefix}_%0{INDEX_WIDTH}d.{FRAME_EXTENSION}")
}

/// Parse `<prefix>_NNNNN.png` into its timestep index.
pub fn parse_frame_file_name(prefix: &str, name: &str) -> Option<TimestepIndex> {
    let rest = name.strip_prefix(prefix)?.strip_prefix('_')?;
    let digits = rest.strip_suffix(FRAME_EXTENSION)?.strip_suffix('.')?;
    parse_index(digits)
}

fn parse_index(digits: &str) -> Option<u32> {
    if digits.len() != INDEX_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
