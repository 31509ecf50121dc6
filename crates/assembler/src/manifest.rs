//! Expected rank files per timestep.

use snapshot_common::{snapshot_path, RankIndex, TimestepIndex, MAX_INDEX};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The ranks expected for every timestep of a run.
///
/// The rank count is taken once from timestep 0 and then fixed for the
/// whole run; it is never re-derived per timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestepManifest {
    num_ranks: u32,
}

impl TimestepManifest {
    pub fn new(num_ranks: u32) -> Self {
        Self { num_ranks }
    }

    /// Count contiguous rank files `0, 1, 2, ...` present for timestep 0.
    pub fn scan(dir: &Path, prefix: &str) -> Self {
        let num_ranks = (0..=MAX_INDEX)
            .take_while(|&rank| snapshot_path(dir, prefix, 0, rank).is_file())
            .count() as u32;
        debug!(dir = ?dir, num_ranks, "Counted ranks");
        Self { num_ranks }
    }

    pub fn num_ranks(&self) -> u32 {
        self.num_ranks
    }

    pub fn is_empty(&self) -> bool {
        self.num_ranks == 0
    }

    pub fn ranks(&self) -> Range<RankIndex> {
        0..self.num_ranks
    }

    /// Paths of every rank file of `timestep`, rank 0 first.
    pub fn expected_paths(&self, dir: &Path, prefix: &str, timestep: TimestepIndex) -> Vec<PathBuf> {
        self.ranks()
            .map(|rank| snapshot_path(dir, prefix, timestep, rank))
            .collect()
    }
}

/// Number of ranks of the run stored in `dir`.
pub fn count_ranks(dir: &Path, prefix: &str) -> u32 {
    TimestepManifest::scan(dir, prefix).num_ranks()
}
