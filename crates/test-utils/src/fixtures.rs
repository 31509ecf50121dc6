//! Fixture writers that lay out snapshot files like the simulation does.

use snapshot_common::{snapshot_path, RankIndex, TimestepIndex, DEFAULT_SNAPSHOT_PREFIX};
use snapshot_parser::{write_snapshot, Snapshot};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::generators::{create_density_tile, create_test_tile};

/// Payload pattern written into fixture tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Values encode `(var, y, global_x)`, see [`crate::encoded_value`].
    Positional,
    /// Positive density-like values suitable for log rendering.
    Density,
}

/// Shape of a synthetic run: `timesteps` x `ranks` tiles of `nx * ny * nvar`.
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub timesteps: u32,
    pub ranks: u32,
    pub nx: usize,
    pub ny: usize,
    pub nvar: usize,
    pub prefix: String,
    pub pattern: Pattern,
}

impl RunSpec {
    pub fn new(timesteps: u32, ranks: u32, nx: usize, ny: usize, nvar: usize) -> Self {
        Self {
            timesteps,
            ranks,
            nx,
            ny,
            nvar,
            prefix: DEFAULT_SNAPSHOT_PREFIX.to_string(),
            pattern: Pattern::Density,
        }
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Global width of an assembled frame.
    pub fn total_width(&self) -> usize {
        self.nx * self.ranks as usize
    }

    /// The tile rank `rank` writes for `timestep`.
    pub fn tile(&self, timestep: TimestepIndex, rank: RankIndex) -> Snapshot {
        let x_offset = self.nx * rank as usize;
        let payload = match self.pattern {
            Pattern::Positional => create_test_tile(self.nx, self.ny, self.nvar, x_offset),
            Pattern::Density => {
                create_density_tile(self.nx, self.ny, self.nvar, x_offset, self.total_width())
            }
        };
        Snapshot::new(
            timestep as f32 * 0.01,
            1.4,
            (self.nx as i32, self.ny as i32, self.nvar as i32),
            timestep as i32,
            payload,
        )
        .expect("fixture payload matches its dimensions")
    }

    /// Write every rank file of one timestep.
    pub fn write_timestep(&self, dir: &Path, timestep: TimestepIndex) -> Vec<PathBuf> {
        (0..self.ranks)
            .map(|rank| write_tile(dir, &self.prefix, timestep, rank, &self.tile(timestep, rank)))
            .collect()
    }

    /// Write all timesteps into `dir`.
    pub fn write(&self, dir: &Path) -> Vec<PathBuf> {
        (0..self.timesteps)
            .flat_map(|timestep| self.write_timestep(dir, timestep))
            .collect()
    }

    /// Write the run into a fresh temporary directory.
    pub fn temp_dir(&self) -> TempDir {
        let dir = tempfile::tempdir().expect("create temp dir");
        self.write(dir.path());
        dir
    }
}

/// Write one tile under the standard snapshot file name.
pub fn write_tile(
    dir: &Path,
    prefix: &str,
    timestep: TimestepIndex,
    rank: RankIndex,
    snapshot: &Snapshot,
) -> PathBuf {
    let path = snapshot_path(dir, prefix, timestep, rank);
    write_snapshot(&path, snapshot).expect("write fixture tile");
    path
}

/// Remove one rank file of a timestep.
pub fn remove_tile(dir: &Path, prefix: &str, timestep: TimestepIndex, rank: RankIndex) {
    std::fs::remove_file(snapshot_path(dir, prefix, timestep, rank)).expect("remove fixture tile");
}

/// Overwrite one rank file with its first `keep` bytes.
pub fn truncate_tile(
    dir: &Path,
    prefix: &str,
    timestep: TimestepIndex,
    rank: RankIndex,
    keep: usize,
) {
    let path = snapshot_path(dir, prefix, timestep, rank);
    let data = std::fs::read(&path).expect("read fixture tile");
    std::fs::write(&path, &data[..keep.min(data.len())]).expect("truncate fixture tile");
}
