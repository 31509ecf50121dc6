//! Locating timesteps, run directories and previously rendered frames.

use snapshot_common::{parse_frame_file_name, snapshot_path, TimestepIndex, MAX_INDEX};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// Prefix of per-run output directories under the output root.
pub const RUN_DIR_PREFIX: &str = "output-";

/// Enumerate the timesteps present in `dir`.
///
/// Checks the rank 0 file of timesteps 0, 1, 2, ... and stops at the first
/// index with no rank 0 file. Timesteps after a gap are never reported.
pub fn discover_timesteps(dir: &Path, prefix: &str) -> Result<Vec<TimestepIndex>> {
    if !dir.is_dir() {
        return Err(PipelineError::DirectoryNotFound(dir.to_path_buf()));
    }

    let timesteps: Vec<TimestepIndex> = (0..=MAX_INDEX)
        .take_while(|&t| snapshot_path(dir, prefix, t, 0).is_file())
        .collect();

    debug!(dir = %dir.display(), count = timesteps.len(), "Discovered timesteps");
    Ok(timesteps)
}

/// Timesteps with a rendered frame in `dir`, in ascending order.
pub fn discover_frames(dir: &Path, frame_prefix: &str) -> Result<Vec<TimestepIndex>> {
    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut frames = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let name = entry.file_name();
        if let Some(t) = name.to_str().and_then(|n| parse_frame_file_name(frame_prefix, n)) {
            if entry.path().is_file() {
                frames.push(t);
            }
        }
    }
    frames.sort_unstable();
    Ok(frames)
}

/// Most recent run directory under `root`.
///
/// Run directories are named `<prefix><timestamp>`, so the lexically
/// greatest name is the latest run.
pub fn latest_output_dir(root: &Path, prefix: &str) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(PipelineError::DirectoryNotFound(root.to_path_buf()));
    }

    let entries = std::fs::read_dir(root).map_err(|e| PipelineError::io(root, e))?;

    let mut latest: Option<(String, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(root, e))?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !name.starts_with(prefix) || !path.is_dir() {
            continue;
        }
        if latest.as_ref().map_or(true, |(best, _)| name > *best) {
            latest = Some((name, path));
        }
    }

    match latest {
        Some((_, path)) => {
            info!(dir = %path.display(), "Using latest output directory");
            Ok(path)
        }
        None => Err(PipelineError::NoOutputDirectory {
            root: root.to_path_buf(),
            prefix: prefix.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_discover_stops_at_first_gap() {
        let dir = tempfile::tempdir().unwrap();
        for t in [0, 1, 2, 4] {
            touch(&snapshot_path(dir.path(), "output", t, 0));
        }
        assert_eq!(discover_timesteps(dir.path(), "output").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_discover_requires_rank_zero() {
        let dir = tempfile::tempdir().unwrap();
        touch(&snapshot_path(dir.path(), "output", 0, 1));
        assert!(discover_timesteps(dir.path(), "output").unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            discover_timesteps(&missing, "output"),
            Err(PipelineError::DirectoryNotFound(p)) if p == missing
        ));
    }

    #[test]
    fn test_discover_frames_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["frame_00002.png", "frame_00000.png", "frame_1.png", "notes.txt"] {
            touch(&dir.path().join(name));
        }
        assert_eq!(discover_frames(dir.path(), "frame").unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_latest_output_dir() {
        let root = tempfile::tempdir().unwrap();
        for name in ["output-2024-01-01", "output-2024-03-01", "other-2025"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        touch(&root.path().join("output-2099.txt"));

        let latest = latest_output_dir(root.path(), RUN_DIR_PREFIX).unwrap();
        assert_eq!(latest, root.path().join("output-2024-03-01"));
    }

    #[test]
    fn test_latest_output_dir_none() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            latest_output_dir(root.path(), RUN_DIR_PREFIX),
            Err(PipelineError::NoOutputDirectory { .. })
        ));
    }
}
