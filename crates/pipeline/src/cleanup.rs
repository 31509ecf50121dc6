//! Removal of frames left over from earlier runs.

use snapshot_common::parse_frame_file_name;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};

/// Suffix of frames still being written.
pub(crate) const TEMP_SUFFIX: &str = ".tmp";

/// Name of the in-progress file for a frame named `frame_name`.
pub(crate) fn temp_frame_name(frame_name: &str) -> String {
    format!(".{frame_name}{TEMP_SUFFIX}")
}

fn is_stale_frame(frame_prefix: &str, name: &str) -> bool {
    if parse_frame_file_name(frame_prefix, name).is_some() {
        return true;
    }
    name.strip_prefix('.')
        .and_then(|n| n.strip_suffix(TEMP_SUFFIX))
        .is_some_and(|n| parse_frame_file_name(frame_prefix, n).is_some())
}

/// Delete every frame file (and unfinished frame) in `dir`.
///
/// Only names produced by this pipeline are touched. Returns the number of
/// files removed.
pub fn cleanup_previous_frames(dir: &Path, frame_prefix: &str) -> Result<usize> {
    if !dir.is_dir() {
        return Err(PipelineError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let path = entry.path();
        let is_match = entry
            .file_name()
            .to_str()
            .is_some_and(|name| is_stale_frame(frame_prefix, name));
        if !is_match || !path.is_file() {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove stale frame");
                return Err(PipelineError::io(path, e));
            }
        }
    }

    if removed > 0 {
        info!(dir = %dir.display(), removed, "Removed frames from previous run");
    }
    Ok(removed)
}
