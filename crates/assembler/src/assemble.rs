//! Reading and stitching all rank tiles of one timestep.

use snapshot_common::{snapshot_path, FormatError, FrameError, FrameResult, TimestepIndex};
use snapshot_parser::{read_snapshot, Snapshot};
use std::path::Path;
use tracing::debug;

use crate::frame::{stitch, GlobalFrame};

/// Reconstruct the full-domain field of `timestep` from `num_ranks` tiles.
///
/// Returns `Ok(None)` when the rank 0 file does not exist: the timestep is
/// not part of the run. A missing file for any other rank is a
/// [`FrameError::MissingTile`]; empty tiles and tiles that disagree with
/// rank 0 on `ny`, `nvar` or `step` are a [`FrameError::Format`].
pub fn assemble(
    dir: &Path,
    prefix: &str,
    timestep: TimestepIndex,
    num_ranks: u32,
) -> FrameResult<Option<GlobalFrame>> {
    if num_ranks == 0 {
        return Ok(None);
    }

    let mut tiles: Vec<Snapshot> = Vec::with_capacity(num_ranks as usize);

    for rank in 0..num_ranks {
        let path = snapshot_path(dir, prefix, timestep, rank);
        match read_snapshot(&path) {
            Ok(tile) => tiles.push(tile),
            Err(FrameError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                if rank == 0 {
                    debug!(timestep, "No master file, timestep absent");
                    return Ok(None);
                }
                return Err(FrameError::MissingTile {
                    timestep,
                    rank,
                    path,
                });
            }
            Err(e) => return Err(e),
        }
    }

    let frame = stitch(&tiles).map_err(|e| {
        // Mismatches are reported against the offending rank's file.
        let rank = match &e {
            FormatError::TileMismatch { rank, .. } | FormatError::EmptyTile { rank, .. } => *rank,
            _ => 0,
        };
        FrameError::format(snapshot_path(dir, prefix, timestep, rank), e)
    })?;

    debug!(
        timestep,
        num_ranks,
        width = frame.width(),
        height = frame.height(),
        "Assembled global frame"
    );
    Ok(Some(frame))
}
