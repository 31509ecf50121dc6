//! Render-then-encode orchestration.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::discovery::discover_frames;
use crate::encoder::FrameEncoder;
use crate::error::{EncodeError, Result};
use crate::report::RunReport;
use crate::scheduler::Scheduler;

/// Result of the encode phase.
#[derive(Debug)]
pub enum EncodeStatus {
    /// The animation was written to this path.
    Encoded(PathBuf),
    /// No frames existed, so the encoder was not invoked.
    Skipped,
    Failed(EncodeError),
}

impl EncodeStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, EncodeStatus::Failed(_))
    }
}

impl Serialize for EncodeStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            EncodeStatus::Encoded(path) => {
                serializer.serialize_str(&format!("encoded {}", path.display()))
            }
            EncodeStatus::Skipped => serializer.serialize_str("skipped"),
            EncodeStatus::Failed(e) => serializer.serialize_str(&format!("{}: {e}", e.kind())),
        }
    }
}

/// Outcome of a full render-and-encode invocation.
#[derive(Debug, Serialize)]
pub struct Animation {
    /// Present when frames were rendered in this invocation.
    pub run: Option<RunReport>,
    /// Frames available to the encoder.
    pub frames: usize,
    pub encode: EncodeStatus,
    pub encode_secs: f64,
}

impl Animation {
    /// True when frames exist, no timestep failed and encoding did not fail.
    pub fn is_success(&self) -> bool {
        let run_ok = self.run.as_ref().map_or(true, |r| r.failed.is_empty());
        run_ok && self.frames > 0 && !self.encode.is_failure()
    }
}

/// Optionally render `dir`, then encode its frames into `output`.
///
/// With `render == false` the frames already in `dir` are encoded as is.
/// The encoder is never invoked when there are no frames.
pub fn animate(
    scheduler: &Scheduler,
    encoder: &dyn FrameEncoder,
    dir: &Path,
    output: &Path,
    render: bool,
) -> Result<Animation> {
    let frame_prefix = &scheduler.config().frame_prefix;

    let run = if render {
        Some(scheduler.run(dir)?)
    } else {
        info!(dir = %dir.display(), "Skipping render, encoding existing frames");
        None
    };

    let frames = match &run {
        Some(report) => report.frames_written(),
        None => discover_frames(dir, frame_prefix)?.len(),
    };

    if frames == 0 {
        warn!(dir = %dir.display(), "No frames to encode");
        return Ok(Animation {
            run,
            frames,
            encode: EncodeStatus::Skipped,
            encode_secs: 0.0,
        });
    }

    let start = Instant::now();
    let encode = match encoder.encode(dir, frame_prefix, output) {
        Ok(()) => EncodeStatus::Encoded(output.to_path_buf()),
        Err(e) => {
            error!(error = %e, "Encoding failed; rendered frames are kept");
            EncodeStatus::Failed(e)
        }
    };

    Ok(Animation {
        run,
        frames,
        encode,
        encode_secs: start.elapsed().as_secs_f64(),
    })
}
