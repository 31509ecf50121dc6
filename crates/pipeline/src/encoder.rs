//! Adapter to an external video encoder.

use serde::{Deserialize, Serialize};
use snapshot_common::frame_sequence_pattern;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::error::EncodeError;

/// Encodes an ordered frame sequence into an animation file.
pub trait FrameEncoder: Send + Sync {
    /// Encode every `<frame_prefix>_NNNNN.png` in `frames_dir` into `output`.
    fn encode(
        &self,
        frames_dir: &Path,
        frame_prefix: &str,
        output: &Path,
    ) -> Result<(), EncodeError>;
}

/// Default animation file name, relative to the frame directory.
pub const DEFAULT_OUTFILE: &str = "animation.gif";

/// Settings for the ffmpeg encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Encoder executable.
    pub program: String,
    /// Output width in pixels; height follows the aspect ratio.
    pub scale_width: Option<u32>,
    /// Input frame rate. ffmpeg's default when unset.
    pub framerate: Option<u32>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            scale_width: Some(200),
            framerate: None,
        }
    }
}

impl EncoderConfig {
    /// Defaults, with the executable overridable through `ANIMATOR_FFMPEG`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(program) = std::env::var("ANIMATOR_FFMPEG") {
            if !program.is_empty() {
                config.program = program;
            }
        }
        config
    }
}

/// Runs ffmpeg over the frame sequence.
#[derive(Debug, Clone, Default)]
pub struct FfmpegEncoder {
    config: EncoderConfig,
}

impl FfmpegEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Command line arguments, excluding the program.
    pub fn args(&self, frames_dir: &Path, frame_prefix: &str, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        if let Some(fps) = self.config.framerate {
            args.push("-framerate".into());
            args.push(fps.to_string().into());
        }
        args.push("-i".into());
        args.push(frames_dir.join(frame_sequence_pattern(frame_prefix)).into_os_string());
        for flag in ["-loglevel", "error", "-y", "-nostats"] {
            args.push(flag.into());
        }
        if let Some(width) = self.config.scale_width {
            args.push("-vf".into());
            args.push(format!("scale={width}:-1").into());
        }
        args.push(output.as_os_str().to_os_string());
        args
    }
}

impl FrameEncoder for FfmpegEncoder {
    fn encode(
        &self,
        frames_dir: &Path,
        frame_prefix: &str,
        output: &Path,
    ) -> Result<(), EncodeError> {
        let args = self.args(frames_dir, frame_prefix, output);
        debug!(program = %self.config.program, ?args, "Running encoder");

        let result = Command::new(&self.config.program)
            .args(&args)
            .output()
            .map_err(|source| EncodeError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(EncodeError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        info!(output = %output.display(), "Encoded animation");
        Ok(())
    }
}
