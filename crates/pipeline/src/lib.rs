//! Frame pipeline for rank-decomposed simulation snapshots.
//!
//! A run discovers timesteps in a directory, removes frames from earlier
//! runs, reconstructs and renders every timestep on a bounded pool of
//! workers, and writes one `frame_NNNNN.png` per timestep. A timestep that
//! fails is recorded in the [`RunReport`] and does not affect the others.
//!
//! The optional encode phase hands the frame sequence to a
//! [`FrameEncoder`], by default ffmpeg.
//!
//! ```no_run
//! use pipeline::{run, RenderConfig};
//! use std::path::Path;
//!
//! let report = run(Path::new("output-2024"), 4, RenderConfig::default())?;
//! println!("{} frames", report.frames_written());
//! # Ok::<(), pipeline::PipelineError>(())
//! ```

pub mod animation;
pub mod cleanup;
pub mod config;
pub mod discovery;
pub mod encoder;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod task;

pub use animation::{animate, Animation, EncodeStatus};
pub use cleanup::cleanup_previous_frames;
pub use config::{PipelineConfig, WorkerCount};
pub use discovery::{discover_frames, discover_timesteps, latest_output_dir, RUN_DIR_PREFIX};
pub use encoder::{EncoderConfig, FfmpegEncoder, FrameEncoder, DEFAULT_OUTFILE};
pub use error::{EncodeError, PipelineError, Result};
pub use renderer::RenderConfig;
pub use report::{FailedTimestep, RunReport};
pub use scheduler::{run, Scheduler};
pub use task::{FrameTask, TaskOutcome, TaskState};
