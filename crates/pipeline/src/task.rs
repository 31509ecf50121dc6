//! Per-timestep work unit: assemble, render, write.

use assembler::assemble;
use renderer::FrameRenderer;
use snapshot_common::{frame_path, snapshot_path, FrameError, FrameResult, TimestepIndex};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::cleanup::temp_frame_name;

/// Everything a worker needs to produce one frame.
///
/// Tasks share no mutable state; the renderer is shared read-only.
#[derive(Debug, Clone)]
pub struct FrameTask {
    pub dir: PathBuf,
    pub timestep: TimestepIndex,
    pub num_ranks: u32,
    pub snapshot_prefix: Arc<str>,
    pub frame_prefix: Arc<str>,
    pub renderer: Arc<FrameRenderer>,
}

/// Lifecycle of a task.
///
/// `Pending -> Running -> Succeeded | Failed`. Both terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }

    fn name(&self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal result of one task.
#[derive(Debug)]
pub struct TaskOutcome {
    pub timestep: TimestepIndex,
    /// Path of the written frame, or why none was written.
    pub result: FrameResult<PathBuf>,
    pub elapsed: Duration,
}

impl TaskOutcome {
    /// Always `Succeeded` or `Failed`.
    pub fn state(&self) -> TaskState {
        match self.result {
            Ok(_) => TaskState::Succeeded,
            Err(_) => TaskState::Failed,
        }
    }
}

impl FrameTask {
    /// Path of the frame this task writes.
    pub fn frame_path(&self) -> PathBuf {
        frame_path(&self.dir, &self.frame_prefix, self.timestep)
    }

    /// Run the task to a terminal state.
    ///
    /// Never panics on bad input; every failure ends up in the outcome.
    pub fn run(&self) -> TaskOutcome {
        debug!(timestep = self.timestep, state = %TaskState::Pending, "Task queued");

        let start = Instant::now();
        debug!(timestep = self.timestep, state = %TaskState::Running, "Task started");

        let result = self.execute();
        if let Err(e) = &result {
            warn!(
                timestep = self.timestep,
                kind = %e.kind(),
                error = %e,
                "Timestep failed"
            );
        }

        let outcome = TaskOutcome {
            timestep: self.timestep,
            result,
            elapsed: start.elapsed(),
        };
        debug!(
            timestep = self.timestep,
            state = %outcome.state(),
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "Task finished"
        );
        outcome
    }

    /// Assemble, render and write the frame, returning its path.
    pub fn execute(&self) -> FrameResult<PathBuf> {
        let frame = assemble(&self.dir, &self.snapshot_prefix, self.timestep, self.num_ranks)?
            .ok_or_else(|| FrameError::MissingTile {
                timestep: self.timestep,
                rank: 0,
                path: snapshot_path(&self.dir, &self.snapshot_prefix, self.timestep, 0),
            })?;

        let image = self
            .renderer
            .render(&frame)
            .map_err(|e| FrameError::Render(format!("timestep {}: {e}", self.timestep)))?;

        let path = self.frame_path();
        write_atomic(&path, &image.bytes)?;
        Ok(path)
    }
}

/// Write `bytes` to `path` through a hidden temporary file and a rename, so a
/// frame file is either absent or complete.
fn write_atomic(path: &Path, bytes: &[u8]) -> FrameResult<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FrameError::Render(format!("invalid frame path {}", path.display())))?;
    let tmp = path.with_file_name(temp_frame_name(name));

    std::fs::write(&tmp, bytes).map_err(|e| FrameError::io(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(FrameError::io(path, e));
    }
    Ok(())
}
