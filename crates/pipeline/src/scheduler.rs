//! Parallel execution of timestep tasks on a bounded worker pool.

use assembler::TimestepManifest;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use renderer::{FrameRenderer, RenderConfig};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::cleanup::cleanup_previous_frames;
use crate::config::{PipelineConfig, WorkerCount};
use crate::discovery::discover_timesteps;
use crate::error::{PipelineError, Result};
use crate::report::RunReport;
use crate::task::{FrameTask, TaskOutcome};

/// Drives one run: discover, purge old frames, fan out, collect.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: Arc<PipelineConfig>,
}

impl Scheduler {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Render every discovered timestep of `dir` into a frame.
    ///
    /// Per-timestep failures are recorded in the report and never stop the
    /// other timesteps. Only run-level problems (missing directory, pool
    /// creation) are returned as errors.
    pub fn run(&self, dir: &Path) -> Result<RunReport> {
        let started_at = Utc::now();
        let start = Instant::now();

        let timesteps = discover_timesteps(dir, &self.config.snapshot_prefix)?;
        if timesteps.is_empty() {
            warn!(dir = %dir.display(), "No timesteps found");
            return Ok(RunReport::empty(dir.to_path_buf(), started_at));
        }

        let removed_frames = cleanup_previous_frames(dir, &self.config.frame_prefix)?;

        let manifest = TimestepManifest::scan(dir, &self.config.snapshot_prefix);
        let workers = self.config.workers.resolve();
        info!(
            dir = %dir.display(),
            timesteps = timesteps.len(),
            num_ranks = manifest.num_ranks(),
            workers,
            "Dispatching timesteps"
        );

        let renderer = Arc::new(FrameRenderer::new(self.config.render.clone())?);
        let snapshot_prefix: Arc<str> = Arc::from(self.config.snapshot_prefix.as_str());
        let frame_prefix: Arc<str> = Arc::from(self.config.frame_prefix.as_str());

        let tasks: Vec<FrameTask> = timesteps
            .iter()
            .map(|&timestep| FrameTask {
                dir: dir.to_path_buf(),
                timestep,
                num_ranks: manifest.num_ranks(),
                snapshot_prefix: Arc::clone(&snapshot_prefix),
                frame_prefix: Arc::clone(&frame_prefix),
                renderer: Arc::clone(&renderer),
            })
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("animator-worker-{i}"))
            .build()?;

        let progress = progress_bar(tasks.len() as u64, self.config.progress);
        let outcomes: Vec<TaskOutcome> = pool.install(|| {
            tasks
                .par_iter()
                .map(|task| {
                    let outcome = task.run();
                    progress.inc(1);
                    outcome
                })
                .collect()
        });
        progress.finish_and_clear();

        let mut report = RunReport::empty(dir.to_path_buf(), started_at);
        report.num_ranks = manifest.num_ranks();
        report.workers = workers;
        report.removed_frames = removed_frames;
        report.record(outcomes);
        report.elapsed_secs = start.elapsed().as_secs_f64();

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            elapsed_secs = report.elapsed_secs,
            "Run complete"
        );
        Ok(report)
    }
}

/// Render every timestep of `dir` with `num_workers` workers and the default
/// file naming.
pub fn run(dir: &Path, num_workers: usize, render: RenderConfig) -> Result<RunReport> {
    if num_workers == 0 {
        return Err(PipelineError::Config("num_workers must be > 0".to_string()));
    }
    let config = PipelineConfig {
        workers: WorkerCount::Fixed(num_workers),
        render,
        ..Default::default()
    };
    Scheduler::new(config)?.run(dir)
}

fn progress_bar(len: u64, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} frames")
    {
        bar.set_style(style);
    }
    bar
}
