//! Aggregated outcome of a pipeline run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use snapshot_common::{ErrorKind, TimestepIndex};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::task::TaskOutcome;

/// A timestep that did not produce a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTimestep {
    pub kind: ErrorKind,
    pub message: String,
}

/// Per-run summary.
///
/// Every discovered timestep appears in exactly one of `succeeded` and
/// `failed`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub directory: PathBuf,
    pub started_at: DateTime<Utc>,
    pub num_ranks: u32,
    pub workers: usize,
    pub succeeded: BTreeSet<TimestepIndex>,
    pub failed: BTreeMap<TimestepIndex, FailedTimestep>,
    pub removed_frames: usize,
    pub elapsed_secs: f64,
    /// Mean wall time of a single timestep task.
    pub mean_task_ms: f64,
}

impl RunReport {
    /// Report for a run that found nothing to do.
    pub fn empty(directory: PathBuf, started_at: DateTime<Utc>) -> Self {
        Self {
            directory,
            started_at,
            num_ranks: 0,
            workers: 0,
            succeeded: BTreeSet::new(),
            failed: BTreeMap::new(),
            removed_frames: 0,
            elapsed_secs: 0.0,
            mean_task_ms: 0.0,
        }
    }

    /// Fold task outcomes into the report.
    pub fn record(&mut self, outcomes: Vec<TaskOutcome>) {
        let mut total_ms = 0.0;
        let count = outcomes.len();

        for outcome in outcomes {
            total_ms += outcome.elapsed.as_secs_f64() * 1000.0;
            match outcome.result {
                Ok(_) => {
                    self.succeeded.insert(outcome.timestep);
                }
                Err(e) => {
                    self.failed.insert(
                        outcome.timestep,
                        FailedTimestep {
                            kind: e.kind(),
                            message: e.to_string(),
                        },
                    );
                }
            }
        }

        if count > 0 {
            self.mean_task_ms = total_ms / count as f64;
        }
    }

    /// Number of timesteps attempted.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Number of frames written.
    pub fn frames_written(&self) -> usize {
        self.succeeded.len()
    }

    /// True when at least one frame was written and nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.succeeded.is_empty()
    }

    /// Failure counts grouped by error kind.
    pub fn failures_by_kind(&self) -> BTreeMap<ErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for failure in self.failed.values() {
            *counts.entry(failure.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapshot_common::{FrameError, FrameResult};
    use std::time::Duration;

    fn outcome(timestep: TimestepIndex, result: FrameResult<PathBuf>) -> TaskOutcome {
        TaskOutcome {
            timestep,
            result,
            elapsed: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_record_partitions_outcomes() {
        let mut report = RunReport::empty(PathBuf::from("/data"), Utc::now());
        report.record(vec![
            outcome(2, Ok(PathBuf::from("frame_00002.png"))),
            outcome(0, Ok(PathBuf::from("frame_00000.png"))),
            outcome(
                1,
                Err(FrameError::MissingTile {
                    timestep: 1,
                    rank: 1,
                    path: PathBuf::from("output_00001.00001"),
                }),
            ),
        ]);

        assert_eq!(report.succeeded.iter().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(report.failed[&1].kind, ErrorKind::MissingTile);
        assert_eq!(report.total(), 3);
        assert!(!report.is_success());
        assert_eq!(report.failures_by_kind()[&ErrorKind::MissingTile], 1);
        assert!((report.mean_task_ms - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_record_counts_every_outcome_once() {
        let mut report = RunReport::empty(PathBuf::from("/data"), Utc::now());
        report.record(
            (0..6)
                .map(|t| {
                    if t % 3 == 0 {
                        outcome(t, Err(FrameError::Render(format!("timestep {t}"))))
                    } else {
                        outcome(t, Ok(PathBuf::from(format!("frame_{t:05}.png"))))
                    }
                })
                .collect(),
        );

        assert_eq!(report.total(), 6);
        assert_eq!(report.failed.keys().copied().collect::<Vec<_>>(), vec![0, 3]);
        assert!(report.succeeded.is_disjoint(&report.failed.keys().copied().collect()));
    }

    #[test]
    fn test_empty_report_is_not_success() {
        let report = RunReport::empty(PathBuf::from("/data"), Utc::now());
        assert_eq!(report.total(), 0);
        assert!(!report.is_success());
    }

    #[test]
    fn test_json_uses_snake_case_kinds() {
        let mut report = RunReport::empty(PathBuf::from("/data"), Utc::now());
        report.record(vec![outcome(
            4,
            Err(FrameError::Render("bad".to_string())),
        )]);
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["failed"]["4"]["kind"], "io");
    }
}
