//! Configuration for the frame pipeline.

use renderer::{Colormap, RenderConfig};
use serde::{Deserialize, Serialize};
use snapshot_common::{DEFAULT_FRAME_PREFIX, DEFAULT_SNAPSHOT_PREFIX};
use std::str::FromStr;

use crate::error::{PipelineError, Result};

/// Size of the worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerCount {
    /// Exactly this many workers.
    Fixed(usize),
    /// One worker per available processing unit.
    AllAvailable,
}

impl Default for WorkerCount {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

impl WorkerCount {
    /// Number of worker threads to start.
    pub fn resolve(&self) -> usize {
        match self {
            WorkerCount::Fixed(n) => (*n).max(1),
            WorkerCount::AllAvailable => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl FromStr for WorkerCount {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "auto" => Ok(WorkerCount::AllAvailable),
            other => match other.parse::<usize>() {
                Ok(0) => Err("worker count must be > 0".to_string()),
                Ok(n) => Ok(WorkerCount::Fixed(n)),
                Err(_) => Err(format!("invalid worker count '{other}'")),
            },
        }
    }
}

/// Configuration for a pipeline run.
///
/// Built once and shared read-only with every task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// File name prefix of snapshot dumps.
    pub snapshot_prefix: String,

    /// File name prefix of rendered frames.
    pub frame_prefix: String,

    /// Worker pool size.
    pub workers: WorkerCount,

    /// Colormap and clamp range.
    pub render: RenderConfig,

    /// Show a progress bar while rendering.
    pub progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            snapshot_prefix: DEFAULT_SNAPSHOT_PREFIX.to_string(),
            frame_prefix: DEFAULT_FRAME_PREFIX.to_string(),
            workers: WorkerCount::default(),
            render: RenderConfig::default(),
            progress: false,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Recognized keys: `ANIMATOR_WORKERS`, `ANIMATOR_SNAPSHOT_PREFIX`,
    /// `ANIMATOR_FRAME_PREFIX`, `ANIMATOR_COLORMAP`, `ANIMATOR_VMIN`,
    /// `ANIMATOR_VMAX`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("ANIMATOR_WORKERS") {
            config.workers = val.parse().map_err(PipelineError::Config)?;
        }

        if let Some(val) = lookup("ANIMATOR_SNAPSHOT_PREFIX") {
            config.snapshot_prefix = val;
        }

        if let Some(val) = lookup("ANIMATOR_FRAME_PREFIX") {
            config.frame_prefix = val;
        }

        if let Some(val) = lookup("ANIMATOR_COLORMAP") {
            config.render.colormap = val.parse::<Colormap>().map_err(PipelineError::Config)?;
        }

        if let Some(val) = lookup("ANIMATOR_VMIN") {
            config.render.vmin = parse_float("ANIMATOR_VMIN", &val)?;
        }

        if let Some(val) = lookup("ANIMATOR_VMAX") {
            config.render.vmax = parse_float("ANIMATOR_VMAX", &val)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.snapshot_prefix.is_empty() {
            return Err(PipelineError::Config("snapshot_prefix must not be empty".to_string()));
        }
        if self.frame_prefix.is_empty() {
            return Err(PipelineError::Config("frame_prefix must not be empty".to_string()));
        }
        if self.snapshot_prefix == self.frame_prefix {
            return Err(PipelineError::Config(
                "snapshot_prefix and frame_prefix must differ".to_string(),
            ));
        }
        if self.workers == WorkerCount::Fixed(0) {
            return Err(PipelineError::Config("workers must be > 0".to_string()));
        }
        self.render.validate()?;
        Ok(())
    }
}

fn parse_float(key: &str, val: &str) -> Result<f32> {
    val.parse()
        .map_err(|_| PipelineError::Config(format!("{key}: invalid number '{val}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.snapshot_prefix, "output");
        assert_eq!(config.frame_prefix, "frame");
        assert_eq!(config.workers, WorkerCount::Fixed(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_worker_count_parse() {
        assert_eq!("4".parse::<WorkerCount>(), Ok(WorkerCount::Fixed(4)));
        assert_eq!("all".parse::<WorkerCount>(), Ok(WorkerCount::AllAvailable));
        assert!("0".parse::<WorkerCount>().is_err());
        assert!("many".parse::<WorkerCount>().is_err());
    }

    #[test]
    fn test_worker_count_resolve() {
        assert_eq!(WorkerCount::Fixed(3).resolve(), 3);
        assert!(WorkerCount::AllAvailable.resolve() >= 1);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            ("ANIMATOR_WORKERS", "8"),
            ("ANIMATOR_COLORMAP", "viridis"),
            ("ANIMATOR_VMIN", "-2.5"),
            ("ANIMATOR_VMAX", "1.0"),
        ]))
        .unwrap();
        assert_eq!(config.workers, WorkerCount::Fixed(8));
        assert_eq!(config.render.colormap, Colormap::Viridis);
        assert_eq!(config.render.vmin, -2.5);
        assert_eq!(config.render.vmax, 1.0);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(PipelineConfig::from_lookup(lookup_from(&[("ANIMATOR_VMIN", "low")])).is_err());
        assert!(PipelineConfig::from_lookup(lookup_from(&[("ANIMATOR_WORKERS", "0")])).is_err());
        assert!(PipelineConfig::from_lookup(lookup_from(&[
            ("ANIMATOR_VMIN", "3"),
            ("ANIMATOR_VMAX", "1"),
        ]))
        .is_err());
    }

    #[test]
    fn test_same_prefixes_rejected() {
        let config = PipelineConfig {
            frame_prefix: "output".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }
}
