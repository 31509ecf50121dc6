//! Render configuration shared by every frame of a run.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::colormap::Colormap;
use crate::error::{RenderError, RenderResult};

/// Lower clamp bound of log10(density).
pub const DEFAULT_VMIN: f32 = -3.308183;

/// Upper clamp bound of log10(density).
pub const DEFAULT_VMAX: f32 = 1.5684958;

/// Vertical placement of grid row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Row 0 is drawn at the bottom of the image.
    #[default]
    Lower,
    /// Row 0 is drawn at the top of the image.
    Upper,
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lower" => Ok(Origin::Lower),
            "upper" => Ok(Origin::Upper),
            other => Err(format!("unknown origin '{other}'")),
        }
    }
}

/// Colormap and clamp range applied to log10(density).
///
/// Values outside `[vmin, vmax]` saturate to the colormap extremes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub colormap: Colormap,
    pub vmin: f32,
    pub vmax: f32,
    pub origin: Origin,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            colormap: Colormap::Jet,
            vmin: DEFAULT_VMIN,
            vmax: DEFAULT_VMAX,
            origin: Origin::Lower,
        }
    }
}

impl RenderConfig {
    /// Load render configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> RenderResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load render configuration from file
    pub fn from_file(path: &Path) -> RenderResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> RenderResult<()> {
        if !self.vmin.is_finite() || !self.vmax.is_finite() {
            return Err(RenderError::InvalidConfig(format!(
                "clamp range must be finite, got [{}, {}]",
                self.vmin, self.vmax
            )));
        }
        if self.vmin >= self.vmax {
            return Err(RenderError::InvalidConfig(format!(
                "vmin ({}) must be below vmax ({})",
                self.vmin, self.vmax
            )));
        }
        Ok(())
    }

    /// Map log10(value) onto `[0, 1]` within the clamp range (unclamped).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        (value.log10() - self.vmin) / (self.vmax - self.vmin)
    }
}
