//! Colormaps and the precomputed palette used for indexed frames.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of colormap levels in a palette.
///
/// The last palette slot (index 255) is reserved for invalid values.
pub const LEVELS: usize = 255;

/// Palette index used for NaN or otherwise unmappable values.
pub const BAD_INDEX: u8 = LEVELS as u8;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    fn to_tuple(self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }
}

/// Piecewise-linear channel anchors `(position, intensity)` on `[0, 1]`.
type Channel = &'static [(f32, f32)];

const JET: [Channel; 3] = [
    &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)],
    &[(0.0, 0.0), (0.125, 0.0), (0.375, 1.0), (0.64, 1.0), (0.91, 0.0), (1.0, 0.0)],
    &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)],
];

// Sampled at 0, 0.25, 0.5, 0.75 and 1.
const VIRIDIS: [Channel; 3] = [
    &[(0.0, 0.267), (0.25, 0.231), (0.5, 0.129), (0.75, 0.369), (1.0, 0.992)],
    &[(0.0, 0.004), (0.25, 0.322), (0.5, 0.569), (0.75, 0.788), (1.0, 0.906)],
    &[(0.0, 0.329), (0.25, 0.545), (0.5, 0.549), (0.75, 0.384), (1.0, 0.145)],
];

const GRAYSCALE: [Channel; 3] = [
    &[(0.0, 0.0), (1.0, 1.0)],
    &[(0.0, 0.0), (1.0, 1.0)],
    &[(0.0, 0.0), (1.0, 1.0)],
];

/// Perceptually ordered colormaps available for frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Jet,
    Viridis,
    Grayscale,
}

impl Colormap {
    fn channels(&self) -> &'static [Channel; 3] {
        match self {
            Colormap::Jet => &JET,
            Colormap::Viridis => &VIRIDIS,
            Colormap::Grayscale => &GRAYSCALE,
        }
    }

    /// Color at position `t` in `[0, 1]` (clamped).
    pub fn color_at(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let [r, g, b] = self.channels();
        Color::new(
            channel_byte(r, t),
            channel_byte(g, t),
            channel_byte(b, t),
            255,
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Colormap::Jet => "jet",
            Colormap::Viridis => "viridis",
            Colormap::Grayscale => "grayscale",
        }
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jet" => Ok(Colormap::Jet),
            "viridis" => Ok(Colormap::Viridis),
            "grayscale" | "greyscale" | "gray" | "grey" => Ok(Colormap::Grayscale),
            other => Err(format!("unknown colormap '{other}'")),
        }
    }
}

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn channel_byte(anchors: Channel, t: f32) -> u8 {
    let value = anchors
        .windows(2)
        .find(|w| t <= w[1].0)
        .map(|w| {
            let (x0, y0) = w[0];
            let (x1, y1) = w[1];
            if x1 - x0 <= f32::EPSILON {
                y1
            } else {
                y0 + (y1 - y0) * (t - x0) / (x1 - x0)
            }
        })
        .unwrap_or_else(|| anchors[anchors.len() - 1].1);
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Colormap sampled into [`LEVELS`] entries plus a transparent bad-value slot.
///
/// Computed once per run and shared by every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub colors: Vec<(u8, u8, u8, u8)>,
}

impl Palette {
    pub fn from_colormap(colormap: Colormap) -> Self {
        let mut colors: Vec<(u8, u8, u8, u8)> = (0..LEVELS)
            .map(|i| colormap.color_at(i as f32 / (LEVELS - 1) as f32).to_tuple())
            .collect();
        colors.push(Color::transparent().to_tuple());
        Self { colors }
    }

    /// Palette index for a normalized value.
    ///
    /// Values below 0 or above 1 saturate to the first or last level; NaN maps
    /// to [`BAD_INDEX`].
    #[inline]
    pub fn index_for(&self, normalized: f32) -> u8 {
        if normalized.is_nan() {
            return BAD_INDEX;
        }
        let scaled = (normalized * LEVELS as f32).floor();
        scaled.clamp(0.0, (LEVELS - 1) as f32) as u8
    }

    pub fn color(&self, index: u8) -> (u8, u8, u8, u8) {
        self.colors[index as usize]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
