//! Raster rendering of reconstructed simulation frames.
//!
//! The first variable of a [`assembler::GlobalFrame`] (density) is taken to
//! base-10 logarithm, clamped to `[vmin, vmax]` and mapped through a fixed
//! colormap into an indexed PNG.
//!
//! - [`colormap`]: colormap definitions and the precomputed palette
//! - [`gradient`]: value to palette-index mapping
//! - [`png`]: PNG encoding
//! - [`frame`]: the frame renderer tying these together

pub mod colormap;
pub mod error;
pub mod frame;
pub mod gradient;
pub mod png;
pub mod style;

pub use colormap::{Color, Colormap, Palette};
pub use error::{RenderError, RenderResult};
pub use frame::{render, FrameRenderer, RenderedImage};
pub use style::{Origin, RenderConfig};
