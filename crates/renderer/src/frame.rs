//! Rendering of a reconstructed frame into a raster image.

use assembler::GlobalFrame;
use tracing::debug;

use crate::colormap::Palette;
use crate::error::{RenderError, RenderResult};
use crate::gradient::render_indices;
use crate::png::create_png_from_palette;
use crate::style::RenderConfig;

/// Variable rendered from every frame (density).
pub const DENSITY_VARIABLE: usize = 0;

/// Encoded raster of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub width: usize,
    pub height: usize,
    /// PNG file content.
    pub bytes: Vec<u8>,
}

/// Renders frames with a fixed configuration and precomputed palette.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    config: RenderConfig,
    palette: Palette,
}

impl FrameRenderer {
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        let palette = Palette::from_colormap(config.colormap);
        Ok(Self { config, palette })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Render the density variable of `frame`.
    pub fn render(&self, frame: &GlobalFrame) -> RenderResult<RenderedImage> {
        let (width, height) = (frame.width(), frame.height());
        if width == 0 || height == 0 || frame.num_vars() == 0 {
            return Err(RenderError::EmptyFrame { width, height });
        }

        let indices = render_indices(
            frame.variable(DENSITY_VARIABLE),
            width,
            height,
            &self.config,
            &self.palette,
        );
        let bytes = create_png_from_palette(&indices, width, height, &self.palette)?;
        debug!(width, height, bytes = bytes.len(), "Rendered frame");

        Ok(RenderedImage {
            width,
            height,
            bytes,
        })
    }
}

/// Render a single frame with `config`.
pub fn render(frame: &GlobalFrame, config: &RenderConfig) -> RenderResult<RenderedImage> {
    FrameRenderer::new(config.clone())?.render(frame)
}
