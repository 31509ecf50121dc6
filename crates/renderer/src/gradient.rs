//! Mapping of grid values onto palette indices.

use crate::colormap::Palette;
use crate::style::{Origin, RenderConfig};

/// Map a row-major `(height, width)` grid onto palette indices.
///
/// Each value is taken to log10, normalized to the clamp range of `config`
/// and looked up in `palette`. With [`Origin::Lower`] grid row 0 becomes the
/// last image row.
pub fn render_indices(
    data: &[f32],
    width: usize,
    height: usize,
    config: &RenderConfig,
    palette: &Palette,
) -> Vec<u8> {
    let mut indices = vec![0u8; width * height];

    for (y, row) in data.chunks_exact(width).take(height).enumerate() {
        let image_row = match config.origin {
            Origin::Lower => height - 1 - y,
            Origin::Upper => y,
        };
        let out = &mut indices[image_row * width..(image_row + 1) * width];
        for (dst, &value) in out.iter_mut().zip(row) {
            *dst = palette.index_for(config.normalize(value));
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::{Colormap, BAD_INDEX};

    fn config(origin: Origin) -> RenderConfig {
        RenderConfig {
            colormap: Colormap::Grayscale,
            vmin: 0.0,
            vmax: 2.0,
            origin,
        }
    }

    #[test]
    fn test_clamp_and_log_mapping() {
        let palette = Palette::from_colormap(Colormap::Grayscale);
        // log10: -1 (below), 0 (vmin), 1 (mid), 2 (vmax), 3 (above)
        let data = [0.1, 1.0, 10.0, 100.0, 1000.0];
        let indices = render_indices(&data, 5, 1, &config(Origin::Upper), &palette);
        assert_eq!(indices[0], 0);
        assert_eq!(indices[1], 0);
        assert_eq!(indices[2], 127);
        assert_eq!(indices[3], 254);
        assert_eq!(indices[4], 254);
    }

    #[test]
    fn test_invalid_values_use_bad_slot() {
        let palette = Palette::from_colormap(Colormap::Grayscale);
        let data = [-1.0, f32::NAN, 0.0];
        let indices = render_indices(&data, 3, 1, &config(Origin::Upper), &palette);
        assert_eq!(indices[0], BAD_INDEX);
        assert_eq!(indices[1], BAD_INDEX);
        // log10(0) is -inf and saturates low.
        assert_eq!(indices[2], 0);
    }

    #[test]
    fn test_origin_lower_flips_rows() {
        let palette = Palette::from_colormap(Colormap::Grayscale);
        // row 0 low values, row 1 high values
        let data = [1.0, 1.0, 100.0, 100.0];
        let lower = render_indices(&data, 2, 2, &config(Origin::Lower), &palette);
        let upper = render_indices(&data, 2, 2, &config(Origin::Upper), &palette);
        assert_eq!(lower, vec![254, 254, 0, 0]);
        assert_eq!(upper, vec![0, 0, 254, 254]);
    }
}
