//! Synthetic payload generators.
//!
//! Values are predictable so that stitching can be verified element by
//! element after decoding and assembly.

/// Value stored at `(var, y, global_x)` by [`create_test_tile`].
///
/// ```
/// use test_utils::encoded_value;
///
/// assert_eq!(encoded_value(0, 0, 0), 0.0);
/// assert_eq!(encoded_value(1, 2, 3), 1_002_003.0);
/// ```
pub fn encoded_value(var: usize, y: usize, global_x: usize) -> f32 {
    (var * 1_000_000 + y * 1000 + global_x) as f32
}

/// Creates a tile payload whose values encode their global position.
///
/// The payload is laid out `(nvar, ny, nx)`; `x_offset` is the global column
/// of the tile's first column.
pub fn create_test_tile(nx: usize, ny: usize, nvar: usize, x_offset: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(nx * ny * nvar);
    for var in 0..nvar {
        for y in 0..ny {
            for x in 0..nx {
                data.push(encoded_value(var, y, x_offset + x));
            }
        }
    }
    data
}

/// Creates a density-like tile spanning roughly `1e-3..1e1.5` across the
/// global width, with a mild vertical modulation.
///
/// Variables past the first hold constant filler values.
pub fn create_density_tile(
    nx: usize,
    ny: usize,
    nvar: usize,
    x_offset: usize,
    total_width: usize,
) -> Vec<f32> {
    let mut data = Vec::with_capacity(nx * ny * nvar);
    for var in 0..nvar {
        for y in 0..ny {
            for x in 0..nx {
                if var == 0 {
                    let gx = (x_offset + x) as f32 / total_width.max(1) as f32;
                    let gy = y as f32 / ny.max(1) as f32;
                    let exponent = -3.0 + 4.5 * gx + 0.25 * (gy - 0.5);
                    data.push(10f32.powf(exponent));
                } else {
                    data.push(var as f32);
                }
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_tile_layout() {
        let tile = create_test_tile(3, 2, 2, 10);
        assert_eq!(tile.len(), 12);
        assert_eq!(tile[0], encoded_value(0, 0, 10));
        assert_eq!(tile[4], encoded_value(0, 1, 11));
        assert_eq!(tile[6], encoded_value(1, 0, 10));
    }

    #[test]
    fn test_density_tile_is_positive() {
        let tile = create_density_tile(8, 4, 2, 0, 8);
        assert!(tile.iter().all(|&v| v > 0.0));
    }
}
