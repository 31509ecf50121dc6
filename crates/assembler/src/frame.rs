//! The reconstructed full-domain field of one timestep.

use snapshot_common::{FormatError, RankIndex};
use snapshot_parser::Snapshot;

/// Full-domain field with logical shape `(nvar, ny, nx)`.
///
/// Laid out like a [`Snapshot`] payload, with `nx` the sum of all tile widths.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalFrame {
    pub time: f32,
    pub gamma: f32,
    pub step: i32,
    nvar: usize,
    ny: usize,
    nx: usize,
    tile_widths: Vec<usize>,
    data: Vec<f32>,
}

impl GlobalFrame {
    /// Logical shape `(nvar, ny, nx)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nvar, self.ny, self.nx)
    }

    pub fn width(&self) -> usize {
        self.nx
    }

    pub fn height(&self) -> usize {
        self.ny
    }

    pub fn num_vars(&self) -> usize {
        self.nvar
    }

    /// Width of each contributing tile, in rank order.
    pub fn tile_widths(&self) -> &[usize] {
        &self.tile_widths
    }

    /// All values of one variable, row-major `(ny, nx)`.
    pub fn variable(&self, var: usize) -> &[f32] {
        let plane = self.nx * self.ny;
        &self.data[var * plane..(var + 1) * plane]
    }

    pub fn value(&self, var: usize, y: usize, x: usize) -> f32 {
        self.data[(var * self.ny + y) * self.nx + x]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// Concatenate rank tiles along x, rank 0 leftmost.
///
/// Every tile must share `ny`, `nvar` and `step` with the first one and
/// have non-zero extent.
pub fn stitch(tiles: &[Snapshot]) -> Result<GlobalFrame, FormatError> {
    let Some(first) = tiles.first() else {
        return Ok(GlobalFrame {
            time: 0.0,
            gamma: 0.0,
            step: 0,
            nvar: 0,
            ny: 0,
            nx: 0,
            tile_widths: Vec::new(),
            data: Vec::new(),
        });
    };

    for (rank, tile) in tiles.iter().enumerate() {
        if tile.nx == 0 || tile.ny == 0 || tile.nvar == 0 {
            return Err(FormatError::EmptyTile {
                rank: rank as RankIndex,
                nx: tile.nx,
                ny: tile.ny,
                nvar: tile.nvar,
            });
        }
    }

    for (rank, tile) in tiles.iter().enumerate().skip(1) {
        check_matches(rank as RankIndex, "ny", first.ny, tile.ny)?;
        check_matches(rank as RankIndex, "nvar", first.nvar, tile.nvar)?;
        check_matches(rank as RankIndex, "step", first.step, tile.step)?;
    }

    let (nvar, ny) = (first.num_vars(), first.height());
    let tile_widths: Vec<usize> = tiles.iter().map(Snapshot::width).collect();
    let nx: usize = tile_widths.iter().sum();

    let mut data = Vec::with_capacity(nvar * ny * nx);
    for var in 0..nvar {
        for y in 0..ny {
            for tile in tiles {
                data.extend_from_slice(tile.row(var, y));
            }
        }
    }

    Ok(GlobalFrame {
        time: first.time,
        gamma: first.gamma,
        step: first.step,
        nvar,
        ny,
        nx,
        tile_widths,
        data,
    })
}

fn check_matches(
    rank: RankIndex,
    field: &'static str,
    expected: i32,
    found: i32,
) -> Result<(), FormatError> {
    if expected != found {
        return Err(FormatError::TileMismatch {
            rank,
            field,
            expected,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(nx: i32, ny: i32, nvar: i32, step: i32, base: f32) -> Snapshot {
        let len = (nx * ny * nvar) as usize;
        let payload = (0..len).map(|i| base + i as f32).collect();
        Snapshot::new(0.5, 1.4, (nx, ny, nvar), step, payload).unwrap()
    }

    #[test]
    fn test_single_tile_is_identity() {
        let t = tile(3, 2, 2, 0, 0.0);
        let frame = stitch(std::slice::from_ref(&t)).unwrap();
        assert_eq!(frame.shape(), (2, 2, 3));
        assert_eq!(frame.data(), t.payload.as_slice());
        assert_eq!(frame.time, 0.5);
    }

    #[test]
    fn test_uneven_widths_concatenate_in_rank_order() {
        let left = tile(2, 2, 1, 0, 0.0); // rows [0,1] [2,3]
        let right = tile(3, 2, 1, 0, 100.0); // rows [100,101,102] [103,104,105]
        let frame = stitch(&[left, right]).unwrap();

        assert_eq!(frame.shape(), (1, 2, 5));
        assert_eq!(frame.tile_widths(), &[2, 3]);
        assert_eq!(
            frame.variable(0),
            &[0.0, 1.0, 100.0, 101.0, 102.0, 2.0, 3.0, 103.0, 104.0, 105.0]
        );
    }

    #[test]
    fn test_variables_stay_separate() {
        let a = tile(1, 1, 2, 0, 0.0); // var0=0, var1=1
        let b = tile(1, 1, 2, 0, 10.0); // var0=10, var1=11
        let frame = stitch(&[a, b]).unwrap();
        assert_eq!(frame.variable(0), &[0.0, 10.0]);
        assert_eq!(frame.variable(1), &[1.0, 11.0]);
    }

    #[test]
    fn test_mismatched_height_rejected() {
        let err = stitch(&[tile(2, 2, 1, 0, 0.0), tile(2, 3, 1, 0, 0.0)]).unwrap_err();
        assert_eq!(
            err,
            FormatError::TileMismatch {
                rank: 1,
                field: "ny",
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_mismatched_step_rejected() {
        let err = stitch(&[
            tile(2, 2, 1, 4, 0.0),
            tile(2, 2, 1, 4, 0.0),
            tile(2, 2, 1, 5, 0.0),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            FormatError::TileMismatch {
                rank: 2,
                field: "step",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_extent_tile_rejected() {
        let err = stitch(&[tile(2, 2, 1, 0, 0.0), tile(0, 2, 1, 0, 0.0)]).unwrap_err();
        assert_eq!(
            err,
            FormatError::EmptyTile {
                rank: 1,
                nx: 0,
                ny: 2,
                nvar: 1
            }
        );

        let err = stitch(&[tile(3, 0, 1, 0, 0.0)]).unwrap_err();
        assert!(matches!(err, FormatError::EmptyTile { rank: 0, .. }));
    }

    #[test]
    fn test_mismatched_nvar_rejected() {
        let err = stitch(&[tile(2, 2, 4, 0, 0.0), tile(2, 2, 3, 0, 0.0)]).unwrap_err();
        assert!(matches!(err, FormatError::TileMismatch { field: "nvar", .. }));
    }
}
