use rayon::prelude::*;

use crate::config::Parameters;
use crate::fbm::Fbm;
use crate::grid::Grid;
use crate::simplex::Simplex;

/// How octave sums are reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalization {
    /// Divided by the accumulated amplitude, within roughly [-1, 1].
    Signed,
    /// Plain sum.
    Raw,
}

/// A rectangular block of cells to evaluate.
///
/// Cell `(x, y)` is sampled at `((x + pan_x) * scale, (y + pan_y) * scale)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub width: usize,
    pub height: usize,
    pub pan_x: i64,
    pub pan_y: i64,
    pub scale: f64,
    /// z coordinate for 3D noise; `None` samples 2D noise.
    pub slice: Option<f64>,
}

impl Region {
    /// The viewer's square canvas, panned by `(pan_x, pan_y)` cells.
    pub fn canvas(params: &Parameters, pan_x: i64, pan_y: i64) -> Self {
        Self {
            width: params.canvas_size as usize,
            height: params.canvas_size as usize,
            pan_x,
            pan_y,
            scale: params.amplitude,
            slice: params.slice,
        }
    }

    /// Offsets are added in floating point, so any pan is accepted; exact
    /// while `|x + pan_x|` stays below 2^53.
    #[inline]
    pub fn coord(&self, x: usize, y: usize) -> (f64, f64) {
        (
            (x as f64 + self.pan_x as f64) * self.scale,
            (y as f64 + self.pan_y as f64) * self.scale,
        )
    }
}

/// One FBM sample at already-scaled coordinates.
#[inline]
pub fn sample_point(
    noise: &Simplex,
    fbm: &Fbm,
    mode: Normalization,
    x: f64,
    y: f64,
    slice: Option<f64>,
) -> f64 {
    match (slice, mode) {
        (None, Normalization::Signed) => fbm.signed2(noise, x, y),
        (None, Normalization::Raw) => fbm.raw2(noise, x, y),
        (Some(z), Normalization::Signed) => fbm.signed3(noise, x, y, z),
        (Some(z), Normalization::Raw) => fbm.raw3(noise, x, y, z),
    }
}

/// Evaluate every cell of `region`. Rows are split across the rayon pool;
/// the kernel is shared read-only.
pub fn sample_region(
    noise: &Simplex,
    fbm: &Fbm,
    region: &Region,
    mode: Normalization,
) -> Grid<f64> {
    let mut grid: Grid<f64> = Grid::new(region.width, region.height);
    if region.width == 0 || region.height == 0 {
        return grid;
    }

    grid.data
        .par_chunks_mut(region.width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                let (sx, sy) = region.coord(x, y);
                *cell = sample_point(noise, fbm, mode, sx, sy, region.slice);
            }
        });

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(width: usize, height: usize) -> Region {
        Region {
            width,
            height,
            pan_x: 0,
            pan_y: 0,
            scale: 0.1,
            slice: None,
        }
    }

    #[test]
    fn cells_match_pointwise_samples() {
        let noise = Simplex::new();
        let fbm = Fbm::new(3, 2.0, 0.5).unwrap();
        let r = Region {
            pan_x: -7,
            pan_y: 12,
            ..region(9, 5)
        };
        let grid = sample_region(&noise, &fbm, &r, Normalization::Signed);
        assert_eq!((grid.w, grid.h), (9, 5));
        for y in 0..5 {
            for x in 0..9 {
                let sx = (x as i64 - 7) as f64 * 0.1;
                let sy = (y as i64 + 12) as f64 * 0.1;
                assert_eq!(grid.get(x, y), fbm.signed2(&noise, sx, sy));
            }
        }
    }

    #[test]
    fn panning_shifts_the_field() {
        let noise = Simplex::new();
        let fbm = Fbm::new(2, 2.0, 0.5).unwrap();
        let base = sample_region(&noise, &fbm, &region(6, 6), Normalization::Raw);
        let panned = sample_region(
            &noise,
            &fbm,
            &Region {
                pan_x: 2,
                pan_y: 1,
                ..region(6, 6)
            },
            Normalization::Raw,
        );
        for y in 0..5 {
            for x in 0..4 {
                assert_eq!(panned.get(x, y), base.get(x + 2, y + 1));
            }
        }
    }

    #[test]
    fn slice_uses_three_dimensions() {
        let noise = Simplex::new();
        let fbm = Fbm::new(1, 2.0, 0.5).unwrap();
        let r = Region {
            slice: Some(0.75),
            ..region(4, 4)
        };
        let grid = sample_region(&noise, &fbm, &r, Normalization::Signed);
        let (x, y) = r.coord(3, 2);
        assert_eq!(grid.get(3, 2), noise.sample3(x, y, 0.75));
    }

    #[test]
    fn extreme_pan_does_not_overflow() {
        let noise = Simplex::new();
        let fbm = Fbm::new(3, 2.0, 0.5).unwrap();
        let r = Region {
            pan_x: i64::MAX,
            pan_y: i64::MIN,
            ..region(4, 4)
        };
        let grid = sample_region(&noise, &fbm, &r, Normalization::Signed);
        assert!(grid.data.iter().all(|v| v.is_finite()));
        let (x, y) = r.coord(3, 3);
        assert!(x > 9.0e17 && y < -9.0e17);
    }

    #[test]
    fn empty_region_is_empty_grid() {
        let noise = Simplex::new();
        let fbm = Fbm::new(1, 2.0, 0.5).unwrap();
        let grid = sample_region(&noise, &fbm, &region(0, 3), Normalization::Signed);
        assert!(grid.data.is_empty());
    }

    #[test]
    fn canvas_follows_parameters() {
        let params = Parameters {
            canvas_size: 20,
            amplitude: 0.05,
            slice: Some(2.0),
            ..Parameters::default()
        };
        let r = Region::canvas(&params, 3, -4);
        assert_eq!((r.width, r.height), (20, 20));
        assert_eq!(r.coord(0, 0), (3.0 * 0.05, -4.0 * 0.05));
        assert_eq!(r.slice, Some(2.0));
    }
}
