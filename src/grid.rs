/// A sampled noise field: one scalar per canvas cell, stored row-major so
/// rows can be handed to rayon as contiguous chunks.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }
}

impl Grid<f64> {
    /// Smallest and largest finite values, or `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_layout() {
        let mut g = Grid::<f64>::new(3, 2);
        g.data[5] = 7.0;
        assert_eq!(g.idx(2, 1), 5);
        assert_eq!(g.get(2, 1), 7.0);
        assert_eq!(g.get(1, 1), 0.0);
    }

    #[test]
    fn finite_range_skips_nan() {
        let g = Grid {
            data: vec![f64::NAN, -0.5, 0.25, f64::INFINITY],
            w: 2,
            h: 2,
        };
        assert_eq!(g.finite_range(), Some((-0.5, 0.25)));
        let empty = Grid {
            data: vec![f64::NAN],
            w: 1,
            h: 1,
        };
        assert_eq!(empty.finite_range(), None);
    }
}
