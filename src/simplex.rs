use tracing::trace;

use crate::rng;

/// Ken Perlin's reference permutation of 0..=255.
const PERLIN: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186,
    3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206, 59,
    227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163, 70,
    221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Midpoints of the 12 cube edges. The 2D kernel uses the x/y components.
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Midpoints of the 32 edges of a tesseract.
const GRAD4: [[f64; 4]; 32] = [
    [0.0, 1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, -1.0],
    [0.0, 1.0, -1.0, 1.0],
    [0.0, 1.0, -1.0, -1.0],
    [0.0, -1.0, 1.0, 1.0],
    [0.0, -1.0, 1.0, -1.0],
    [0.0, -1.0, -1.0, 1.0],
    [0.0, -1.0, -1.0, -1.0],
    [1.0, 0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, -1.0],
    [1.0, 0.0, -1.0, 1.0],
    [1.0, 0.0, -1.0, -1.0],
    [-1.0, 0.0, 1.0, 1.0],
    [-1.0, 0.0, 1.0, -1.0],
    [-1.0, 0.0, -1.0, 1.0],
    [-1.0, 0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, -1.0],
    [1.0, -1.0, 0.0, 1.0],
    [1.0, -1.0, 0.0, -1.0],
    [-1.0, 1.0, 0.0, 1.0],
    [-1.0, 1.0, 0.0, -1.0],
    [-1.0, -1.0, 0.0, 1.0],
    [-1.0, -1.0, 0.0, -1.0],
    [1.0, 1.0, 1.0, 0.0],
    [1.0, 1.0, -1.0, 0.0],
    [1.0, -1.0, 1.0, 0.0],
    [1.0, -1.0, -1.0, 0.0],
    [-1.0, 1.0, 1.0, 0.0],
    [-1.0, 1.0, -1.0, 0.0],
    [-1.0, -1.0, 1.0, 0.0],
    [-1.0, -1.0, -1.0, 0.0],
];

// Skew / unskew factors: F = (sqrt(n + 1) - 1) / n, G = (n + 1 - sqrt(n + 1)) / (n * (n + 1)).
const F2: f64 = 0.3660254037844386;
const G2: f64 = 0.21132486540518713;
const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;
const F4: f64 = 0.30901699437494745;
const G4: f64 = 0.1381966011250105;

// Squared contribution radius and output scale per dimension.
const RADIUS2: f64 = 0.5;
const SCALE2: f64 = 70.0;
const RADIUS3: f64 = 0.6;
const SCALE3: f64 = 32.0;
const RADIUS4: f64 = 0.6;
const SCALE4: f64 = 27.0;

/// A permutation of 0..=255, stored twice so chained lookups never need a
/// second wrap.
#[derive(Clone, PartialEq, Eq)]
pub struct PermutationTable {
    perm: [u8; 512],
}

impl PermutationTable {
    /// Perlin's canonical table. Golden values are recorded against it.
    pub fn reference() -> Self {
        Self::from_permutation(PERLIN)
    }

    /// Shuffle 0..=255 with a seeded splitmix64 stream.
    pub fn from_seed(seed: u64) -> Self {
        let base = rng::shuffled_bytes(seed);
        trace!(seed, "built seeded permutation table");
        Self::from_permutation(base)
    }

    fn from_permutation(base: [u8; 256]) -> Self {
        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&base);
        perm[256..].copy_from_slice(&base);
        Self { perm }
    }

    /// The 256 distinct entries.
    pub fn entries(&self) -> &[u8] {
        &self.perm[..256]
    }

    #[inline]
    fn at(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    #[inline]
    fn hash2(&self, i: usize, j: usize) -> usize {
        self.at(self.at(i) + j)
    }

    #[inline]
    fn hash3(&self, i: usize, j: usize, k: usize) -> usize {
        self.at(self.hash2(i, j) + k)
    }

    #[inline]
    fn hash4(&self, i: usize, j: usize, k: usize, l: usize) -> usize {
        self.at(self.hash3(i, j, k) + l)
    }
}

impl std::fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationTable")
            .field("head", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

/// Lattice coordinate masked into the table range. Saturating float to int
/// casts keep huge inputs in range too.
#[inline]
fn wrap(v: f64) -> usize {
    ((v as i64) & 255) as usize
}

#[inline]
fn corner2(g: usize, x: f64, y: f64) -> f64 {
    let t = RADIUS2 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let grad = &GRAD3[g];
        let t = t * t;
        t * t * (grad[0] * x + grad[1] * y)
    }
}

#[inline]
fn corner3(g: usize, x: f64, y: f64, z: f64) -> f64 {
    let t = RADIUS3 - x * x - y * y - z * z;
    if t < 0.0 {
        0.0
    } else {
        let grad = &GRAD3[g];
        let t = t * t;
        t * t * (grad[0] * x + grad[1] * y + grad[2] * z)
    }
}

#[inline]
fn corner4(g: usize, x: f64, y: f64, z: f64, w: f64) -> f64 {
    let t = RADIUS4 - x * x - y * y - z * z - w * w;
    if t < 0.0 {
        0.0
    } else {
        let grad = &GRAD4[g];
        let t = t * t;
        t * t * (grad[0] * x + grad[1] * y + grad[2] * z + grad[3] * w)
    }
}

/// Simplex gradient noise over an immutable permutation table.
///
/// Every `sample*` call is a pure function of its arguments and the table, so
/// one instance can be shared by reference across any number of threads.
/// Outputs stay within roughly [-1, 1]. NaN or infinite inputs yield NaN, as
/// do finite inputs whose skewed coordinate overflows `f64` (components
/// within a factor of about 1.4 of `f64::MAX`).
#[derive(Clone, Debug)]
pub struct Simplex {
    table: PermutationTable,
}

impl Default for Simplex {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplex {
    /// Kernel over the reference table.
    pub fn new() -> Self {
        Self::from_table(PermutationTable::reference())
    }

    /// Kernel over a table shuffled from `seed`; distinct seeds give
    /// independent fields.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_table(PermutationTable::from_seed(seed))
    }

    pub fn from_table(table: PermutationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PermutationTable {
        &self.table
    }

    /// 2D simplex noise.
    pub fn sample2(&self, x: f64, y: f64) -> f64 {
        // Skew into the triangular lattice and find the containing cell.
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Lower triangle (x0 > y0) steps along x first, upper along y.
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = wrap(i);
        let jj = wrap(j);
        let g0 = self.table.hash2(ii, jj) % 12;
        let g1 = self.table.hash2(ii + i1, jj + j1) % 12;
        let g2 = self.table.hash2(ii + 1, jj + 1) % 12;

        let n0 = corner2(g0, x0, y0);
        let n1 = corner2(g1, x1, y1);
        let n2 = corner2(g2, x2, y2);
        SCALE2 * (n0 + n1 + n2)
    }

    /// 3D simplex noise.
    pub fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Offsets of the second and third corners, picked by ranking x0, y0, z0.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f64 + G3;
        let y1 = y0 - j1 as f64 + G3;
        let z1 = z0 - k1 as f64 + G3;
        let x2 = x0 - i2 as f64 + 2.0 * G3;
        let y2 = y0 - j2 as f64 + 2.0 * G3;
        let z2 = z0 - k2 as f64 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let ii = wrap(i);
        let jj = wrap(j);
        let kk = wrap(k);
        let g0 = self.table.hash3(ii, jj, kk) % 12;
        let g1 = self.table.hash3(ii + i1, jj + j1, kk + k1) % 12;
        let g2 = self.table.hash3(ii + i2, jj + j2, kk + k2) % 12;
        let g3 = self.table.hash3(ii + 1, jj + 1, kk + 1) % 12;

        let n0 = corner3(g0, x0, y0, z0);
        let n1 = corner3(g1, x1, y1, z1);
        let n2 = corner3(g2, x2, y2, z2);
        let n3 = corner3(g3, x3, y3, z3);
        SCALE3 * (n0 + n1 + n2 + n3)
    }

    /// 4D simplex noise.
    pub fn sample4(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
        let s = (x + y + z + w) * F4;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let l = (w + s).floor();
        let t = (i + j + k + l) * G4;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);
        let w0 = w - (l - t);

        // Rank each axis by how many others it beats; the simplex walks
        // the axes from highest rank to lowest.
        let mut rank = [0u8; 4];
        let d = [x0, y0, z0, w0];
        for a in 0..4 {
            for b in (a + 1)..4 {
                if d[a] > d[b] {
                    rank[a] += 1;
                } else {
                    rank[b] += 1;
                }
            }
        }
        let step = |threshold: u8| -> [usize; 4] {
            [
                (rank[0] >= threshold) as usize,
                (rank[1] >= threshold) as usize,
                (rank[2] >= threshold) as usize,
                (rank[3] >= threshold) as usize,
            ]
        };
        let c1 = step(3);
        let c2 = step(2);
        let c3 = step(1);

        let ii = wrap(i);
        let jj = wrap(j);
        let kk = wrap(k);
        let ll = wrap(l);

        let mut total = corner4(self.table.hash4(ii, jj, kk, ll) % 32, x0, y0, z0, w0);
        for (n, c) in [(1.0, c1), (2.0, c2), (3.0, c3)] {
            let g = self.table.hash4(ii + c[0], jj + c[1], kk + c[2], ll + c[3]) % 32;
            total += corner4(
                g,
                x0 - c[0] as f64 + n * G4,
                y0 - c[1] as f64 + n * G4,
                z0 - c[2] as f64 + n * G4,
                w0 - c[3] as f64 + n * G4,
            );
        }
        let g = self.table.hash4(ii + 1, jj + 1, kk + 1, ll + 1) % 32;
        total += corner4(
            g,
            x0 - 1.0 + 4.0 * G4,
            y0 - 1.0 + 4.0 * G4,
            z0 - 1.0 + 4.0 * G4,
            w0 - 1.0 + 4.0 * G4,
        );
        SCALE4 * total
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn reference_table_is_a_permutation() {
        let mut seen = [false; 256];
        for &v in PermutationTable::reference().entries() {
            assert!(!seen[v as usize], "duplicate entry {v}");
            seen[v as usize] = true;
        }
    }

    #[test]
    fn seeded_tables_are_permutations_and_differ() {
        let a = PermutationTable::from_seed(1);
        let b = PermutationTable::from_seed(2);
        assert_eq!(a, PermutationTable::from_seed(1));
        assert_ne!(a, b);
        let mut sorted = a.entries().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..=255u8).collect::<Vec<_>>());
    }

    #[test]
    fn doubled_half_mirrors_first() {
        let t = PermutationTable::from_seed(5);
        assert_eq!(&t.perm[..256], &t.perm[256..]);
    }

    #[test]
    fn origin_is_zero() {
        // Only the origin corner is in range, and its offset is zero.
        assert_eq!(Simplex::new().sample2(0.0, 0.0), 0.0);
    }

    #[test]
    fn off_lattice_values() {
        let noise = Simplex::new();
        assert_abs_diff_eq!(noise.sample3(0.5, 1.25, -2.75), -0.7849538323045268, epsilon = 1e-12);
        assert_abs_diff_eq!(
            noise.sample4(0.5, 1.25, -2.75, 3.1),
            -0.38509529720295166,
            epsilon = 1e-12
        );
    }

    #[test]
    fn huge_coordinates_stay_finite() {
        let noise = Simplex::new();
        for &(x, y) in &[(1e9 + 0.3, -3e9 + 0.7), (1e15, 1e15), (-1e300, 4.0)] {
            let v = noise.sample2(x, y);
            assert!(v.is_finite(), "({x}, {y}) -> {v}");
        }
        assert!(noise.sample3(-1e300, 4.0, 2.0).is_finite());
        assert!(noise.sample4(-1e300, 4.0, 2.0, 1.0).is_finite());
        assert_abs_diff_eq!(noise.sample2(1e9 + 0.3, -3e9 + 0.7), -0.6534485770934694, epsilon = 1e-6);
    }

    #[test]
    fn skew_overflow_is_nan() {
        let noise = Simplex::new();
        assert!(noise.sample2(f64::MAX, 0.5).is_nan());
        assert!(noise.sample2(1e308, 1e308).is_nan());
        assert!(noise.sample3(f64::MAX, 0.0, 0.0).is_nan());
        assert!(noise.sample4(0.0, f64::MAX, 0.0, 0.0).is_nan());
        assert!(noise.sample2(f64::INFINITY, 0.0).is_nan());
    }

    #[test]
    fn nan_propagates() {
        let noise = Simplex::new();
        assert!(noise.sample2(f64::NAN, 1.0).is_nan());
        assert!(noise.sample3(0.0, f64::NAN, 1.0).is_nan());
        assert!(noise.sample4(0.0, 0.0, 0.0, f64::NAN).is_nan());
    }

    #[test]
    fn higher_dimensions_bounded() {
        let noise = Simplex::with_seed(11);
        let mut x = 0.123;
        for step in 0..20_000 {
            x += 0.731;
            let y = step as f64 * 0.377 - 900.0;
            let z = (step % 97) as f64 * 1.913;
            let v3 = noise.sample3(x, y, z);
            let v4 = noise.sample4(x, y, z, -x * 0.5);
            assert!(v3.abs() <= 1.05, "sample3 out of range: {v3}");
            assert!(v4.abs() <= 1.05, "sample4 out of range: {v4}");
        }
    }
}
