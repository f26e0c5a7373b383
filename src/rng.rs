//! Seed source for shuffled permutation tables. Runs once per kernel, never
//! inside the sampling loop.

/// One splitmix64 step; the output doubles as the next state.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// The bytes 0..=255 in the Fisher-Yates order drawn from `seed`.
pub fn shuffled_bytes(seed: u64) -> [u8; 256] {
    let mut bytes: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut state = seed;
    for i in (1..bytes.len()).rev() {
        state = splitmix64(state);
        let j = (state % (i as u64 + 1)) as usize;
        bytes.swap(i, j);
    }
    bytes
}
