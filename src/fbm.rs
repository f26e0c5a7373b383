use crate::error::ConfigError;
use crate::simplex::Simplex;

/// Validated fractal Brownian motion settings.
///
/// Construction is the only place a configuration can be rejected; once an
/// `Fbm` exists every sampling call is total.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fbm {
    octaves: u32,
    lacunarity: f64,
    persistence: f64,
}

impl Fbm {
    pub fn new(octaves: i32, lacunarity: f64, persistence: f64) -> Result<Self, ConfigError> {
        if octaves < 1 {
            return Err(ConfigError::InvalidOctaveCount(octaves));
        }
        if !(lacunarity.is_finite() && lacunarity > 0.0) {
            return Err(ConfigError::InvalidLacunarity(lacunarity));
        }
        if !(persistence.is_finite() && persistence > 0.0) {
            return Err(ConfigError::InvalidPersistence(persistence));
        }
        Ok(Self {
            octaves: octaves as u32,
            lacunarity,
            persistence,
        })
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn lacunarity(&self) -> f64 {
        self.lacunarity
    }

    pub fn persistence(&self) -> f64 {
        self.persistence
    }

    /// Sum `octaves` layers, lowest frequency first. `layer` receives the
    /// octave's frequency. Frequency and amplitude are stepped by repeated
    /// multiplication, never `powi`, so results are bit-reproducible.
    /// Returns `(total, amplitude_sum)`.
    #[inline]
    fn accumulate(&self, mut layer: impl FnMut(f64) -> f64) -> (f64, f64) {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_amplitude = 0.0;
        for _ in 0..self.octaves {
            total += layer(frequency) * amplitude;
            max_amplitude += amplitude;
            frequency *= self.lacunarity;
            amplitude *= self.persistence;
        }
        (total, max_amplitude)
    }

    /// Unnormalised sum; its range grows with the octave count.
    pub fn raw2(&self, noise: &Simplex, x: f64, y: f64) -> f64 {
        self.accumulate(|f| noise.sample2(x * f, y * f)).0
    }

    /// Sum divided by the amplitudes actually added, keeping the kernel's
    /// [-1, 1] bound for any octave count.
    pub fn signed2(&self, noise: &Simplex, x: f64, y: f64) -> f64 {
        let (total, max) = self.accumulate(|f| noise.sample2(x * f, y * f));
        total / max
    }

    pub fn raw3(&self, noise: &Simplex, x: f64, y: f64, z: f64) -> f64 {
        self.accumulate(|f| noise.sample3(x * f, y * f, z * f)).0
    }

    pub fn signed3(&self, noise: &Simplex, x: f64, y: f64, z: f64) -> f64 {
        let (total, max) = self.accumulate(|f| noise.sample3(x * f, y * f, z * f));
        total / max
    }

    pub fn raw4(&self, noise: &Simplex, x: f64, y: f64, z: f64, w: f64) -> f64 {
        self.accumulate(|f| noise.sample4(x * f, y * f, z * f, w * f)).0
    }

    pub fn signed4(&self, noise: &Simplex, x: f64, y: f64, z: f64, w: f64) -> f64 {
        let (total, max) = self.accumulate(|f| noise.sample4(x * f, y * f, z * f, w * f));
        total / max
    }
}

/// Raw 2D FBM, validating the layering configuration first.
pub fn fbm2d(
    noise: &Simplex,
    x: f64,
    y: f64,
    octaves: i32,
    lacunarity: f64,
    persistence: f64,
) -> Result<f64, ConfigError> {
    Ok(Fbm::new(octaves, lacunarity, persistence)?.raw2(noise, x, y))
}

/// Signed-normalised 2D FBM, validating the layering configuration first.
pub fn signed_fbm2d(
    noise: &Simplex,
    x: f64,
    y: f64,
    octaves: i32,
    lacunarity: f64,
    persistence: f64,
) -> Result<f64, ConfigError> {
    Ok(Fbm::new(octaves, lacunarity, persistence)?.signed2(noise, x, y))
}
