use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fbm::Fbm;

/// Slider ranges exposed by the viewer frontend.
pub const CANVAS_SIZE_RANGE: RangeInclusive<u32> = 1..=320;
pub const TILE_SIZE_RANGE: RangeInclusive<u32> = 1..=64;
pub const AMPLITUDE_RANGE: RangeInclusive<f64> = 0.0001..=1.0;
pub const OCTAVES_RANGE: RangeInclusive<i32> = 1..=5;
pub const PERSISTENCE_RANGE: RangeInclusive<f64> = 0.001..=1.0;
pub const LACUNARITY_RANGE: RangeInclusive<f64> = 0.001..=10.0;

/// All tunable parameters of the viewer.
///
/// The slider ranges above are advisory; `validate` only rejects values the
/// noise core cannot work with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Cells per side of the square canvas.
    pub canvas_size: u32,
    /// Screen pixels per cell side.
    pub tile_size: u32,
    /// Scale applied to cell coordinates before the first octave.
    pub amplitude: f64,
    pub octaves: i32,
    pub persistence: f64,
    pub lacunarity: f64,
    /// Signed-normalised FBM when true, raw sum otherwise.
    pub normalize: bool,
    /// Sample the z = `slice` plane of 3D noise instead of 2D noise.
    pub slice: Option<f64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            canvas_size: 110,
            tile_size: 6,
            amplitude: 0.1,
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
            normalize: true,
            slice: None,
        }
    }
}

impl Parameters {
    /// Check every field, returning the layering settings on success.
    pub fn validate(&self) -> Result<Fbm, ConfigError> {
        if !CANVAS_SIZE_RANGE.contains(&self.canvas_size) {
            return Err(ConfigError::InvalidCanvasSize {
                got: self.canvas_size,
                max: *CANVAS_SIZE_RANGE.end(),
            });
        }
        if !TILE_SIZE_RANGE.contains(&self.tile_size) {
            return Err(ConfigError::InvalidTileSize {
                got: self.tile_size,
                max: *TILE_SIZE_RANGE.end(),
            });
        }
        if !(self.amplitude.is_finite() && self.amplitude > 0.0) {
            return Err(ConfigError::InvalidAmplitude(self.amplitude));
        }
        Fbm::new(self.octaves, self.lacunarity, self.persistence)
    }

    /// Names of fields set outside the viewer's slider ranges. Such values
    /// still render; callers only report them.
    pub fn outside_slider_ranges(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !AMPLITUDE_RANGE.contains(&self.amplitude) {
            out.push("amplitude");
        }
        if !OCTAVES_RANGE.contains(&self.octaves) {
            out.push("octaves");
        }
        if !PERSISTENCE_RANGE.contains(&self.persistence) {
            out.push("persistence");
        }
        if !LACUNARITY_RANGE.contains(&self.lacunarity) {
            out.push("lacunarity");
        }
        out
    }

    /// Output image side in pixels.
    pub fn image_size(&self) -> u32 {
        self.canvas_size * self.tile_size
    }
}
