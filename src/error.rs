use thiserror::Error;

/// Rejected configuration. Raised before any sampling begins; the sampling
/// path itself never fails.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("octave count must be at least 1, got {0}")]
    InvalidOctaveCount(i32),
    #[error("lacunarity must be a positive finite number, got {0}")]
    InvalidLacunarity(f64),
    #[error("persistence must be a positive finite number, got {0}")]
    InvalidPersistence(f64),
    #[error("amplitude must be a positive finite number, got {0}")]
    InvalidAmplitude(f64),
    #[error("canvas size must be between 1 and {max}, got {got}")]
    InvalidCanvasSize { got: u32, max: u32 },
    #[error("tile size must be between 1 and {max}, got {got}")]
    InvalidTileSize { got: u32, max: u32 },
}
