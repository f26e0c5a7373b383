pub mod config;
pub mod error;
pub mod fbm;
pub mod field;
pub mod grid;
pub mod render;
pub mod rng;
pub mod simplex;

use std::time::Instant;

use tracing::{debug, warn};

use config::Parameters;
use error::ConfigError;
use field::{Normalization, Region};
use grid::Grid;
use simplex::Simplex;

pub use fbm::{Fbm, fbm2d, signed_fbm2d};

/// One evaluated and colorized canvas.
pub struct Frame {
    pub field: Grid<f64>,
    pub rgba: Vec<u8>,
    /// Image side in pixels (the image is square).
    pub size: u32,
    pub normalization: Normalization,
}

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

fn elapsed_ms(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

/// Validate `params`, sample the canvas panned by `(pan_x, pan_y)` cells and
/// colorize it.
pub fn render_frame(
    noise: &Simplex,
    params: &Parameters,
    pan_x: i64,
    pan_y: i64,
) -> Result<(Frame, Vec<Timing>), ConfigError> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    let fbm = params.validate()?;
    let off_slider = params.outside_slider_ranges();
    if !off_slider.is_empty() {
        warn!(fields = ?off_slider, "parameters outside slider ranges");
    }
    debug!(
        octaves = fbm.octaves(),
        lacunarity = fbm.lacunarity(),
        persistence = fbm.persistence(),
        "fbm settings"
    );
    let normalization = if params.normalize {
        Normalization::Signed
    } else {
        Normalization::Raw
    };
    let region = Region::canvas(params, pan_x, pan_y);

    // Cost of a single sample at the first cell's coordinates.
    let t = Instant::now();
    let (x0, y0) = region.coord(0, 0);
    std::hint::black_box(field::sample_point(
        noise,
        &fbm,
        normalization,
        x0,
        y0,
        region.slice,
    ));
    timings.push(Timing {
        name: "single_sample",
        ms: elapsed_ms(t),
    });

    let t = Instant::now();
    let grid = field::sample_region(noise, &fbm, &region, normalization);
    timings.push(Timing {
        name: "sample",
        ms: elapsed_ms(t),
    });

    let t = Instant::now();
    let rgba = render::render_field(&grid, params.tile_size as usize, normalization);
    timings.push(Timing {
        name: "render",
        ms: elapsed_ms(t),
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: elapsed_ms(total_start),
    });
    for t in &timings {
        debug!(stage = t.name, ms = t.ms, "frame stage");
    }

    let frame = Frame {
        field: grid,
        rgba,
        size: params.image_size(),
        normalization,
    };
    Ok((frame, timings))
}
