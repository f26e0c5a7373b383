use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use noisefield::config::Parameters;
use noisefield::simplex::Simplex;

/// Render one noise canvas to a PNG.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Shuffle the permutation table with this seed instead of using the reference table.
    #[arg(long)]
    seed: Option<u64>,
    /// Horizontal pan in cells.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pan_x: i64,
    /// Vertical pan in cells.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pan_y: i64,
    /// JSON file with parameters; missing fields take defaults.
    #[arg(long)]
    params: Option<PathBuf>,
    #[arg(long)]
    canvas_size: Option<u32>,
    #[arg(long)]
    tile_size: Option<u32>,
    #[arg(long)]
    amplitude: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    octaves: Option<i32>,
    #[arg(long)]
    persistence: Option<f64>,
    #[arg(long)]
    lacunarity: Option<f64>,
    /// Output the raw octave sum instead of the signed-normalised one.
    #[arg(long)]
    raw: bool,
    /// Sample the z = SLICE plane of 3D noise.
    #[arg(long, allow_hyphen_values = true)]
    slice: Option<f64>,
    #[arg(long, default_value = "artifacts/noise.png")]
    out: PathBuf,
}

impl Args {
    fn parameters(&self) -> Result<Parameters> {
        let mut params = match &self.params {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => Parameters::default(),
        };
        if let Some(v) = self.canvas_size {
            params.canvas_size = v;
        }
        if let Some(v) = self.tile_size {
            params.tile_size = v;
        }
        if let Some(v) = self.amplitude {
            params.amplitude = v;
        }
        if let Some(v) = self.octaves {
            params.octaves = v;
        }
        if let Some(v) = self.persistence {
            params.persistence = v;
        }
        if let Some(v) = self.lacunarity {
            params.lacunarity = v;
        }
        if self.raw {
            params.normalize = false;
        }
        if self.slice.is_some() {
            params.slice = self.slice;
        }
        Ok(params)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let params = args.parameters()?;
    let noise = match args.seed {
        Some(seed) => Simplex::with_seed(seed),
        None => Simplex::new(),
    };

    info!(
        canvas = params.canvas_size,
        tile = params.tile_size,
        octaves = params.octaves,
        seed = ?args.seed,
        "rendering {}x{} cells",
        params.canvas_size,
        params.canvas_size
    );

    let (frame, timings) = noisefield::render_frame(&noise, &params, args.pan_x, args.pan_y)?;

    for t in &timings {
        info!("  {:20} {:10.3} ms", t.name, t.ms);
    }

    if let Some(dir) = args.out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    image::save_buffer(
        &args.out,
        &frame.rgba,
        frame.size,
        frame.size,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("saving {}", args.out.display()))?;
    info!("saved {}", args.out.display());

    Ok(())
}
