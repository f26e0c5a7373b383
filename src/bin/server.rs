use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::post};
use base64::Engine;
use clap::Parser;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use noisefield::config::Parameters;
use noisefield::error::ConfigError;
use noisefield::field::{self, Normalization, Region};
use noisefield::simplex::Simplex;

#[derive(Parser, Debug)]
#[command(about = "HTTP backend for the noise viewer")]
struct Args {
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
}

#[derive(Clone)]
struct AppState {
    reference: Arc<Simplex>,
}

impl AppState {
    fn kernel(&self, seed: Option<u64>) -> Arc<Simplex> {
        match seed {
            Some(seed) => Arc::new(Simplex::with_seed(seed)),
            None => Arc::clone(&self.reference),
        }
    }
}

/// Slider values plus view state. Absent fields fall back to
/// `Parameters::default()`.
#[derive(Deserialize)]
struct FrameRequest {
    seed: Option<u64>,
    #[serde(default)]
    pan_x: i64,
    #[serde(default)]
    pan_y: i64,
    #[serde(flatten)]
    params: Parameters,
}

#[derive(Serialize)]
struct RenderResponse {
    data_url: String,
    size: u32,
    timings: Vec<TimingEntry>,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

#[derive(Serialize)]
struct SampleResponse {
    width: usize,
    height: usize,
    /// Row-major; non-finite samples serialise as `null`.
    values: Vec<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Debug)]
enum ApiError {
    Config(ConfigError),
    Encode(image::ImageError),
    Join(tokio::task::JoinError),
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Config(err) => {
                warn!(%err, "rejected parameters");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Encode(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Join(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

fn encode_png(rgba: &[u8], size: u32) -> Result<String, ApiError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(rgba, size, size, image::ExtendedColorType::Rgba8)
        .map_err(ApiError::Encode)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

fn build_render(noise: &Simplex, req: &FrameRequest) -> Result<RenderResponse, ApiError> {
    let (frame, timings) = noisefield::render_frame(noise, &req.params, req.pan_x, req.pan_y)?;
    Ok(RenderResponse {
        data_url: encode_png(&frame.rgba, frame.size)?,
        size: frame.size,
        timings: timings
            .iter()
            .map(|t| TimingEntry {
                name: t.name.to_string(),
                ms: t.ms,
            })
            .collect(),
    })
}

fn build_sample(noise: &Simplex, req: &FrameRequest) -> Result<SampleResponse, ApiError> {
    let fbm = req.params.validate()?;
    let off_slider = req.params.outside_slider_ranges();
    if !off_slider.is_empty() {
        warn!(fields = ?off_slider, "parameters outside slider ranges");
    }
    let mode = if req.params.normalize {
        Normalization::Signed
    } else {
        Normalization::Raw
    };
    let region = Region::canvas(&req.params, req.pan_x, req.pan_y);
    let grid = field::sample_region(noise, &fbm, &region, mode);
    let range = grid.finite_range();
    Ok(SampleResponse {
        width: grid.w,
        height: grid.h,
        values: grid.data,
        min: range.map(|r| r.0),
        max: range.map(|r| r.1),
    })
}

async fn render_handler(
    State(state): State<AppState>,
    Json(req): Json<FrameRequest>,
) -> Result<Json<RenderResponse>, ApiError> {
    let noise = state.kernel(req.seed);
    let response = tokio::task::spawn_blocking(move || build_render(&noise, &req))
        .await
        .map_err(ApiError::Join)??;
    Ok(Json(response))
}

async fn sample_handler(
    State(state): State<AppState>,
    Json(req): Json<FrameRequest>,
) -> Result<Json<SampleResponse>, ApiError> {
    let noise = state.kernel(req.seed);
    let response = tokio::task::spawn_blocking(move || build_sample(&noise, &req))
        .await
        .map_err(ApiError::Join)??;
    Ok(Json(response))
}

fn app() -> Router {
    let state = AppState {
        reference: Arc::new(Simplex::new()),
    };
    Router::new()
        .route("/api/render", post(render_handler))
        .route("/api/sample", post(sample_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("binding {}", args.addr))?;
    info!("noisefield server at http://{}", args.addr);

    axum::serve(listener, app()).await.context("serving")?;
    Ok(())
}
