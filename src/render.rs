use rayon::prelude::*;

use crate::field::Normalization;
use crate::grid::Grid;

/// Canvas background, also used for cells whose sample is not finite.
pub const BACKGROUND: [u8; 4] = [24, 25, 38, 255];

#[inline]
fn grey(v: f64) -> [u8; 4] {
    let v = v.clamp(0.0, 255.0) as u8;
    [v, v, v, 255]
}

/// Signed value in [-1, 1] to grey: `(n + 1) * 127`.
#[inline]
pub fn signed_grey(n: f64) -> [u8; 4] {
    if n.is_finite() {
        grey((n + 1.0) * 127.0)
    } else {
        BACKGROUND
    }
}

/// Paint each cell as a `tile` x `tile` square of RGBA pixels.
fn paint(field: &Grid<f64>, tile: usize, shade: impl Fn(f64) -> [u8; 4] + Sync) -> Vec<u8> {
    let out_w = field.w * tile;
    let out_h = field.h * tile;
    let mut rgba = vec![0u8; out_w * out_h * 4];
    if rgba.is_empty() {
        return rgba;
    }

    rgba.par_chunks_mut(out_w * 4)
        .enumerate()
        .for_each(|(py, row)| {
            let y = py / tile;
            for x in 0..field.w {
                let color = shade(field.get(x, y));
                for px in row[x * tile * 4..(x + 1) * tile * 4].chunks_exact_mut(4) {
                    px.copy_from_slice(&color);
                }
            }
        });

    rgba
}

/// Grayscale for signed-normalised fields.
pub fn render_signed(field: &Grid<f64>, tile: usize) -> Vec<u8> {
    paint(field, tile, signed_grey)
}

/// Grayscale stretched over the field's finite min/max. Raw sums have no
/// fixed range, so they are shown this way.
pub fn render_stretched(field: &Grid<f64>, tile: usize) -> Vec<u8> {
    let (lo, hi) = field.finite_range().unwrap_or((0.0, 1.0));
    let range = (hi - lo).max(f64::EPSILON);
    paint(field, tile, |v| {
        if v.is_finite() {
            grey((v - lo) / range * 255.0)
        } else {
            BACKGROUND
        }
    })
}

pub fn render_field(field: &Grid<f64>, tile: usize, mode: Normalization) -> Vec<u8> {
    match mode {
        Normalization::Signed => render_signed(field, tile),
        Normalization::Raw => render_stretched(field, tile),
    }
}
