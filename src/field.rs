//! Field utilities shared by every generator.
//!
//! All transforms take a field by value (or by reference) and hand back a new
//! field, so a finished layer always has exactly one owner.

use rayon::prelude::*;

use crate::tilemap::Tilemap;

/// A scalar field over the world grid.
pub type Field = Tilemap<f32>;

/// Denominator floor for degenerate ranges.
pub const EPSILON: f32 = 1e-6;

pub fn zeros(width: usize, height: usize) -> Field {
    Tilemap::new_with(width, height, 0.0f32)
}

pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Smoothstep interpolation for gentle falloff
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = clamp01((x - edge0) / (edge1 - edge0));
    t * t * (3.0 - 2.0 * t)
}

/// Probabilistic-OR merge of two masks: `1 - (1 - a)(1 - b)`.
pub fn smooth_union(a: f32, b: f32) -> f32 {
    1.0 - (1.0 - a) * (1.0 - b)
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Min-max normalize into [0, 1]. A constant field maps to all zeros.
pub fn normalize_01(mut field: Field) -> Field {
    if field.is_empty() {
        return field;
    }
    let (mn, mx) = field.min_max();
    let range = (mx - mn).max(EPSILON);
    for v in field.values_mut() {
        *v = (*v - mn) / range;
    }
    field
}

/// Normalize into [-1, +1] by the largest absolute value.
/// All-zero (or near-zero) fields are returned unchanged.
pub fn normalize_signed(mut field: Field) -> Field {
    let max_abs = field.values().iter().fold(0.0f32, |m, v| m.max(v.abs()));
    if max_abs < EPSILON {
        return field;
    }
    for v in field.values_mut() {
        *v /= max_abs;
    }
    field
}

/// Normalize an (x, y) vector field by the single largest component magnitude
/// across both axes, preserving per-cell direction.
pub fn normalize_vector_pair(mut x: Field, mut y: Field) -> (Field, Field) {
    let max_abs = x
        .values()
        .iter()
        .chain(y.values().iter())
        .fold(0.0f32, |m, v| m.max(v.abs()));
    if max_abs < EPSILON {
        return (x, y);
    }
    x.values_mut().iter_mut().for_each(|v| *v /= max_abs);
    y.values_mut().iter_mut().for_each(|v| *v /= max_abs);
    (x, y)
}

/// Shift a field so its mean is zero.
pub fn mean_center(mut field: Field) -> Field {
    let mean = field.mean();
    for v in field.values_mut() {
        *v -= mean;
    }
    field
}

/// Remap a signed field into [0, 1] (`v * 0.5 + 0.5`).
pub fn signed_to_01(field: &Field) -> Field {
    field.map(|&v| clamp01(v * 0.5 + 0.5))
}

// =============================================================================
// ACCUMULATION
// =============================================================================

/// `dst += src * weight`, cell by cell.
pub fn add_scaled(dst: &mut Field, src: &Field, weight: f32) {
    debug_assert_eq!((dst.width, dst.height), (src.width, src.height));
    for (d, &s) in dst.values_mut().iter_mut().zip(src.values()) {
        *d += s * weight;
    }
}

// =============================================================================
// BLUR
// =============================================================================

/// One 3x3 box-blur pass. Edge cells average only their in-bounds neighbours.
pub fn blur_once(field: &Field) -> Field {
    let width = field.width;
    let height = field.height;
    let src = field.values();
    let mut out = vec![0.0f32; src.len()];

    out.par_chunks_mut(width.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            let y0 = y.saturating_sub(1);
            let y1 = (y + 1).min(height - 1);
            for (x, cell) in row.iter_mut().enumerate() {
                let x0 = x.saturating_sub(1);
                let x1 = (x + 1).min(width - 1);
                let mut sum = 0.0f32;
                let mut count = 0u32;
                for ny in y0..=y1 {
                    for nx in x0..=x1 {
                        sum += src[ny * width + nx];
                        count += 1;
                    }
                }
                *cell = sum / count as f32;
            }
        });

    Tilemap::from_vec(width, height, out)
}

/// Repeated box blur. Zero passes returns a copy.
pub fn blur(field: &Field, passes: usize) -> Field {
    let mut result = field.clone();
    for _ in 0..passes {
        result = blur_once(&result);
    }
    result
}
