//! Impact craters: bowls, rims and ejecta stamped onto a signed field.

use std::f32::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::field::{self, clamp01, lerp, smooth_union, smoothstep, Field};
use crate::timing::Timed;
use crate::value_noise::{noise_seed, signed_value_noise};

/// Parameters for crater placement and shape
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraterParams {
    // Density
    pub tiles_per_crater: usize,
    pub min_craters: usize,
    pub max_craters: usize,

    // Radius in tiles
    pub radius_min_tiles: f32,
    pub radius_max_tiles: f32,

    // Shape, as multiples of the crater radius
    pub inner_radius_mul: f32,
    pub rim_start_mul: f32,
    pub rim_end_mul: f32,
    pub ejecta_end_mul: f32,

    pub depth: f32,
    pub rim: f32,
    pub ejecta: f32,
    pub warp: f32,

    pub bowl_power: f32,
    /// 0 = ejecta texture fully signed, 1 = fully positive
    pub ejecta_bias: f32,

    pub warp_noise_freq: f32,
    pub ejecta_noise_freq: f32,
}

impl Default for CraterParams {
    fn default() -> Self {
        Self {
            tiles_per_crater: 3200,
            min_craters: 1,
            max_craters: 40,
            radius_min_tiles: 6.0,
            radius_max_tiles: 14.0,
            inner_radius_mul: 0.55,
            rim_start_mul: 0.85,
            rim_end_mul: 1.10,
            ejecta_end_mul: 1.85,
            depth: 0.22,
            rim: 0.18,
            ejecta: 0.16,
            warp: 0.18,
            bowl_power: 0.8,
            ejecta_bias: 0.65,
            warp_noise_freq: 0.9,
            ejecta_noise_freq: 2.3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CraterFields {
    /// Signed height contribution, [-1, +1]
    pub crater: Field,
    /// Crater influence, [0, 1]
    pub crater_mask: Field,
}

/// One crater's randomized shape.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Crater {
    cx: f32,
    cy: f32,
    radius: f32,
    depth: f32,
    rim: f32,
    ejecta: f32,
    warp: f32,
    noise_seed: u32,
}

/// Number of craters for a map: one per `tiles_per_crater` tiles, clamped.
pub fn crater_count(width: usize, height: usize, params: &CraterParams) -> usize {
    let raw = (width * height) / params.tiles_per_crater.max(1);
    raw.clamp(params.min_craters, params.max_craters.max(params.min_craters))
}

pub fn build_craters(width: usize, height: usize, seed: u64, params: &CraterParams) -> CraterFields {
    let _t = Timed::info("craters");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let base_seed = noise_seed(seed);
    let count = crater_count(width, height, params);
    log::debug!("Stamping {} craters", count);

    let mut height_field = field::zeros(width, height);
    let mut mask = field::zeros(width, height);

    for i in 0..count {
        let crater = Crater {
            cx: rng.gen::<f32>() * (width - 1) as f32,
            cy: rng.gen::<f32>() * (height - 1) as f32,
            radius: lerp(params.radius_min_tiles, params.radius_max_tiles, rng.gen::<f32>()),
            depth: params.depth * (0.75 + rng.gen::<f32>() * 0.5),
            rim: params.rim * (0.75 + rng.gen::<f32>() * 0.5),
            ejecta: params.ejecta * (0.75 + rng.gen::<f32>() * 0.5),
            warp: params.warp * (0.6 + rng.gen::<f32>() * 0.8),
            noise_seed: base_seed.wrapping_add((i as u32).wrapping_mul(1337)),
        };
        stamp_crater(&mut height_field, &mut mask, &crater, params);
    }

    CraterFields {
        crater: field::normalize_signed(height_field),
        crater_mask: field::normalize_01(mask),
    }
}

fn stamp_crater(height_field: &mut Field, mask_field: &mut Field, c: &Crater, params: &CraterParams) {
    let width = height_field.width;
    let height = height_field.height;

    let r_inner = c.radius * params.inner_radius_mul;
    let r_rim_start = c.radius * params.rim_start_mul;
    let r_rim_end = c.radius * params.rim_end_mul;
    let r_ejecta_end = c.radius * params.ejecta_end_mul;

    let min_x = ((c.cx - r_ejecta_end).floor() as i64).clamp(0, width as i64 - 1) as usize;
    let max_x = ((c.cx + r_ejecta_end).ceil() as i64).clamp(0, width as i64 - 1) as usize;
    let min_y = ((c.cy - r_ejecta_end).floor() as i64).clamp(0, height as i64 - 1) as usize;
    let max_y = ((c.cy + r_ejecta_end).ceil() as i64).clamp(0, height as i64 - 1) as usize;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 - c.cx;
            let dy = y as f32 - c.cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d > r_ejecta_end {
                continue;
            }

            let jitter = signed_value_noise(
                x as f32 * params.warp_noise_freq,
                y as f32 * params.warp_noise_freq,
                c.noise_seed,
            );
            let wd = d * (1.0 + c.warp * jitter);

            let mut delta = 0.0f32;
            let mut mask = 0.0f32;

            // Bowl
            if wd < r_inner {
                let t = 1.0 - wd / r_inner;
                let bowl = smoothstep(0.0, 1.0, t).powf(params.bowl_power);
                delta -= bowl * c.depth;
                mask = mask.max(bowl);
            }

            // Rim ring
            if (r_rim_start..=r_rim_end).contains(&wd) {
                let t = (wd - r_rim_start) / (r_rim_end - r_rim_start);
                let bell = (t * PI).sin();
                delta += bell * c.rim;
                mask = mask.max(bell);
            }

            // Ejecta blanket
            if wd > c.radius && wd < r_ejecta_end {
                let falloff = 1.0 - (wd - c.radius) / (r_ejecta_end - c.radius);
                let n = signed_value_noise(
                    x as f32 * params.ejecta_noise_freq,
                    y as f32 * params.ejecta_noise_freq,
                    c.noise_seed ^ 0x5A5A,
                );
                let biased = lerp(n, n * 0.5 + 0.5, params.ejecta_bias);
                let ripple = 0.70 + 0.30 * (wd / (c.radius * 0.18)).cos();

                delta += falloff * c.ejecta * (0.75 * biased + 0.25 * ripple);
                mask = mask.max(falloff);
            }

            // Positive deposits flatten out on terrain that is already high
            let cur = *height_field.get(x, y);
            let atten = if delta > 0.0 { 1.0 - clamp01(cur * 0.9) } else { 1.0 };
            height_field.set(x, y, cur + delta * atten);

            let m = mask_field.get_mut(x, y);
            *m = smooth_union(*m, mask);
        }
    }
}
