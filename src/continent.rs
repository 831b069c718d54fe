//! Continent macro shape: a signed landmass-pressure field.
//!
//! Positive values push toward land, negative toward ocean. The field is
//! deliberately not mean-centred: its bias decides how ocean-heavy a world is.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::field::{self, smoothstep, Field};
use crate::plates::Vec2;
use crate::tilemap::Tilemap;
use crate::timing::Timed;
use crate::value_noise::{noise_seed, signed_value_noise};

/// Parameters for continent blobs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinentParams {
    /// Blob count is drawn from `min_centers..=max_centers` (clamped to 1..=16)
    pub min_centers: usize,
    pub max_centers: usize,
    /// Blob radius is `min(width, height) * U(radius_min_mul, radius_max_mul)`
    pub radius_min_mul: f32,
    pub radius_max_mul: f32,
    /// How much map edges are pushed toward ocean (0..1)
    pub edge_depress_mul: f32,
    /// Edge falloff smoothstep window, in half-extent units
    pub edge_falloff_inner: f32,
    pub edge_falloff_outer: f32,
    /// Warp blob distances with noise so coasts are not circles
    pub enable_warp: bool,
    pub warp_strength: f32,
    pub warp_period_tiles: f32,
    pub warp_seed_salt: u32,
}

impl Default for ContinentParams {
    fn default() -> Self {
        Self {
            min_centers: 1,
            max_centers: 3,
            radius_min_mul: 0.35,
            radius_max_mul: 0.50,
            edge_depress_mul: 0.60,
            edge_falloff_inner: 0.10,
            edge_falloff_outer: 0.90,
            enable_warp: true,
            warp_strength: 0.18,
            warp_period_tiles: 28.0,
            warp_seed_salt: 0x00C0_7771,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContinentFields {
    /// Signed landmass pressure, [-1, +1]
    pub continent: Field,
}

pub fn build_continent(width: usize, height: usize, seed: u64, params: &ContinentParams) -> ContinentFields {
    let _t = Timed::info("continents");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let span = params.max_centers.saturating_sub(params.min_centers) + 1;
    let centers = (params.min_centers + rng.gen_range(0..span)).clamp(1, 16);

    let blobs: Vec<Vec2> = (0..centers)
        .map(|_| {
            Vec2::new(
                rng.gen::<f32>() * (width - 1) as f32,
                rng.gen::<f32>() * (height - 1) as f32,
            )
        })
        .collect();

    let min_dim = width.min(height) as f32;
    let blob_radius = (min_dim
        * (params.radius_min_mul + rng.gen::<f32>() * (params.radius_max_mul - params.radius_min_mul)))
        .max(field::EPSILON);

    let warp_freq = 1.0 / params.warp_period_tiles.max(1e-3);
    let warp_seed = noise_seed(seed) ^ params.warp_seed_salt;

    log::debug!("{} continent blobs, radius {:.1}", centers, blob_radius);

    let raw = Tilemap::from_fn(width, height, |x, y| {
        // Stable per-tile warp, multiplicative so it scales with distance
        let warp = if params.enable_warp {
            signed_value_noise(x as f32 * warp_freq, y as f32 * warp_freq, warp_seed) * params.warp_strength
        } else {
            0.0
        };

        let p = Vec2::new(x as f32, y as f32);
        let mask = blobs.iter().fold(0.0f32, |mask, c| {
            let d = (p - *c).length() * (1.0 + warp);
            mask.max(smoothstep(0.0, 1.0, 1.0 - d / blob_radius))
        });

        let edge = edge_falloff(x, y, width, height, params);
        let m = mask * (1.0 - params.edge_depress_mul * edge);

        // Neutral at 0.5
        m - 0.5
    });

    ContinentFields {
        continent: field::normalize_signed(raw),
    }
}

/// 1 at the map edges, 0 toward the centre.
fn edge_falloff(x: usize, y: usize, width: usize, height: usize, params: &ContinentParams) -> f32 {
    let fx = x.min(width - 1 - x) as f32 / (width as f32 * 0.5);
    let fy = y.min(height - 1 - y) as f32 / (height as f32 * 0.5);
    1.0 - smoothstep(params.edge_falloff_inner, params.edge_falloff_outer, fx.min(fy))
}
