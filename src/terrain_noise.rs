//! Natural terrain noise band (fBm) as a signed field.
//!
//! Feature size stays roughly stable in tiles but adapts a little to the map
//! size, so small maps do not look flat and large maps do not look uniform.

use serde::{Deserialize, Serialize};

use crate::field::{self, Field};
use crate::timing::Timed;
use crate::value_noise::{fractal_noise, noise_seed};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainNoiseParams {
    pub octaves: u32,
    /// Period of the lowest octave in tiles (used when auto-scaling is off)
    pub base_period_tiles: f32,
    /// Derive the base period from the map size instead:
    /// `clamp(min_dim / features_across_min_dim, min_base_period, max_base_period)`
    pub auto_scale_base_period: bool,
    pub features_across_min_dim: f32,
    pub min_base_period_tiles: f32,
    pub max_base_period_tiles: f32,
    /// Second, finer band mixed in before normalization
    pub enable_detail_band: bool,
    pub detail_band_strength: f32,
    pub detail_band_period_mul: f32,
}

impl Default for TerrainNoiseParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            base_period_tiles: 24.0,
            auto_scale_base_period: true,
            features_across_min_dim: 6.0,
            min_base_period_tiles: 6.0,
            max_base_period_tiles: 32.0,
            enable_detail_band: true,
            detail_band_strength: 0.45,
            detail_band_period_mul: 0.45,
        }
    }
}

impl TerrainNoiseParams {
    pub fn base_period_for(&self, width: usize, height: usize) -> f32 {
        if self.auto_scale_base_period {
            let min_dim = width.min(height) as f32;
            (min_dim / self.features_across_min_dim.max(1e-3))
                .clamp(self.min_base_period_tiles, self.max_base_period_tiles)
        } else {
            self.base_period_tiles.clamp(1.0, 10_000.0)
        }
    }
}

#[derive(Clone, Debug)]
pub struct TerrainNoiseFields {
    /// Mean-centred fBm, [-1, +1]
    pub noise: Field,
    /// Base period actually used, in tiles
    pub base_period_used: f32,
}

pub fn build_terrain_noise(width: usize, height: usize, seed: u64, params: &TerrainNoiseParams) -> TerrainNoiseFields {
    let _t = Timed::info("terrain noise");

    let seed = noise_seed(seed);
    let base_period_used = params.base_period_for(width, height);

    let mut noise = fractal_noise(width, height, 1.0, seed, base_period_used, params.octaves);

    if params.enable_detail_band {
        let detail_period = (base_period_used * params.detail_band_period_mul).max(3.0);
        let detail = fractal_noise(
            width,
            height,
            1.0,
            seed ^ 0x9E37,
            detail_period,
            params.octaves.saturating_sub(1).max(2),
        );
        field::add_scaled(&mut noise, &detail, params.detail_band_strength);
    }

    TerrainNoiseFields {
        noise: field::normalize_signed(field::mean_center(noise)),
        base_period_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_base_period_auto_scales() {
        let params = TerrainNoiseParams::default();
        assert_abs_diff_eq!(params.base_period_for(64, 32), 6.0);
        assert_abs_diff_eq!(params.base_period_for(60, 90), 10.0);
        assert_abs_diff_eq!(params.base_period_for(96, 96), 16.0);
        assert_abs_diff_eq!(params.base_period_for(1024, 512), 32.0);

        let fixed = TerrainNoiseParams {
            auto_scale_base_period: false,
            base_period_tiles: 0.0,
            ..Default::default()
        };
        assert_abs_diff_eq!(fixed.base_period_for(64, 64), 1.0);
    }

    #[test]
    fn test_noise_is_centred_and_signed() {
        let fields = build_terrain_noise(64, 48, 42, &TerrainNoiseParams::default());
        let (mn, mx) = fields.noise.min_max();
        assert!(mn >= -1.0 && mx <= 1.0);
        assert!(mn < 0.0 && mx > 0.0);
        assert!(fields.noise.mean().abs() < 1e-3);
    }

    #[test]
    fn test_noise_deterministic() {
        let params = TerrainNoiseParams::default();
        let a = build_terrain_noise(20, 20, 9, &params);
        let b = build_terrain_noise(20, 20, 9, &params);
        assert_eq!(a.noise, b.noise);
    }
}
