//! Elevation compositor: mixes the signed macro layers into one unit heightmap.

use serde::{Deserialize, Serialize};

use crate::continent::ContinentFields;
use crate::craters::CraterFields;
use crate::field::{self, Field};
use crate::plate_bias::PlateBiasFields;
use crate::plates::BoundaryFields;
use crate::terrain_noise::TerrainNoiseFields;
use crate::timing::Timed;
use crate::volcanoes::VolcanoFields;

// =============================================================================
// ELEVATION PARAMETERS
// =============================================================================

/// Layer weights for the elevation mix
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationParams {
    pub continent_strength: f32,
    pub plate_bias_strength: f32,
    pub boundary_strength: f32,
    pub noise_strength: f32,
    pub crater_strength: f32,
    pub volcano_strength: f32,
    /// Box-blur passes applied to the soft layers
    pub smooth_passes: usize,
    /// Share of the crater layer mixed in before smoothing; the rest is
    /// added afterwards to keep rims sharp
    pub crater_pre_blur_fraction: f32,
}

impl Default for ElevationParams {
    fn default() -> Self {
        Self {
            continent_strength: 0.9,
            plate_bias_strength: 0.35,
            boundary_strength: 0.9,
            noise_strength: 0.5,
            crater_strength: 0.66,
            volcano_strength: 1.0,
            smooth_passes: 1,
            crater_pre_blur_fraction: 0.5,
        }
    }
}

/// Upstream layers consumed by the compositor.
#[derive(Clone, Copy)]
pub struct ElevationInputs<'a> {
    pub continent: &'a ContinentFields,
    pub plate_bias: &'a PlateBiasFields,
    pub boundaries: &'a BoundaryFields,
    pub noise: &'a TerrainNoiseFields,
    pub craters: &'a CraterFields,
    pub volcanoes: &'a VolcanoFields,
}

#[derive(Clone, Debug)]
pub struct ElevationFields {
    /// Final heightmap, [0, 1]
    pub elevation: Field,
}

// =============================================================================
// COMPOSITION
// =============================================================================

pub fn build_elevation(width: usize, height: usize, inputs: ElevationInputs<'_>, params: &ElevationParams) -> ElevationFields {
    let _t = Timed::info("elevation");

    let pre_crater = params.crater_strength * params.crater_pre_blur_fraction;
    let post_crater = params.crater_strength - pre_crater;

    let mut raw = field::zeros(width, height);
    field::add_scaled(&mut raw, &inputs.continent.continent, params.continent_strength);
    field::add_scaled(&mut raw, &inputs.plate_bias.plate_bias, params.plate_bias_strength);
    field::add_scaled(&mut raw, &inputs.boundaries.stress, params.boundary_strength);
    field::add_scaled(&mut raw, &inputs.noise.noise, params.noise_strength);
    field::add_scaled(&mut raw, &inputs.craters.crater, pre_crater);

    let mut raw = field::blur(&raw, params.smooth_passes);

    // Sharp features go in after smoothing
    field::add_scaled(&mut raw, &inputs.craters.crater, post_crater);
    field::add_scaled(&mut raw, &inputs.volcanoes.volcano, params.volcano_strength);

    ElevationFields {
        elevation: field::normalize_01(raw),
    }
}
