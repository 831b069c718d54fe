//! Surface air pressure: low over mountains and warm regions.

use serde::{Deserialize, Serialize};

use crate::field::{self, clamp01, Field};
use crate::sea_level::FluidFields;
use crate::tilemap::Tilemap;
use crate::timing::Timed;
use crate::value_noise::{fractal_noise, noise_seed};

use super::temperature::TemperatureFields;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureParams {
    /// Bigger = lower pressure in mountains
    pub altitude_strength: f32,
    /// Bigger = warmer regions drop further
    pub temperature_strength: f32,
    pub noise_strength: f32,
    pub noise_period_tiles: f32,
    pub noise_octaves: u32,
    /// Neutral temperature baseline
    pub mid_temp: f32,
}

impl Default for PressureParams {
    fn default() -> Self {
        Self {
            altitude_strength: 0.75,
            temperature_strength: 0.35,
            noise_strength: 0.10,
            noise_period_tiles: 60.0,
            noise_octaves: 3,
            mid_temp: 0.55,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PressureFields {
    /// [0, 1]
    pub pressure: Field,
}

pub fn build_pressure(
    fluid: &FluidFields,
    temperature: &TemperatureFields,
    seed: u64,
    params: &PressureParams,
) -> PressureFields {
    let _t = Timed::debug("pressure");
    let (width, height) = (fluid.is_water.width, fluid.is_water.height);

    let noise = field::normalize_signed(fractal_noise(
        width,
        height,
        1.0,
        noise_seed(seed),
        params.noise_period_tiles,
        params.noise_octaves,
    ));

    let raw = Tilemap::from_fn(width, height, |x, y| {
        let alt = clamp01(*fluid.alt_above_sea.get(x, y));
        let temp_anomaly = clamp01(*temperature.temperature.get(x, y)) - params.mid_temp;
        0.5 - alt * params.altitude_strength - temp_anomaly * params.temperature_strength
            + noise.get(x, y) * params.noise_strength
    });

    PressureFields {
        pressure: field::normalize_01(raw),
    }
}
