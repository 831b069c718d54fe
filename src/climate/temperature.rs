//! Surface temperature from latitude, altitude, coast and geothermal heat.

use serde::{Deserialize, Serialize};

use crate::field::{self, clamp01, lerp, Field};
use crate::sea_level::FluidFields;
use crate::tilemap::Tilemap;
use crate::timing::Timed;
use crate::value_noise::{fractal_noise, noise_seed};

use super::geothermal::GeothermalFields;
use super::latitude::LatitudeFields;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureParams {
    pub latitude_strength: f32,
    pub altitude_strength: f32,
    pub noise_strength: f32,

    pub latitude_curve_power: f32,
    pub altitude_curve_power: f32,

    /// Coasts are pulled toward `mild_temp` by up to this fraction
    pub coast_moderation_strength: f32,
    pub mild_temp: f32,

    pub noise_period_tiles: f32,
    pub noise_octaves: u32,

    pub geothermal_strength: f32,
    pub geothermal_power: f32,
    /// Clamp after adding geothermal heat instead of renormalizing
    pub geothermal_clamp: bool,
}

impl Default for TemperatureParams {
    fn default() -> Self {
        Self {
            latitude_strength: 1.0,
            altitude_strength: 0.65,
            noise_strength: 0.06,
            latitude_curve_power: 1.15,
            altitude_curve_power: 1.10,
            coast_moderation_strength: 0.20,
            mild_temp: 0.55,
            noise_period_tiles: 28.0,
            noise_octaves: 4,
            geothermal_strength: 0.12,
            geothermal_power: 1.15,
            geothermal_clamp: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TemperatureFields {
    /// Final temperature including geothermal heat, [0, 1]
    pub temperature: Field,
    /// Temperature before geothermal heat, [0, 1]
    pub temperature_base: Field,
    /// Latitude warmth, 1 at the equator
    pub lat_heat: Field,
    /// Altitude cooling, 1 at the highest peak
    pub alt_cool: Field,
}

pub fn build_temperature(
    latitude: &LatitudeFields,
    fluid: &FluidFields,
    geothermal: &GeothermalFields,
    seed: u64,
    params: &TemperatureParams,
) -> TemperatureFields {
    let _t = Timed::info("temperature");
    let (width, height) = (fluid.is_water.width, fluid.is_water.height);

    let lat_heat = latitude
        .latitude
        .map(|&l| clamp01(1.0 - l.clamp(-1.0, 1.0).abs()).powf(params.latitude_curve_power));
    let alt_cool = fluid
        .alt_above_sea
        .map(|&a| clamp01(a).powf(params.altitude_curve_power));

    let noise = field::normalize_signed(fractal_noise(
        width,
        height,
        1.0,
        noise_seed(seed),
        params.noise_period_tiles,
        params.noise_octaves,
    ));

    let raw = Tilemap::from_fn(width, height, |x, y| {
        let t = lat_heat.get(x, y) * params.latitude_strength - alt_cool.get(x, y) * params.altitude_strength
            + noise.get(x, y) * params.noise_strength;
        let k = clamp01(clamp01(*fluid.coast.get(x, y)) * params.coast_moderation_strength);
        lerp(t, params.mild_temp, k)
    });
    let temperature_base = field::normalize_01(raw);

    let mixed = Tilemap::from_fn(width, height, |x, y| {
        let g = clamp01(*geothermal.heat.get(x, y)).powf(params.geothermal_power);
        temperature_base.get(x, y) + g * params.geothermal_strength
    });
    let temperature = if params.geothermal_clamp {
        mixed.map(|&t| clamp01(t))
    } else {
        field::normalize_01(mixed)
    };

    TemperatureFields {
        temperature,
        temperature_base,
        lat_heat,
        alt_cool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::latitude::{build_latitude, LatitudeParams};
    use crate::sea_level::{build_fluid, SeaLevelParams};
    use approx::assert_abs_diff_eq;

    fn no_heat(width: usize, height: usize) -> GeothermalFields {
        GeothermalFields {
            heat: field::zeros(width, height),
            raw: field::zeros(width, height),
        }
    }

    fn sea_world(width: usize, height: usize) -> FluidFields {
        build_fluid(&Field::new_with(width, height, 0.1), &SeaLevelParams::default())
    }

    #[test]
    fn test_equator_warmer_than_pole() {
        let latitude = build_latitude(16, 32, &LatitudeParams::default());
        let fluid = sea_world(16, 32);
        let fields = build_temperature(&latitude, &fluid, &no_heat(16, 32), 3, &TemperatureParams::default());

        // Default latitude puts the pole on the top row, the equator on the bottom
        let top: f32 = (0..16).map(|x| fields.temperature.get(x, 0)).sum();
        let bottom: f32 = (0..16).map(|x| fields.temperature.get(x, 31)).sum();
        assert!(bottom > top);
        assert_eq!(*fields.lat_heat.get(0, 0), 0.0);
        assert_eq!(*fields.lat_heat.get(0, 31), 1.0);
    }

    #[test]
    fn test_mountains_are_cold() {
        let latitude = build_latitude(
            10,
            10,
            &LatitudeParams {
                mono_lat_percent: Some(1.0),
                ..Default::default()
            },
        );
        let elevation = Field::from_fn(10, 10, |x, _| if x == 9 { 1.0 } else { 0.5 });
        let fluid = build_fluid(&elevation, &SeaLevelParams::default());
        let params = TemperatureParams {
            noise_strength: 0.0,
            ..Default::default()
        };
        let fields = build_temperature(&latitude, &fluid, &no_heat(10, 10), 1, &params);
        assert!(*fields.temperature.get(9, 5) < *fields.temperature.get(2, 5));
        assert_abs_diff_eq!(*fields.alt_cool.get(9, 5), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_geothermal_warms_and_stays_in_range() {
        let latitude = build_latitude(8, 8, &LatitudeParams::default());
        let fluid = sea_world(8, 8);
        let heat = GeothermalFields {
            heat: Field::new_with(8, 8, 1.0),
            raw: Field::new_with(8, 8, 1.0),
        };
        let fields = build_temperature(&latitude, &fluid, &heat, 9, &TemperatureParams::default());
        for (x, y, &t) in fields.temperature.iter() {
            assert!((0.0..=1.0).contains(&t));
            assert!(t >= *fields.temperature_base.get(x, y));
        }

        let renorm = TemperatureParams {
            geothermal_clamp: false,
            ..Default::default()
        };
        let fields = build_temperature(&latitude, &fluid, &heat, 9, &renorm);
        let (mn, mx) = fields.temperature.min_max();
        assert_eq!(mn, 0.0);
        assert!(mx > 0.99 && mx <= 1.0);
    }
}
