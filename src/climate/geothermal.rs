//! Geothermal heat from volcanoes, faults and ash, damped by water and thin air.

use serde::{Deserialize, Serialize};

use crate::field::{self, clamp01, lerp, Field};
use crate::plates::BoundaryFields;
use crate::sea_level::FluidFields;
use crate::tilemap::Tilemap;
use crate::timing::Timed;
use crate::volcanoes::VolcanoFields;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeothermalParams {
    pub volcano_heat_strength: f32,
    pub fault_heat_strength: f32,
    pub ash_heat_strength: f32,
    /// Fraction of heat that remains under water
    pub water_dampen_mul: f32,
    /// Fraction of heat that remains in thin air
    pub thin_air_dampen_mul: f32,
    pub spread_blur_passes: usize,
}

impl Default for GeothermalParams {
    fn default() -> Self {
        Self {
            volcano_heat_strength: 1.0,
            fault_heat_strength: 0.35,
            ash_heat_strength: 0.06,
            water_dampen_mul: 0.45,
            thin_air_dampen_mul: 0.65,
            spread_blur_passes: 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeothermalFields {
    /// Heat felt at the surface, [0, 1]
    pub heat: Field,
    /// Undamped, unblurred potential, [0, 1]
    pub raw: Field,
}

pub fn build_geothermal(
    volcanoes: &VolcanoFields,
    boundaries: &BoundaryFields,
    fluid: &FluidFields,
    params: &GeothermalParams,
) -> GeothermalFields {
    let _t = Timed::debug("geothermal");
    let (width, height) = (fluid.is_water.width, fluid.is_water.height);

    let raw = Tilemap::from_fn(width, height, |x, y| {
        clamp01(*volcanoes.volcano_mask.get(x, y)) * params.volcano_heat_strength
            + clamp01(*boundaries.fault.get(x, y)) * params.fault_heat_strength
            + clamp01(*volcanoes.ash_mask.get(x, y)) * params.ash_heat_strength
    });
    let raw = field::normalize_01(raw);

    let damped = Tilemap::from_fn(width, height, |x, y| {
        let water_mul = lerp(1.0, params.water_dampen_mul, clamp01(*fluid.is_water.get(x, y)));
        let thin_mul = lerp(1.0, params.thin_air_dampen_mul, clamp01(*fluid.thin_air.get(x, y)));
        raw.get(x, y) * water_mul * thin_mul
    });

    let heat = field::normalize_01(field::blur(&damped, params.spread_blur_passes));

    GeothermalFields { heat, raw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sea_level::{build_fluid, SeaLevelParams};

    fn inputs(width: usize, height: usize, elevation: f32) -> (VolcanoFields, BoundaryFields, FluidFields) {
        let z = field::zeros(width, height);
        let volcanoes = VolcanoFields {
            volcano: z.clone(),
            volcano_mask: z.clone(),
            ash_mask: z.clone(),
            volcanoes: Vec::new(),
        };
        let boundaries = BoundaryFields {
            stress: z.clone(),
            fault: z,
        };
        let fluid = build_fluid(&Field::new_with(width, height, elevation), &SeaLevelParams::default());
        (volcanoes, boundaries, fluid)
    }

    #[test]
    fn test_heat_spreads_from_vent() {
        let (mut volcanoes, boundaries, fluid) = inputs(11, 11, 0.6);
        volcanoes.volcano_mask.set(5, 5, 1.0);
        let fields = build_geothermal(&volcanoes, &boundaries, &fluid, &GeothermalParams::default());

        assert_eq!(*fields.raw.get(5, 5), 1.0);
        assert_eq!(*fields.raw.get(4, 5), 0.0);
        assert_eq!(*fields.heat.get(5, 5), 1.0);
        assert!(*fields.heat.get(4, 5) > 0.0);
        assert_eq!(*fields.heat.get(0, 0), 0.0);
    }

    #[test]
    fn test_water_dampens_heat() {
        // Left half water, right half land, a fault line across both
        let mut elevation = Field::new_with(20, 5, 0.2);
        for y in 0..5 {
            for x in 10..20 {
                elevation.set(x, y, 0.7);
            }
        }
        let (volcanoes, mut boundaries, _) = inputs(20, 5, 0.0);
        for x in 0..20 {
            boundaries.fault.set(x, 2, 1.0);
        }
        let fluid = build_fluid(&elevation, &SeaLevelParams::default());
        let params = GeothermalParams {
            spread_blur_passes: 0,
            ..Default::default()
        };
        let fields = build_geothermal(&volcanoes, &boundaries, &fluid, &params);
        assert!(*fields.heat.get(2, 2) < *fields.heat.get(15, 2));
        assert_eq!(*fields.raw.get(2, 2), *fields.raw.get(15, 2));
    }

    #[test]
    fn test_quiet_world_has_no_heat() {
        let (volcanoes, boundaries, fluid) = inputs(4, 4, 0.5);
        let fields = build_geothermal(&volcanoes, &boundaries, &fluid, &GeothermalParams::default());
        assert!(fields.heat.values().iter().all(|&v| v == 0.0));
    }
}
