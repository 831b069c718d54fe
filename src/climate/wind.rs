//! Surface wind speed from exposure, topography and circulation bands.
//!
//! Direction comes straight from the circulation bands; this module only
//! decides how hard the wind blows at each tile.

use serde::{Deserialize, Serialize};

use crate::field::{self, clamp01, lerp, smooth_union, Field};
use crate::morphology::MorphologyFields;
use crate::sea_level::FluidFields;
use crate::tilemap::Tilemap;
use crate::timing::Timed;
use crate::value_noise::{fractal_noise, noise_seed};

use super::circulation::CirculationFields;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindParams {
    pub base_wind: f32,

    // Exposure and acceleration boosts
    pub coast_boost: f32,
    pub high_alt_boost: f32,
    pub peak_boost: f32,
    pub slope_boost: f32,
    pub water_speed_boost: f32,

    // Dampening
    pub basin_shelter: f32,
    pub roughness_drag: f32,

    // Curve shaping
    pub alt_power: f32,
    pub peak_power: f32,
    pub slope_power: f32,
    pub basin_power: f32,
    pub roughness_power: f32,

    pub noise_strength: f32,
    pub noise_period_tiles: f32,
    pub noise_octaves: u32,

    /// Absolute band multiplier range the circulation [0, 1] value maps onto
    pub band_speed_mul_min: f32,
    pub band_speed_mul_max: f32,
    /// 0 = ignore bands, 1 = full multiply
    pub band_speed_influence: f32,
}

impl Default for WindParams {
    fn default() -> Self {
        Self {
            base_wind: 0.20,
            coast_boost: 0.20,
            high_alt_boost: 0.25,
            peak_boost: 0.25,
            slope_boost: 0.18,
            water_speed_boost: 0.15,
            basin_shelter: 0.35,
            roughness_drag: 0.12,
            alt_power: 1.20,
            peak_power: 1.10,
            slope_power: 1.30,
            basin_power: 1.25,
            roughness_power: 1.00,
            noise_strength: 0.12,
            noise_period_tiles: 42.0,
            noise_octaves: 3,
            band_speed_mul_min: 0.4,
            band_speed_mul_max: 2.0,
            band_speed_influence: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WindFields {
    /// [0, 1]
    pub speed: Field,
    /// Prevailing direction, passed through from circulation
    pub dir_x: Field,
    pub dir_y: Field,
    /// Coast or altitude exposure, [0, 1]
    pub exposure: Field,
    /// Peak or slope acceleration on land, [0, 1]
    pub topo_accel: Field,
    /// Basin and roughness shelter on land, [0, 1]
    pub shelter: Field,
    /// Band multiplier as applied, [0, 1]
    pub band_speed_mul_abs: Field,
}

/// Shaped terrain terms for one tile.
#[derive(Clone, Copy, Debug, Default)]
struct TileTerms {
    land: f32,
    coast: f32,
    alt: f32,
    peak: f32,
    slope: f32,
    basin: f32,
    rough: f32,
}

impl TileTerms {
    fn sample(x: usize, y: usize, fluid: &FluidFields, morph: &MorphologyFields, params: &WindParams) -> Self {
        let land = 1.0 - clamp01(*fluid.is_water.get(x, y));
        let shaped = |f: &Field, power: f32| clamp01(*f.get(x, y)).powf(power) * land;
        Self {
            land,
            coast: clamp01(*fluid.coast.get(x, y)),
            alt: clamp01(*fluid.alt_above_sea.get(x, y)).powf(params.alt_power),
            peak: shaped(&morph.peak, params.peak_power),
            slope: shaped(&morph.steepness, params.slope_power),
            basin: shaped(&morph.basin, params.basin_power),
            rough: shaped(&morph.roughness, params.roughness_power),
        }
    }
}

pub fn build_wind(
    fluid: &FluidFields,
    morphology: &MorphologyFields,
    circulation: &CirculationFields,
    seed: u64,
    params: &WindParams,
) -> WindFields {
    let _t = Timed::info("wind");
    let (width, height) = (fluid.is_water.width, fluid.is_water.height);

    let noise = field::normalize_signed(fractal_noise(
        width,
        height,
        1.0,
        noise_seed(seed),
        params.noise_period_tiles,
        params.noise_octaves,
    ));

    let terms = Tilemap::from_fn(width, height, |x, y| TileTerms::sample(x, y, fluid, morphology, params));

    let exposure = terms.map(|t| clamp01(smooth_union(t.coast, t.alt)));
    let topo_accel = terms.map(|t| clamp01(smooth_union(t.peak, t.slope)));
    let shelter = terms.map(|t| clamp01(t.basin * 0.75 + t.rough * 0.25));

    let mul_range = params.band_speed_mul_max - params.band_speed_mul_min;
    let band_mul = circulation
        .band_speed_mul
        .map(|&b| lerp(params.band_speed_mul_min, params.band_speed_mul_max, clamp01(b)));
    let band_speed_mul_abs = band_mul.map(|&m| clamp01((m - params.band_speed_mul_min) / mul_range.max(1e-6)));

    let influence = clamp01(params.band_speed_influence);
    let raw = Tilemap::from_fn(width, height, |x, y| {
        let t = terms.get(x, y);
        let water = 1.0 - t.land;

        let mut w = params.base_wind;
        w += t.coast * params.coast_boost;
        w += t.alt * params.high_alt_boost;
        w += t.peak * params.peak_boost;
        w += t.slope * params.slope_boost;
        w -= t.basin * params.basin_shelter;
        w -= t.rough * params.roughness_drag;
        w += water * params.water_speed_boost;
        w += noise.get(x, y) * params.noise_strength;

        w * lerp(1.0, *band_mul.get(x, y), influence)
    });

    WindFields {
        speed: field::normalize_01(raw),
        dir_x: circulation.dir_x.clone(),
        dir_y: circulation.dir_y.clone(),
        exposure,
        topo_accel,
        shelter,
        band_speed_mul_abs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::circulation::{build_circulation, CirculationParams};
    use crate::climate::latitude::{build_latitude, LatitudeParams};
    use crate::morphology::{build_morphology, MorphologyParams};
    use crate::sea_level::{build_fluid, SeaLevelParams};

    struct Chain {
        fluid: FluidFields,
        morphology: MorphologyFields,
        circulation: CirculationFields,
    }

    fn chain(elevation: &Field, latitude: LatitudeParams) -> Chain {
        let fluid = build_fluid(elevation, &SeaLevelParams::default());
        let morphology = build_morphology(elevation, &fluid, &MorphologyParams::default());
        let latitude = build_latitude(elevation.width, elevation.height, &latitude);
        let circulation = build_circulation(&latitude, &CirculationParams::default());
        Chain {
            fluid,
            morphology,
            circulation,
        }
    }

    fn quiet() -> WindParams {
        WindParams {
            noise_strength: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_open_water_is_windier_than_flat_land() {
        // Low plain with one high spot far away so the plain sits near sea level
        let mut elevation = Field::from_fn(30, 6, |x, _| if x < 15 { 0.2 } else { 0.45 });
        elevation.set(29, 0, 1.0);
        let c = chain(
            &elevation,
            LatitudeParams {
                mono_lat_percent: Some(1.0),
                ..Default::default()
            },
        );
        let fields = build_wind(&c.fluid, &c.morphology, &c.circulation, 1, &quiet());
        // Far from the coast on both sides
        assert!(*fields.speed.get(1, 3) > *fields.speed.get(22, 3));
    }

    #[test]
    fn test_direction_passes_through() {
        let elevation = Field::new_with(8, 8, 0.3);
        let c = chain(&elevation, LatitudeParams::default());
        let fields = build_wind(&c.fluid, &c.morphology, &c.circulation, 4, &WindParams::default());
        assert_eq!(fields.dir_x, c.circulation.dir_x);
        assert_eq!(fields.dir_y, c.circulation.dir_y);
    }

    #[test]
    fn test_topographic_layers_are_land_only() {
        let elevation = Field::from_fn(24, 24, |x, y| {
            let d = ((x as f32 - 16.0).powi(2) + (y as f32 - 12.0).powi(2)).sqrt();
            (0.95 - d * 0.05).max(0.1)
        });
        let c = chain(&elevation, LatitudeParams::default());
        let fields = build_wind(&c.fluid, &c.morphology, &c.circulation, 8, &WindParams::default());
        for (x, y, _) in elevation.iter() {
            if c.fluid.is_water_at(x, y) {
                assert_eq!(*fields.topo_accel.get(x, y), 0.0);
                assert_eq!(*fields.shelter.get(x, y), 0.0);
            }
        }
        for f in [
            &fields.speed,
            &fields.exposure,
            &fields.topo_accel,
            &fields.shelter,
            &fields.band_speed_mul_abs,
        ] {
            let (mn, mx) = f.min_max();
            assert!(mn >= 0.0 && mx <= 1.0);
        }
    }

    #[test]
    fn test_band_influence_off_ignores_circulation() {
        let elevation = Field::new_with(4, 16, 0.2);
        let c = chain(&elevation, LatitudeParams::default());
        let params = WindParams {
            band_speed_influence: 0.0,
            ..quiet()
        };
        let fields = build_wind(&c.fluid, &c.morphology, &c.circulation, 2, &params);
        // Uniform sea, no noise, no bands: a constant field normalizes to zero
        assert!(fields.speed.values().iter().all(|&v| v == 0.0));
    }
}
