//! Three-cell atmospheric circulation: per-tile prevailing wind direction and
//! a band speed multiplier.
//!
//! Bands by distance from the equator: Hadley (easterlies), Ferrel
//! (westerlies), Polar (easterlies). +y points down the map, so "equatorward"
//! is +y in the northern half.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::field::{lerp, smoothstep, Field};
use crate::plates::Vec2;
use crate::timing::Timed;

use super::latitude::LatitudeFields;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CirculationParams {
    /// Band edges as distance from the equator (0 equator, 1 pole)
    pub hadley_max: f32,
    pub ferrel_max: f32,
    pub band_transition: f32,
    pub meridional_strength: f32,

    pub hadley_speed_mul: f32,
    pub ferrel_speed_mul: f32,
    pub polar_speed_mul: f32,
    pub jet_strength: f32,
    pub jet_center_dist_eq: f32,
    pub jet_sigma: f32,

    pub coriolis_strength: f32,
    pub coriolis_max_degrees: f32,
    pub coriolis_curve_power: f32,

    /// Absolute speed multiplier range mapped onto [0, 1]
    pub speed_mul_min: f32,
    pub speed_mul_max: f32,
}

impl Default for CirculationParams {
    fn default() -> Self {
        Self {
            hadley_max: 0.33,
            ferrel_max: 0.72,
            band_transition: 0.06,
            meridional_strength: 0.18,
            hadley_speed_mul: 0.85,
            ferrel_speed_mul: 1.20,
            polar_speed_mul: 0.80,
            jet_strength: 0.20,
            jet_center_dist_eq: 0.55,
            jet_sigma: 0.12,
            coriolis_strength: 0.55,
            coriolis_max_degrees: 35.0,
            coriolis_curve_power: 1.25,
            speed_mul_min: 0.4,
            speed_mul_max: 2.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CirculationFields {
    /// Unit wind direction, [-1, +1]
    pub dir_x: Field,
    pub dir_y: Field,
    /// Band speed multiplier mapped from [speed_mul_min, speed_mul_max] to [0, 1]
    pub band_speed_mul: Field,
}

/// Wind vector and speed multiplier for one latitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandWind {
    pub dir: Vec2,
    pub speed_mul: f32,
}

pub fn build_circulation(latitude: &LatitudeFields, params: &CirculationParams) -> CirculationFields {
    let _t = Timed::debug("circulation");
    let winds = latitude.latitude.map(|&l| band_wind(l, params));

    CirculationFields {
        dir_x: winds.map(|w| w.dir.x),
        dir_y: winds.map(|w| w.dir.y),
        band_speed_mul: winds.map(|w| w.speed_mul),
    }
}

/// Prevailing wind for a signed latitude.
pub fn band_wind(latitude: f32, params: &CirculationParams) -> BandWind {
    let lat = latitude.clamp(-1.0, 1.0);
    let dist_eq = lat.abs();

    let transition = params.band_transition.max(1e-6);
    let hadley_to_ferrel = smoothstep(0.0, 1.0, (dist_eq - params.hadley_max) / transition);
    let ferrel_to_polar = smoothstep(0.0, 1.0, (dist_eq - params.ferrel_max) / transition);

    let in_ferrel_or_below = dist_eq <= params.ferrel_max;
    let band_x = if in_ferrel_or_below {
        lerp(-1.0, 1.0, hadley_to_ferrel)
    } else {
        lerp(1.0, -1.0, ferrel_to_polar)
    };

    let equatorward = if lat < 0.0 { 1.0 } else { -1.0 };
    let band_y_dir = if dist_eq <= params.hadley_max || !in_ferrel_or_below {
        equatorward
    } else {
        -equatorward
    };
    let band_dir = Vec2::new(band_x, band_y_dir * params.meridional_strength).normalize();

    // Right turn in the north is clockwise with +y down, hence the negative sign
    let coriolis = dist_eq.powf(params.coriolis_curve_power);
    let turn_sign = if lat < 0.0 { -1.0 } else { 1.0 };
    let turn = turn_sign * params.coriolis_max_degrees * (PI / 180.0) * coriolis * params.coriolis_strength;
    let dir = band_dir.rotate(turn).normalize();

    let mut mul = if in_ferrel_or_below {
        lerp(params.hadley_speed_mul, params.ferrel_speed_mul, hadley_to_ferrel)
    } else {
        lerp(params.ferrel_speed_mul, params.polar_speed_mul, ferrel_to_polar)
    };
    if params.jet_strength > 0.0 {
        mul *= 1.0 + params.jet_strength * gauss(dist_eq, params.jet_center_dist_eq, params.jet_sigma);
    }
    let mul = mul.clamp(params.speed_mul_min, params.speed_mul_max);
    let range = (params.speed_mul_max - params.speed_mul_min).max(1e-6);

    BandWind {
        dir,
        speed_mul: ((mul - params.speed_mul_min) / range).clamp(0.0, 1.0),
    }
}

fn gauss(x: f32, mu: f32, sigma: f32) -> f32 {
    let z = (x - mu) / sigma.max(1e-6);
    (-0.5 * z * z).exp()
}
