//! Sea-level classification: water mask, altitude above sea, thin air and coast.

use serde::{Deserialize, Serialize};

use crate::field::{self, clamp01, smoothstep, Field, EPSILON};
use crate::tilemap::Tilemap;
use crate::timing::Timed;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeaLevelParams {
    /// Elevation at or below which a cell is water, in [0, 1]
    pub sea_level: f32,
    /// Altitude above sea (unit) where air starts thinning
    pub thin_air_level: f32,
    pub thin_air_ramp: f32,
    /// Blur passes turning the coast outline into a proximity field
    pub coast_blur_passes: usize,
}

impl Default for SeaLevelParams {
    fn default() -> Self {
        Self {
            sea_level: 0.42,
            thin_air_level: 0.80,
            thin_air_ramp: 0.10,
            coast_blur_passes: 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FluidFields {
    /// 1 for water, 0 for land
    pub is_water: Field,
    /// `elevation - sea_level`
    pub alt_from_sea: Field,
    /// 0 at sea level and below, 1 at the highest land cell
    pub alt_above_sea: Field,
    pub thin_air: Field,
    /// Coast proximity, [0, 1]
    pub coast: Field,
    /// Threshold these fields were classified with
    pub sea_level: f32,
}

impl FluidFields {
    pub fn is_water_at(&self, x: usize, y: usize) -> bool {
        *self.is_water.get(x, y) > 0.5
    }

    /// Fraction of cells above sea level.
    pub fn land_fraction(&self) -> f32 {
        if self.is_water.is_empty() {
            return 0.0;
        }
        let land = self.is_water.values().iter().filter(|&&w| w < 0.5).count();
        land as f32 / self.is_water.len() as f32
    }
}

pub fn build_fluid(elevation: &Field, params: &SeaLevelParams) -> FluidFields {
    let _t = Timed::info("sea level");
    let sea_level = params.sea_level;

    let alt_from_sea = elevation.map(|&e| e - sea_level);
    let is_water = alt_from_sea.map(|&a| if a <= 0.0 { 1.0 } else { 0.0 });

    let max_above = alt_from_sea.values().iter().fold(0.0f32, |m, &a| m.max(a));
    let inv_max_above = if max_above > EPSILON { 1.0 / max_above } else { 0.0 };
    let alt_above_sea = alt_from_sea.map(|&a| if a > 0.0 { clamp01(a * inv_max_above) } else { 0.0 });

    let start = clamp01(params.thin_air_level);
    let ramp = params.thin_air_ramp.max(EPSILON);
    let thin_air = alt_above_sea.map(|&a| smoothstep(start, start + ramp, a));

    let coast = field::normalize_01(field::blur(&coast_outline(&is_water), params.coast_blur_passes));

    FluidFields {
        is_water,
        alt_from_sea,
        alt_above_sea,
        thin_air,
        coast,
        sea_level,
    }
}

/// 1 where a cell's clamped 4-neighbourhood mixes water and land.
fn coast_outline(is_water: &Field) -> Field {
    Tilemap::from_fn(is_water.width, is_water.height, |x, y| {
        let w = *is_water.get(x, y);
        let (x, y) = (x as i64, y as i64);
        let mixed = [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
            .iter()
            .any(|&(nx, ny)| *is_water.get_clamped(nx, ny) != w);
        if mixed {
            1.0
        } else {
            0.0
        }
    })
}
