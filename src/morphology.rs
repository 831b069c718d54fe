//! Terrain morphology: local peaks and basins, roughness, slope and normals.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::field::{self, Field, EPSILON};
use crate::sea_level::FluidFields;
use crate::tilemap::Tilemap;
use crate::timing::Timed;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphologyParams {
    /// Mean-filter window radius for peak/basin detection
    pub peak_basin_radius: usize,
    /// Window radius for roughness (smaller = micro roughness)
    pub roughness_radius: usize,
    /// Slope magnitude multiplier before `atan`; higher reaches 90 degrees sooner
    pub steepness_scale: f32,
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self {
            peak_basin_radius: 4,
            roughness_radius: 2,
            steepness_scale: 6.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MorphologyFields {
    pub peak: Field,
    pub basin: Field,
    pub peak_below_sea: Field,
    pub basin_below_sea: Field,
    pub roughness: Field,
    /// 0..1 mapped from 0..90 degrees, then normalized
    pub steepness: Field,
    /// Jointly normalized gradient, [-1, +1]
    pub grad_x: Field,
    pub grad_y: Field,
    /// Unit uphill direction, zero on flats
    pub normal_x: Field,
    pub normal_y: Field,
}

pub fn build_morphology(elevation: &Field, fluid: &FluidFields, params: &MorphologyParams) -> MorphologyFields {
    let _t = Timed::info("morphology");
    let sea = fluid.sea_level;

    // Water acts as a sea-level floor for land features, land as a ceiling
    // for seabed features
    let above = elevation.map(|&e| e.max(sea));
    let below = elevation.map(|&e| e.min(sea));

    let land = fluid.is_water.map(|&w| field::clamp01(1.0 - w));
    let water = fluid.is_water.map(|&w| field::clamp01(w));

    let (peak_all, basin_all) = peak_basin(&above, params.peak_basin_radius);
    let peak = field::normalize_01(masked(&peak_all, &land));
    let basin = field::normalize_01(masked(&basin_all, &land));

    let (peak_below_all, basin_below_all) = peak_basin(&below, params.peak_basin_radius);
    let peak_below_sea = field::normalize_01(masked(&peak_below_all, &water));
    let basin_below_sea = field::normalize_01(masked(&basin_below_all, &water));

    let roughness = roughness(elevation, params.roughness_radius);

    let (raw_x, raw_y) = central_gradient(elevation);

    let scale = params.steepness_scale.max(EPSILON);
    let steepness = Tilemap::from_fn(elevation.width, elevation.height, |x, y| {
        let g = raw_x.get(x, y).hypot(*raw_y.get(x, y));
        field::clamp01((g * scale).atan() / FRAC_PI_2)
    });
    let steepness = field::normalize_01(steepness);

    let (grad_x, grad_y) = field::normalize_vector_pair(raw_x, raw_y);

    let mut normal_x = field::zeros(elevation.width, elevation.height);
    let mut normal_y = field::zeros(elevation.width, elevation.height);
    for (i, (&gx, &gy)) in grad_x.values().iter().zip(grad_y.values()).enumerate() {
        let m = gx.hypot(gy);
        if m >= EPSILON {
            normal_x.values_mut()[i] = gx / m;
            normal_y.values_mut()[i] = gy / m;
        }
    }

    MorphologyFields {
        peak,
        basin,
        peak_below_sea,
        basin_below_sea,
        roughness,
        steepness,
        grad_x,
        grad_y,
        normal_x,
        normal_y,
    }
}

fn masked(values: &Field, mask: &Field) -> Field {
    Tilemap::from_fn(values.width, values.height, |x, y| values.get(x, y) * mask.get(x, y))
}

/// Mean over the in-bounds `(2r+1)^2` window around every cell.
fn local_mean(elev: &Field, radius: usize) -> Field {
    let w = elev.width;
    let h = elev.height;
    Tilemap::from_fn(w, h, |x, y| {
        let (x0, x1) = (x.saturating_sub(radius), (x + radius).min(w - 1));
        let (y0, y1) = (y.saturating_sub(radius), (y + radius).min(h - 1));
        let mut sum = 0.0f32;
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                sum += elev.get(nx, ny);
            }
        }
        sum / ((x1 - x0 + 1) * (y1 - y0 + 1)) as f32
    })
}

/// Height above (peak) and below (basin) the local mean, each in [0, 1].
fn peak_basin(elev: &Field, radius: usize) -> (Field, Field) {
    let mean = local_mean(elev, radius);
    let peak = Tilemap::from_fn(elev.width, elev.height, |x, y| (elev.get(x, y) - mean.get(x, y)).max(0.0));
    let basin = Tilemap::from_fn(elev.width, elev.height, |x, y| (mean.get(x, y) - elev.get(x, y)).max(0.0));
    (field::normalize_01(peak), field::normalize_01(basin))
}

/// Mean absolute deviation from the local mean, normalized.
fn roughness(elev: &Field, radius: usize) -> Field {
    let w = elev.width;
    let h = elev.height;
    let mean = local_mean(elev, radius);
    let mad = Tilemap::from_fn(w, h, |x, y| {
        let m = *mean.get(x, y);
        let (x0, x1) = (x.saturating_sub(radius), (x + radius).min(w - 1));
        let (y0, y1) = (y.saturating_sub(radius), (y + radius).min(h - 1));
        let mut sum = 0.0f32;
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                sum += (elev.get(nx, ny) - m).abs();
            }
        }
        sum / ((x1 - x0 + 1) * (y1 - y0 + 1)) as f32
    });
    field::normalize_01(mad)
}

/// Central differences with clamped edge sampling.
fn central_gradient(elev: &Field) -> (Field, Field) {
    let gx = Tilemap::from_fn(elev.width, elev.height, |x, y| {
        let (x, y) = (x as i64, y as i64);
        (elev.get_clamped(x + 1, y) - elev.get_clamped(x - 1, y)) * 0.5
    });
    let gy = Tilemap::from_fn(elev.width, elev.height, |x, y| {
        let (x, y) = (x as i64, y as i64);
        (elev.get_clamped(x, y + 1) - elev.get_clamped(x, y - 1)) * 0.5
    });
    (gx, gy)
}
