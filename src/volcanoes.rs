//! Volcanoes placed along faults: shield and strato cones, calderas and ash.
//!
//! Placement favours high fault proximity, and the type follows the local
//! tectonics: convergent boundaries mostly grow steep stratovolcanoes, quiet
//! interiors grow broad shields. Ash is a mask only; it never changes height.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::field::{self, clamp01, lerp, smooth_union, Field};
use crate::plates::{convergence, BoundaryFields};
use crate::timing::Timed;
use crate::value_noise::{noise_seed, signed_value_noise};

/// Parameters for volcano placement and shape
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolcanoParams {
    // Placement
    pub tiles_per_volcano: usize,
    pub min_volcanoes: usize,
    pub max_volcanoes: usize,
    pub min_spacing_tiles: usize,
    /// Higher => stronger bias toward faults
    pub fault_power: f32,

    // Base radius in tiles, before the type multiplier
    pub radius_min_tiles: f32,
    pub radius_max_tiles: f32,

    pub cone_height_min: f32,
    pub cone_height_max: f32,

    pub warp: f32,
    pub roughness: f32,

    pub caldera_chance: f32,
    pub caldera_depth_min: f32,
    pub caldera_depth_max: f32,

    pub ash_strength: f32,
    pub ash_radius_mul: f32,

    // Stratovolcano chance: base + fault_weight * fault^fault_pow + conv_weight * convergence
    pub strato_base: f32,
    pub strato_fault_weight: f32,
    pub strato_conv_weight: f32,
    pub strato_fault_pow: f32,
}

impl Default for VolcanoParams {
    fn default() -> Self {
        Self {
            tiles_per_volcano: 2400,
            min_volcanoes: 1,
            max_volcanoes: 24,
            min_spacing_tiles: 10,
            fault_power: 2.2,
            radius_min_tiles: 6.0,
            radius_max_tiles: 22.0,
            cone_height_min: 0.18,
            cone_height_max: 0.42,
            warp: 0.20,
            roughness: 0.06,
            caldera_chance: 0.35,
            caldera_depth_min: 0.05,
            caldera_depth_max: 0.18,
            ash_strength: 0.55,
            ash_radius_mul: 2.2,
            strato_base: 0.15,
            strato_fault_weight: 0.75,
            strato_conv_weight: 0.85,
            strato_fault_pow: 1.2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolcanoKind {
    Shield,
    Strato,
}

/// Shape multipliers per volcano type.
#[derive(Clone, Copy, Debug, PartialEq)]
struct VolcanoShape {
    radius_mul: f32,
    height_mul: f32,
    falloff_power: f32,
    ash_mul: f32,
    rough_mul: f32,
    caldera_mul: f32,
    caldera_radius_mul: f32,
}

impl VolcanoKind {
    fn shape(self) -> VolcanoShape {
        match self {
            VolcanoKind::Shield => VolcanoShape {
                radius_mul: 1.55,
                height_mul: 0.72,
                falloff_power: 1.15,
                ash_mul: 0.70,
                rough_mul: 0.70,
                caldera_mul: 0.70,
                caldera_radius_mul: 0.18,
            },
            VolcanoKind::Strato => VolcanoShape {
                radius_mul: 0.78,
                height_mul: 1.25,
                falloff_power: 3.00,
                ash_mul: 1.35,
                rough_mul: 1.15,
                caldera_mul: 1.10,
                caldera_radius_mul: 0.26,
            },
        }
    }
}

/// A placed volcano.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Volcano {
    pub x: usize,
    pub y: usize,
    pub kind: VolcanoKind,
    /// Cone radius in tiles, after the type multiplier
    pub radius: f32,
    pub caldera: bool,
}

#[derive(Clone, Debug)]
pub struct VolcanoFields {
    /// Signed height contribution, [-1, +1]
    pub volcano: Field,
    /// Cone influence, [0, 1]
    pub volcano_mask: Field,
    /// Ash blanket, [0, 1]
    pub ash_mask: Field,
    pub volcanoes: Vec<Volcano>,
}

pub fn volcano_count(width: usize, height: usize, params: &VolcanoParams) -> usize {
    let raw = (width * height) / params.tiles_per_volcano.max(1);
    raw.clamp(params.min_volcanoes, params.max_volcanoes.max(params.min_volcanoes))
}

pub fn build_volcanoes(
    width: usize,
    height: usize,
    boundaries: &BoundaryFields,
    seed: u64,
    params: &VolcanoParams,
) -> VolcanoFields {
    let _t = Timed::info("volcanoes");

    let count = volcano_count(width, height, params);
    let centers = pick_centers(&boundaries.fault, seed ^ 0x51ED, count, params);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let base_seed = noise_seed(seed);

    let mut stamp = VolcanoStamp {
        height: field::zeros(width, height),
        volcano_mask: field::zeros(width, height),
        ash_mask: field::zeros(width, height),
    };
    let mut volcanoes = Vec::with_capacity(centers.len());

    for (i, &(cx, cy)) in centers.iter().enumerate() {
        let base_radius = lerp(params.radius_min_tiles, params.radius_max_tiles, rng.gen::<f32>());
        let cone_height = lerp(params.cone_height_min, params.cone_height_max, rng.gen::<f32>());
        let warp = params.warp * (0.6 + rng.gen::<f32>() * 0.8);
        let caldera_depth = if rng.gen::<f32>() < params.caldera_chance {
            lerp(params.caldera_depth_min, params.caldera_depth_max, rng.gen::<f32>())
        } else {
            0.0
        };

        let noise_seed = base_seed.wrapping_add((i as u32).wrapping_mul(4099));
        let kind = choose_kind(boundaries, cx, cy, noise_seed, params);
        let shape = kind.shape();

        let volcano = Volcano {
            x: cx,
            y: cy,
            kind,
            radius: (base_radius * shape.radius_mul).max(3.0),
            caldera: caldera_depth > 0.0,
        };
        stamp.stamp(&volcano, cone_height, caldera_depth, warp, noise_seed, params);
        volcanoes.push(volcano);
    }

    let strato = volcanoes.iter().filter(|v| v.kind == VolcanoKind::Strato).count();
    log::debug!(
        "Placed {} volcanoes ({} strato, {} shield)",
        volcanoes.len(),
        strato,
        volcanoes.len() - strato
    );

    VolcanoFields {
        volcano: field::normalize_signed(stamp.height),
        volcano_mask: field::normalize_01(stamp.volcano_mask),
        ash_mask: field::normalize_01(stamp.ash_mask),
        volcanoes,
    }
}

/// Rejection-sample centres weighted by `fault^fault_power`, keeping the
/// minimum spacing. Tops up with uniform cells if attempts run out.
fn pick_centers(fault: &Field, seed: u64, count: usize, params: &VolcanoParams) -> Vec<(usize, usize)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut chosen: Vec<(usize, usize)> = Vec::with_capacity(count);

    let min_spacing2 = (params.min_spacing_tiles * params.min_spacing_tiles) as f32;
    let attempts = (count * 80).max(1);

    for _ in 0..attempts {
        if chosen.len() >= count {
            break;
        }

        let x = rng.gen_range(0..fault.width);
        let y = rng.gen_range(0..fault.height);

        let weight = fault.get(x, y).powf(params.fault_power);
        if rng.gen::<f32>() > weight {
            continue;
        }

        let spaced = chosen.iter().all(|&(cx, cy)| {
            let dx = x as f32 - cx as f32;
            let dy = y as f32 - cy as f32;
            dx * dx + dy * dy >= min_spacing2
        });
        if spaced {
            chosen.push((x, y));
        }
    }

    if chosen.len() < count {
        log::debug!("Volcano placement fell back to uniform for {} centres", count - chosen.len());
    }
    while chosen.len() < count {
        chosen.push((rng.gen_range(0..fault.width), rng.gen_range(0..fault.height)));
    }

    chosen
}

fn choose_kind(boundaries: &BoundaryFields, x: usize, y: usize, noise_seed: u32, params: &VolcanoParams) -> VolcanoKind {
    let fault = *boundaries.fault.get(x, y);
    let convergent = convergence(&boundaries.stress, x, y);

    let strato_chance = clamp01(
        params.strato_base
            + params.strato_fault_weight * fault.powf(params.strato_fault_pow)
            + params.strato_conv_weight * convergent,
    );

    let mut rng = ChaCha8Rng::seed_from_u64((noise_seed ^ 0xA11CE) as u64);
    if rng.gen::<f32>() < strato_chance {
        VolcanoKind::Strato
    } else {
        VolcanoKind::Shield
    }
}

/// Accumulation buffers for volcano stamping.
struct VolcanoStamp {
    height: Field,
    volcano_mask: Field,
    ash_mask: Field,
}

impl VolcanoStamp {
    fn stamp(
        &mut self,
        volcano: &Volcano,
        cone_height: f32,
        caldera_depth: f32,
        warp: f32,
        noise_seed: u32,
        params: &VolcanoParams,
    ) {
        let width = self.height.width;
        let height = self.height.height;
        let shape = volcano.kind.shape();

        let cx = volcano.x as f32;
        let cy = volcano.y as f32;
        let r = volcano.radius;
        let h = cone_height * shape.height_mul;
        let caldera_d = caldera_depth * shape.caldera_mul;
        let r_caldera = r * shape.caldera_radius_mul;
        let r_ash = r * params.ash_radius_mul;

        let min_x = ((cx - r_ash).floor() as i64).clamp(0, width as i64 - 1) as usize;
        let max_x = ((cx + r_ash).ceil() as i64).clamp(0, width as i64 - 1) as usize;
        let min_y = ((cy - r_ash).floor() as i64).clamp(0, height as i64 - 1) as usize;
        let max_y = ((cy + r_ash).ceil() as i64).clamp(0, height as i64 - 1) as usize;

        // Noise frequencies follow the volcano size so small cones keep detail
        let warp_freq = (1.0 / (r * 0.55)).clamp(0.08, 0.45);
        let rough_freq = (1.0 / (r * 0.30)).clamp(0.10, 0.70);
        let ash_freq = (1.0 / (r * 1.10)).clamp(0.03, 0.20);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d > r_ash {
                    continue;
                }

                let (fx, fy) = (x as f32, y as f32);
                let jitter = signed_value_noise(fx * warp_freq, fy * warp_freq, noise_seed);
                let wd = d * (1.0 + warp * jitter);

                let mut delta = 0.0f32;

                if wd < r {
                    let u = clamp01(wd / r);
                    let cone = (1.0 - u).powf(shape.falloff_power);
                    delta += cone * h;

                    let rough = signed_value_noise(fx * rough_freq, fy * rough_freq, noise_seed ^ 0x1234);
                    delta += rough * params.roughness * shape.rough_mul * cone;

                    let m = self.volcano_mask.get_mut(x, y);
                    *m = smooth_union(*m, cone);
                }

                if caldera_d > 0.0 && wd < r_caldera {
                    let u = clamp01(wd / r_caldera);
                    delta -= (1.0 - u * u) * caldera_d;
                }

                let ash_core = 1.0 - clamp01(wd / r_ash);
                let ash_base = ash_core * ash_core * params.ash_strength * shape.ash_mul;
                let ash_tex = 0.78 + 0.22 * signed_value_noise(fx * ash_freq, fy * ash_freq, noise_seed ^ 0xBEEF);
                let a = self.ash_mask.get_mut(x, y);
                *a = smooth_union(*a, clamp01(ash_base * ash_tex));

                *self.height.get_mut(x, y) += delta;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_boundaries(width: usize, height: usize, fault: f32, stress: f32) -> BoundaryFields {
        BoundaryFields {
            stress: Field::new_with(width, height, stress),
            fault: Field::new_with(width, height, fault),
        }
    }

    #[test]
    fn test_volcano_count() {
        let params = VolcanoParams::default();
        assert_eq!(volcano_count(96, 96, &params), 3);
        assert_eq!(volcano_count(4, 4, &params), 1);
        assert_eq!(volcano_count(1000, 1000, &params), 24);
    }

    #[test]
    fn test_centers_respect_spacing_when_faults_everywhere() {
        let params = VolcanoParams::default();
        let fault = Field::new_with(120, 120, 1.0);
        let centers = pick_centers(&fault, 77, 6, &params);
        assert_eq!(centers.len(), 6);
        for (i, a) in centers.iter().enumerate() {
            for b in &centers[i + 1..] {
                let dx = a.0 as f32 - b.0 as f32;
                let dy = a.1 as f32 - b.1 as f32;
                assert!(dx * dx + dy * dy >= 100.0, "{:?} too close to {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_centers_fill_up_without_faults() {
        let fault = field::zeros(30, 30);
        let centers = pick_centers(&fault, 3, 4, &VolcanoParams::default());
        assert_eq!(centers.len(), 4);
        assert!(centers.iter().all(|&(x, y)| x < 30 && y < 30));
    }

    #[test]
    fn test_convergent_boundaries_make_stratovolcanoes() {
        // strato chance clamps to 1 on a strong convergent fault
        let boundaries = flat_boundaries(10, 10, 1.0, 1.0);
        let params = VolcanoParams::default();
        for seed in 0..16 {
            assert_eq!(choose_kind(&boundaries, 5, 5, seed, &params), VolcanoKind::Strato);
        }

        let never = VolcanoParams {
            strato_base: 0.0,
            ..Default::default()
        };
        let quiet = flat_boundaries(10, 10, 0.0, -1.0);
        for seed in 0..16 {
            assert_eq!(choose_kind(&quiet, 5, 5, seed, &never), VolcanoKind::Shield);
        }
    }

    #[test]
    fn test_volcano_fields_in_range() {
        let boundaries = flat_boundaries(64, 64, 0.8, 0.2);
        let fields = build_volcanoes(64, 64, &boundaries, 12, &VolcanoParams::default());

        assert_eq!(fields.volcanoes.len(), 1);
        let (mn, mx) = fields.volcano.min_max();
        assert!(mn >= -1.0 && mx <= 1.0);
        assert!(mx > 0.0);
        for f in [&fields.volcano_mask, &fields.ash_mask] {
            let (a, b) = f.min_max();
            assert!(a >= 0.0 && b <= 1.0);
        }

        assert!(fields.volcanoes[0].radius >= 3.0);
    }

    #[test]
    fn test_ash_reaches_beyond_the_cone() {
        let mut stamp = VolcanoStamp {
            height: field::zeros(60, 60),
            volcano_mask: field::zeros(60, 60),
            ash_mask: field::zeros(60, 60),
        };
        let volcano = Volcano {
            x: 30,
            y: 30,
            kind: VolcanoKind::Shield,
            radius: 5.0,
            caldera: false,
        };
        stamp.stamp(&volcano, 0.3, 0.0, 0.0, 9, &VolcanoParams::default());

        assert!(*stamp.height.get(30, 30) > 0.0);
        assert!(*stamp.volcano_mask.get(30, 30) > 0.99);
        // Between the cone edge and the ash edge (r * 2.2 = 11)
        assert_eq!(*stamp.volcano_mask.get(38, 30), 0.0);
        assert_eq!(*stamp.height.get(38, 30), 0.0);
        assert!(*stamp.ash_mask.get(38, 30) > 0.0);
        assert_eq!(*stamp.ash_mask.get(0, 0), 0.0);
    }

    #[test]
    fn test_volcanoes_deterministic() {
        let boundaries = flat_boundaries(50, 50, 0.5, 0.0);
        let params = VolcanoParams::default();
        let a = build_volcanoes(50, 50, &boundaries, 4, &params);
        let b = build_volcanoes(50, 50, &boundaries, 4, &params);
        assert_eq!(a.volcano, b.volcano);
        assert_eq!(a.volcanoes, b.volcanoes);
    }

    #[test]
    fn test_single_cell_world() {
        let boundaries = flat_boundaries(1, 1, 0.0, 0.0);
        let fields = build_volcanoes(1, 1, &boundaries, 0, &VolcanoParams::default());
        assert_eq!(fields.volcanoes.len(), 1);
        assert!((-1.0..=1.0).contains(fields.volcano.get(0, 0)));
    }
}
