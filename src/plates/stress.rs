use serde::{Deserialize, Serialize};

use crate::field::{self, clamp01, Field};
use crate::tilemap::Tilemap;
use crate::timing::Timed;
use crate::value_noise::signed_value_noise;

use super::generation::PlateFields;
use super::types::{Plate, Vec2};

/// Parameters for plate boundary stress
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryParams {
    /// Height pressure from convergent (ridge) boundaries, before normalization
    pub ridge_strength: f32,
    /// Height loss at divergent (rift) boundaries, before normalization
    pub rift_strength: f32,
    /// Amplitude of plate-stable jitter along transform boundaries
    pub transform_roughness: f32,
    /// How far boundary effects spread, in tiles (blur passes = falloff / 2)
    pub boundary_falloff: f32,
    /// Small positive mark on every boundary so blur turns lines into ranges
    pub boundary_mark_strength: f32,
    /// Transform jitter noise frequency in tile units
    pub rough_noise_freq: f32,
    /// Scale applied to the approach speed before clamping
    pub approach_scale: f32,
    /// Ridge reduction per unit of shear
    pub ridge_shear_damping: f32,
    /// Rift reduction per unit of shear
    pub rift_shear_damping: f32,
    /// Blur the fault mask into a proximity field
    pub blur_fault_mask: bool,
    /// Fault blur passes relative to the stress blur passes
    pub fault_blur_mul: f32,
    /// Salt for the plate-stable jitter noise
    pub rough_seed_salt: u32,
}

impl Default for BoundaryParams {
    fn default() -> Self {
        Self {
            ridge_strength: 0.9,
            rift_strength: 0.6,
            transform_roughness: 0.25,
            boundary_falloff: 8.0,
            boundary_mark_strength: 0.05,
            rough_noise_freq: 1.8,
            approach_scale: 1.2,
            ridge_shear_damping: 0.5,
            rift_shear_damping: 0.3,
            blur_fault_mask: true,
            fault_blur_mul: 0.5,
            rough_seed_salt: 1337,
        }
    }
}

impl BoundaryParams {
    /// Blur passes used to spread the signed stress.
    pub fn stress_passes(&self) -> usize {
        ((self.boundary_falloff / 2.0).round() as i64).max(1) as usize
    }

    /// Blur passes used for the fault proximity mask.
    pub fn fault_passes(&self) -> usize {
        ((self.stress_passes() as f32 * self.fault_blur_mul).round() as i64).max(1) as usize
    }
}

/// Boundary outputs.
#[derive(Clone, Debug)]
pub struct BoundaryFields {
    /// Signed height pressure, [-1, +1]: ridges positive, rifts negative
    pub stress: Field,
    /// Boundary proximity/intensity, [0, 1]
    pub fault: Field,
}

/// Classification of one plate-pair contact.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundaryForce {
    pub convergent: f32,
    pub divergent: f32,
    pub transform: f32,
}

/// Classify the contact between two plates.
///
/// `relative_velocity` is `v(B) - v(A)` and `normal` points from A's seed to
/// B's seed. Negative approach means the plates collide.
pub fn boundary_force(relative_velocity: Vec2, normal: Vec2, approach_scale: f32) -> BoundaryForce {
    let approach = relative_velocity.dot(&normal);
    let shear = relative_velocity.cross(&normal).abs();
    BoundaryForce {
        convergent: clamp01(-approach * approach_scale),
        divergent: clamp01(approach * approach_scale),
        transform: clamp01(shear),
    }
}

/// Force felt by plate `a` where it touches plate `b`.
pub fn contact_force(a: &Plate, b: &Plate, approach_scale: f32) -> BoundaryForce {
    let relative = b.velocity - a.velocity;
    let normal = (b.position - a.position).normalize();
    boundary_force(relative, normal, approach_scale)
}

/// Per-cell accumulated boundary activity before any spreading.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct CellStress {
    ridge: f32,
    rift: f32,
    rough: f32,
}

/// Raw (unblurred, unnormalized) signed stress and fault intensity.
///
/// Cells without a differing 4-neighbour contribute exactly zero.
pub fn raw_boundary_stress(plates: &PlateFields, params: &BoundaryParams) -> (Field, Field) {
    let plate_map = &plates.plate_map;
    let width = plate_map.width;
    let height = plate_map.height;

    let mut stress = field::zeros(width, height);
    let mut fault = field::zeros(width, height);

    for y in 0..height {
        for x in 0..width {
            let a_id = *plate_map.get(x, y);
            let a = &plates.plates[a_id.index()];

            let mut acc = CellStress::default();
            for (nx, ny) in plate_map.neighbors(x, y) {
                let b_id = *plate_map.get(nx, ny);
                if b_id == a_id {
                    continue;
                }
                let force = contact_force(a, &plates.plates[b_id.index()], params.approach_scale);
                acc.ridge += force.convergent * (1.0 - params.ridge_shear_damping * force.transform);
                acc.rift += force.divergent * (1.0 - params.rift_shear_damping * force.transform);
                acc.rough += force.transform;
            }

            if acc == CellStress::default() {
                continue;
            }

            let intensity = clamp01(acc.ridge.max(acc.rift).max(acc.rough));
            fault.set(x, y, intensity);

            // Plate-stable jitter: the same plate always perturbs identically
            let jitter = signed_value_noise(
                x as f32 * params.rough_noise_freq,
                y as f32 * params.rough_noise_freq,
                (a_id.0 as u32).wrapping_mul(92_821).wrapping_add(params.rough_seed_salt),
            );

            let mut v = acc.ridge * params.ridge_strength;
            v -= acc.rift * params.rift_strength;
            v += acc.rough * params.transform_roughness * jitter;
            v += intensity * params.boundary_mark_strength;
            stress.set(x, y, v);
        }
    }

    (stress, fault)
}

/// Compute boundary stress and fault proximity, spread into ranges by blur.
pub fn calculate_boundary_stress(plates: &PlateFields, params: &BoundaryParams) -> BoundaryFields {
    let _t = Timed::info("plate boundaries");

    let (raw_stress, raw_fault) = raw_boundary_stress(plates, params);

    let boundary_cells = raw_fault.values().iter().filter(|&&v| v > 0.0).count();
    log::debug!("{} boundary cells", boundary_cells);

    let stress = field::normalize_signed(field::blur(&raw_stress, params.stress_passes()));

    let fault = if params.blur_fault_mask {
        field::blur(&raw_fault, params.fault_passes())
    } else {
        raw_fault
    };
    let fault = field::normalize_01(fault);

    BoundaryFields { stress, fault }
}

/// Positive (convergent) part of a signed stress value.
pub fn convergence(stress: &Tilemap<f32>, x: usize, y: usize) -> f32 {
    clamp01(*stress.get(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plates::{build_tectonic_plates, PlateId, PlateParams};
    use approx::assert_abs_diff_eq;

    fn plate(id: u8, x: f32, y: f32, vx: f32, vy: f32) -> Plate {
        Plate {
            id: PlateId(id),
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            continental_bias: 0.5,
        }
    }

    fn two_plate_world(a: Plate, b: Plate, width: usize, height: usize) -> PlateFields {
        let plates = vec![a, b];
        let plate_map = crate::plates::assign_ownership(width, height, &plates);
        PlateFields { plates, plate_map }
    }

    #[test]
    fn test_head_on_collision_is_convergent() {
        let a = plate(0, 0.0, 0.0, 1.0, 0.0);
        let b = plate(1, 10.0, 0.0, -1.0, 0.0);
        let force = contact_force(&a, &b, 1.2);
        assert_abs_diff_eq!(force.convergent, 1.0);
        assert_abs_diff_eq!(force.divergent, 0.0);
        assert_abs_diff_eq!(force.transform, 0.0);
    }

    #[test]
    fn test_negated_relative_velocity_swaps_classification() {
        let rel = Vec2::new(-0.4, 0.1);
        let normal = Vec2::new(1.0, 0.0);
        let forward = boundary_force(rel, normal, 1.2);
        let mirrored = boundary_force(-rel, normal, 1.2);

        assert!(forward.convergent > 0.0);
        assert_abs_diff_eq!(forward.divergent, 0.0);
        assert_abs_diff_eq!(mirrored.divergent, forward.convergent);
        assert_abs_diff_eq!(mirrored.convergent, forward.divergent);
        assert_abs_diff_eq!(mirrored.transform, forward.transform);
    }

    #[test]
    fn test_both_sides_of_a_collision_see_a_ridge() {
        let a = plate(0, 2.0, 3.0, 0.5, 0.2);
        let b = plate(1, 9.0, 4.0, -0.6, 0.0);
        let from_a = contact_force(&a, &b, 1.2);
        let from_b = contact_force(&b, &a, 1.2);
        assert!(from_a.convergent > 0.0);
        assert_abs_diff_eq!(from_a.convergent, from_b.convergent, epsilon = 1e-6);
        assert_abs_diff_eq!(from_a.transform, from_b.transform, epsilon = 1e-6);
    }

    #[test]
    fn test_pure_shear_is_transform() {
        let force = boundary_force(Vec2::new(0.0, 0.7), Vec2::new(1.0, 0.0), 1.2);
        assert_abs_diff_eq!(force.transform, 0.7);
        assert_abs_diff_eq!(force.convergent, 0.0);
        assert_abs_diff_eq!(force.divergent, 0.0);
    }

    #[test]
    fn test_single_plate_has_no_stress() {
        let params = PlateParams {
            plate_count: 1,
            ..Default::default()
        };
        let plates = build_tectonic_plates(32, 16, 5, &params);
        let (raw_stress, raw_fault) = raw_boundary_stress(&plates, &BoundaryParams::default());
        assert!(raw_stress.values().iter().all(|&v| v == 0.0));
        assert!(raw_fault.values().iter().all(|&v| v == 0.0));

        let fields = calculate_boundary_stress(&plates, &BoundaryParams::default());
        assert!(fields.stress.values().iter().all(|&v| v == 0.0));
        assert!(fields.fault.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_raw_stress_only_on_boundary() {
        let world = two_plate_world(
            plate(0, 2.0, 4.0, 1.0, 0.0),
            plate(1, 13.0, 4.0, -1.0, 0.0),
            16,
            8,
        );
        let (raw_stress, raw_fault) = raw_boundary_stress(&world, &BoundaryParams::default());

        // Boundary sits between x = 7 and x = 8
        for y in 0..8 {
            for x in 0..16 {
                let on_boundary = x == 7 || x == 8;
                assert_eq!(*raw_fault.get(x, y) > 0.0, on_boundary, "({}, {})", x, y);
                if on_boundary {
                    assert!(*raw_stress.get(x, y) > 0.0, "collision should push up");
                }
            }
        }
    }

    #[test]
    fn test_spread_fields_in_range() {
        let world = two_plate_world(
            plate(0, 2.0, 4.0, -1.0, 0.3),
            plate(1, 13.0, 4.0, 1.0, 0.0),
            16,
            8,
        );
        let fields = calculate_boundary_stress(&world, &BoundaryParams::default());
        assert!(fields.stress.values().iter().all(|v| (-1.0..=1.0).contains(v)));
        assert!(fields.fault.values().iter().all(|v| (0.0..=1.0).contains(v)));
        // Separating plates open a rift
        assert!(fields.stress.min_max().0 < 0.0);
    }

    #[test]
    fn test_pass_counts() {
        let params = BoundaryParams::default();
        assert_eq!(params.stress_passes(), 4);
        assert_eq!(params.fault_passes(), 2);
    }
}
