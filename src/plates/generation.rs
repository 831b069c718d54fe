use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;
use crate::timing::Timed;

use super::types::{Plate, PlateId};

/// Parameters for plate generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateParams {
    /// Number of plates (clamped to 1..=255)
    pub plate_count: usize,
    /// Velocity magnitude range
    pub velocity_min: f32,
    pub velocity_max: f32,
    /// Probability a plate draws its bias from the continental range
    pub continental_chance: f32,
    /// Continental bias range (0..1)
    pub continental_bias_min: f32,
    pub continental_bias_max: f32,
    /// Oceanic bias range (0..1)
    pub oceanic_bias_min: f32,
    pub oceanic_bias_max: f32,
}

impl Default for PlateParams {
    fn default() -> Self {
        Self {
            plate_count: 14,
            velocity_min: 0.2,
            velocity_max: 1.0,
            continental_chance: 0.55,
            continental_bias_min: 0.6,
            continental_bias_max: 1.0,
            oceanic_bias_min: 0.0,
            oceanic_bias_max: 0.4,
        }
    }
}

impl PlateParams {
    pub fn clamped_plate_count(&self) -> usize {
        self.plate_count.clamp(1, u8::MAX as usize)
    }
}

/// Plates plus the cell-to-plate ownership map.
#[derive(Clone, Debug)]
pub struct PlateFields {
    pub plates: Vec<Plate>,
    pub plate_map: Tilemap<PlateId>,
}

/// Generate the plate list and assign every cell to its nearest plate.
pub fn build_tectonic_plates(width: usize, height: usize, seed: u64, params: &PlateParams) -> PlateFields {
    let _t = Timed::info("tectonic plates");

    let plates = generate_plates(width, height, seed, params);
    let plate_map = assign_ownership(width, height, &plates);

    let continental = plates.iter().filter(|p| p.is_continental()).count();
    log::debug!(
        "Created {} plates ({} continental, {} oceanic)",
        plates.len(),
        continental,
        plates.len() - continental
    );

    PlateFields { plates, plate_map }
}

/// Draw `plate_count` plates from a generator seeded with `seed`.
pub fn generate_plates(width: usize, height: usize, seed: u64, params: &PlateParams) -> Vec<Plate> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..params.clamped_plate_count())
        .map(|i| Plate::random(PlateId(i as u8), width, height, &mut rng, params))
        .collect()
}

/// Voronoi ownership: each cell goes to the plate with the nearest seed point
/// (squared Euclidean distance). Ties go to the earlier plate in the list.
///
/// This is an exhaustive O(cells * plates) scan. Fine for grids of a few
/// hundred cells per side and <= 32 plates; larger grids would want bucketing
/// or jump flooding.
pub fn assign_ownership(width: usize, height: usize, plates: &[Plate]) -> Tilemap<PlateId> {
    let mut ids = vec![PlateId::default(); width * height];

    ids.par_chunks_mut(width.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = nearest_plate(x as f32, y as f32, plates);
            }
        });

    Tilemap::from_vec(width, height, ids)
}

fn nearest_plate(x: f32, y: f32, plates: &[Plate]) -> PlateId {
    let mut best = PlateId::default();
    let mut best_d2 = f32::INFINITY;
    for plate in plates {
        let dx = x - plate.position.x;
        let dy = y - plate.position.y;
        let d2 = dx * dx + dy * dy;
        if d2 < best_d2 {
            best_d2 = d2;
            best = plate.id;
        }
    }
    best
}
