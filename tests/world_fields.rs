//! Whole-pipeline properties of `build_world_fields`.

use approx::assert_abs_diff_eq;

use planet_fields::craters::crater_count;
use planet_fields::field::normalize_01;
use planet_fields::plates::{build_tectonic_plates, calculate_boundary_stress, BoundaryParams, PlateParams};
use planet_fields::{build_world_fields, FieldRange, WorldError, WorldFields, WorldParams};

const TOLERANCE: f32 = 1e-5;

fn world(width: usize, height: usize, seed: u64) -> WorldFields {
    build_world_fields(width, height, seed, &WorldParams::default()).unwrap()
}

fn assert_ranges(world: &WorldFields) {
    for f in world.named_fields() {
        let (lo, hi) = match f.range {
            FieldRange::Unit => (0.0, 1.0),
            FieldRange::Signed => (-1.0, 1.0),
        };
        for &v in f.field.values() {
            assert!(v.is_finite(), "{} has non-finite value", f.name);
            assert!(
                v >= lo - TOLERANCE && v <= hi + TOLERANCE,
                "{} value {} outside [{}, {}]",
                f.name,
                v,
                lo,
                hi
            );
        }
    }
}

#[test]
fn test_same_seed_same_world() {
    let a = world(48, 24, 1234);
    let b = world(48, 24, 1234);
    for (fa, fb) in a.named_fields().iter().zip(b.named_fields().iter()) {
        assert_eq!(fa.name, fb.name);
        assert_eq!(fa.field, fb.field, "{} differs between runs", fa.name);
    }
    assert_eq!(a.plates.plate_map, b.plates.plate_map);
    assert_eq!(a.volcanoes.volcanoes, b.volcanoes.volcanoes);
}

#[test]
fn test_different_seed_different_elevation() {
    assert_ne!(world(48, 24, 1).elevation.elevation, world(48, 24, 2).elevation.elevation);
}

#[test]
fn test_field_ranges() {
    for (w, h, seed) in [(64, 32, 42), (37, 53, 7), (96, 48, 2024)] {
        assert_ranges(&world(w, h, seed));
    }
}

#[test]
fn test_tiny_worlds() {
    for (w, h) in [(1, 1), (1, 7), (9, 1), (2, 2)] {
        let world = world(w, h, 99);
        assert_ranges(&world);
        for f in world.named_fields() {
            assert_eq!(f.field.len(), w * h, "{}", f.name);
        }
    }
}

#[test]
fn test_water_matches_sea_level() {
    let world = world(64, 32, 42);
    let sea_level = WorldParams::default().sea_level.sea_level;
    assert_eq!(world.fluid.sea_level, sea_level);

    for (x, y, &e) in world.elevation.elevation.iter() {
        let water = world.fluid.is_water_at(x, y);
        assert_eq!(water, e <= sea_level, "({}, {}) elevation {}", x, y, e);
        assert_abs_diff_eq!(*world.fluid.alt_from_sea.get(x, y), e - sea_level, epsilon = 1e-6);
        if water {
            assert_eq!(*world.fluid.alt_above_sea.get(x, y), 0.0);
            assert_eq!(*world.morphology.peak.get(x, y), 0.0);
        } else {
            assert_eq!(*world.morphology.peak_below_sea.get(x, y), 0.0);
        }
    }
}

#[test]
fn test_reference_world_has_water_and_land() {
    let world = world(64, 32, 42);
    let land = world.fluid.land_fraction();
    assert!(land > 0.0 && land < 1.0, "land fraction {}", land);

    let (mn, mx) = world.elevation.elevation.min_max();
    assert_eq!(mn, 0.0);
    assert_abs_diff_eq!(mx, 1.0, epsilon = 1e-6);
}

#[test]
fn test_crater_count_from_area() {
    let params = WorldParams::default();
    assert_eq!(params.craters.tiles_per_crater, 3200);
    assert_eq!(crater_count(96, 96, &params.craters), 2);

    let world = world(96, 96, 5);
    let (_, mx) = world.craters.crater_mask.min_max();
    assert_abs_diff_eq!(mx, 1.0, epsilon = 1e-6);
}

#[test]
fn test_ownership_is_total_and_nearest() {
    let world = world(40, 30, 17);
    let plates = &world.plates.plates;
    assert_eq!(plates.len(), PlateParams::default().plate_count);

    for (x, y, id) in world.plates.plate_map.iter() {
        assert!(id.index() < plates.len());
        let d2 = |i: usize| {
            let dx = x as f32 - plates[i].position.x;
            let dy = y as f32 - plates[i].position.y;
            dx * dx + dy * dy
        };
        let owner = d2(id.index());
        for i in 0..plates.len() {
            assert!(owner <= d2(i), "({}, {}) closer to plate {}", x, y, i);
        }
    }
}

#[test]
fn test_single_plate_has_no_stress() {
    let params = PlateParams {
        plate_count: 1,
        ..Default::default()
    };
    let plates = build_tectonic_plates(32, 16, 3, &params);
    let boundaries = calculate_boundary_stress(&plates, &BoundaryParams::default());
    assert!(boundaries.stress.values().iter().all(|&v| v == 0.0));
    assert!(boundaries.fault.values().iter().all(|&v| v == 0.0));
}

#[test]
fn test_single_plate_world_still_builds() {
    let mut params = WorldParams::default();
    params.plates.plate_count = 1;
    let world = build_world_fields(32, 16, 3, &params).unwrap();
    assert_ranges(&world);
    let first = *world.plate_bias.plate_bias.get(0, 0);
    assert!(world.plate_bias.plate_bias.values().iter().all(|&v| v == first));
    assert!(world.boundaries.fault.values().iter().all(|&v| v == 0.0));
    assert!(world.volcanoes.volcanoes.len() <= params.volcanoes.max_volcanoes);
}

#[test]
fn test_normalize_01_is_idempotent() {
    let world = world(32, 32, 8);
    let once = world.climate.temperature.temperature.clone();
    let twice = normalize_01(once.clone());
    for (a, b) in once.values().iter().zip(twice.values()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
    }
}

#[test]
fn test_invalid_dimensions() {
    let params = WorldParams::default();
    for (w, h) in [(0, 0), (0, 5), (5, 0)] {
        match build_world_fields(w, h, 1, &params) {
            Err(WorldError::InvalidDimensions { width, height }) => assert_eq!((width, height), (w, h)),
            other => panic!("expected InvalidDimensions, got {:?}", other.map(|_| ())),
        }
    }
}

#[test]
fn test_params_from_json_change_output() {
    let params = WorldParams::from_json_str(r#"{ "sea_level": { "sea_level": 0.9 } }"#).unwrap();
    let wet = build_world_fields(48, 24, 42, &params).unwrap();
    let dry = world(48, 24, 42);
    assert!(wet.fluid.land_fraction() < dry.fluid.land_fraction());
    assert_eq!(wet.elevation.elevation, dry.elevation.elevation);
}
