pub mod generation;
pub mod stress;
pub mod types;

pub use generation::{assign_ownership, build_tectonic_plates, generate_plates, PlateFields, PlateParams};
pub use stress::{
    boundary_force, calculate_boundary_stress, contact_force, raw_boundary_stress, BoundaryFields,
    convergence, BoundaryForce, BoundaryParams,
};
pub use types::{Plate, PlateId, Vec2};
