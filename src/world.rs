//! World orchestrator
//!
//! Builds every field in dependency order and bundles the results into a
//! single read-only [`WorldFields`] aggregate.

use crate::climate::{self, build_latitude, ClimateFields, ClimateInputs};
use crate::config::WorldParams;
use crate::continent::{build_continent, ContinentFields};
use crate::craters::{build_craters, CraterFields};
use crate::error::{Result, WorldError};
use crate::field::Field;
use crate::heightmap::{build_elevation, ElevationFields, ElevationInputs};
use crate::morphology::{build_morphology, MorphologyFields};
use crate::plate_bias::{build_plate_bias, PlateBiasFields};
use crate::plates::{build_tectonic_plates, calculate_boundary_stress, BoundaryFields, PlateFields};
use crate::sea_level::{build_fluid, FluidFields};
use crate::seeds::WorldSeeds;
use crate::terrain_noise::{build_terrain_noise, TerrainNoiseFields};
use crate::timing::Timed;
use crate::volcanoes::{build_volcanoes, VolcanoFields};

/// Value range a named field is guaranteed to lie in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRange {
    /// [0, 1]
    Unit,
    /// [-1, +1]
    Signed,
}

impl FieldRange {
    pub fn contains(self, v: f32) -> bool {
        match self {
            FieldRange::Unit => (0.0..=1.0).contains(&v),
            FieldRange::Signed => (-1.0..=1.0).contains(&v),
        }
    }
}

/// A field together with its name and range.
#[derive(Clone, Copy, Debug)]
pub struct NamedField<'a> {
    pub name: &'static str,
    pub range: FieldRange,
    pub field: &'a Field,
}

/// All generated world data bundled together
#[derive(Clone, Debug)]
pub struct WorldFields {
    /// Seeds used for generation (allows recreation)
    pub seeds: WorldSeeds,
    pub width: usize,
    pub height: usize,
    pub plates: PlateFields,
    pub boundaries: BoundaryFields,
    pub continent: ContinentFields,
    pub plate_bias: PlateBiasFields,
    pub terrain_noise: TerrainNoiseFields,
    pub craters: CraterFields,
    pub volcanoes: VolcanoFields,
    pub elevation: ElevationFields,
    pub fluid: FluidFields,
    pub morphology: MorphologyFields,
    pub climate: ClimateFields,
}

impl WorldFields {
    /// Convenience accessor for master seed
    pub fn seed(&self) -> u64 {
        self.seeds.master
    }

    /// Every scalar field, in pipeline order.
    pub fn named_fields(&self) -> Vec<NamedField<'_>> {
        use FieldRange::{Signed, Unit};

        let m = &self.morphology;
        let c = &self.climate;
        let entries: [(&'static str, FieldRange, &Field); 42] = [
            ("continent", Signed, &self.continent.continent),
            ("plate_bias", Signed, &self.plate_bias.plate_bias),
            ("boundary_stress", Signed, &self.boundaries.stress),
            ("fault", Unit, &self.boundaries.fault),
            ("terrain_noise", Signed, &self.terrain_noise.noise),
            ("crater", Signed, &self.craters.crater),
            ("crater_mask", Unit, &self.craters.crater_mask),
            ("volcano", Signed, &self.volcanoes.volcano),
            ("volcano_mask", Unit, &self.volcanoes.volcano_mask),
            ("ash_mask", Unit, &self.volcanoes.ash_mask),
            ("elevation", Unit, &self.elevation.elevation),
            ("is_water", Unit, &self.fluid.is_water),
            ("alt_from_sea", Signed, &self.fluid.alt_from_sea),
            ("alt_above_sea", Unit, &self.fluid.alt_above_sea),
            ("thin_air", Unit, &self.fluid.thin_air),
            ("coast", Unit, &self.fluid.coast),
            ("peak", Unit, &m.peak),
            ("basin", Unit, &m.basin),
            ("peak_below_sea", Unit, &m.peak_below_sea),
            ("basin_below_sea", Unit, &m.basin_below_sea),
            ("roughness", Unit, &m.roughness),
            ("steepness", Unit, &m.steepness),
            ("grad_x", Signed, &m.grad_x),
            ("grad_y", Signed, &m.grad_y),
            ("normal_x", Signed, &m.normal_x),
            ("normal_y", Signed, &m.normal_y),
            ("latitude", Signed, &c.latitude.latitude),
            ("band_speed_mul", Unit, &c.circulation.band_speed_mul),
            ("geothermal_raw", Unit, &c.geothermal.raw),
            ("geothermal", Unit, &c.geothermal.heat),
            ("temperature", Unit, &c.temperature.temperature),
            ("temperature_base", Unit, &c.temperature.temperature_base),
            ("lat_heat", Unit, &c.temperature.lat_heat),
            ("alt_cool", Unit, &c.temperature.alt_cool),
            ("pressure", Unit, &c.pressure.pressure),
            ("wind_speed", Unit, &c.wind.speed),
            ("wind_dir_x", Signed, &c.wind.dir_x),
            ("wind_dir_y", Signed, &c.wind.dir_y),
            ("wind_exposure", Unit, &c.wind.exposure),
            ("wind_topo_accel", Unit, &c.wind.topo_accel),
            ("wind_shelter", Unit, &c.wind.shelter),
            ("wind_band_speed_mul", Unit, &c.wind.band_speed_mul_abs),
        ];

        entries
            .into_iter()
            .map(|(name, range, field)| NamedField { name, range, field })
            .collect()
    }

    /// Look up a field by name, e.g. `"elevation"` or `"wind_speed"`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.named_fields()
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.field)
    }
}

/// Build every field for a `width` x `height` world from one master seed.
pub fn build_world_fields(width: usize, height: usize, seed: u64, params: &WorldParams) -> Result<WorldFields> {
    build_world_fields_with_seeds(width, height, WorldSeeds::from_master(seed), params)
}

/// Like [`build_world_fields`], with every generator seed given explicitly.
pub fn build_world_fields_with_seeds(
    width: usize,
    height: usize,
    seeds: WorldSeeds,
    params: &WorldParams,
) -> Result<WorldFields> {
    if width == 0 || height == 0 {
        return Err(WorldError::InvalidDimensions { width, height });
    }

    let _t = Timed::info("world fields");
    log::info!("Building {}x{} world ({})", width, height, seeds);

    // Leaf generators have no upstream fields and run side by side
    let ((continent, terrain_noise), ((plates, boundaries, plate_bias), (craters, latitude))) = rayon::join(
        || {
            rayon::join(
                || build_continent(width, height, seeds.continent, &params.continent),
                || build_terrain_noise(width, height, seeds.terrain_noise, &params.terrain_noise),
            )
        },
        || {
            rayon::join(
                || {
                    let plates = build_tectonic_plates(width, height, seeds.plates, &params.plates);
                    let (boundaries, plate_bias) = rayon::join(
                        || calculate_boundary_stress(&plates, &params.boundaries),
                        || build_plate_bias(&plates, &params.plate_bias),
                    );
                    (plates, boundaries, plate_bias)
                },
                || {
                    rayon::join(
                        || build_craters(width, height, seeds.craters, &params.craters),
                        || build_latitude(width, height, &params.climate.latitude),
                    )
                },
            )
        },
    );

    let volcanoes = build_volcanoes(width, height, &boundaries, seeds.volcanoes, &params.volcanoes);

    let elevation = build_elevation(
        width,
        height,
        ElevationInputs {
            continent: &continent,
            plate_bias: &plate_bias,
            boundaries: &boundaries,
            noise: &terrain_noise,
            craters: &craters,
            volcanoes: &volcanoes,
        },
        &params.elevation,
    );

    let fluid = build_fluid(&elevation.elevation, &params.sea_level);
    log::debug!("Land fraction {:.1}%", fluid.land_fraction() * 100.0);

    let morphology = build_morphology(&elevation.elevation, &fluid, &params.morphology);

    let climate = climate::build_climate(
        ClimateInputs {
            latitude: &latitude,
            boundaries: &boundaries,
            volcanoes: &volcanoes,
            fluid: &fluid,
            morphology: &morphology,
        },
        &seeds,
        &params.climate,
    );

    Ok(WorldFields {
        seeds,
        width,
        height,
        plates,
        boundaries,
        continent,
        plate_bias,
        terrain_noise,
        craters,
        volcanoes,
        elevation,
        fluid,
        morphology,
        climate,
    })
}
