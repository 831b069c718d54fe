//! Climate chain: latitude, circulation, geothermal heat, temperature,
//! air pressure and wind.
//!
//! Everything here runs after sea level and morphology are known. The order
//! inside the chain is fixed: geothermal feeds temperature, temperature feeds
//! pressure, circulation and morphology feed wind.

pub mod circulation;
pub mod geothermal;
pub mod latitude;
pub mod pressure;
pub mod temperature;
pub mod wind;

use serde::{Deserialize, Serialize};

use crate::morphology::MorphologyFields;
use crate::plates::BoundaryFields;
use crate::sea_level::FluidFields;
use crate::seeds::WorldSeeds;
use crate::volcanoes::VolcanoFields;

pub use circulation::{band_wind, build_circulation, BandWind, CirculationFields, CirculationParams};
pub use geothermal::{build_geothermal, GeothermalFields, GeothermalParams};
pub use latitude::{build_latitude, LatitudeFields, LatitudeParams};
pub use pressure::{build_pressure, PressureFields, PressureParams};
pub use temperature::{build_temperature, TemperatureFields, TemperatureParams};
pub use wind::{build_wind, WindFields, WindParams};

/// Parameters for every climate stage
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateParams {
    pub latitude: LatitudeParams,
    pub circulation: CirculationParams,
    pub geothermal: GeothermalParams,
    pub temperature: TemperatureParams,
    pub pressure: PressureParams,
    pub wind: WindParams,
}

#[derive(Clone, Debug)]
pub struct ClimateFields {
    pub latitude: LatitudeFields,
    pub circulation: CirculationFields,
    pub geothermal: GeothermalFields,
    pub temperature: TemperatureFields,
    pub pressure: PressureFields,
    pub wind: WindFields,
}

/// Upstream layers the climate chain reads.
#[derive(Clone, Copy)]
pub struct ClimateInputs<'a> {
    pub latitude: &'a LatitudeFields,
    pub boundaries: &'a BoundaryFields,
    pub volcanoes: &'a VolcanoFields,
    pub fluid: &'a FluidFields,
    pub morphology: &'a MorphologyFields,
}

/// Run the climate chain in dependency order.
///
/// Latitude is an input rather than built here because it depends only on
/// the grid size and can be computed alongside the terrain layers.
pub fn build_climate(inputs: ClimateInputs<'_>, seeds: &WorldSeeds, params: &ClimateParams) -> ClimateFields {
    let circulation = build_circulation(inputs.latitude, &params.circulation);
    let geothermal = build_geothermal(inputs.volcanoes, inputs.boundaries, inputs.fluid, &params.geothermal);
    let temperature = build_temperature(
        inputs.latitude,
        inputs.fluid,
        &geothermal,
        seeds.temperature,
        &params.temperature,
    );
    let pressure = build_pressure(inputs.fluid, &temperature, seeds.pressure, &params.pressure);
    let wind = build_wind(
        inputs.fluid,
        inputs.morphology,
        &circulation,
        seeds.wind,
        &params.wind,
    );

    ClimateFields {
        latitude: inputs.latitude.clone(),
        circulation,
        geothermal,
        temperature,
        pressure,
        wind,
    }
}
