//! World generation parameters.
//!
//! One params struct per generator, composed into [`WorldParams`]. Every
//! struct is `#[serde(default)]`, so a JSON document only has to name the
//! values it changes:
//!
//! ```json
//! { "sea_level": { "sea_level": 0.5 }, "plates": { "plate_count": 8 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::climate::ClimateParams;
use crate::continent::ContinentParams;
use crate::craters::CraterParams;
use crate::error::{Result, WorldError};
use crate::heightmap::ElevationParams;
use crate::morphology::MorphologyParams;
use crate::plate_bias::PlateBiasParams;
use crate::plates::{BoundaryParams, PlateParams};
use crate::sea_level::SeaLevelParams;
use crate::terrain_noise::TerrainNoiseParams;
use crate::volcanoes::VolcanoParams;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    pub plates: PlateParams,
    pub boundaries: BoundaryParams,
    pub continent: ContinentParams,
    pub plate_bias: PlateBiasParams,
    pub terrain_noise: TerrainNoiseParams,
    pub craters: CraterParams,
    pub volcanoes: VolcanoParams,
    pub elevation: ElevationParams,
    pub sea_level: SeaLevelParams,
    pub morphology: MorphologyParams,
    pub climate: ClimateParams,
}

impl WorldParams {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read params from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WorldError::ParamsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let params = WorldParams::from_json_str("{}").unwrap();
        assert_eq!(params, WorldParams::default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{ "sea_level": { "sea_level": 0.5 }, "plates": { "plate_count": 3 } }"#;
        let params = WorldParams::from_json_str(json).unwrap();
        assert_eq!(params.sea_level.sea_level, 0.5);
        assert_eq!(params.sea_level.thin_air_level, 0.80);
        assert_eq!(params.plates.plate_count, 3);
        assert_eq!(params.craters, CraterParams::default());
    }

    #[test]
    fn test_nested_climate_override() {
        let json = r#"{ "climate": { "latitude": { "mono_lat_percent": 0.5 } } }"#;
        let params = WorldParams::from_json_str(json).unwrap();
        assert_eq!(params.climate.latitude.mono_lat_percent, Some(0.5));
        assert_eq!(params.climate.wind, Default::default());
    }

    #[test]
    fn test_defaults_survive_json() {
        let json = WorldParams::default().to_json_pretty().unwrap();
        assert_eq!(WorldParams::from_json_str(&json).unwrap(), WorldParams::default());
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = WorldParams::from_json_str("{ \"plates\": 7 }").unwrap_err();
        assert!(matches!(err, WorldError::ParamsParse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = WorldParams::load("/nonexistent/planet_params.json").unwrap_err();
        assert!(matches!(err, WorldError::ParamsIo { .. }));
    }
}
