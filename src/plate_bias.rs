//! Plate bias: each plate's continental bias re-expressed as a signed field.

use serde::{Deserialize, Serialize};

use crate::field::{self, Field};
use crate::plates::PlateFields;
use crate::timing::Timed;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateBiasParams {
    /// Bias value mapped to zero (0.5: bias 1.0 -> +0.5, bias 0.0 -> -0.5)
    pub bias_center: f32,
    /// Blur passes so plate interiors blend instead of forming hard cells
    pub blur_passes: usize,
    /// Normalize to [-1, +1] so the layer mixes like the other signed layers
    pub normalize_signed: bool,
}

impl Default for PlateBiasParams {
    fn default() -> Self {
        Self {
            bias_center: 0.5,
            blur_passes: 0,
            normalize_signed: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlateBiasFields {
    /// Positive = continental, negative = oceanic
    pub plate_bias: Field,
}

pub fn build_plate_bias(plates: &PlateFields, params: &PlateBiasParams) -> PlateBiasFields {
    let _t = Timed::info("plate bias");

    let raw = plates
        .plate_map
        .map(|id| plates.plates[id.index()].continental_bias - params.bias_center);
    let blurred = field::blur(&raw, params.blur_passes);

    let plate_bias = if params.normalize_signed {
        field::normalize_signed(blurred)
    } else {
        blurred
    };

    PlateBiasFields { plate_bias }
}
