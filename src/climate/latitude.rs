//! Signed latitude: -1 at the north pole, 0 at the equator, +1 at the south pole.
//!
//! Positions are given in "y-percent" units where 0 is the top row and 1 the
//! bottom row. Poles and equator may sit off-map (the default puts the north
//! pole on the top edge and the equator on the bottom edge).

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::tilemap::Tilemap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatitudeParams {
    pub pole_north_percent: f32,
    pub equator_percent: f32,
    pub pole_south_percent: f32,
    /// Put the whole map at this one y-percent
    pub mono_lat_percent: Option<f32>,
}

impl Default for LatitudeParams {
    fn default() -> Self {
        Self {
            pole_north_percent: 0.0,
            equator_percent: 1.0,
            pole_south_percent: 2.0,
            mono_lat_percent: None,
        }
    }
}

impl LatitudeParams {
    /// Signed latitude for a y-percent position.
    pub fn latitude_at(&self, y_percent: f32) -> f32 {
        let eq = self.equator_percent;
        if y_percent <= eq {
            let denom = non_degenerate(eq - self.pole_north_percent);
            ((y_percent - eq) / denom).clamp(-1.0, 0.0)
        } else {
            let denom = non_degenerate(self.pole_south_percent - eq);
            ((y_percent - eq) / denom).clamp(0.0, 1.0)
        }
    }
}

fn non_degenerate(d: f32) -> f32 {
    if d.abs() < 1e-6 {
        1e-6
    } else {
        d
    }
}

#[derive(Clone, Debug)]
pub struct LatitudeFields {
    /// [-1, +1]
    pub latitude: Field,
}

pub fn build_latitude(width: usize, height: usize, params: &LatitudeParams) -> LatitudeFields {
    let latitude = match params.mono_lat_percent {
        Some(p) => Tilemap::new_with(width, height, params.latitude_at(p)),
        None => {
            let rows: Vec<f32> = (0..height)
                .map(|y| {
                    let y_percent = if height <= 1 { 0.0 } else { y as f32 / (height - 1) as f32 };
                    params.latitude_at(y_percent)
                })
                .collect();
            Tilemap::from_fn(width, height, |_, y| rows[y])
        }
    };
    LatitudeFields { latitude }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_runs_pole_to_equator() {
        let fields = build_latitude(4, 11, &LatitudeParams::default());
        assert_abs_diff_eq!(*fields.latitude.get(0, 0), -1.0);
        assert_abs_diff_eq!(*fields.latitude.get(3, 5), -0.5);
        assert_abs_diff_eq!(*fields.latitude.get(2, 10), 0.0);
    }

    #[test]
    fn test_full_globe() {
        let params = LatitudeParams {
            pole_north_percent: 0.0,
            equator_percent: 0.5,
            pole_south_percent: 1.0,
            mono_lat_percent: None,
        };
        let fields = build_latitude(1, 5, &params);
        let column: Vec<f32> = (0..5).map(|y| *fields.latitude.get(0, y)).collect();
        assert_eq!(column, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_mono_latitude_is_uniform() {
        let params = LatitudeParams {
            mono_lat_percent: Some(0.25),
            ..Default::default()
        };
        let fields = build_latitude(6, 6, &params);
        assert!(fields.latitude.values().iter().all(|&v| v == -0.75));
    }

    #[test]
    fn test_degenerate_configuration_stays_bounded() {
        let params = LatitudeParams {
            pole_north_percent: 0.5,
            equator_percent: 0.5,
            pole_south_percent: 0.5,
            mono_lat_percent: None,
        };
        let fields = build_latitude(2, 7, &params);
        assert!(fields.latitude.values().iter().all(|v| (-1.0..=1.0).contains(v)));
        assert_eq!(*fields.latitude.get(0, 6), 1.0);
    }

    #[test]
    fn test_single_row_is_top_row() {
        let fields = build_latitude(3, 1, &LatitudeParams::default());
        assert_eq!(*fields.latitude.get(1, 0), -1.0);
    }
}
