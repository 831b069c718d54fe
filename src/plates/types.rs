use std::ops::{Add, Mul, Neg, Sub};

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::generation::PlateParams;

/// Unique identifier for a tectonic plate (index into the plate list).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct PlateId(pub u8);

impl PlateId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A 2D vector in grid units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(&self, other: &Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector, or zero for (near-)zero input.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len < 1e-6 {
            Self::ZERO
        } else {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        }
    }

    /// Rotate counter-clockwise (in a y-up frame) by `radians`.
    pub fn rotate(&self, radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// A tectonic plate with its properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Plate {
    pub id: PlateId,
    /// Voronoi seed point, in continuous grid coordinates.
    pub position: Vec2,
    pub velocity: Vec2,
    /// 0..1, higher means the plate tends to carry land.
    pub continental_bias: f32,
}

impl Plate {
    /// Draw a random plate inside a `width` x `height` grid.
    ///
    /// Draw order is fixed (position, direction, speed, kind, bias) so a given
    /// RNG state always yields the same plate.
    pub fn random(
        id: PlateId,
        width: usize,
        height: usize,
        rng: &mut ChaCha8Rng,
        params: &PlateParams,
    ) -> Self {
        let x = rng.gen::<f32>() * (width - 1) as f32;
        let y = rng.gen::<f32>() * (height - 1) as f32;

        // Random velocity direction and magnitude
        let angle = rng.gen::<f32>() * std::f32::consts::TAU;
        let magnitude =
            (params.velocity_min + rng.gen::<f32>() * (params.velocity_max - params.velocity_min)).max(0.0);
        let velocity = Vec2::new(angle.cos() * magnitude, angle.sin() * magnitude);

        let is_continental = rng.gen::<f32>() < params.continental_chance;
        let (lo, hi) = if is_continental {
            (params.continental_bias_min, params.continental_bias_max)
        } else {
            (params.oceanic_bias_min, params.oceanic_bias_max)
        };
        let continental_bias = (lo + rng.gen::<f32>() * (hi - lo)).clamp(0.0, 1.0);

        Self {
            id,
            position: Vec2::new(x, y),
            velocity,
            continental_bias,
        }
    }

    /// Whether this plate was drawn from the continental bias range.
    pub fn is_continental(&self) -> bool {
        self.continental_bias >= 0.5
    }
}
