//! Seeded lattice value noise and fractal (fBm) accumulation.
//!
//! The lattice hash is a pure wrapping 32-bit integer mix, so the same
//! `(x, y, seed)` produces bit-identical output on every platform.

use noise::{NoiseFn, Seedable};

use crate::field::{smoothstep, lerp, Field};
use crate::tilemap::Tilemap;

/// Hash integer lattice coordinates into [0, 1].
pub fn hash01(x: i32, y: i32, seed: u32) -> f32 {
    let mut n = x
        .wrapping_mul(374_761_393)
        .wrapping_add(y.wrapping_mul(668_265_263))
        .wrapping_add((seed as i32).wrapping_mul(1_442_695_041));
    n = (n ^ (n >> 13)).wrapping_mul(1_274_126_177);
    n ^= n >> 16;
    (((n as u32) >> 1) & 0x7fff_ffff) as f32 / i32::MAX as f32
}

/// Continuous value noise in [0, 1]: smoothstep-weighted bilinear blend of the
/// four lattice corners around `(x, y)`.
pub fn value_noise(x: f32, y: f32, seed: u32) -> f32 {
    let xf0 = x.floor();
    let yf0 = y.floor();
    let xi = xf0 as i32;
    let yi = yf0 as i32;
    let xf = x - xf0;
    let yf = y - yf0;

    let v00 = hash01(xi, yi, seed);
    let v10 = hash01(xi.wrapping_add(1), yi, seed);
    let v01 = hash01(xi, yi.wrapping_add(1), seed);
    let v11 = hash01(xi.wrapping_add(1), yi.wrapping_add(1), seed);

    let u = smoothstep(0.0, 1.0, xf);
    let v = smoothstep(0.0, 1.0, yf);

    lerp(lerp(v00, v10, u), lerp(v01, v11, u), v)
}

/// Value noise remapped to [-1, +1].
pub fn signed_value_noise(x: f32, y: f32, seed: u32) -> f32 {
    (value_noise(x, y, seed) - 0.5) * 2.0
}

/// Lattice value noise usable anywhere the `noise` crate expects a [`NoiseFn`].
/// `get` returns the signed form in [-1, +1], like the crate's own generators.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueNoise {
    seed: u32,
}

impl ValueNoise {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl Seedable for ValueNoise {
    fn set_seed(self, seed: u32) -> Self {
        Self { seed }
    }

    fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseFn<f64, 2> for ValueNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        signed_value_noise(point[0] as f32, point[1] as f32, self.seed) as f64
    }
}

/// Fractional Brownian Motion over the grid.
///
/// Octave `o` samples seed `seed + o * 999` at frequency `2^o / base_period`
/// with amplitude `strength / 2^o`. Contributions are signed, so the sum is
/// roughly zero-centred.
pub fn fractal_noise(
    width: usize,
    height: usize,
    strength: f32,
    seed: u32,
    base_period: f32,
    octaves: u32,
) -> Field {
    let layers: Vec<(ValueNoise, f32, f32)> = (0..octaves)
        .scan((strength, 1.0 / base_period.max(1e-3)), |(amp, freq), o| {
            let layer = (
                ValueNoise::new(seed.wrapping_add(o.wrapping_mul(999))),
                *amp,
                *freq,
            );
            *amp *= 0.5;
            *freq *= 2.0;
            Some(layer)
        })
        .collect();

    Tilemap::from_fn(width, height, |x, y| {
        layers.iter().fold(0.0f32, |acc, (noise, amp, freq)| {
            let n = noise.get([(x as f32 * freq) as f64, (y as f32 * freq) as f64]) as f32;
            acc + n * amp
        })
    })
}

/// Fold a 64-bit seed into the 32-bit noise seed space.
pub fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}
