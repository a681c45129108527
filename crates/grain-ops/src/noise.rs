//! Deterministic hash noise.
//!
//! [`HashNoise`] is a lightweight [`GrainGenerator`] for tests, benchmarks
//! and the command line tool. It is not a film-grain model: every sample
//! gets an independent offset derived from a hash of `(seed, x, y)`, scaled
//! by the mean radius, varied by the radius deviation, and softened with a
//! box blur of radius `round(sigma)`. `iterations` is accepted but unused.

use crate::filter::box_blur;
use crate::synth::{GrainGenerator, GrainParams};
use crate::OpsResult;
use grain_core::{Format, Plane};

/// Coordinate-hash noise generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashNoise;

/// SplitMix64 finalizer.
#[inline]
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform value in `[-1, 1)` for one coordinate and stream.
#[inline]
fn signed_unit(seed: u64, x: u32, y: u32, stream: u64) -> f32 {
    let key = mix(seed ^ mix(((y as u64) << 32 | x as u64) ^ stream.rotate_left(17)));
    // top 24 bits fill the f32 mantissa exactly
    (key >> 40) as f32 / (1u64 << 23) as f32 - 1.0
}

impl HashNoise {
    /// Zero-mean noise field of `width x height` for `seed`.
    pub fn field(&self, width: u32, height: u32, seed: u64, params: &GrainParams) -> OpsResult<Vec<f32>> {
        let mut field = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let spread = 1.0 + params.deviation * signed_unit(seed, x, y, 1);
                field.push(params.radius * spread.max(0.0) * signed_unit(seed, x, y, 0));
            }
        }
        let radius = params.sigma.round() as usize;
        if radius == 0 {
            return Ok(field);
        }
        box_blur(&field, width as usize, height as usize, radius, 1)
    }
}

impl GrainGenerator for HashNoise {
    fn generate(&self, source: &Plane, seed: u64, params: &GrainParams) -> OpsResult<Plane> {
        let field = self.field(source.width(), source.height(), seed, params)?;
        let grained = source
            .to_f32()
            .into_iter()
            .zip(field)
            .map(|(s, n)| s + n)
            .collect();
        Ok(Plane::from_f32(&Format::GRAYS, source.width(), source.height(), grained)?)
    }
}
