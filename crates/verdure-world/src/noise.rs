//! Seed-keyed noise. Every function here is a pure function of its inputs; nothing
//! carries generator state between calls, so sampling order never matters.

use fastnoise_lite::{FastNoiseLite, NoiseType};

pub const SALT_TREE_HEIGHT: u32 = 0x7EE5_0001;
pub const SALT_GROUND_TINT: u32 = 0x6A0D_17A1;

/// Integer avalanche hash over a 2D lattice point.
#[inline]
pub fn hash2(ix: i32, iy: i32, seed: u32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iy as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

/// Uniform value in `[0, 1)` for a lattice point.
#[inline]
pub fn rand01(seed: u32, ix: i32, iy: i32, salt: u32) -> f32 {
    let h = hash2(ix, iy, (seed ^ salt).wrapping_add(0x9E37_79B9));
    ((h & 0x00FF_FFFF) as f32) / 16_777_216.0
}

/// Integer in `[0, span)` for a lattice point; `span == 0` yields 0.
#[inline]
pub fn pick(seed: u32, ix: i32, iy: i32, salt: u32, span: u32) -> u32 {
    if span == 0 {
        return 0;
    }
    hash2(ix, iy, (seed ^ salt).wrapping_add(0x9E37_79B9)) % span
}

/// Channel-wise jitter of `base` by up to `delta`, stable per lattice point.
pub fn jitter_color(base: [u8; 3], seed: u32, ix: i32, iy: i32, delta: u8) -> [u8; 3] {
    let span = u32::from(delta) * 2 + 1;
    let mut out = base;
    for (c, slot) in out.iter_mut().enumerate() {
        let off = pick(seed, ix, iy, SALT_GROUND_TINT.wrapping_add(c as u32), span) as i32
            - i32::from(delta);
        *slot = (i32::from(*slot) + off).clamp(0, 255) as u8;
    }
    out
}

/// Smooth one-dimensional height noise: fractal OpenSimplex2 over x.
pub struct NoiseField {
    seed: i32,
    noise: FastNoiseLite,
    octaves: u32,
    norm: f32,
}

impl NoiseField {
    pub fn new(seed: i32, frequency: f32, octaves: u32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(frequency));
        let octaves = octaves.max(1);
        let mut norm = 0.0f32;
        let mut amp = 1.0f32;
        for _ in 0..octaves {
            norm += amp;
            amp *= 0.5;
        }
        Self {
            seed,
            noise,
            octaves,
            norm,
        }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Offset in `[-amplitude, amplitude]` at `x`.
    pub fn sample(&self, x: f32, amplitude: f32) -> f32 {
        if !x.is_finite() {
            return 0.0;
        }
        let mut sum = 0.0f32;
        let mut amp = 1.0f32;
        let mut freq = 1.0f32;
        for o in 0..self.octaves {
            // Each octave reads its own row so octaves do not line up.
            sum += self.noise.get_noise_2d(x * freq, o as f32 * 131.0) * amp;
            amp *= 0.5;
            freq *= 2.0;
        }
        (sum / self.norm).clamp(-1.0, 1.0) * amplitude
    }
}
