//! Seeded permutation-table noise.
//!
//! A 256-entry permutation is shuffled once from the seed and then stored
//! twice, so lattice hashes can index `perm[perm[x] + y]` without wrapping.
//! Sampling is read-only: the same seed gives the same value at the same
//! point regardless of what was sampled before.

use ::noise::NoiseFn;
use serde::{Deserialize, Serialize};

/// Permutation table size (power of two).
const PERM_SIZE: usize = 256;
/// Mask for wrapping lattice coordinates into the table.
const PERM_MASK: i32 = PERM_SIZE as i32 - 1;

/// Default input frequency.
pub const DEFAULT_FREQUENCY: f32 = 0.01;

/// Interpolated noise flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Gradient noise over four diagonal gradients
    #[default]
    Perlin,
    /// Interpolated lattice values
    Value,
}

/// Deterministic 2D noise over a seeded permutation table.
#[derive(Debug, Clone)]
pub struct PermutationNoise {
    /// Permutation table, duplicated to twice its size
    perm: [u8; PERM_SIZE * 2],
    /// Input scale applied before lattice lookup
    frequency: f32,
    /// Noise flavour
    kind: NoiseKind,
    /// Seed the table was built from
    seed: u64,
}

impl PermutationNoise {
    /// Builds the permutation table for `seed`.
    #[must_use]
    pub fn new(seed: u64, kind: NoiseKind) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut p: [u8; PERM_SIZE] = std::array::from_fn(|i| i as u8);

        // Fisher-Yates
        for i in (1..PERM_SIZE).rev() {
            let j = rng.usize(0..=i);
            p.swap(i, j);
        }

        let mut perm = [0u8; PERM_SIZE * 2];
        perm[..PERM_SIZE].copy_from_slice(&p);
        perm[PERM_SIZE..].copy_from_slice(&p);

        Self {
            perm,
            frequency: DEFAULT_FREQUENCY,
            kind,
            seed,
        }
    }

    /// Sets the input frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Seed used to build the table.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Noise flavour.
    #[must_use]
    pub const fn kind(&self) -> NoiseKind {
        self.kind
    }

    /// Input frequency.
    #[must_use]
    pub const fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Samples noise normalised to `[0, 1]`.
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let (x, y) = (x * self.frequency, y * self.frequency);
        match self.kind {
            NoiseKind::Perlin => (self.gradient(x, y) * 0.5 + 0.5).clamp(0.0, 1.0),
            NoiseKind::Value => self.value(x, y),
        }
    }

    /// Samples noise in `[-1, 1]`.
    ///
    /// For value noise this is the `[0, 1]` sample remapped.
    #[must_use]
    pub fn sample_raw(&self, x: f32, y: f32) -> f32 {
        let (x, y) = (x * self.frequency, y * self.frequency);
        match self.kind {
            NoiseKind::Perlin => self.gradient(x, y).clamp(-1.0, 1.0),
            NoiseKind::Value => self.value(x, y) * 2.0 - 1.0,
        }
    }

    /// Lattice hash for integer corner `(ix, iy)`.
    fn hash(&self, ix: i32, iy: i32) -> u8 {
        let a = self.perm[(ix & PERM_MASK) as usize] as usize;
        self.perm[a + (iy & PERM_MASK) as usize]
    }

    fn dot_grid_gradient(&self, ix: i32, iy: i32, x: f32, y: f32) -> f32 {
        let (gx, gy) = match self.hash(ix, iy) & 3 {
            0 => (1.0, 1.0),
            1 => (-1.0, 1.0),
            2 => (1.0, -1.0),
            _ => (-1.0, -1.0),
        };
        (x - ix as f32) * gx + (y - iy as f32) * gy
    }

    fn gradient(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let (x1, y1) = (x0.wrapping_add(1), y0.wrapping_add(1));
        let sx = smoothstep(x - x0 as f32);
        let sy = smoothstep(y - y0 as f32);

        let top = lerp(
            self.dot_grid_gradient(x0, y0, x, y),
            self.dot_grid_gradient(x1, y0, x, y),
            sx,
        );
        let bottom = lerp(
            self.dot_grid_gradient(x0, y1, x, y),
            self.dot_grid_gradient(x1, y1, x, y),
            sx,
        );
        lerp(top, bottom, sy)
    }

    fn lattice_value(&self, ix: i32, iy: i32) -> f32 {
        f32::from(self.hash(ix, iy)) / PERM_SIZE as f32
    }

    fn value(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let (x1, y1) = (x0.wrapping_add(1), y0.wrapping_add(1));
        let sx = smoothstep(x - x0 as f32);
        let sy = smoothstep(y - y0 as f32);

        let top = lerp(self.lattice_value(x0, y0), self.lattice_value(x1, y0), sx);
        let bottom = lerp(
            self.lattice_value(x0, y1),
            self.lattice_value(x1, y1),
            sx,
        );
        lerp(top, bottom, sy)
    }
}

impl NoiseFn<f64, 2> for PermutationNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        f64::from(self.sample_raw(point[0] as f32, point[1] as f32))
    }
}

/// Cubic ease `3t² - 2t³`.
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
