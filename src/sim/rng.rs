//! Seeded random streams
//!
//! Gameplay decisions (spawn picks, spawn cadence, surge timing) draw from
//! `Mulberry32`, which reproduces the reference generator bit-for-bit.
//! Cosmetic jitter draws from a separate `Pcg32` stream so visual effects
//! never shift the gameplay sequence.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Largest f32 strictly below 1.0
const ONE_BELOW: f32 = 1.0 - f32::EPSILON / 2.0;

/// 32-bit state generator: additive seed step, then two xor-shift/multiply rounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Fold a 64-bit run seed into the 32-bit state
    pub fn from_run_seed(seed: u64) -> Self {
        Self::new((seed ^ (seed >> 32)) as u32)
    }

    /// Uniform float in [0, 1) with 32 bits of resolution
    pub fn next_f32(&mut self) -> f32 {
        // f32 rounding would otherwise map the top few outputs onto 1.0
        ((self.next_u32() as f64 / 4_294_967_296.0) as f32).min(ONE_BELOW)
    }

    /// Uniform float in [lo, lo + span)
    pub fn span(&mut self, lo: f32, span: f32) -> f32 {
        lo + self.next_f32() * span
    }

    /// Uniform index in [0, len); `len` must be non-zero
    pub fn index(&mut self, len: usize) -> usize {
        ((self.next_u32() as u64 * len as u64) >> 32) as usize
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(s | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Cosmetic stream derived from the run seed
pub fn fx_stream(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed.rotate_left(17) ^ 0x9e37_79b9_7f4a_7c15)
}
