//! Territory Run - a side-scrolling runner across Fire, Middle and Ice territories
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, decisions, arrows, hazards)
//! - `driver`: Fixed-timestep accumulator that owns the simulation and routes commands
//! - `hud`: Read-only snapshots consumed by rendering and HUD layers
//! - `tuning`: Data-driven game balance
//! - `settings`: Run settings for the headless binary

pub mod driver;
pub mod hud;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::Game;
pub use settings::{RunProfile, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum catch-up ticks per frame; leftover time is dropped
    pub const MAX_SUBSTEPS: u32 = 10;

    /// Health bounds
    pub const MAX_HEALTH: f32 = 100.0;
    pub const HEARTS_TOTAL: usize = 4;
    pub const HP_PER_HEART: f32 = 25.0;

    /// Half a heart
    pub const SMALL_HIT: f32 = 12.5;
    /// A full heart
    pub const BIG_HIT: f32 = 25.0;

    pub const START_WATER_BUCKETS: u32 = 3;

    /// Cosmetic particle cap (dust, smoke, snow, trail)
    pub const MAX_PARTICLES: usize = 600;
}

/// Clamp helper that tolerates NaN by falling back to `lo`
#[inline]
pub fn clamp_f32(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() { lo } else { v.max(lo).min(hi) }
}

/// Exponential approach of `current` toward `target` by factor `t` per tick
#[inline]
pub fn ease_toward(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t
}
