//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (gameplay and cosmetic streams kept apart)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arrow;
pub mod collision;
pub mod decision;
pub mod effects;
pub mod hazard;
pub mod input;
pub mod physics;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod territory;
pub mod tick;

pub use decision::{Choice, Resolution};
pub use input::{InputState, Key, PlayerIntent};
pub use rng::Mulberry32;
pub use state::{
    Arrow, DecisionContext, DecisionKind, DecisionState, GameEvent, GamePhase, GameState,
    Inventory, Item, Obstacle, ObstacleCategory, ObstacleKind, Player, RunOutcome, Territory,
    Viewport,
};
pub use tick::tick;
