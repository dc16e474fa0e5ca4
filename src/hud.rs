//! Read-only views for HUD, renderer and decision prompt
//!
//! Nothing here mutates simulation state; the host rebuilds a snapshot each
//! frame and draws from it.

use serde::Serialize;

use crate::consts::HEARTS_TOTAL;
use crate::sim::decision::{self, required_item};
use crate::sim::state::{
    DecisionKind, GamePhase, GameState, Item, ObstacleKind, ParticleKind, RunOutcome, Territory,
};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerPose {
    pub x: f32,
    /// Feet line
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub on_ground: bool,
    pub jumping: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    /// Top edge after territory lift
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrowView {
    pub x: f32,
    pub y: f32,
    /// Heading in radians, for sprite rotation
    pub angle: f32,
}

/// Light circle cut out of the darkness overlay by a wielded torch
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TorchLight {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl TorchLight {
    /// Below this the overlay is not drawn at all
    const MIN_DARKNESS: f32 = 0.01;

    fn from_state(state: &GameState, darkness: f32) -> Option<Self> {
        if darkness <= Self::MIN_DARKNESS || !state.inventory.wields(Item::Torch) {
            return None;
        }
        let p = &state.player;
        Some(Self {
            x: p.pos.x + p.size.x * 0.45,
            y: p.pos.y - p.size.y * 0.55,
            radius: crate::clamp_f32(p.size.y * 1.4, 190.0, 320.0),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ParticleCounts {
    pub dust: usize,
    pub trail: usize,
    pub smoke: usize,
    pub snow: usize,
    pub glitch: usize,
}

/// Everything the HUD and renderer read in one frame
#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub elapsed: f32,
    pub total_time: f32,
    /// elapsed / total, clamped to [0, 1]
    pub progress: f32,
    pub distance: f32,
    pub health: f32,
    pub hearts: [f32; HEARTS_TOTAL],
    pub water_buckets: u32,
    pub owned: Vec<Item>,
    pub active_item: Option<Item>,
    pub territory: Territory,
    pub territory_name: &'static str,
    pub fade_from: usize,
    pub fade_to: usize,
    /// `None` when no cross-fade is running
    pub fade_progress: Option<f32>,
    pub darkness: f32,
    pub torch: Option<TorchLight>,
    pub paused: bool,
    pub frozen: bool,
    pub outcome: Option<RunOutcome>,
    pub player: PlayerPose,
    pub obstacles: Vec<ObstacleView>,
    pub arrows: Vec<ArrowView>,
    pub particles: ParticleCounts,
    pub bg_scroll: f32,
    pub anim_time: f32,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let gy = state.ground_y();
        let fade = &state.territory.fade;
        let darkness = state.darkness_level();
        let mut particles = ParticleCounts {
            glitch: state.glitches.len(),
            ..Default::default()
        };
        for p in &state.particles {
            match p.kind {
                ParticleKind::Dust => particles.dust += 1,
                ParticleKind::Trail => particles.trail += 1,
                ParticleKind::Smoke => particles.smoke += 1,
                ParticleKind::Snow => particles.snow += 1,
            }
        }

        Self {
            phase: state.phase(),
            elapsed: state.elapsed,
            total_time: state.tuning.total_time,
            progress: crate::clamp_f32(state.elapsed / state.tuning.total_time, 0.0, 1.0),
            distance: state.distance,
            health: state.inventory.health(),
            hearts: state.inventory.heart_fills(),
            water_buckets: state.inventory.water_buckets(),
            owned: state.inventory.owned().collect(),
            active_item: state.inventory.active,
            territory: state.territory.current,
            territory_name: state.territory.current.name(),
            fade_from: fade.from_idx,
            fade_to: fade.to_idx,
            fade_progress: fade.active.then(|| fade.progress()),
            darkness,
            torch: TorchLight::from_state(state, darkness),
            paused: state.paused,
            frozen: state.is_frozen(),
            outcome: state.outcome,
            player: PlayerPose {
                x: state.player.pos.x,
                y: state.player.pos.y,
                width: state.player.size.x,
                height: state.player.size.y,
                on_ground: state.player.on_ground,
                jumping: state.player.jumping,
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    x: o.x,
                    y: gy - o.height - state.obstacle_lift(o.kind),
                    width: o.width,
                    height: o.height,
                })
                .collect(),
            arrows: state
                .arrows
                .iter()
                .map(|a| ArrowView {
                    x: a.pos.x,
                    y: a.pos.y,
                    angle: a.vel.y.atan2(a.vel.x),
                })
                .collect(),
            particles,
            bg_scroll: state.bg_scroll,
            anim_time: state.anim_time,
        }
    }
}

/// Text and button state for the open decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionPrompt {
    pub kind: DecisionKind,
    pub obstacle: ObstacleKind,
    pub territory: Territory,
    pub required: Item,
    pub title: String,
    pub body: String,
    pub primary_label: &'static str,
    pub alt_label: &'static str,
    pub hint: String,
    pub primary_enabled: bool,
}

impl DecisionPrompt {
    /// `None` while no decision is open
    pub fn from_state(state: &GameState) -> Option<Self> {
        let ctx = state.decision.context()?;
        let territory = state.territory.current;
        let primary_enabled = decision::primary_enabled(state);
        let required = required_item(ctx.kind, territory);

        let prompt = match (ctx.kind, territory) {
            (DecisionKind::SmallFire, _) => {
                let water = state.inventory.water_buckets();
                Self {
                    kind: ctx.kind,
                    obstacle: ctx.obstacle.kind,
                    territory,
                    required,
                    title: "Fire Obstacle Ahead!".to_string(),
                    body: "A fire obstacle blocks your path. Use Water Bucket to extinguish, \
                           or Push Through (-½ heart)."
                        .to_string(),
                    primary_label: "Use Water Bucket",
                    alt_label: "Push Through",
                    hint: if water > 0 {
                        format!("{} water buckets remaining", water)
                    } else {
                        "No water buckets left!".to_string()
                    },
                    primary_enabled,
                }
            }
            (DecisionKind::Large, Territory::Ice) => Self {
                kind: ctx.kind,
                obstacle: ctx.obstacle.kind,
                territory,
                required,
                title: blocks_title(ctx.obstacle.kind),
                body: "Ice Territory: Use your rope to trap the Yeti or push through taking damage."
                    .to_string(),
                primary_label: "Use Rope",
                alt_label: "Push Through (-25 HP)",
                hint: "Rope is effective against Yetis in Ice Territory".to_string(),
                primary_enabled,
            },
            (DecisionKind::Large, _) => Self {
                kind: ctx.kind,
                obstacle: ctx.obstacle.kind,
                territory,
                required,
                title: blocks_title(ctx.obstacle.kind),
                body: "Choose your approach: Shoot with your bow or push through taking damage."
                    .to_string(),
                primary_label: "Shoot Bow (F)",
                alt_label: "Push Through (-25 HP)",
                hint: "Bow available in Fire & Middle territories".to_string(),
                primary_enabled,
            },
        };
        Some(prompt)
    }
}

fn blocks_title(kind: ObstacleKind) -> String {
    format!("{} Blocks Your Path!", kind.as_str().to_uppercase())
}
