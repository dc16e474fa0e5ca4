//! Game state and core simulation types
//!
//! Everything the fixed-tick update mutates lives in `GameState`; systems
//! receive it by `&mut` from the driver.

use std::collections::BTreeSet;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rng::{Mulberry32, fx_stream};
use crate::consts::*;
use crate::tuning::Tuning;

/// Phase as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// A decision prompt is open and the world is frozen
    Deciding,
    /// Run ended; world frozen until restart
    Finished,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Survived the full run length
    Win,
    /// Health reached zero
    Lose,
}

impl RunOutcome {
    pub fn title(&self) -> &'static str {
        match self {
            RunOutcome::Win => "Victory!",
            RunOutcome::Lose => "Game Over",
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            RunOutcome::Win => "You survived the full run!",
            RunOutcome::Lose => "Your health reached zero.",
        }
    }
}

/// Themed zones, visited in cyclic order Fire -> Middle -> Ice -> Fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Territory {
    Fire,
    Middle,
    Ice,
}

impl Territory {
    pub fn next(self) -> Self {
        match self {
            Territory::Fire => Territory::Middle,
            Territory::Middle => Territory::Ice,
            Territory::Ice => Territory::Fire,
        }
    }

    /// Background index used by the cross-fade
    pub fn index(self) -> usize {
        match self {
            Territory::Fire => 0,
            Territory::Middle => 1,
            Territory::Ice => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Territory::Fire => "Fire",
            Territory::Middle => "Middle",
            Territory::Ice => "Ice",
        }
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Canyon,
    Mountain,
    Cave,
    Hunger,
    Rock,
    Hurdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleCategory {
    /// Resolved by a decision when the player draws near
    Large,
    /// Resolved by direct collision
    Small,
}

impl ObstacleKind {
    pub fn category(self) -> ObstacleCategory {
        match self {
            ObstacleKind::Canyon
            | ObstacleKind::Mountain
            | ObstacleKind::Cave
            | ObstacleKind::Hunger => ObstacleCategory::Large,
            ObstacleKind::Rock | ObstacleKind::Hurdle => ObstacleCategory::Small,
        }
    }

    #[inline]
    pub fn is_large(self) -> bool {
        self.category() == ObstacleCategory::Large
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleKind::Canyon => "canyon",
            ObstacleKind::Mountain => "mountain",
            ObstacleKind::Cave => "cave",
            ObstacleKind::Hunger => "hunger",
            ObstacleKind::Rock => "rock",
            ObstacleKind::Hurdle => "hurdle",
        }
    }
}

/// A scrolling obstacle. `x` is the left edge in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Hotbar items
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    Water,
    Rope,
    Torch,
    Bow,
}

impl Item {
    /// Hotbar order
    pub const ALL: [Item; 4] = [Item::Water, Item::Rope, Item::Torch, Item::Bow];

    pub fn label(self) -> &'static str {
        match self {
            Item::Water => "Water Bucket",
            Item::Rope => "Rope",
            Item::Torch => "Torch",
            Item::Bow => "Bow",
        }
    }

    /// 1-based hotbar slot
    pub fn slot(self) -> usize {
        match self {
            Item::Water => 1,
            Item::Rope => 2,
            Item::Torch => 3,
            Item::Bow => 4,
        }
    }
}

/// Health, water buckets and owned items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    health: f32,
    water_buckets: u32,
    owned: BTreeSet<Item>,
    pub active: Option<Item>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            health: MAX_HEALTH,
            water_buckets: START_WATER_BUCKETS,
            owned: Item::ALL.into_iter().collect(),
            active: Some(Item::Bow),
        }
    }
}

impl Inventory {
    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn water_buckets(&self) -> u32 {
        self.water_buckets
    }

    pub fn owns(&self, item: Item) -> bool {
        self.owned.contains(&item)
    }

    pub fn owned(&self) -> impl Iterator<Item = Item> + '_ {
        self.owned.iter().copied()
    }

    /// Active and owned
    pub fn wields(&self, item: Item) -> bool {
        self.active == Some(item) && self.owns(item)
    }

    /// Subtract health, clamped at zero. Returns the health left.
    pub fn damage(&mut self, amount: f32) -> f32 {
        self.health = crate::clamp_f32(self.health - amount.max(0.0), 0.0, MAX_HEALTH);
        self.health
    }

    /// Spend one bucket; false when none are left
    pub fn use_water(&mut self) -> bool {
        if self.water_buckets == 0 {
            return false;
        }
        self.water_buckets -= 1;
        true
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Fill fraction of each heart, left to right
    pub fn heart_fills(&self) -> [f32; HEARTS_TOTAL] {
        let mut hp = self.health;
        let mut fills = [0.0; HEARTS_TOTAL];
        for fill in fills.iter_mut() {
            *fill = crate::clamp_f32(hp, 0.0, HP_PER_HEART) / HP_PER_HEART;
            hp -= HP_PER_HEART;
        }
        fills
    }
}

/// The runner. `pos.y` is the feet line; `pos.x` the left edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Feet line before this tick's integration (crossing detection)
    pub prev_y: f32,
    pub size: Vec2,
    /// Vertical velocity in px per tick, negative is up
    pub vy: f32,
    pub on_ground: bool,
    pub coyote: f32,
    pub jump_time: f32,
    pub jumping: bool,
    pub landing_recovery: f32,
    pub air_time: f32,
    pub ground_frames: u32,
}

impl Player {
    pub fn new(tuning: &Tuning, ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(tuning.player.start_x, ground_y),
            prev_y: ground_y,
            size: Vec2::new(tuning.player.width, tuning.player.height),
            vy: 0.0,
            on_ground: true,
            coyote: 0.0,
            jump_time: 0.0,
            jumping: false,
            landing_recovery: 0.0,
            air_time: 0.0,
            ground_frames: 0,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// A bow projectile. Velocity is in px per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub max_age: f32,
    pub radius: f32,
    /// Only this obstacle may be destroyed; `None` hits anything eligible
    pub target: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Dust,
    Trail,
    Smoke,
    Snow,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub kind: ParticleKind,
}

/// A fragment of the rope "vanish" effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlitchShard {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: Vec2,
    /// HSL hue in degrees and lightness in percent
    pub hue: f32,
    pub lightness: f32,
}

/// Background cross-fade between territory backdrops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    pub active: bool,
    pub from_idx: usize,
    pub to_idx: usize,
    pub t: f32,
    pub duration: f32,
}

impl Fade {
    /// 0 at the start of the fade, 1 when done
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            crate::clamp_f32(self.t / self.duration, 0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryState {
    pub current: Territory,
    /// Elapsed run time when `current` was entered
    pub entered_at: f32,
    pub fade: Fade,
}

impl TerritoryState {
    pub fn new(fade_duration: f32) -> Self {
        Self {
            current: Territory::Fire,
            entered_at: 0.0,
            fade: Fade {
                active: false,
                from_idx: 0,
                to_idx: 0,
                t: 0.0,
                duration: fade_duration,
            },
        }
    }
}

/// Periodic darkening window outside Fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surge {
    pub active: bool,
    pub next_at: f32,
    pub end_at: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Darkness {
    pub base: f32,
    pub surge: f32,
}

/// Countdown (seconds) to the next small and large spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub small: f32,
    pub large: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    /// Fire hazard on a small obstacle in the Fire territory
    SmallFire,
    Large,
}

/// The one live decision: its kind and the obstacle that raised it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    pub kind: DecisionKind,
    pub obstacle: Obstacle,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DecisionState {
    #[default]
    Closed,
    Open(DecisionContext),
}

impl DecisionState {
    pub fn is_open(&self) -> bool {
        matches!(self, DecisionState::Open(_))
    }

    pub fn context(&self) -> Option<&DecisionContext> {
        match self {
            DecisionState::Open(ctx) => Some(ctx),
            DecisionState::Closed => None,
        }
    }
}

/// Drawable viewport in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Fire-and-forget notifications for the toast/HUD layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    ItemSelected { item: Item, water_left: u32 },
    ItemUnavailable { item: Item },
    TerritoryChanged { territory: Territory },
    DecisionOpened { kind: DecisionKind, obstacle: ObstacleKind },
    WaterUsed { remaining: u32 },
    NoWater,
    PushedThroughFire,
    PushedThroughObstacle,
    RopeTrapped,
    ArrowFired,
    BowFrozen,
    BowNotSelected,
    ArrowHit { obstacle: ObstacleKind },
    SmallHit,
    PauseToggled { paused: bool },
    RunEnded { outcome: RunOutcome },
}

impl GameEvent {
    /// Toast text
    pub fn message(&self) -> String {
        match self {
            GameEvent::RunStarted => "Game Restarted - Good Luck!".to_string(),
            GameEvent::ItemSelected {
                item: Item::Water,
                water_left,
            } => format!("{} selected ({} remaining)", Item::Water.label(), water_left),
            GameEvent::ItemSelected { item, .. } => {
                format!("{} selected ({})", item.label(), item.slot())
            }
            GameEvent::ItemUnavailable { item } => format!("No {} available", item.label()),
            GameEvent::TerritoryChanged { territory } => format!("→ {}", territory.name()),
            GameEvent::DecisionOpened { obstacle, .. } => {
                format!("{} ahead!", obstacle.as_str().to_uppercase())
            }
            GameEvent::WaterUsed { remaining } => {
                format!("Water bucket used! {} remaining", remaining)
            }
            GameEvent::NoWater => "No water buckets available!".to_string(),
            GameEvent::PushedThroughFire => "Pushed through fire (-½ heart)".to_string(),
            GameEvent::PushedThroughObstacle => "Pushed through obstacle (-25 HP)".to_string(),
            GameEvent::RopeTrapped => "Rope trap successful! Yeti vanished!".to_string(),
            GameEvent::ArrowFired => "Arrow fired!".to_string(),
            GameEvent::BowFrozen => "Bow frozen in Ice Territory!".to_string(),
            GameEvent::BowNotSelected => "Bow not selected".to_string(),
            GameEvent::ArrowHit { .. } => "Direct hit! Obstacle destroyed!".to_string(),
            GameEvent::SmallHit => "Hit by obstacle (-½ heart)".to_string(),
            GameEvent::PauseToggled { paused: true } => "Paused".to_string(),
            GameEvent::PauseToggled { paused: false } => "Resumed".to_string(),
            GameEvent::RunEnded { outcome } => {
                format!("{} {}", outcome.title(), outcome.reason())
            }
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Gameplay stream
    pub rng: Mulberry32,
    /// Cosmetic stream
    pub fx_rng: Pcg32,
    pub viewport: Viewport,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds since the run began
    pub elapsed: f32,
    pub distance: f32,
    pub bg_scroll: f32,
    pub anim_time: f32,
    pub inventory: Inventory,
    pub player: Player,
    /// Active obstacles (ascending id)
    pub obstacles: Vec<Obstacle>,
    pub arrows: Vec<Arrow>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub glitches: Vec<GlitchShard>,
    pub territory: TerritoryState,
    pub surge: Surge,
    pub darkness: Darkness,
    pub spawn: SpawnTimers,
    pub decision: DecisionState,
    /// Obstacle ids that already raised a decision in this territory
    pub processed: BTreeSet<u32>,
    pub paused: bool,
    pub outcome: Option<RunOutcome>,
    /// Pending notifications, drained by the host
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_viewport(seed, tuning, Viewport::default())
    }

    pub fn with_viewport(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        let ground_y = ground_level(&tuning, viewport);
        Self {
            seed,
            rng: Mulberry32::from_run_seed(seed),
            fx_rng: fx_stream(seed),
            viewport,
            time_ticks: 0,
            elapsed: 0.0,
            distance: 0.0,
            bg_scroll: 0.0,
            anim_time: 0.0,
            inventory: Inventory::default(),
            player: Player::new(&tuning, ground_y),
            obstacles: Vec::new(),
            arrows: Vec::new(),
            particles: Vec::new(),
            glitches: Vec::new(),
            territory: TerritoryState::new(tuning.fade_duration),
            surge: Surge {
                active: false,
                next_at: tuning.hazard.first_surge_at,
                end_at: 0.0,
            },
            darkness: Darkness {
                base: tuning.hazard.base,
                surge: 0.0,
            },
            spawn: SpawnTimers {
                small: tuning.spawn.initial_small,
                large: tuning.spawn.initial_large,
            },
            decision: DecisionState::Closed,
            processed: BTreeSet::new(),
            paused: false,
            outcome: None,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Return every run-scoped field to its initial value.
    /// Both random streams keep running so each restart plays a fresh sequence.
    pub fn reset(&mut self) {
        let rng = self.rng.clone();
        let fx_rng = self.fx_rng.clone();
        let mut fresh = Self::with_viewport(self.seed, self.tuning.clone(), self.viewport);
        fresh.rng = rng;
        fresh.fx_rng = fx_rng;
        *self = fresh;
        self.push_event(GameEvent::RunStarted);
        log::info!("Run restarted (seed {})", self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Feet line of a grounded player
    pub fn ground_y(&self) -> f32 {
        ground_level(&self.tuning, self.viewport)
    }

    /// Update viewport metrics and re-ground the player
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let gy = self.ground_y();
        self.player.pos.y = gy;
        self.player.prev_y = gy;
    }

    /// World scroll in px per tick
    pub fn scroll_speed(&self, sprinting: bool) -> f32 {
        let boost = if sprinting {
            self.tuning.world.sprint_boost
        } else {
            0.0
        };
        self.tuning.world.base_speed + boost
    }

    /// Vertical lift of an obstacle's base above the ground line in the current territory
    pub fn obstacle_lift(&self, kind: ObstacleKind) -> f32 {
        let world = &self.tuning.world;
        let extra = if self.territory.current == Territory::Middle
            && kind.is_large()
            && kind != ObstacleKind::Canyon
        {
            world.middle_extra_lift
        } else {
            0.0
        };
        world.obstacle_lift + extra
    }

    /// Decision open or run over
    pub fn is_frozen(&self) -> bool {
        self.decision.is_open() || self.outcome.is_some()
    }

    pub fn phase(&self) -> GamePhase {
        if self.outcome.is_some() {
            GamePhase::Finished
        } else if self.decision.is_open() {
            GamePhase::Deciding
        } else if self.paused {
            GamePhase::Paused
        } else {
            GamePhase::Playing
        }
    }

    /// Darkness overlay strength after territory gating and clamping
    pub fn darkness_level(&self) -> f32 {
        if self.territory.current == Territory::Fire {
            return 0.0;
        }
        crate::clamp_f32(
            self.darkness.base + self.darkness.surge,
            0.0,
            self.tuning.hazard.max_darkness,
        )
    }

    pub fn find_obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Remove an obstacle by id, leaving every other obstacle untouched
    pub fn remove_obstacle(&mut self, id: u32) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(idx))
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Select a hotbar item. Selecting always sets it active.
    pub fn select_item(&mut self, item: Item) {
        self.inventory.active = Some(item);
        let event = if !self.inventory.owns(item) {
            GameEvent::ItemUnavailable { item }
        } else {
            GameEvent::ItemSelected {
                item,
                water_left: self.inventory.water_buckets(),
            }
        };
        self.push_event(event);
    }

    /// Settle terminal outcomes. Health is checked first.
    pub fn check_run_end(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let outcome = if self.inventory.is_dead() {
            RunOutcome::Lose
        } else if self.elapsed >= self.tuning.total_time {
            RunOutcome::Win
        } else {
            return;
        };
        self.outcome = Some(outcome);
        log::info!(
            "Run ended: {:?} at {:.2}s, health {}",
            outcome,
            self.elapsed,
            self.inventory.health()
        );
        self.push_event(GameEvent::RunEnded { outcome });
    }
}

fn ground_level(tuning: &Tuning, viewport: Viewport) -> f32 {
    (viewport.height + tuning.world.ground_inset).max(0.0)
}
