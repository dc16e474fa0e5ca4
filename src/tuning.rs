//! Data-driven game balance
//!
//! Every number the simulation reads lives here. Defaults reproduce the
//! shipped game; a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::settings::RunProfile;
use crate::sim::state::ObstacleKind;

/// Errors raised when a tuning table breaks its invariants
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be greater than zero (got {value:.3})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.3})")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("{field} must not be negative (got {value:.3})")]
    Negative { field: &'static str, value: f32 },
    #[error("{table} obstacle table is empty")]
    EmptyTable { table: &'static str },
    #[error("{kind:?} listed in the {table} table but belongs to the other category")]
    WrongCategory {
        kind: ObstacleKind,
        table: &'static str,
    },
    #[error("gap range for {kind:?} is inverted ({min:.1} > {max:.1})")]
    InvertedGap { kind: ObstacleKind, min: f32, max: f32 },
}

/// Player vertical motion tunables (px/s units, converted per tick by the integrator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    /// Gravity while the jump button is held inside the sustain window
    pub sustain_gravity: f32,
    pub jump_vel: f32,
    /// Upward speed cap applied when the jump button is released early
    pub jump_cut_vel: f32,
    pub terminal_vy: f32,
    pub air_drag: f32,
    pub ground_eps: f32,
    pub coyote_time: f32,
    pub jump_buffer: f32,
    pub sustain_time: f32,
    pub apex_assist: f32,
    pub apex_threshold: f32,
    pub ground_landing_recovery: f32,
    pub platform_landing_recovery: f32,
    pub min_ground_frames: u32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 95.0,
            sustain_gravity: 62.0,
            jump_vel: 400.0,
            jump_cut_vel: 200.0,
            terminal_vy: 1200.0,
            air_drag: 0.988,
            ground_eps: 1.5,
            coyote_time: 0.05,
            jump_buffer: 0.16,
            sustain_time: 0.26,
            apex_assist: 0.82,
            apex_threshold: 50.0,
            ground_landing_recovery: 0.08,
            platform_landing_recovery: 0.06,
            min_ground_frames: 2,
        }
    }
}

/// Player pose and horizontal lean easing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub start_x: f32,
    pub width: f32,
    pub height: f32,
    pub air_target_x: f32,
    pub ground_target_x: f32,
    pub air_lerp_apex: f32,
    pub air_lerp_long: f32,
    pub air_lerp: f32,
    /// Air time after which the slower "long air" lerp applies
    pub long_air_time: f32,
    pub ground_lerp_settling: f32,
    pub ground_lerp: f32,
    pub settling_frames: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start_x: 220.0,
            width: 200.0,
            height: 260.0,
            air_target_x: 242.0,
            ground_target_x: 220.0,
            air_lerp_apex: 0.22,
            air_lerp_long: 0.18,
            air_lerp: 0.15,
            long_air_time: 0.3,
            ground_lerp_settling: 0.35,
            ground_lerp: 0.3,
            settling_frames: 10,
        }
    }
}

/// Scrolling, placement and trigger geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Scroll speed in px per tick
    pub base_speed: f32,
    pub sprint_boost: f32,
    /// Large non-canyon obstacles drift slower in Ice
    pub ice_large_factor: f32,
    pub distance_divisor: f32,
    pub bg_scroll_factor: f32,
    pub obstacle_lift: f32,
    pub middle_extra_lift: f32,
    pub offscreen_margin: f32,
    pub ground_inset: f32,
    pub trigger_base: f32,
    pub trigger_speed_factor: f32,
    /// Fraction of the player height counted as "feet" for small collisions
    pub feet_portion: f32,
    pub horiz_pad: f32,
    pub landing_tolerance: f32,
    pub center_threshold: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            base_speed: 5.4,
            sprint_boost: 0.45,
            ice_large_factor: 0.72,
            distance_divisor: 8.0,
            bg_scroll_factor: 0.7,
            obstacle_lift: 48.0,
            middle_extra_lift: 24.0,
            offscreen_margin: 120.0,
            ground_inset: 4.0,
            trigger_base: 110.0,
            trigger_speed_factor: 5.0,
            feet_portion: 0.3,
            horiz_pad: 14.0,
            landing_tolerance: 10.0,
            center_threshold: 35.0,
        }
    }
}

/// One row of an obstacle definition table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDef {
    pub kind: ObstacleKind,
    pub width: f32,
    pub height: f32,
    pub gap_min: f32,
    pub gap_max: f32,
}

impl ObstacleDef {
    pub const fn new(kind: ObstacleKind, width: f32, height: f32, gap: (f32, f32)) -> Self {
        Self {
            kind,
            width,
            height,
            gap_min: gap.0,
            gap_max: gap.1,
        }
    }
}

/// Spawn cadence (seconds) and definition tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub initial_small: f32,
    pub initial_large: f32,
    pub small_interval_min: f32,
    pub small_interval_span: f32,
    pub large_interval_min: f32,
    pub large_interval_span: f32,
    pub small: Vec<ObstacleDef>,
    pub large: Vec<ObstacleDef>,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        const LARGE_GAP: (f32, f32) = (1400.0, 2200.0);
        const SMALL_GAP: (f32, f32) = (500.0, 900.0);
        Self {
            initial_small: 2.2,
            initial_large: 5.0,
            small_interval_min: 2.0,
            small_interval_span: 1.4,
            large_interval_min: 4.5,
            large_interval_span: 2.5,
            small: vec![
                ObstacleDef::new(ObstacleKind::Rock, 60.0, 50.0, SMALL_GAP),
                ObstacleDef::new(ObstacleKind::Hurdle, 40.0, 60.0, SMALL_GAP),
            ],
            large: vec![
                ObstacleDef::new(ObstacleKind::Canyon, 140.0, 40.0, LARGE_GAP),
                ObstacleDef::new(ObstacleKind::Mountain, 100.0, 122.0, LARGE_GAP),
                ObstacleDef::new(ObstacleKind::Cave, 180.0, 98.0, LARGE_GAP),
                ObstacleDef::new(ObstacleKind::Hunger, 40.0, 40.0, LARGE_GAP),
            ],
        }
    }
}

/// Arrow ballistics (px per tick, except lifetime in seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowTuning {
    pub speed: f32,
    pub angle_deg: f32,
    pub gravity: f32,
    pub lifetime: f32,
    pub radius: f32,
    pub origin_x_frac: f32,
    pub origin_y_frac: f32,
    /// "hunger" birds use a tighter hitbox than their definition size
    pub hunger_hitbox_w: f32,
    pub hunger_hitbox_h: f32,
}

impl Default for ArrowTuning {
    fn default() -> Self {
        Self {
            speed: 35.0,
            angle_deg: -12.0,
            gravity: 0.24,
            lifetime: 1.2,
            radius: 4.0,
            origin_x_frac: 0.75,
            origin_y_frac: 0.55,
            hunger_hitbox_w: 24.0,
            hunger_hitbox_h: 30.0,
        }
    }
}

/// Darkness and surge timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub base: f32,
    pub day_night_amplitude: f32,
    /// Divisor applied to elapsed seconds inside the day/night sine
    pub day_night_period: f32,
    pub surge_bonus: f32,
    pub first_surge_at: f32,
    pub surge_duration_min: f32,
    pub surge_duration_span: f32,
    pub surge_cooldown_min: f32,
    pub surge_cooldown_span: f32,
    pub max_darkness: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            base: 0.12,
            day_night_amplitude: 0.16,
            day_night_period: 12.0,
            surge_bonus: 0.45,
            first_surge_at: 8.0,
            surge_duration_min: 8.0,
            surge_duration_span: 4.0,
            surge_cooldown_min: 25.0,
            surge_cooldown_span: 15.0,
            max_darkness: 0.7,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Run length in seconds
    pub total_time: f32,
    pub auto_rotate_secs: f32,
    pub fade_duration: f32,
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub world: WorldTuning,
    pub spawn: SpawnTuning,
    pub arrow: ArrowTuning,
    pub hazard: HazardTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::for_profile(RunProfile::default())
    }
}

impl Tuning {
    /// Defaults with the run length and rotation period of `profile`
    pub fn for_profile(profile: RunProfile) -> Self {
        Self {
            total_time: profile.run_seconds(),
            auto_rotate_secs: profile.rotate_seconds(),
            fade_duration: 1.0,
            physics: PhysicsTuning::default(),
            player: PlayerTuning::default(),
            world: WorldTuning::default(),
            spawn: SpawnTuning::default(),
            arrow: ArrowTuning::default(),
            hazard: HazardTuning::default(),
        }
    }

    /// Parse a (possibly partial) tuning file and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Self::from_json_over(&Tuning::default(), json)
    }

    /// Apply a (possibly partial) tuning file on top of `base` and validate.
    /// Nested tables merge field by field; arrays replace wholesale.
    pub fn from_json_over(base: &Tuning, json: &str) -> Result<Self, TuningError> {
        let overrides: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(base)?;
        merge_json(&mut merged, overrides);
        let tuning: Tuning = serde_json::from_value(merged)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positives = [
            ("total_time", self.total_time),
            ("auto_rotate_secs", self.auto_rotate_secs),
            ("fade_duration", self.fade_duration),
            ("physics.jump_vel", self.physics.jump_vel),
            ("physics.terminal_vy", self.physics.terminal_vy),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("world.base_speed", self.world.base_speed),
            ("world.distance_divisor", self.world.distance_divisor),
            ("spawn.small_interval_min", self.spawn.small_interval_min),
            ("spawn.large_interval_min", self.spawn.large_interval_min),
            ("arrow.lifetime", self.arrow.lifetime),
            ("arrow.radius", self.arrow.radius),
            ("hazard.day_night_period", self.hazard.day_night_period),
        ];
        for (field, value) in positives {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let unit_ranges = [
            ("physics.air_drag", self.physics.air_drag),
            ("hazard.max_darkness", self.hazard.max_darkness),
            ("world.ice_large_factor", self.world.ice_large_factor),
            ("world.feet_portion", self.world.feet_portion),
        ];
        for (field, value) in unit_ranges {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::OutOfRange {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }

        let spans = [
            ("spawn.small_interval_span", self.spawn.small_interval_span),
            ("spawn.large_interval_span", self.spawn.large_interval_span),
            ("hazard.surge_duration_span", self.hazard.surge_duration_span),
            ("hazard.surge_cooldown_span", self.hazard.surge_cooldown_span),
        ];
        for (field, value) in spans {
            if value.is_nan() || value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }

        Self::validate_table("small", &self.spawn.small, false)?;
        Self::validate_table("large", &self.spawn.large, true)?;
        Ok(())
    }

    fn validate_table(
        table: &'static str,
        defs: &[ObstacleDef],
        large: bool,
    ) -> Result<(), TuningError> {
        if defs.is_empty() {
            return Err(TuningError::EmptyTable { table });
        }
        for def in defs {
            if def.kind.is_large() != large {
                return Err(TuningError::WrongCategory {
                    kind: def.kind,
                    table,
                });
            }
            if def.gap_min > def.gap_max {
                return Err(TuningError::InvertedGap {
                    kind: def.kind,
                    min: def.gap_min,
                    max: def.gap_max,
                });
            }
        }
        Ok(())
    }
}

fn merge_json(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                merge_json(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}
