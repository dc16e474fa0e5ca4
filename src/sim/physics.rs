//! Player vertical motion and horizontal lean
//!
//! Velocities are stored in px per tick; tunables are in px/s and scaled by `dt`
//! at the point of use. Gravity therefore enters as `g * dt * dt`.

use super::input::PlayerIntent;
use super::state::Player;
use crate::ease_toward;
use crate::tuning::{PhysicsTuning, PlayerTuning};

/// What happened to the player this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicsStep {
    /// A jump fired; the caller spends the buffered press
    pub jumped: bool,
    /// Airborne to grounded on the ground line
    pub landed: bool,
}

/// Advance the player by one fixed tick
pub fn step_player(
    player: &mut Player,
    intent: &PlayerIntent,
    phys: &PhysicsTuning,
    pose: &PlayerTuning,
    ground_y: f32,
    dt: f32,
) -> PhysicsStep {
    let mut step = PhysicsStep::default();

    if player.landing_recovery > 0.0 {
        player.landing_recovery = (player.landing_recovery - dt).max(0.0);
    }

    if player.on_ground {
        player.ground_frames = player.ground_frames.saturating_add(1);
        player.air_time = 0.0;
    } else {
        player.ground_frames = 0;
        player.air_time += dt;
    }

    let was_on_ground = player.on_ground;
    player.on_ground = player.pos.y >= ground_y - phys.ground_eps;
    if player.on_ground {
        player.coyote = phys.coyote_time;
        if !was_on_ground {
            player.landing_recovery = phys.ground_landing_recovery;
            step.landed = true;
        }
    } else {
        player.coyote = (player.coyote - dt).max(0.0);
    }

    let can_jump = (player.on_ground || player.coyote > 0.0)
        && player.landing_recovery <= 0.0
        && player.ground_frames >= phys.min_ground_frames;
    if intent.wants_jump && can_jump {
        player.vy = -(phys.jump_vel * dt);
        player.on_ground = false;
        player.jumping = true;
        player.jump_time = 0.0;
        player.air_time = 0.0;
        player.ground_frames = 0;
        player.coyote = 0.0;
        step.jumped = true;
    }

    player.prev_y = player.pos.y;

    if !player.on_ground {
        player.jump_time += dt;
        let near_apex = (player.vy / dt).abs() < phys.apex_threshold;
        let in_sustain =
            player.jumping && intent.holding_jump && player.jump_time <= phys.sustain_time;

        let g = if in_sustain {
            phys.sustain_gravity
        } else if near_apex {
            phys.gravity * phys.apex_assist
        } else {
            phys.gravity
        };
        player.vy += g * dt * dt;

        // Released early while still rising: cap the climb
        let cut = -(phys.jump_cut_vel * dt);
        if player.jumping && !intent.holding_jump && player.vy < cut {
            player.vy = cut;
            player.jumping = false;
        }

        player.vy = (player.vy * phys.air_drag).min(phys.terminal_vy * dt);

        let lerp = if near_apex {
            pose.air_lerp_apex
        } else if player.air_time > pose.long_air_time {
            pose.air_lerp_long
        } else {
            pose.air_lerp
        };
        player.pos.x = ease_toward(player.pos.x, pose.air_target_x, lerp);
    } else {
        let lerp = if player.ground_frames < pose.settling_frames {
            pose.ground_lerp_settling
        } else {
            pose.ground_lerp
        };
        player.pos.x = ease_toward(player.pos.x, pose.ground_target_x, lerp);
        player.vy = 0.0;
        player.jumping = false;
        player.jump_time = 0.0;
    }

    player.pos.y += player.vy;

    if player.pos.y >= ground_y {
        let airborne = !player.on_ground;
        player.pos.y = ground_y;
        player.vy = 0.0;
        player.on_ground = true;
        player.jumping = false;
        player.jump_time = 0.0;
        if airborne {
            player.landing_recovery = phys.ground_landing_recovery;
            step.landed = true;
        }
    }

    step
}

/// Snap the player onto a platform top (small obstacle landing)
pub fn land_on(player: &mut Player, top_y: f32, phys: &PhysicsTuning) {
    player.pos.y = top_y;
    player.vy = 0.0;
    player.on_ground = true;
    player.jumping = false;
    player.jump_time = 0.0;
    player.landing_recovery = phys.platform_landing_recovery;
    player.ground_frames = 0;
}
