//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use rand::Rng;

use super::input::InputState;
use super::state::{GameState, ObstacleKind, Territory};
use super::{arrow, collision, decision, effects, hazard, physics, spawn, territory};

/// Chance per tick of a sprint streak behind the player
const TRAIL_CHANCE: f32 = 0.35;

/// Advance the game state by one fixed timestep.
///
/// Order: territory rotation, clock and input, hazard, player physics, world
/// scroll, obstacle contacts (may open a decision), spawner, arrows, effects,
/// end-of-run check, background fade.
pub fn tick(state: &mut GameState, input: &mut InputState, dt: f32) {
    // Hard freeze while a decision is open or the run is over
    if state.is_frozen() || state.paused {
        return;
    }

    territory::auto_rotate(state);

    state.time_ticks += 1;
    state.elapsed += dt;
    let intent = input.poll(dt);

    hazard::update_hazard(state);

    let ground_y = state.ground_y();
    let step = physics::step_player(
        &mut state.player,
        &intent,
        &state.tuning.physics,
        &state.tuning.player,
        ground_y,
        dt,
    );
    if step.jumped {
        input.consume_jump();
    }
    if step.landed {
        let x = state.player.center_x();
        effects::spawn_dust(state, x, ground_y);
    }

    if intent.sprinting && state.fx_rng.random::<f32>() < TRAIL_CHANCE {
        let (x, y) = (state.player.pos.x - 8.0, state.player.pos.y - 20.0);
        effects::spawn_trail(state, x, y);
    }

    let speed = state.scroll_speed(intent.sprinting);
    scroll_world(state, speed, dt);

    if let Some(ctx) = collision::scan_obstacles(state, speed) {
        if decision::open(state, ctx) {
            input.clear_all();
        }
    }

    if !state.is_frozen() {
        spawn::update_spawner(state, dt);
    }
    arrow::update_arrows(state, dt);
    effects::spawn_snow(state);
    effects::update_particles(state, dt);
    effects::update_glitches(state, dt);

    state.check_run_end();
    territory::advance_fade(state, dt);
}

/// Move obstacles and the backdrop left by one tick of travel
fn scroll_world(state: &mut GameState, speed: f32, dt: f32) {
    let world = &state.tuning.world;
    state.distance += speed / world.distance_divisor;

    let in_ice = state.territory.current == Territory::Ice;
    for o in &mut state.obstacles {
        // Yetis lumber along slower than the scroll
        let factor = if in_ice && o.kind.is_large() && o.kind != ObstacleKind::Canyon {
            world.ice_large_factor
        } else {
            1.0
        };
        o.x -= speed * factor;
    }

    state.bg_scroll -= speed * world.bg_scroll_factor;
    state.anim_time += (speed * 0.065 + 1.05) * dt;
}
