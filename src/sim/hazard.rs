//! Darkness and surge
//!
//! Outside Fire the screen darkens on a slow day/night sine, with periodic
//! surge windows stacked on top. Surge timing draws from the gameplay stream.

use super::state::{GameState, Territory};

pub fn update_hazard(state: &mut GameState) {
    if state.territory.current == Territory::Fire {
        state.darkness.base = 0.0;
        state.darkness.surge = 0.0;
        return;
    }

    let cfg = state.tuning.hazard;
    let now = state.elapsed;
    let surge = &mut state.surge;
    if !surge.active && now >= surge.next_at {
        surge.active = true;
        surge.end_at = now + state.rng.span(cfg.surge_duration_min, cfg.surge_duration_span);
        surge.next_at = surge.end_at + state.rng.span(cfg.surge_cooldown_min, cfg.surge_cooldown_span);
        log::debug!("Darkness surge until {:.1}s", surge.end_at);
    } else if surge.active && now >= surge.end_at {
        surge.active = false;
        log::debug!("Darkness surge over, next at {:.1}s", surge.next_at);
    }

    let day_night = ((now / cfg.day_night_period).sin() + 1.0) / 2.0;
    state.darkness.base = cfg.base + day_night * cfg.day_night_amplitude;
    state.darkness.surge = if state.surge.active { cfg.surge_bonus } else { 0.0 };
}
