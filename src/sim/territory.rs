//! Territory rotation and background cross-fade

use super::effects;
use super::state::{GameEvent, GameState, Territory};

/// Enter `next`, starting a cross-fade and forgetting which obstacles already
/// raised decisions. No-op when already there.
pub fn change_territory(state: &mut GameState, next: Territory, with_smoke: bool) {
    let current = state.territory.current;
    if next == current {
        return;
    }
    let fade = &mut state.territory.fade;
    fade.active = true;
    fade.t = 0.0;
    fade.from_idx = current.index();
    fade.to_idx = next.index();

    state.territory.current = next;
    state.territory.entered_at = state.elapsed;
    state.processed.clear();
    if with_smoke {
        effects::spawn_smoke_burst(state);
    }
    state.push_event(GameEvent::TerritoryChanged { territory: next });
    log::info!("Territory {} -> {} at {:.1}s", current.name(), next.name(), state.elapsed);
}

/// Advance to the cyclic successor
pub fn rotate(state: &mut GameState) {
    let next = state.territory.current.next();
    change_territory(state, next, true);
}

/// Rotate once the current territory has run its course. Returns true on rotation.
pub fn auto_rotate(state: &mut GameState) -> bool {
    if state.elapsed - state.territory.entered_at < state.tuning.auto_rotate_secs {
        return false;
    }
    rotate(state);
    true
}

pub fn advance_fade(state: &mut GameState, dt: f32) {
    let fade = &mut state.territory.fade;
    if !fade.active {
        return;
    }
    fade.t = (fade.t + dt).min(fade.duration);
    if fade.t >= fade.duration {
        fade.active = false;
    }
}
