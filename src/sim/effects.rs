//! Cosmetic particles and glitch shards
//!
//! Everything here draws from the cosmetic stream (`fx_rng`) and never feeds
//! back into gameplay.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, GlitchShard, Particle, ParticleKind, Territory};
use crate::consts::MAX_PARTICLES;

fn push(state: &mut GameState, particle: Particle) {
    if state.particles.len() < MAX_PARTICLES {
        state.particles.push(particle);
    }
}

/// Centered unit jitter in [-0.5, 0.5)
fn jitter(state: &mut GameState) -> f32 {
    state.fx_rng.random::<f32>() - 0.5
}

/// Landing puff at the player's feet
pub fn spawn_dust(state: &mut GameState, x: f32, y: f32) {
    for _ in 0..18 {
        let pos = Vec2::new(x + jitter(state) * 25.0, y + jitter(state) * 12.0);
        let vel = Vec2::new(
            jitter(state) * 3.0,
            -state.fx_rng.random::<f32>() * 3.2 - 1.2,
        );
        let max_life = 0.7 + state.fx_rng.random::<f32>() * 0.7;
        push(state, Particle {
            pos,
            vel,
            life: 0.0,
            max_life,
            kind: ParticleKind::Dust,
        });
    }
}

/// Arrow impact debris
pub fn spawn_impact(state: &mut GameState, at: Vec2) {
    for _ in 0..10 {
        let vel = Vec2::new(jitter(state) * 5.0, jitter(state) * 5.0);
        push(state, Particle {
            pos: at,
            vel,
            life: 0.0,
            max_life: 0.6,
            kind: ParticleKind::Dust,
        });
    }
}

/// Speed streak behind a sprinting player
pub fn spawn_trail(state: &mut GameState, x: f32, y: f32) {
    let vel = Vec2::new(
        -3.8 - state.fx_rng.random::<f32>() * 1.8,
        jitter(state) * 1.3,
    );
    let max_life = 0.35 + state.fx_rng.random::<f32>() * 0.35;
    push(state, Particle {
        pos: Vec2::new(x, y),
        vel,
        life: 0.0,
        max_life,
        kind: ParticleKind::Trail,
    });
}

/// Screen-center smoke cloud masking a territory change
pub fn spawn_smoke_burst(state: &mut GameState) {
    let center = Vec2::new(state.viewport.width * 0.5, state.viewport.height * 0.5);
    for _ in 0..150 {
        let angle = state.fx_rng.random::<f32>() * std::f32::consts::TAU;
        let speed = 1.2 + state.fx_rng.random::<f32>() * 2.8;
        let pos = center + Vec2::new(jitter(state) * 90.0, jitter(state) * 70.0);
        let max_life = 1.0 + state.fx_rng.random::<f32>() * 0.9;
        push(state, Particle {
            pos,
            vel: Vec2::new(angle.cos() * speed, angle.sin() * speed * 0.65),
            life: 0.0,
            max_life,
            kind: ParticleKind::Smoke,
        });
    }
}

/// Occasional snowflake while in Ice
pub fn spawn_snow(state: &mut GameState) {
    if state.territory.current != Territory::Ice || state.fx_rng.random::<f32>() >= 0.7 {
        return;
    }
    let w = state.viewport.width;
    let h = state.viewport.height;
    let pos = Vec2::new(
        state.fx_rng.random::<f32>() * w,
        state.fx_rng.random::<f32>() * (h - 60.0).max(0.0),
    );
    let vel = Vec2::new(
        -0.45 - state.fx_rng.random::<f32>() * 0.45,
        0.4 + state.fx_rng.random::<f32>() * 0.4,
    );
    let max_life = 2.4 + state.fx_rng.random::<f32>() * 0.6;
    push(state, Particle {
        pos,
        vel,
        life: 0.0,
        max_life,
        kind: ParticleKind::Snow,
    });
}

/// Shards scattered over `area` starting at `origin` (top-left)
pub fn spawn_glitch(state: &mut GameState, origin: Vec2, area: Vec2) {
    for _ in 0..25 {
        let rng = &mut state.fx_rng;
        let pos = origin + Vec2::new(rng.random::<f32>() * area.x, rng.random::<f32>() * area.y);
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 8.0,
            (rng.random::<f32>() - 0.5) * 8.0,
        );
        let max_life = 0.8 + rng.random::<f32>() * 0.4;
        let size = Vec2::new(
            2.0 + rng.random::<f32>() * 8.0,
            2.0 + rng.random::<f32>() * 8.0,
        );
        let hue = 180.0 + rng.random::<f32>() * 60.0;
        let lightness = 50.0 + rng.random::<f32>() * 40.0;
        state.glitches.push(GlitchShard {
            pos,
            vel,
            life: 0.0,
            max_life,
            size,
            hue,
            lightness,
        });
    }
}

/// Age, move and cull particles
pub fn update_particles(state: &mut GameState, dt: f32) {
    state.particles.retain_mut(|p| {
        p.life += dt;
        p.pos += p.vel;
        if p.life >= p.max_life {
            return false;
        }
        match p.kind {
            ParticleKind::Smoke => {
                p.vel.y -= 0.035;
                p.vel.x *= 0.994;
            }
            ParticleKind::Dust => p.vel.y += 0.05,
            ParticleKind::Trail | ParticleKind::Snow => {}
        }
        true
    });
}

pub fn update_glitches(state: &mut GameState, dt: f32) {
    state.glitches.retain_mut(|g| {
        g.life += dt;
        g.pos += g.vel;
        g.vel *= 0.96;
        g.life < g.max_life
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn dust_rises_then_fades() {
        let mut state = GameState::new(3, Tuning::default());
        spawn_dust(&mut state, 320.0, 724.0);
        assert_eq!(state.particles.len(), 18);
        assert!(state.particles.iter().all(|p| p.vel.y < 0.0));
        for _ in 0..120 {
            update_particles(&mut state, 1.0 / 60.0);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn smoke_burst_respects_cap() {
        let mut state = GameState::new(3, Tuning::default());
        for _ in 0..5 {
            spawn_smoke_burst(&mut state);
        }
        assert_eq!(state.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn snow_only_in_ice() {
        let mut state = GameState::new(3, Tuning::default());
        for _ in 0..50 {
            spawn_snow(&mut state);
        }
        assert!(state.particles.is_empty());

        state.territory.current = Territory::Ice;
        for _ in 0..50 {
            spawn_snow(&mut state);
        }
        assert!(!state.particles.is_empty());
        assert!(state.particles.iter().all(|p| p.kind == ParticleKind::Snow));
    }

    #[test]
    fn glitch_shards_decay() {
        let mut state = GameState::new(3, Tuning::default());
        spawn_glitch(&mut state, Vec2::new(100.0, 200.0), Vec2::new(150.0, 350.0));
        assert_eq!(state.glitches.len(), 25);
        assert!(state.glitches.iter().all(|g| (180.0..=240.0).contains(&g.hue)));
        for _ in 0..90 {
            update_glitches(&mut state, 1.0 / 60.0);
        }
        assert!(state.glitches.is_empty());
    }

    #[test]
    fn effects_leave_gameplay_stream_alone() {
        let mut state = GameState::new(3, Tuning::default());
        let before = state.rng.clone();
        spawn_dust(&mut state, 0.0, 0.0);
        spawn_trail(&mut state, 0.0, 0.0);
        spawn_impact(&mut state, Vec2::ZERO);
        assert_eq!(state.rng, before);
    }
}
