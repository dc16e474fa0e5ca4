//! Bow projectiles
//!
//! Arrows fly a flat ballistic arc and destroy the first eligible large
//! obstacle they touch. Canyons are holes in the ground and never get hit;
//! nothing can be shot while in Ice.

use glam::Vec2;

use super::effects;
use super::state::{Arrow, GameEvent, GameState, Item, Obstacle, ObstacleKind, Territory};

/// Slack for accumulated f32 tick time when comparing against a lifetime
const AGE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireResult {
    Fired(u32),
    /// Bow does not work in Ice
    Frozen,
    NotSelected,
}

/// Loose an arrow from the player's bow hand, optionally locked onto one obstacle
pub fn fire(state: &mut GameState, target: Option<u32>) -> FireResult {
    if state.territory.current == Territory::Ice {
        state.push_event(GameEvent::BowFrozen);
        return FireResult::Frozen;
    }
    if !state.inventory.wields(Item::Bow) {
        state.push_event(GameEvent::BowNotSelected);
        return FireResult::NotSelected;
    }

    let cfg = &state.tuning.arrow;
    let player = &state.player;
    let origin = Vec2::new(
        player.pos.x + player.size.x * cfg.origin_x_frac,
        player.pos.y - player.size.y * cfg.origin_y_frac,
    );
    let angle = cfg.angle_deg.to_radians();
    let vel = Vec2::new(angle.cos(), angle.sin()) * cfg.speed;
    let (max_age, radius) = (cfg.lifetime, cfg.radius);

    let id = state.next_entity_id();
    state.arrows.push(Arrow {
        id,
        pos: origin,
        vel,
        age: 0.0,
        max_age,
        radius,
        target,
    });
    state.push_event(GameEvent::ArrowFired);
    log::debug!("Arrow #{} fired (target {:?})", id, target);
    FireResult::Fired(id)
}

/// Screen-space box an arrow can hit, as (top-left, size).
/// `None` for obstacles arrows ignore.
pub fn hitbox(state: &GameState, o: &Obstacle) -> Option<(Vec2, Vec2)> {
    if !o.kind.is_large() || o.kind == ObstacleKind::Canyon {
        return None;
    }
    let size = if o.kind == ObstacleKind::Hunger {
        Vec2::new(state.tuning.arrow.hunger_hitbox_w, state.tuning.arrow.hunger_hitbox_h)
    } else {
        Vec2::new(o.width, o.height)
    };
    let top = state.ground_y() - size.y - state.obstacle_lift(o.kind);
    Some((Vec2::new(o.x, top), size))
}

fn overlaps(arrow: &Arrow, min: Vec2, size: Vec2) -> bool {
    let r = arrow.radius;
    arrow.pos.x + r > min.x
        && arrow.pos.x - r < min.x + size.x
        && arrow.pos.y + r > min.y
        && arrow.pos.y - r < min.y + size.y
}

/// Age, move and collide every arrow
pub fn update_arrows(state: &mut GameState, dt: f32) {
    let gravity = state.tuning.arrow.gravity;
    let mut i = state.arrows.len();
    while i > 0 {
        i -= 1;
        let arrow = &mut state.arrows[i];
        arrow.age += dt;
        arrow.pos += arrow.vel;
        arrow.vel.y += gravity;

        if arrow.age + AGE_EPSILON >= arrow.max_age {
            log::debug!("Arrow #{} expired", arrow.id);
            state.arrows.remove(i);
            continue;
        }
        if state.territory.current == Territory::Ice {
            continue;
        }

        let arrow = state.arrows[i].clone();
        let Some(obstacle) = state
            .obstacles
            .iter()
            .find(|o| hitbox(state, o).is_some_and(|(min, size)| overlaps(&arrow, min, size)))
            .copied()
        else {
            continue;
        };

        // First touched obstacle decides; a locked arrow flies through others
        if arrow.target.is_none_or(|t| t == obstacle.id) {
            state.remove_obstacle(obstacle.id);
            state.arrows.remove(i);
            state.push_event(GameEvent::ArrowHit {
                obstacle: obstacle.kind,
            });
            effects::spawn_impact(state, arrow.pos);
            log::debug!("Arrow #{} destroyed {} #{}", arrow.id, obstacle.kind.as_str(), obstacle.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(8, Tuning::default())
    }

    fn mountain_ahead(state: &mut GameState, ahead: f32) -> Obstacle {
        let o = Obstacle {
            id: state.next_entity_id(),
            kind: ObstacleKind::Mountain,
            x: state.player.center_x() + ahead - 50.0,
            width: 100.0,
            height: 122.0,
        };
        state.obstacles.push(o);
        o
    }

    #[test]
    fn fires_forward_and_slightly_up() {
        let mut s = state();
        assert!(matches!(fire(&mut s, None), FireResult::Fired(_)));
        let a = &s.arrows[0];
        assert!((a.pos.x - 370.0).abs() < 1e-3);
        assert!((a.pos.y - (724.0 - 143.0)).abs() < 1e-3);
        assert!(a.vel.x > 34.0 && a.vel.y < 0.0);
        assert_eq!(s.drain_events(), vec![GameEvent::ArrowFired]);
    }

    #[test]
    fn bow_refuses_in_ice_or_when_not_wielded() {
        let mut s = state();
        s.inventory.active = Some(Item::Rope);
        assert_eq!(fire(&mut s, None), FireResult::NotSelected);
        s.territory.current = Territory::Ice;
        assert_eq!(fire(&mut s, None), FireResult::Frozen);
        assert!(s.arrows.is_empty());
    }

    #[test]
    fn expires_exactly_at_lifetime_with_nothing_to_hit() {
        let mut s = state();
        fire(&mut s, None);
        let ticks = (s.tuning.arrow.lifetime / SIM_DT).round() as usize;
        for _ in 0..ticks - 1 {
            update_arrows(&mut s, SIM_DT);
        }
        assert_eq!(s.arrows.len(), 1);
        update_arrows(&mut s, SIM_DT);
        assert!(s.arrows.is_empty());
    }

    #[test]
    fn hits_mountain_in_path() {
        let mut s = state();
        let o = mountain_ahead(&mut s, 100.0);
        fire(&mut s, Some(o.id));
        update_arrows(&mut s, SIM_DT);
        assert!(s.arrows.is_empty());
        assert!(s.find_obstacle(o.id).is_none());
        assert_eq!(s.particles.len(), 10);
    }

    #[test]
    fn locked_arrow_passes_other_obstacles() {
        let mut s = state();
        let decoy = mountain_ahead(&mut s, 100.0);
        fire(&mut s, Some(decoy.id + 1000));
        update_arrows(&mut s, SIM_DT);
        assert!(s.find_obstacle(decoy.id).is_some());
        assert_eq!(s.arrows.len(), 1);
    }

    #[test]
    fn canyons_and_small_obstacles_have_no_hitbox() {
        let s = state();
        let canyon = Obstacle {
            id: 1,
            kind: ObstacleKind::Canyon,
            x: 400.0,
            width: 140.0,
            height: 40.0,
        };
        let rock = Obstacle {
            kind: ObstacleKind::Rock,
            ..canyon
        };
        assert!(hitbox(&s, &canyon).is_none());
        assert!(hitbox(&s, &rock).is_none());

        let hunger = Obstacle {
            kind: ObstacleKind::Hunger,
            ..canyon
        };
        let (min, size) = hitbox(&s, &hunger).unwrap();
        assert_eq!(size, Vec2::new(24.0, 30.0));
        assert_eq!(min.y, 724.0 - 30.0 - 48.0);
    }
}
