//! Obstacle contact checks
//!
//! Large obstacles raise a decision once the player draws near; small ones are
//! landed on, hit, or (in Fire) raise a fire decision on contact.

use super::effects;
use super::physics;
use super::state::{DecisionContext, DecisionKind, GameEvent, GameState, Obstacle, Territory};
use crate::consts::SMALL_HIT;

/// Result of testing one small obstacle against the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmallContact {
    None,
    /// Player snapped onto the obstacle top
    Landed,
    /// Immediate damage; the obstacle was removed
    Damage,
    /// Fire hazard in the Fire territory
    Decision,
}

/// Center-to-center gap at which a large obstacle raises its decision
pub fn trigger_distance(state: &GameState, speed: f32) -> f32 {
    state.tuning.world.trigger_base + speed * state.tuning.world.trigger_speed_factor
}

/// True when a large obstacle sits inside the trigger window ahead of the player
pub fn large_in_range(state: &GameState, o: &Obstacle, speed: f32) -> bool {
    let ahead = o.center_x() - state.player.center_x();
    ahead > 0.0 && ahead <= trigger_distance(state, speed)
}

/// Land-on, hit, or fire-decision test for a small obstacle
pub fn check_small(state: &mut GameState, o: &Obstacle) -> SmallContact {
    let world = &state.tuning.world;
    let (feet_portion, pad, tolerance, center_threshold) = (
        world.feet_portion,
        world.horiz_pad,
        world.landing_tolerance,
        world.center_threshold,
    );
    let player = &state.player;
    let top_y = state.ground_y() - o.height - state.obstacle_lift(o.kind);

    let p_left = player.pos.x + pad;
    let p_right = player.pos.x + player.size.x - pad;
    let overlap_horiz = p_left < o.right() && p_right > o.x;
    let falling = player.vy > 0.0;
    let crossed_top = player.prev_y <= top_y && player.pos.y >= top_y;

    if overlap_horiz && falling && crossed_top && player.pos.y - top_y < tolerance {
        let center = state.player.center_x();
        physics::land_on(&mut state.player, top_y, &state.tuning.physics);
        effects::spawn_dust(state, center, top_y);
        return SmallContact::Landed;
    }

    let feet_top = player.pos.y - player.size.y * feet_portion;
    let overlap_feet = feet_top < top_y + o.height && player.pos.y > top_y;
    if !(overlap_horiz && overlap_feet) {
        return SmallContact::None;
    }
    if (player.center_x() - o.center_x()).abs() >= center_threshold {
        return SmallContact::None;
    }

    if state.territory.current == Territory::Fire {
        return SmallContact::Decision;
    }
    state.inventory.damage(SMALL_HIT);
    state.remove_obstacle(o.id);
    state.push_event(GameEvent::SmallHit);
    log::debug!(
        "Small {} #{} hit, health {}",
        o.kind.as_str(),
        o.id,
        state.inventory.health()
    );
    SmallContact::Damage
}

/// Walk the obstacle list once: cull off-screen obstacles, then run contact
/// tests in spawn order. Returns the first decision that is still eligible
/// (not yet processed this territory); scanning stops there.
pub fn scan_obstacles(state: &mut GameState, speed: f32) -> Option<DecisionContext> {
    let margin = state.tuning.world.offscreen_margin;
    let mut i = 0;
    while i < state.obstacles.len() {
        let o = state.obstacles[i];

        if o.right() < -margin {
            state.obstacles.remove(i);
            continue;
        }

        if o.kind.is_large() {
            if !state.decision.is_open()
                && !state.processed.contains(&o.id)
                && large_in_range(state, &o, speed)
            {
                return Some(DecisionContext {
                    kind: DecisionKind::Large,
                    obstacle: o,
                });
            }
            i += 1;
            continue;
        }

        match check_small(state, &o) {
            SmallContact::Damage => continue,
            SmallContact::Decision if !state.processed.contains(&o.id) => {
                return Some(DecisionContext {
                    kind: DecisionKind::SmallFire,
                    obstacle: o,
                });
            }
            _ => i += 1,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(21, Tuning::default())
    }

    fn place(state: &mut GameState, kind: ObstacleKind, center_ahead: f32) -> Obstacle {
        let def = *state
            .tuning
            .spawn
            .small
            .iter()
            .chain(state.tuning.spawn.large.iter())
            .find(|d| d.kind == kind)
            .unwrap();
        let id = state.next_entity_id();
        let o = Obstacle {
            id,
            kind,
            x: state.player.center_x() + center_ahead - def.width / 2.0,
            width: def.width,
            height: def.height,
        };
        state.obstacles.push(o);
        o
    }

    #[test]
    fn trigger_window_grows_with_speed() {
        let s = state();
        assert!((trigger_distance(&s, 5.4) - 137.0).abs() < 1e-4);
        assert!(trigger_distance(&s, 5.85) > trigger_distance(&s, 5.4));
    }

    #[test]
    fn large_triggers_only_ahead_and_in_range() {
        let mut s = state();
        let near = place(&mut s, ObstacleKind::Mountain, 100.0);
        let far = place(&mut s, ObstacleKind::Cave, 400.0);
        let behind = place(&mut s, ObstacleKind::Hunger, -10.0);
        assert!(large_in_range(&s, &near, 5.4));
        assert!(!large_in_range(&s, &far, 5.4));
        assert!(!large_in_range(&s, &behind, 5.4));

        let ctx = scan_obstacles(&mut s, 5.4).unwrap();
        assert_eq!(ctx.kind, DecisionKind::Large);
        assert_eq!(ctx.obstacle.id, near.id);
    }

    #[test]
    fn processed_obstacle_does_not_retrigger() {
        let mut s = state();
        let o = place(&mut s, ObstacleKind::Mountain, 100.0);
        s.processed.insert(o.id);
        assert!(scan_obstacles(&mut s, 5.4).is_none());
        s.processed.clear();
        assert!(scan_obstacles(&mut s, 5.4).is_some());
    }

    #[test]
    fn offscreen_obstacles_are_culled() {
        let mut s = state();
        let keep = place(&mut s, ObstacleKind::Rock, 900.0);
        let id = s.next_entity_id();
        s.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Rock,
            x: -200.0,
            width: 60.0,
            height: 50.0,
        });
        assert!(scan_obstacles(&mut s, 5.4).is_none());
        assert_eq!(s.obstacles.len(), 1);
        assert_eq!(s.obstacles[0].id, keep.id);
    }

    /// Feet line inside the rock body: the obstacle top sits above the ground line
    fn sink_into(s: &mut GameState, o: &Obstacle) {
        let top = s.ground_y() - o.height - s.obstacle_lift(o.kind);
        s.player.pos.y = top + 20.0;
        s.player.prev_y = top + 20.0;
        s.player.vy = 0.0;
    }

    #[test]
    fn small_hit_outside_fire_damages_and_removes() {
        let mut s = state();
        s.territory.current = Territory::Middle;
        let o = place(&mut s, ObstacleKind::Rock, 0.0);
        sink_into(&mut s, &o);
        assert_eq!(check_small(&mut s, &o), SmallContact::Damage);
        assert_eq!(s.inventory.health(), 100.0 - SMALL_HIT);
        assert!(s.find_obstacle(o.id).is_none());
        assert_eq!(s.drain_events(), vec![GameEvent::SmallHit]);
    }

    #[test]
    fn small_hit_in_fire_asks_for_decision() {
        let mut s = state();
        let o = place(&mut s, ObstacleKind::Hurdle, 10.0);
        sink_into(&mut s, &o);
        assert_eq!(check_small(&mut s, &o), SmallContact::Decision);
        assert_eq!(s.inventory.health(), 100.0);

        let ctx = scan_obstacles(&mut s, 5.4).unwrap();
        assert_eq!(ctx.kind, DecisionKind::SmallFire);
    }

    #[test]
    fn off_center_overlap_is_harmless() {
        let mut s = state();
        s.territory.current = Territory::Ice;
        let o = place(&mut s, ObstacleKind::Rock, 60.0);
        sink_into(&mut s, &o);
        assert_eq!(check_small(&mut s, &o), SmallContact::None);
        assert_eq!(s.inventory.health(), 100.0);
    }

    #[test]
    fn falling_across_top_lands() {
        let mut s = state();
        s.territory.current = Territory::Middle;
        let o = place(&mut s, ObstacleKind::Rock, 0.0);
        let top = s.ground_y() - o.height - s.obstacle_lift(o.kind);
        s.player.prev_y = top - 3.0;
        s.player.pos.y = top + 2.0;
        s.player.vy = 2.0;
        s.player.on_ground = false;
        assert_eq!(check_small(&mut s, &o), SmallContact::Landed);
        assert_eq!(s.player.pos.y, top);
        assert!(s.player.on_ground);
        assert_eq!(s.player.vy, 0.0);
        assert_eq!(s.particles.len(), 18);
        assert!(s.find_obstacle(o.id).is_some());
    }
}
