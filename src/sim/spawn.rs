//! Obstacle spawner
//!
//! Two independent countdowns feed obstacles in from beyond the right edge.

use super::state::{GameState, Obstacle, ObstacleCategory};
use crate::tuning::ObstacleDef;

/// Count both timers down and emit whatever came due
pub fn update_spawner(state: &mut GameState, dt: f32) {
    state.spawn.small -= dt;
    state.spawn.large -= dt;

    if state.spawn.small <= 0.0 {
        spawn_from_table(state, ObstacleCategory::Small);
        let cfg = &state.tuning.spawn;
        let (min, span) = (cfg.small_interval_min, cfg.small_interval_span);
        state.spawn.small = state.rng.span(min, span);
    }
    if state.spawn.large <= 0.0 {
        spawn_from_table(state, ObstacleCategory::Large);
        let cfg = &state.tuning.spawn;
        let (min, span) = (cfg.large_interval_min, cfg.large_interval_span);
        state.spawn.large = state.rng.span(min, span);
    }
}

fn spawn_from_table(state: &mut GameState, category: ObstacleCategory) -> Option<u32> {
    let table = match category {
        ObstacleCategory::Small => &state.tuning.spawn.small,
        ObstacleCategory::Large => &state.tuning.spawn.large,
    };
    if table.is_empty() {
        return None;
    }
    let len = table.len();
    let idx = state.rng.index(len);
    let def = match category {
        ObstacleCategory::Small => state.tuning.spawn.small[idx],
        ObstacleCategory::Large => state.tuning.spawn.large[idx],
    };
    Some(spawn_obstacle(state, &def))
}

/// Place one obstacle from `def` past the right edge at a random gap
pub fn spawn_obstacle(state: &mut GameState, def: &ObstacleDef) -> u32 {
    let gap = state.rng.span(def.gap_min, def.gap_max - def.gap_min);
    let x = state.viewport.width + gap;
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind: def.kind,
        x,
        width: def.width,
        height: def.height,
    });
    log::debug!("Spawned {} #{} at x={:.0}", def.kind.as_str(), id, x);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn first_spawns_follow_initial_timers() {
        let mut state = GameState::new(11, Tuning::default());
        // 2.2 s until the first small obstacle
        for _ in 0..131 {
            update_spawner(&mut state, DT);
        }
        assert!(state.obstacles.is_empty());
        for _ in 0..3 {
            update_spawner(&mut state, DT);
        }
        assert_eq!(state.obstacles.len(), 1);
        assert!(!state.obstacles[0].kind.is_large());

        for _ in 0..170 {
            update_spawner(&mut state, DT);
        }
        assert!(state.obstacles.iter().any(|o| o.kind.is_large()));
    }

    #[test]
    fn spawn_lands_beyond_viewport_within_gap() {
        let mut state = GameState::new(5, Tuning::default());
        let def = state.tuning.spawn.large[1];
        for _ in 0..50 {
            let id = spawn_obstacle(&mut state, &def);
            let o = state.find_obstacle(id).copied().unwrap();
            assert_eq!(o.kind, ObstacleKind::Mountain);
            assert!(o.x >= 1280.0 + def.gap_min);
            assert!(o.x <= 1280.0 + def.gap_max);
        }
    }

    #[test]
    fn ids_strictly_increase() {
        let mut state = GameState::new(5, Tuning::default());
        for _ in 0..3000 {
            update_spawner(&mut state, DT);
        }
        assert!(state.obstacles.len() > 10);
        assert!(state.obstacles.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn timers_reseed_inside_their_windows() {
        let mut state = GameState::new(9, Tuning::default());
        state.spawn.small = 0.0;
        state.spawn.large = 0.0;
        update_spawner(&mut state, DT);
        assert_eq!(state.obstacles.len(), 2);
        assert!((2.0..3.4).contains(&state.spawn.small));
        assert!((4.5..7.0).contains(&state.spawn.large));
    }

    #[test]
    fn same_seed_same_spawns() {
        let mut a = GameState::new(77, Tuning::default());
        let mut b = GameState::new(77, Tuning::default());
        for _ in 0..1200 {
            update_spawner(&mut a, DT);
            update_spawner(&mut b, DT);
        }
        assert_eq!(a.obstacles, b.obstacles);
    }

    #[test]
    fn remove_leaves_neighbours_in_place() {
        let mut state = GameState::new(5, Tuning::default());
        let rock = state.tuning.spawn.small[0];
        let a = spawn_obstacle(&mut state, &rock);
        let b = spawn_obstacle(&mut state, &rock);
        let c = spawn_obstacle(&mut state, &rock);
        let before: Vec<_> = state.obstacles.iter().filter(|o| o.id != b).copied().collect();

        let removed = state.remove_obstacle(b).expect("obstacle b exists");
        assert_eq!(removed.id, b);
        assert!(state.find_obstacle(b).is_none());
        assert_eq!(state.obstacles, before);
        assert!(state.find_obstacle(a).is_some() && state.find_obstacle(c).is_some());
        assert!(state.remove_obstacle(b).is_none());
    }
}
