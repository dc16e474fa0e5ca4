//! Decision resolver
//!
//! `Closed -> Open(kind, obstacle) -> Closed`. While open the world is frozen and
//! `resolve` is the only way forward.

use glam::Vec2;

use super::arrow::{self, FireResult};
use super::effects;
use super::state::{
    DecisionContext, DecisionKind, DecisionState, GameEvent, GameState, Item, Territory,
};
use crate::consts::{BIG_HIT, SMALL_HIT};

/// The two buttons of a decision prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Spend the item (water, rope or bow)
    Primary,
    /// Push through and take the hit
    Alt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No decision was open
    NotOpen,
    /// Primary refused for lack of resources; the decision stays open
    Rejected,
    Resolved,
}

/// Open a decision unless this obstacle already raised one in the current territory
pub fn open(state: &mut GameState, ctx: DecisionContext) -> bool {
    if state.decision.is_open() || !state.processed.insert(ctx.obstacle.id) {
        return false;
    }
    state.decision = DecisionState::Open(ctx);
    state.push_event(GameEvent::DecisionOpened {
        kind: ctx.kind,
        obstacle: ctx.obstacle.kind,
    });
    log::info!(
        "Decision opened: {:?} on {} #{}",
        ctx.kind,
        ctx.obstacle.kind.as_str(),
        ctx.obstacle.id
    );
    true
}

/// Item the primary choice needs in the current territory
pub fn required_item(kind: DecisionKind, territory: Territory) -> Item {
    match (kind, territory) {
        (DecisionKind::SmallFire, _) => Item::Water,
        (DecisionKind::Large, Territory::Ice) => Item::Rope,
        (DecisionKind::Large, _) => Item::Bow,
    }
}

/// Whether the prompt should offer its primary button
pub fn primary_enabled(state: &GameState) -> bool {
    let Some(ctx) = state.decision.context() else {
        return false;
    };
    match ctx.kind {
        DecisionKind::SmallFire => state.inventory.water_buckets() > 0,
        DecisionKind::Large => state
            .inventory
            .owns(required_item(ctx.kind, state.territory.current)),
    }
}

/// Apply the chosen branch and close the decision
pub fn resolve(state: &mut GameState, choice: Choice) -> Resolution {
    let Some(ctx) = state.decision.context().copied() else {
        return Resolution::NotOpen;
    };
    let obstacle = ctx.obstacle;

    match (ctx.kind, choice) {
        (DecisionKind::SmallFire, Choice::Primary) => {
            if !state.inventory.use_water() {
                state.push_event(GameEvent::NoWater);
                return Resolution::Rejected;
            }
            state.remove_obstacle(obstacle.id);
            state.push_event(GameEvent::WaterUsed {
                remaining: state.inventory.water_buckets(),
            });
        }
        (DecisionKind::SmallFire, Choice::Alt) => {
            state.inventory.damage(SMALL_HIT);
            state.remove_obstacle(obstacle.id);
            state.push_event(GameEvent::PushedThroughFire);
        }
        (DecisionKind::Large, Choice::Primary) => {
            let territory = state.territory.current;
            if territory == Territory::Ice && state.inventory.wields(Item::Rope) {
                let (origin, area) = rope_footprint(state, &ctx);
                effects::spawn_glitch(state, origin, area);
                state.remove_obstacle(obstacle.id);
                state.push_event(GameEvent::RopeTrapped);
            } else if territory != Territory::Ice
                && state.inventory.wields(Item::Bow)
                && matches!(arrow::fire(state, Some(obstacle.id)), FireResult::Fired(_))
            {
                // The arrow removes the obstacle when it connects
            } else {
                push_through(state, obstacle.id);
            }
        }
        (DecisionKind::Large, Choice::Alt) => push_through(state, obstacle.id),
    }

    state.decision = DecisionState::Closed;
    log::info!("Decision resolved: {:?} with {:?}", ctx.kind, choice);
    state.check_run_end();
    Resolution::Resolved
}

fn push_through(state: &mut GameState, id: u32) {
    state.inventory.damage(BIG_HIT);
    state.remove_obstacle(id);
    state.push_event(GameEvent::PushedThroughObstacle);
}

/// Area the trapped yeti covered on screen, as (top-left, size)
fn rope_footprint(state: &GameState, ctx: &DecisionContext) -> (Vec2, Vec2) {
    let o = &ctx.obstacle;
    let world = &state.tuning.world;
    let draw_h = (state.player.size.y * 1.35).max(o.height * 1.25);
    let lift = world.obstacle_lift + world.middle_extra_lift;
    let top = state.ground_y() - lift - draw_h;
    (Vec2::new(o.x, top), Vec2::new(o.width * 1.5, draw_h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleKind};
    use crate::tuning::Tuning;

    fn open_on(state: &mut GameState, kind: DecisionKind, obstacle_kind: ObstacleKind) -> Obstacle {
        let o = Obstacle {
            id: state.next_entity_id(),
            kind: obstacle_kind,
            x: 400.0,
            width: 100.0,
            height: 100.0,
        };
        state.obstacles.push(o);
        assert!(open(state, DecisionContext { kind, obstacle: o }));
        o
    }

    fn state() -> GameState {
        GameState::new(4, Tuning::default())
    }

    #[test]
    fn open_is_once_per_obstacle() {
        let mut s = state();
        let o = open_on(&mut s, DecisionKind::Large, ObstacleKind::Cave);
        assert!(s.is_frozen());
        resolve(&mut s, Choice::Alt);
        assert!(!open(&mut s, DecisionContext {
            kind: DecisionKind::Large,
            obstacle: o,
        }));
        assert!(!s.decision.is_open());
    }

    #[test]
    fn resolve_without_open_is_noop() {
        let mut s = state();
        assert_eq!(resolve(&mut s, Choice::Primary), Resolution::NotOpen);
        assert_eq!(s.inventory.health(), 100.0);
    }

    #[test]
    fn water_extinguishes_fire() {
        let mut s = state();
        let o = open_on(&mut s, DecisionKind::SmallFire, ObstacleKind::Rock);
        assert!(primary_enabled(&s));
        assert_eq!(resolve(&mut s, Choice::Primary), Resolution::Resolved);
        assert_eq!(s.inventory.water_buckets(), 2);
        assert_eq!(s.inventory.health(), 100.0);
        assert!(s.find_obstacle(o.id).is_none());
        assert!(!s.is_frozen());
    }

    #[test]
    fn empty_bucket_rejects_then_alt_burns() {
        let mut s = state();
        while s.inventory.use_water() {}
        let o = open_on(&mut s, DecisionKind::SmallFire, ObstacleKind::Hurdle);
        assert!(!primary_enabled(&s));
        s.drain_events();

        assert_eq!(resolve(&mut s, Choice::Primary), Resolution::Rejected);
        assert!(s.decision.is_open());
        assert!(s.find_obstacle(o.id).is_some());
        assert_eq!(s.inventory.health(), 100.0);
        assert_eq!(s.drain_events(), vec![GameEvent::NoWater]);

        assert_eq!(resolve(&mut s, Choice::Alt), Resolution::Resolved);
        assert_eq!(s.inventory.health(), 100.0 - SMALL_HIT);
        assert!(s.find_obstacle(o.id).is_none());
        assert!(!s.decision.is_open());
    }

    #[test]
    fn rope_traps_yeti_in_ice() {
        let mut s = state();
        s.territory.current = Territory::Ice;
        s.inventory.active = Some(Item::Rope);
        let o = open_on(&mut s, DecisionKind::Large, ObstacleKind::Mountain);
        assert!(primary_enabled(&s));
        assert_eq!(resolve(&mut s, Choice::Primary), Resolution::Resolved);
        assert_eq!(s.inventory.health(), 100.0);
        assert!(s.find_obstacle(o.id).is_none());
        assert_eq!(s.glitches.len(), 25);
        assert!(s.arrows.is_empty());
    }

    #[test]
    fn bow_fires_locked_arrow_without_removing() {
        let mut s = state();
        let o = open_on(&mut s, DecisionKind::Large, ObstacleKind::Mountain);
        assert_eq!(resolve(&mut s, Choice::Primary), Resolution::Resolved);
        assert!(s.find_obstacle(o.id).is_some());
        assert_eq!(s.arrows.len(), 1);
        assert_eq!(s.arrows[0].target, Some(o.id));
        assert_eq!(s.inventory.health(), 100.0);
    }

    #[test]
    fn wrong_item_pushes_through() {
        let mut s = state();
        s.territory.current = Territory::Ice;
        // bow is active but frozen in Ice
        let o = open_on(&mut s, DecisionKind::Large, ObstacleKind::Cave);
        assert_eq!(resolve(&mut s, Choice::Primary), Resolution::Resolved);
        assert_eq!(s.inventory.health(), 100.0 - BIG_HIT);
        assert!(s.find_obstacle(o.id).is_none());
        assert!(s.arrows.is_empty());

        let mut s = state();
        s.inventory.active = Some(Item::Torch);
        open_on(&mut s, DecisionKind::Large, ObstacleKind::Hunger);
        resolve(&mut s, Choice::Primary);
        assert_eq!(s.inventory.health(), 100.0 - BIG_HIT);
    }

    #[test]
    fn alt_always_costs_a_heart() {
        let mut s = state();
        open_on(&mut s, DecisionKind::Large, ObstacleKind::Canyon);
        resolve(&mut s, Choice::Alt);
        assert_eq!(s.inventory.health(), 75.0);
        assert_eq!(s.inventory.water_buckets(), 3);
    }

    #[test]
    fn fatal_push_ends_the_run() {
        let mut s = state();
        s.inventory.damage(75.0);
        open_on(&mut s, DecisionKind::Large, ObstacleKind::Mountain);
        resolve(&mut s, Choice::Alt);
        assert_eq!(s.inventory.health(), 0.0);
        assert_eq!(s.outcome, Some(crate::sim::state::RunOutcome::Lose));
    }

    #[test]
    fn required_item_by_territory() {
        assert_eq!(required_item(DecisionKind::SmallFire, Territory::Fire), Item::Water);
        assert_eq!(required_item(DecisionKind::Large, Territory::Middle), Item::Bow);
        assert_eq!(required_item(DecisionKind::Large, Territory::Ice), Item::Rope);
    }
}
