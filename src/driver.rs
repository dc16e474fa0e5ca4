//! Fixed-timestep driver
//!
//! Owns the simulation and the input model. The host calls `frame` once per
//! display frame with its clock, and routes key events and prompt clicks
//! through the command methods below.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::hud::{DecisionPrompt, HudSnapshot};
use crate::sim::arrow::{self, FireResult};
use crate::sim::decision::{self, Choice, Resolution};
use crate::sim::input::{InputState, Key};
use crate::sim::state::{GameEvent, GameState, Item, Territory, Viewport};
use crate::sim::{territory, tick};
use crate::tuning::Tuning;

/// Game instance holding all state
#[derive(Debug, Clone)]
pub struct Game {
    pub state: GameState,
    pub input: InputState,
    accumulator: f32,
    last_time: Option<f64>,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_viewport(seed, tuning, Viewport::default())
    }

    pub fn with_viewport(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        let input = InputState::new(tuning.physics.jump_buffer);
        let mut state = GameState::with_viewport(seed, tuning, viewport);
        state.push_event(GameEvent::RunStarted);
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state,
            input,
            accumulator: 0.0,
            last_time: None,
        }
    }

    /// Host frame callback; `now` is a monotonic clock in seconds.
    /// Returns the number of simulation ticks run.
    pub fn frame(&mut self, now: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (now - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now);
        self.advance(dt)
    }

    /// Feed `real_dt` seconds into the accumulator and run the ticks it covers
    pub fn advance(&mut self, real_dt: f32) -> u32 {
        if self.state.is_frozen() || self.state.paused {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += real_dt.max(0.0);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &mut self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            if self.state.is_frozen() {
                break;
            }
        }

        if substeps >= MAX_SUBSTEPS {
            if self.accumulator >= SIM_DT {
                log::warn!(
                    "Dropped {:.3}s of simulation after a stall",
                    self.accumulator
                );
            }
            self.accumulator = 0.0;
        }
        if self.state.is_frozen() {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Unprocessed real time carried to the next frame
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn key_down(&mut self, key: Key) {
        self.input.press(key);
        match key {
            Key::P => self.toggle_pause(),
            Key::F => {
                self.fire_bow();
            }
            _ => {
                if let Some(item) = key.item_slot() {
                    self.select_item(item);
                }
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.release(key);
    }

    pub fn toggle_pause(&mut self) {
        self.state.paused = !self.state.paused;
        let paused = self.state.paused;
        self.state.push_event(GameEvent::PauseToggled { paused });
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
    }

    /// Back to a fresh run; random streams carry on
    pub fn restart(&mut self) {
        self.state.reset();
        self.input.clear_all();
        self.accumulator = 0.0;
    }

    /// Force the next territory, even mid-decision
    pub fn rotate_territory(&mut self) {
        territory::rotate(&mut self.state);
    }

    pub fn select_item(&mut self, item: Item) {
        self.state.select_item(item);
    }

    /// Free shot from the F key. Ignored while frozen or paused, or when the
    /// bow is not the active item outside Ice.
    pub fn fire_bow(&mut self) -> Option<FireResult> {
        if self.state.is_frozen() || self.state.paused {
            return None;
        }
        if self.state.inventory.active != Some(Item::Bow)
            || self.state.territory.current == Territory::Ice
        {
            return None;
        }
        Some(arrow::fire(&mut self.state, None))
    }

    /// Answer the open decision prompt
    pub fn resolve_decision(&mut self, choice: Choice) -> Resolution {
        let resolution = decision::resolve(&mut self.state, choice);
        if resolution == Resolution::Resolved {
            self.accumulator = 0.0;
        }
        resolution
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.set_viewport(Viewport { width, height });
    }

    /// Toast messages since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::capture(&self.state)
    }

    pub fn decision_prompt(&self) -> Option<DecisionPrompt> {
        DecisionPrompt::from_state(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleKind, RunOutcome};

    fn game() -> Game {
        Game::new(31, Tuning::default())
    }

    #[test]
    fn first_frame_only_sets_clock() {
        let mut g = game();
        assert_eq!(g.frame(10.0), 0);
        assert_eq!(g.frame(10.04), 2);
        assert_eq!(g.state.time_ticks, 2);
    }

    #[test]
    fn partial_tick_carries_over() {
        let mut g = game();
        assert_eq!(g.advance(SIM_DT * 0.5), 0);
        assert!(g.accumulator() > 0.0);
        assert_eq!(g.advance(SIM_DT * 0.6), 1);
        assert!(g.accumulator() < SIM_DT);
    }

    #[test]
    fn stall_is_capped_and_dropped() {
        let mut g = game();
        let ran = g.advance(2.0);
        assert_eq!(ran, MAX_SUBSTEPS);
        assert_eq!(g.accumulator(), 0.0);
        assert_eq!(g.state.time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn pause_discards_time() {
        let mut g = game();
        g.key_down(Key::P);
        assert!(g.state.paused);
        assert_eq!(g.advance(1.0), 0);
        assert_eq!(g.accumulator(), 0.0);
        g.key_up(Key::P);
        g.key_down(Key::P);
        assert!(!g.state.paused);
        assert_eq!(g.advance(SIM_DT), 1);
    }

    #[test]
    fn decision_stops_the_frame_and_resolves() {
        let mut g = game();
        let center = g.state.player.center_x();
        let id = g.state.next_entity_id();
        g.state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Cave,
            x: center + 100.0 - 90.0,
            width: 180.0,
            height: 98.0,
        });
        assert_eq!(g.advance(SIM_DT * 5.0), 1);
        assert_eq!(g.accumulator(), 0.0);
        assert!(g.decision_prompt().is_some());
        assert_eq!(g.advance(1.0), 0);

        assert_eq!(g.resolve_decision(Choice::Alt), Resolution::Resolved);
        assert!(g.decision_prompt().is_none());
        assert_eq!(g.state.inventory.health(), 75.0);
        assert_eq!(g.advance(SIM_DT), 1);
    }

    #[test]
    fn digit_keys_select_items() {
        let mut g = game();
        g.drain_events();
        g.key_down(Key::Digit2);
        assert_eq!(g.state.inventory.active, Some(Item::Rope));
        let events = g.drain_events();
        assert_eq!(events[0].message(), "Rope selected (2)");
    }

    #[test]
    fn f_key_fires_only_with_bow_outside_ice() {
        let mut g = game();
        g.key_down(Key::F);
        assert_eq!(g.state.arrows.len(), 1);

        g.select_item(Item::Water);
        assert!(g.fire_bow().is_none());

        g.select_item(Item::Bow);
        g.rotate_territory();
        g.rotate_territory();
        assert_eq!(g.state.territory.current, Territory::Ice);
        assert!(g.fire_bow().is_none());
        assert_eq!(g.state.arrows.len(), 1);
    }

    #[test]
    fn restart_returns_to_initial_run() {
        let mut g = game();
        g.advance(0.1);
        g.rotate_territory();
        g.state.inventory.damage(40.0);
        g.state.outcome = Some(RunOutcome::Lose);
        g.restart();
        assert_eq!(g.state.time_ticks, 0);
        assert_eq!(g.state.inventory.health(), 100.0);
        assert_eq!(g.state.territory.current, Territory::Fire);
        assert!(g.state.outcome.is_none());
        assert!(g.drain_events().contains(&GameEvent::RunStarted));
        assert_eq!(g.advance(SIM_DT), 1);
    }

    #[test]
    fn resize_regrounds_player() {
        let mut g = game();
        g.resize(800.0, 600.0);
        assert_eq!(g.state.player.pos.y, 604.0);
        assert_eq!(g.hud().player.y, 604.0);
    }
}
