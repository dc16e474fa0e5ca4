//! Territory Run headless entry point
//!
//! Plays one run with a simple autopilot at the configured frame rate and
//! prints a JSON report. Usage: `territory-run [settings.json]`

use std::path::Path;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;

use territory_run::Game;
use territory_run::settings::{Settings, SettingsError};
use territory_run::sim::{Choice, GameEvent, Item, Key, RunOutcome, Territory, Viewport};

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Summary printed at the end of a headless run
#[derive(Debug, Default, Serialize)]
struct RunReport {
    seed: u64,
    profile: String,
    outcome: Option<RunOutcome>,
    reason: Option<&'static str>,
    elapsed: f32,
    ticks: u64,
    distance: f32,
    health: f32,
    water_buckets: u32,
    territory: Option<Territory>,
    territory_changes: u32,
    decisions: u32,
    arrows_fired: u32,
    arrow_hits: u32,
    small_hits: u32,
}

impl RunReport {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::TerritoryChanged { .. } => self.territory_changes += 1,
            GameEvent::DecisionOpened { .. } => self.decisions += 1,
            GameEvent::ArrowFired => self.arrows_fired += 1,
            GameEvent::ArrowHit { .. } => self.arrow_hits += 1,
            GameEvent::SmallHit => self.small_hits += 1,
            _ => {}
        }
    }
}

/// Picks items per territory, hops small obstacles and answers every prompt
#[derive(Debug, Default)]
struct Autopilot {
    jump_held_ticks: u32,
}

impl Autopilot {
    fn drive(&mut self, game: &mut Game) {
        if let Some(prompt) = game.decision_prompt() {
            let choice = if prompt.primary_enabled {
                Choice::Primary
            } else {
                Choice::Alt
            };
            log::debug!("Autopilot answers '{}' with {:?}", prompt.title, choice);
            game.resolve_decision(choice);
            return;
        }

        let wanted = match game.state.territory.current {
            Territory::Ice => Item::Rope,
            Territory::Fire | Territory::Middle => Item::Bow,
        };
        if game.state.inventory.active != Some(wanted) {
            game.select_item(wanted);
        }

        if self.jump_held_ticks > 0 {
            self.jump_held_ticks -= 1;
            if self.jump_held_ticks == 0 {
                game.key_up(Key::Space);
            }
            return;
        }

        let player_center = game.state.player.center_x();
        let small_ahead = game.state.obstacles.iter().any(|o| {
            let ahead = o.center_x() - player_center;
            !o.kind.is_large() && (40.0..220.0).contains(&ahead)
        });
        if small_ahead && game.state.player.on_ground {
            game.key_down(Key::Space);
            self.jump_held_ticks = 12;
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

fn run() -> Result<RunReport, RunError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path))?,
        None => Settings::default(),
    };
    let tuning = settings.tuning()?;
    let seed = settings.seed.unwrap_or_else(clock_seed);
    let viewport = Viewport {
        width: settings.viewport_width,
        height: settings.viewport_height,
    };
    log::info!(
        "Starting {} run ({:.0}s) with seed {}",
        settings.profile.as_str(),
        tuning.total_time,
        seed
    );

    let mut game = Game::with_viewport(seed, tuning, viewport);
    let mut autopilot = Autopilot::default();
    let mut report = RunReport {
        seed,
        profile: settings.profile.as_str().to_string(),
        ..Default::default()
    };

    let frame_dt = 1.0 / f64::from(settings.frame_rate.max(1.0));
    let frames = (f64::from(settings.simulate_seconds) / frame_dt).ceil() as u64;
    let mut now = 0.0;
    game.frame(now);
    for _ in 0..frames {
        autopilot.drive(&mut game);
        now += frame_dt;
        game.frame(now);
        for event in game.drain_events() {
            log::debug!("{}", event.message());
            report.record(&event);
        }
        if game.state.outcome.is_some() {
            break;
        }
    }

    let state = &game.state;
    report.outcome = state.outcome;
    report.reason = state.outcome.map(|o| o.reason());
    report.elapsed = state.elapsed;
    report.ticks = state.time_ticks;
    report.distance = state.distance;
    report.health = state.inventory.health();
    report.water_buckets = state.inventory.water_buckets();
    report.territory = Some(state.territory.current);
    Ok(report)
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Territory Run (headless) starting...");

    match run().and_then(|report| Ok(serde_json::to_string_pretty(&report)?)) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("territory-run: {err}");
            ExitCode::FAILURE
        }
    }
}
