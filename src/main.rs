//! Swarm Arena headless driver
//!
//! Starts the background engine, kicks off a run, and mirrors the snapshot
//! to the log for a few seconds. Stands in for a real front end; anything
//! rendering the game would consume `Engine` the same way.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glam::Vec2;

use swarm_arena::consts::MAP_SIZE;
use swarm_arena::sim::Command;
use swarm_arena::{Engine, GamePhase, InputState, JsonFileStore, SystemClock};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store = JsonFileStore::load("swarm-arena-prefs.json");
    let seed = rand::random();
    let mut engine = Engine::start(seed, Box::new(store), Arc::new(SystemClock::new()));

    engine.send(Command::Start);
    engine.set_input(InputState {
        right: true,
        aim: Vec2::splat(MAP_SIZE),
        ..InputState::default()
    });

    for _ in 0..10 {
        thread::sleep(Duration::from_millis(500));
        let snap = engine.snapshot();
        log::info!(
            "wave {} | hp {}/{} | lvl {} | xp {}/{} | coins {} | enemies {} | kills {}",
            snap.wave,
            snap.player.health,
            snap.player.max_health,
            snap.player.level,
            snap.player.xp,
            snap.player.xp_to_next_level,
            snap.player.coins,
            snap.enemies.len(),
            snap.player.enemies_killed,
        );

        // Always take the first offered upgrade so the run keeps moving
        if snap.paused && !snap.offered_upgrades.is_empty() {
            log::info!("level up, picking {:?}", snap.offered_upgrades[0]);
            engine.send(Command::ChooseUpgrade(0));
        }
        if snap.phase == GamePhase::GameOver {
            log::info!("game over, reset in {}s", snap.countdown);
        }
    }

    engine.stop();
}
