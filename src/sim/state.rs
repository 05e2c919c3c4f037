//! Game state and read-only snapshot views
//!
//! `GameState` is owned exclusively by the tick thread; everything a
//! renderer or HUD needs is copied out into a `Snapshot` once per tick so
//! readers never observe a half-applied mutation.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::achievement::{self, Achievement};
use super::bullet::Bullet;
use super::enemy::{Enemy, EnemyKind};
use super::player::{Player, UpgradeType};
use super::wave::WaveManager;
use crate::consts::{GAME_OVER_COUNTDOWN_SECS, MAP_SIZE, PLAYER_SIZE};
use crate::store::PrefStore;

/// Simulation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum GamePhase {
    #[default]
    StartScreen,
    Playing,
    GameOver,
}

/// Complete simulation state
#[derive(Debug)]
pub struct GameState {
    pub phase: GamePhase,
    /// Cooperative pause gate checked at the top of every tick. Set while
    /// an upgrade choice is pending and on game over.
    pub paused: bool,
    /// Pending level-up choices; empty unless `paused` for selection
    pub offered_upgrades: Vec<UpgradeType>,
    /// Seconds left on the game-over screen before the run resets
    pub countdown: u32,
    pub player: Player,
    pub achievements: Vec<Achievement>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub waves: WaveManager,
    pub rng: Pcg32,
    /// Ticks since the last health regen
    pub regen_counter: u32,
}

impl GameState {
    pub fn new(seed: u64, store: Box<dyn PrefStore>) -> Self {
        let mut achievements = achievement::standard_set();
        let player = Player::new(
            Vec2::splat((MAP_SIZE - PLAYER_SIZE) / 2.0),
            &mut achievements,
            store,
        );
        Self {
            phase: GamePhase::StartScreen,
            paused: false,
            offered_upgrades: Vec::new(),
            countdown: GAME_OVER_COUNTDOWN_SECS,
            player,
            achievements,
            enemies: Vec::new(),
            bullets: Vec::new(),
            waves: WaveManager::new(),
            rng: Pcg32::seed_from_u64(seed),
            regen_counter: 0,
        }
    }

    /// Clear all transient entities and return to the start screen. Shop
    /// levels, coins and lifetime kills survive through the player reset.
    pub fn reset_run(&mut self) {
        self.player.reset(&mut self.achievements);
        self.enemies.clear();
        self.bullets.clear();
        self.waves.reset();
        self.offered_upgrades.clear();
        self.paused = false;
        self.countdown = GAME_OVER_COUNTDOWN_SECS;
        self.phase = GamePhase::StartScreen;
        log::info!("run reset, back to start screen");
    }

    /// Copy out everything the render/HUD side needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            paused: self.paused,
            countdown: self.countdown,
            wave: self.waves.current_wave(),
            enemies_alive: self.waves.enemies_alive(),
            offered_upgrades: self.offered_upgrades.clone(),
            player: PlayerView {
                pos: self.player.pos(),
                size: PLAYER_SIZE,
                health: self.player.health(),
                max_health: self.player.max_health(),
                level: self.player.level(),
                xp: self.player.xp(),
                xp_to_next_level: self.player.xp_to_next_level(),
                coins: self.player.coins(),
                enemies_killed: self.player.enemies_killed(),
                bullet_damage: self.player.stats().bullet_damage,
            },
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    pos: e.pos,
                    size: e.kind.spec().size,
                    kind: e.kind,
                    health: e.health(),
                    max_health: e.kind.spec().max_health,
                })
                .collect(),
            bullets: self.bullets.iter().map(|b| BulletView { pos: b.pos() }).collect(),
        }
    }
}

/// Player fields exposed to readers
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: f32,
    pub health: i32,
    pub max_health: i32,
    pub level: i32,
    pub xp: i32,
    pub xp_to_next_level: i32,
    pub coins: i32,
    pub enemies_killed: i32,
    pub bullet_damage: i32,
}

/// Enemy fields exposed to readers
#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub size: f32,
    pub kind: EnemyKind,
    pub health: i32,
    pub max_health: i32,
}

/// Bullet fields exposed to readers
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
}

/// Per-tick read-only view handed to rendering/input layers
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub paused: bool,
    pub countdown: u32,
    pub wave: u32,
    pub enemies_alive: u32,
    pub offered_upgrades: Vec<UpgradeType>,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: PLAYER_SIZE,
            health: 0,
            max_health: 0,
            level: 1,
            xp: 0,
            xp_to_next_level: 0,
            coins: 0,
            enemies_killed: 0,
            bullet_damage: 0,
        }
    }
}
