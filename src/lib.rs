//! Swarm Arena - a top-down arena survival simulation core
//!
//! Core modules:
//! - `sim`: Gameplay logic (waves, enemies, bullets, player progression)
//! - `engine`: Fixed-tick background loop and snapshot publishing
//! - `store`: Key-value preference store for the persisted profile

pub mod engine;
pub mod sim;
pub mod store;

pub use engine::{Clock, Engine, InputState, SystemClock};
pub use sim::{Command, GamePhase, Snapshot, TickInput};
pub use store::{JsonFileStore, MemoryStore, PrefStore};

/// Game tuning constants
pub mod consts {
    /// Fixed simulation tick period (50 Hz)
    pub const TICK_PERIOD_MS: u64 = 20;
    /// Countdown timer period during game over
    pub const COUNTDOWN_PERIOD_MS: u64 = 1000;
    /// Seconds shown on the game-over countdown before the run resets
    pub const GAME_OVER_COUNTDOWN_SECS: u32 = 10;

    /// Square map edge length (world units)
    pub const MAP_SIZE: f32 = 3200.0;
    /// Keep-out margin along every map edge
    pub const BORDER_PADDING: f32 = 5.0;

    /// Player bounding-box edge length
    pub const PLAYER_SIZE: f32 = 30.0;
    pub const PLAYER_MAX_HEALTH: i32 = 200;
    pub const PLAYER_BASE_SPEED: f32 = 5.0;
    pub const PLAYER_BASE_DAMAGE: i32 = 10;
    /// Minimum milliseconds between shots before any upgrades
    pub const PLAYER_BASE_FIRE_RATE_MS: u64 = 150;
    /// Fire rate can never be upgraded below this
    pub const PLAYER_MIN_FIRE_RATE_MS: u64 = 100;
    /// XP needed to finish level N is `XP_PER_LEVEL * N`
    pub const XP_PER_LEVEL: i32 = 100;
    /// Health restored on every regen tick
    pub const REGEN_AMOUNT: i32 = 1;
    /// Regen fires every Nth simulation tick
    pub const REGEN_INTERVAL_TICKS: u32 = 5;

    /// Bullet bounding-box edge length
    pub const BULLET_SIZE: f32 = 12.0;
    /// Distance a bullet covers per tick
    pub const BULLET_SPEED: f32 = 10.0;
    /// Bullets expire this long after being fired
    pub const BULLET_LIFETIME_MS: u64 = 5000;

    /// Inner radius of the ring enemies spawn in around the player
    pub const ENEMY_SPAWN_RADIUS: f32 = 400.0;
    /// Radial spread beyond `ENEMY_SPAWN_RADIUS`
    pub const ENEMY_SPAWN_SPREAD: f32 = 300.0;
    /// Soft push-apart strength between overlapping enemies
    pub const ENEMY_PUSH_FORCE: f32 = 0.5;
    /// A fresh wave may start this long after the previous one even if
    /// enemies are still alive
    pub const WAVE_COOLDOWN_MS: u64 = 15_000;
    /// Placement samples tried per enemy before the spawn is abandoned
    pub const SPAWN_PLACEMENT_ATTEMPTS: u32 = 100;
}
