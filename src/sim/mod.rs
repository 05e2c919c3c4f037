//! Gameplay simulation module
//!
//! All game rules live here. This module has no thread or I/O concerns of
//! its own: the tick function is driven externally with explicit input and
//! timestamps, RNG is seeded, and persistence goes through the `PrefStore`
//! abstraction. The `engine` module owns the actual loop.

pub mod achievement;
pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod player;
pub mod shop;
pub mod state;
pub mod tick;
pub mod wave;

pub use achievement::Achievement;
pub use bullet::Bullet;
pub use collision::Rect;
pub use enemy::{Enemy, EnemyKind};
pub use player::{LevelUpBonuses, Player, Stats, UpgradeType, derive_stats};
pub use shop::{Shop, ShopUpgrade};
pub use state::{BulletView, EnemyView, GamePhase, GameState, PlayerView, Snapshot};
pub use tick::{Command, TickInput, apply_command, tick};
pub use wave::WaveManager;
