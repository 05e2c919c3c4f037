//! Player state, progression and derived combat stats
//!
//! Combat stats are never mutated in place. They are recomputed by the pure
//! `derive_stats` function from three independent sources: permanent shop
//! levels, sticky achievement bonuses, and transient per-run level-up
//! bonuses. Every mutation of a source goes through `recompute_stats`, so
//! the stats can never drift from the formula.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::achievement::Achievement;
use super::bullet::Bullet;
use super::collision::Rect;
use super::shop::{Shop, ShopUpgrade};
use crate::consts::{
    BORDER_PADDING, PLAYER_BASE_DAMAGE, PLAYER_BASE_FIRE_RATE_MS, PLAYER_BASE_SPEED,
    PLAYER_MAX_HEALTH, PLAYER_MIN_FIRE_RATE_MS, PLAYER_SIZE, XP_PER_LEVEL,
};
use crate::store::{COINS_KEY, KILLS_KEY, PrefStore};

/// Transient per-run upgrades offered on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeType {
    Speed,
    Damage,
    FireRate,
}

impl UpgradeType {
    pub const ALL: [UpgradeType; 3] = [UpgradeType::Speed, UpgradeType::Damage, UpgradeType::FireRate];

    /// Localization key resolved by the UI layer
    pub fn description_key(self) -> &'static str {
        match self {
            UpgradeType::Speed => "speedUpgradeDescription",
            UpgradeType::Damage => "damageUpgradeDescription",
            UpgradeType::FireRate => "fireRateUpgradeDescription",
        }
    }
}

/// Accumulated level-up picks for the current run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelUpBonuses {
    pub damage_bonus: i32,
    pub speed_multiplier: f32,
    pub fire_rate_reduction_ms: u64,
}

impl Default for LevelUpBonuses {
    fn default() -> Self {
        Self {
            damage_bonus: 0,
            speed_multiplier: 1.0,
            fire_rate_reduction_ms: 0,
        }
    }
}

/// Derived combat stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub bullet_damage: i32,
    pub fire_rate_ms: u64,
    pub speed: f32,
}

/// The one place combat stats come from
pub fn derive_stats(shop: &Shop, achievement_bonus: i32, level_up: &LevelUpBonuses) -> Stats {
    let speed = PLAYER_BASE_SPEED
        * 1.03f32.powi(shop.level(ShopUpgrade::Speed) as i32)
        * level_up.speed_multiplier;

    let fire_rate_ms = (PLAYER_BASE_FIRE_RATE_MS as i64
        - shop.level(ShopUpgrade::FireRate) as i64 * 10
        - level_up.fire_rate_reduction_ms as i64)
        .max(PLAYER_MIN_FIRE_RATE_MS as i64) as u64;

    let bullet_damage = PLAYER_BASE_DAMAGE
        + shop.level(ShopUpgrade::Damage) as i32
        + achievement_bonus
        + level_up.damage_bonus;

    Stats {
        bullet_damage,
        fire_rate_ms,
        speed,
    }
}

/// Sum of bonuses from currently unlocked achievements, re-evaluating each
/// one against the lifetime kill count first
fn achievement_damage_bonus(achievements: &mut [Achievement], total_kills: i32) -> i32 {
    let mut bonus = 0;
    for achievement in achievements.iter_mut() {
        achievement.update_status(total_kills);
        if achievement.is_unlocked() {
            bonus += achievement.damage_bonus();
        }
    }
    bonus
}

/// The player
///
/// Coins and lifetime kills persist across runs through the preference
/// store; level, xp, health and level-up bonuses are per-run.
#[derive(Debug)]
pub struct Player {
    /// Top-left corner of the bounding box
    pos: Vec2,
    health: i32,
    level: i32,
    xp: i32,
    xp_to_next_level: i32,
    coins: i32,
    enemies_killed: i32,
    /// `None` until the first shot, so a fresh run fires immediately
    last_shot_ms: Option<u64>,
    level_up: LevelUpBonuses,
    stats: Stats,
    shop: Shop,
    store: Box<dyn PrefStore>,
}

impl Player {
    pub fn new(pos: Vec2, achievements: &mut [Achievement], store: Box<dyn PrefStore>) -> Self {
        let coins = store.get_int(COINS_KEY, 0);
        let enemies_killed = store.get_int(KILLS_KEY, 0);
        let shop = Shop::new();
        let level_up = LevelUpBonuses::default();
        let bonus = achievement_damage_bonus(achievements, enemies_killed);
        let stats = derive_stats(&shop, bonus, &level_up);
        Self {
            pos,
            health: PLAYER_MAX_HEALTH,
            level: 1,
            xp: 0,
            xp_to_next_level: XP_PER_LEVEL,
            coins,
            enemies_killed,
            last_shot_ms: None,
            level_up,
            stats,
            shop,
            store,
        }
    }

    /// Re-derive stats after any contributing source changed
    pub fn recompute_stats(&mut self, achievements: &mut [Achievement]) {
        let bonus = achievement_damage_bonus(achievements, self.enemies_killed);
        self.stats = derive_stats(&self.shop, bonus, &self.level_up);
    }

    /// Apply a movement delta. Diagonal input is renormalized so diagonal
    /// travel is no faster than axial, then the position is clamped inside
    /// the padded map bounds.
    pub fn move_by(&mut self, mut dx: f32, mut dy: f32, map_size: f32) {
        if dx != 0.0 && dy != 0.0 {
            let norm = std::f32::consts::FRAC_1_SQRT_2;
            dx *= norm;
            dy *= norm;
        }
        let max = map_size - PLAYER_SIZE - BORDER_PADDING;
        self.pos.x = (self.pos.x + dx).clamp(BORDER_PADDING, max);
        self.pos.y = (self.pos.y + dy).clamp(BORDER_PADDING, max);
    }

    /// Rate-limited fire: at most one bullet per `fire_rate_ms` window. The
    /// very first shot of a run is never gated.
    pub fn shoot(&mut self, aim: Vec2, now_ms: u64) -> Option<Bullet> {
        if let Some(last) = self.last_shot_ms
            && now_ms.saturating_sub(last) < self.stats.fire_rate_ms
        {
            return None;
        }
        self.last_shot_ms = Some(now_ms);
        Some(Bullet::new(
            self.center(),
            aim,
            self.stats.bullet_damage,
            now_ms,
        ))
    }

    /// Grant XP, leveling up as many times as the amount covers
    pub fn add_xp(&mut self, amount: i32) {
        self.xp += amount;
        while self.xp >= self.xp_to_next_level {
            self.xp -= self.xp_to_next_level;
            self.level += 1;
            self.xp_to_next_level = XP_PER_LEVEL * self.level;
        }
    }

    /// Up to three distinct upgrade types in random order
    pub fn upgrade_options(&self, rng: &mut impl Rng) -> Vec<UpgradeType> {
        let mut options = UpgradeType::ALL.to_vec();
        options.shuffle(rng);
        options.truncate(3);
        options
    }

    /// Apply one transient level-up pick and re-derive stats
    pub fn apply_upgrade(&mut self, upgrade: UpgradeType, achievements: &mut [Achievement]) {
        match upgrade {
            UpgradeType::Speed => self.level_up.speed_multiplier *= 1.1,
            UpgradeType::Damage => self.level_up.damage_bonus += 5,
            UpgradeType::FireRate => self.level_up.fire_rate_reduction_ms += 50,
        }
        self.recompute_stats(achievements);
    }

    /// Buy a permanent shop upgrade: requires both headroom below the level
    /// cap and enough coins. Debits, persists the balance, bumps the level
    /// and re-derives stats. Returns false (changing nothing) otherwise.
    pub fn purchase_upgrade(&mut self, upgrade: ShopUpgrade, achievements: &mut [Achievement]) -> bool {
        if !self.shop.can_upgrade(upgrade) {
            return false;
        }
        let cost = self.shop.cost(upgrade);
        if self.coins < cost {
            return false;
        }
        self.coins -= cost;
        self.shop.advance(upgrade);
        self.store.put_int(COINS_KEY, self.coins);
        self.recompute_stats(achievements);
        true
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    /// Heal, only while alive and below max
    pub fn regenerate_health(&mut self, amount: i32) {
        if self.is_alive() && self.health < PLAYER_MAX_HEALTH {
            self.health = (self.health + amount).min(PLAYER_MAX_HEALTH);
        }
    }

    pub fn add_coins(&mut self, amount: i32) {
        self.coins += amount;
        self.store.put_int(COINS_KEY, self.coins);
    }

    /// Record a kill, persist it and re-evaluate achievement bonuses
    pub fn add_enemy_kill(&mut self, achievements: &mut [Achievement]) {
        self.enemies_killed += 1;
        self.store.put_int(KILLS_KEY, self.enemies_killed);
        self.recompute_stats(achievements);
    }

    /// Overwrite the lifetime kill counter (profile/testing flows)
    pub fn set_enemies_killed(&mut self, amount: i32, achievements: &mut [Achievement]) {
        self.enemies_killed = amount.max(0);
        self.store.put_int(KILLS_KEY, self.enemies_killed);
        self.recompute_stats(achievements);
    }

    /// Per-run reset: restores health and progression, drops transient
    /// level-up bonuses. Shop levels, coins and lifetime kills survive.
    pub fn reset(&mut self, achievements: &mut [Achievement]) {
        self.health = PLAYER_MAX_HEALTH;
        self.level = 1;
        self.xp = 0;
        self.xp_to_next_level = XP_PER_LEVEL;
        self.level_up = LevelUpBonuses::default();
        self.last_shot_ms = None;
        self.recompute_stats(achievements);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_SIZE, PLAYER_SIZE)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(PLAYER_SIZE / 2.0)
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        PLAYER_MAX_HEALTH
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn xp(&self) -> i32 {
        self.xp
    }

    pub fn xp_to_next_level(&self) -> i32 {
        self.xp_to_next_level
    }

    pub fn coins(&self) -> i32 {
        self.coins
    }

    pub fn enemies_killed(&self) -> i32 {
        self.enemies_killed
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }
}
