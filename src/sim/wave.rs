//! Wave spawn economy
//!
//! Each wave gets a points budget that buys enemies from a cost table.
//! Placement searches random polar samples around the player for a spot
//! whose footprint does not overlap any existing or freshly placed enemy;
//! if none is found within the attempt budget the remaining spawn is
//! silently abandoned for this wave.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::enemy::{Enemy, EnemyKind};
use crate::consts::{
    BORDER_PADDING, ENEMY_SPAWN_RADIUS, ENEMY_SPAWN_SPREAD, PLAYER_SIZE,
    SPAWN_PLACEMENT_ATTEMPTS, WAVE_COOLDOWN_MS,
};

/// Cost-table entries, resolved to variants via `EnemyKind::from_cost`
const ENEMY_COSTS: [u32; 3] = [10, 15, 20];

/// Spawn economy state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveManager {
    current_wave: u32,
    points_available: i32,
    enemies_alive: u32,
    last_spawn_ms: u64,
}

impl WaveManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn points_available(&self) -> i32 {
        self.points_available
    }

    pub fn enemies_alive(&self) -> u32 {
        self.enemies_alive
    }

    /// Open the next wave: budget is `50 + wave * 20`
    pub fn start_next_wave(&mut self, now_ms: u64) {
        self.current_wave += 1;
        self.points_available = 50 + self.current_wave as i32 * 20;
        self.last_spawn_ms = now_ms;
        log::info!(
            "wave {} started, budget {}",
            self.current_wave,
            self.points_available
        );
    }

    /// A wave starts when the field is clear, or after the cooldown even
    /// with enemies alive. The latter guarantees forward progress against a
    /// stalemate.
    pub fn should_spawn_wave(&self, now_ms: u64) -> bool {
        self.enemies_alive == 0
            || now_ms.saturating_sub(self.last_spawn_ms) > WAVE_COOLDOWN_MS
    }

    /// Never drops below zero
    pub fn enemy_died(&mut self) {
        self.enemies_alive = self.enemies_alive.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Buy and place enemies until the budget is exhausted, nothing is
    /// affordable, or placement fails. Cost is debited per successful
    /// placement; a cost-table entry with no matching variant is logged and
    /// skipped without aborting the wave.
    pub fn spawn_enemies(
        &mut self,
        player_center: Vec2,
        map_size: f32,
        existing: &[Enemy],
        rng: &mut impl Rng,
    ) -> Vec<Enemy> {
        let mut spawned: Vec<Enemy> = Vec::new();

        while self.points_available > 0 {
            let Some(cost) = self.random_affordable_cost(rng) else {
                break;
            };
            let Some(pos) = find_free_position(player_center, map_size, existing, &spawned, rng)
            else {
                log::debug!(
                    "no free spawn position after {SPAWN_PLACEMENT_ATTEMPTS} attempts, \
                     abandoning wave {} spawn with {} points left",
                    self.current_wave,
                    self.points_available
                );
                break;
            };

            self.points_available -= cost as i32;

            let Some(kind) = EnemyKind::from_cost(cost) else {
                log::warn!("no enemy variant for cost {cost}, skipping spawn attempt");
                continue;
            };
            self.enemies_alive += 1;
            spawned.push(Enemy::new(kind, pos));
        }

        spawned
    }

    /// Uniform pick among cost entries still within budget
    fn random_affordable_cost(&self, rng: &mut impl Rng) -> Option<u32> {
        let affordable: Vec<u32> = ENEMY_COSTS
            .iter()
            .copied()
            .filter(|&cost| cost as i32 <= self.points_available)
            .collect();
        if affordable.is_empty() {
            return None;
        }
        Some(affordable[rng.random_range(0..affordable.len())])
    }
}

/// Sample up to `SPAWN_PLACEMENT_ATTEMPTS` polar positions in a ring around
/// the player, clamped to map bounds, and return the first whose footprint
/// is free of every existing and already placed enemy
fn find_free_position(
    player_center: Vec2,
    map_size: f32,
    existing: &[Enemy],
    spawned: &[Enemy],
    rng: &mut impl Rng,
) -> Option<Vec2> {
    let max = map_size - PLAYER_SIZE - BORDER_PADDING;
    for _ in 0..SPAWN_PLACEMENT_ATTEMPTS {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let distance = ENEMY_SPAWN_RADIUS + rng.random_range(0.0..ENEMY_SPAWN_SPREAD);
        let candidate = Vec2::new(
            (player_center.x + angle.cos() * distance).clamp(BORDER_PADDING, max),
            (player_center.y + angle.sin() * distance).clamp(BORDER_PADDING, max),
        );

        let footprint = Rect::centered(candidate, PLAYER_SIZE);
        let blocked = existing
            .iter()
            .chain(spawned.iter())
            .any(|enemy| footprint.intersects(&enemy.collision_bounds()));
        if !blocked {
            return Some(candidate);
        }
    }
    None
}
