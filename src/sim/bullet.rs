//! Ballistic projectiles with swept collision
//!
//! Bullets move fast relative to enemy size, so the hit test samples the
//! segment between the previous and current position instead of only the
//! endpoint. Timestamps are injected by the caller, which makes lifetime
//! behavior fully testable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::enemy::Enemy;
use crate::consts::{BULLET_LIFETIME_MS, BULLET_SIZE, BULLET_SPEED};

/// Interim points sampled along the swept path (plus the start point)
const SWEEP_STEPS: u32 = 5;

/// A player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pos: Vec2,
    /// Position at the start of the current tick, for the swept test
    prev: Vec2,
    vel: Vec2,
    damage: i32,
    created_at_ms: u64,
    active: bool,
}

impl Bullet {
    /// Build a bullet at `start` heading toward `aim`. A degenerate aim
    /// point equal to the start yields a stationary bullet that still
    /// expires normally.
    pub fn new(start: Vec2, aim: Vec2, damage: i32, now_ms: u64) -> Self {
        let to_aim = aim - start;
        let dist = to_aim.length();
        let vel = if dist > 0.0 {
            to_aim / dist * BULLET_SPEED
        } else {
            Vec2::ZERO
        };
        Self {
            pos: start,
            prev: start,
            vel,
            damage,
            created_at_ms: now_ms,
            active: true,
        }
    }

    /// Advance one tick, or expire if the lifetime has elapsed
    pub fn update(&mut self, now_ms: u64) {
        if !self.active {
            return;
        }
        if now_ms.saturating_sub(self.created_at_ms) >= BULLET_LIFETIME_MS {
            self.active = false;
            return;
        }
        self.prev = self.pos;
        self.pos += self.vel;
    }

    /// Swept hit test against one enemy: samples `SWEEP_STEPS + 1` evenly
    /// spaced points from the previous to the current position so a fast
    /// bullet cannot tunnel through an enemy between ticks.
    pub fn hits(&self, enemy: &Enemy) -> bool {
        if !self.active {
            return false;
        }
        let enemy_bounds = enemy.collision_bounds();
        let step = (self.pos - self.prev) / SWEEP_STEPS as f32;
        for i in 0..=SWEEP_STEPS {
            let point = self.prev + step * i as f32;
            if Rect::centered(point, BULLET_SIZE).intersects(&enemy_bounds) {
                return true;
            }
        }
        false
    }

    /// One-way and idempotent
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;

    #[test]
    fn test_new_bullet_state() {
        let bullet = Bullet::new(Vec2::new(100.0, 100.0), Vec2::new(200.0, 200.0), 10, 0);
        assert_eq!(bullet.damage(), 10);
        assert!(bullet.is_active());
        assert_eq!(bullet.pos(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_update_moves_bullet() {
        let mut bullet = Bullet::new(Vec2::new(100.0, 100.0), Vec2::new(200.0, 200.0), 10, 0);
        bullet.update(20);
        assert_ne!(bullet.pos(), Vec2::new(100.0, 100.0));
        // Diagonal aim: both components advance equally
        let moved = bullet.pos() - Vec2::new(100.0, 100.0);
        assert!((moved.x - moved.y).abs() < 1e-4);
        assert!((moved.length() - BULLET_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut bullet = Bullet::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 10, 1000);
        bullet.update(1020);
        assert!(bullet.is_active());
        bullet.update(1000 + BULLET_LIFETIME_MS);
        assert!(!bullet.is_active());
    }

    #[test]
    fn test_expired_bullet_stops_moving() {
        let mut bullet = Bullet::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 10, 0);
        bullet.update(BULLET_LIFETIME_MS);
        let frozen = bullet.pos();
        bullet.update(BULLET_LIFETIME_MS + 20);
        assert_eq!(bullet.pos(), frozen);
    }

    #[test]
    fn test_swept_hit_between_positions() {
        // Enemy sits midway along the tick's path; the endpoint alone would
        // miss it, the sweep must not.
        let mut bullet = Bullet::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 10, 0);
        bullet.update(20);
        let enemy = Enemy::new(EnemyKind::Fast, Vec2::new(5.0, 0.0));
        assert!(bullet.hits(&enemy));
    }

    #[test]
    fn test_miss_far_enemy() {
        let mut bullet = Bullet::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 10, 0);
        bullet.update(20);
        let enemy = Enemy::new(EnemyKind::Basic, Vec2::new(200.0, 200.0));
        assert!(!bullet.hits(&enemy));
    }

    #[test]
    fn test_inactive_bullet_never_hits() {
        let bullet = {
            let mut b = Bullet::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 10, 0);
            b.deactivate();
            b
        };
        let enemy = Enemy::new(EnemyKind::Basic, Vec2::ZERO);
        assert!(!bullet.hits(&enemy));
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let mut bullet = Bullet::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 10, 0);
        bullet.deactivate();
        bullet.deactivate();
        assert!(!bullet.is_active());
    }
}
