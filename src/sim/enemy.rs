//! Enemy variants, seek movement and pairwise separation
//!
//! The three variants differ only in data, so they are a closed enum with a
//! constant spec table. Spawning resolves a variant from its cost-table
//! entry through `EnemyKind::from_cost`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::ENEMY_PUSH_FORCE;

/// Per-variant constant data
#[derive(Debug, Clone, Copy)]
pub struct EnemySpec {
    /// Bounding-box edge length (also the mass proxy for separation)
    pub size: f32,
    /// Distance covered per tick
    pub speed: f32,
    /// Collision-box edge length
    pub collision_radius: f32,
    pub max_health: i32,
    pub xp_reward: i32,
    /// Damage dealt to the player on contact
    pub contact_damage: i32,
    pub coin_reward: i32,
    /// Spawn-budget cost
    pub cost: u32,
}

/// Enemy variant family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank];

    pub fn spec(self) -> EnemySpec {
        match self {
            EnemyKind::Basic => EnemySpec {
                size: 30.0,
                speed: 3.0,
                collision_radius: 30.0,
                max_health: 20,
                xp_reward: 20,
                contact_damage: 20,
                coin_reward: 2,
                cost: 10,
            },
            EnemyKind::Fast => EnemySpec {
                size: 25.0,
                speed: 4.0,
                collision_radius: 25.0,
                max_health: 10,
                xp_reward: 10,
                contact_damage: 10,
                coin_reward: 1,
                cost: 15,
            },
            EnemyKind::Tank => EnemySpec {
                size: 40.0,
                speed: 2.0,
                collision_radius: 40.0,
                max_health: 50,
                xp_reward: 50,
                contact_damage: 40,
                coin_reward: 3,
                cost: 20,
            },
        }
    }

    /// Resolve a variant from a cost-table entry
    pub fn from_cost(cost: u32) -> Option<EnemyKind> {
        Self::ALL.iter().copied().find(|k| k.spec().cost == cost)
    }
}

/// A live enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Center position
    pub pos: Vec2,
    health: i32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            health: kind.spec().max_health,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Health never reported negative
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    pub fn xp_reward(&self) -> i32 {
        self.kind.spec().xp_reward
    }

    pub fn coin_reward(&self) -> i32 {
        self.kind.spec().coin_reward
    }

    pub fn contact_damage(&self) -> i32 {
        self.kind.spec().contact_damage
    }

    /// Box used for bullet hits, spawn placement and mutual separation
    pub fn collision_bounds(&self) -> Rect {
        Rect::centered(self.pos, self.kind.spec().collision_radius)
    }

    /// Box used for player contact
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.kind.spec().size)
    }

    /// Step toward `target`, then push away from any enemy the tentative
    /// position would overlap. The correction is soft and mass-weighted:
    /// `penetration * massRatio * pushForce` along the away direction, so
    /// overlapping enemies shove each other apart over a few ticks instead
    /// of resolving instantly.
    pub fn advance<'a>(&mut self, target: Vec2, others: impl Iterator<Item = &'a Enemy>) {
        let spec = self.kind.spec();

        let to_target = target - self.pos;
        let dist = to_target.length();
        let step = if dist > 0.0 {
            to_target / dist * spec.speed
        } else {
            Vec2::ZERO
        };

        let mut next = self.pos + step;
        let future_bounds = Rect::centered(next, spec.collision_radius);

        for other in others {
            if !future_bounds.intersects(&other.collision_bounds()) {
                continue;
            }
            let away = self.pos - other.pos;
            let d = away.length();
            if d <= 0.0 {
                // Exactly stacked; no direction to push along
                continue;
            }
            let other_spec = other.kind.spec();
            let penetration = (spec.collision_radius + other_spec.collision_radius) / 2.0 - d;
            let mass_ratio = spec.size / (spec.size + other_spec.size);
            next += away / d * penetration * mass_ratio * ENEMY_PUSH_FORCE;
        }

        self.pos = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alive_iff_health_positive() {
        let mut enemy = Enemy::new(EnemyKind::Basic, Vec2::ZERO);
        assert!(enemy.is_alive());
        assert_eq!(enemy.health(), 20);

        enemy.take_damage(19);
        assert!(enemy.is_alive());

        enemy.take_damage(1);
        assert!(!enemy.is_alive());
        assert_eq!(enemy.health(), 0);
    }

    #[test]
    fn test_health_never_negative() {
        let mut enemy = Enemy::new(EnemyKind::Fast, Vec2::ZERO);
        enemy.take_damage(1000);
        assert_eq!(enemy.health(), 0);
    }

    #[test]
    fn test_from_cost_lookup() {
        assert_eq!(EnemyKind::from_cost(10), Some(EnemyKind::Basic));
        assert_eq!(EnemyKind::from_cost(15), Some(EnemyKind::Fast));
        assert_eq!(EnemyKind::from_cost(20), Some(EnemyKind::Tank));
        assert_eq!(EnemyKind::from_cost(99), None);
    }

    #[test]
    fn test_advance_moves_toward_target() {
        let mut enemy = Enemy::new(EnemyKind::Basic, Vec2::new(0.0, 0.0));
        enemy.advance(Vec2::new(100.0, 0.0), std::iter::empty());
        assert_eq!(enemy.pos, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_advance_at_target_stays_put() {
        let mut enemy = Enemy::new(EnemyKind::Tank, Vec2::new(50.0, 50.0));
        enemy.advance(Vec2::new(50.0, 50.0), std::iter::empty());
        assert_eq!(enemy.pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_separation_pushes_away_from_overlap() {
        // Two basics almost stacked, both heading for the same target to
        // the right. The mover should end up further from the blocker than
        // pure seek movement would leave it.
        let blocker = Enemy::new(EnemyKind::Basic, Vec2::new(10.0, 0.0));
        let mut mover = Enemy::new(EnemyKind::Basic, Vec2::new(0.0, 0.0));

        mover.advance(Vec2::new(200.0, 0.0), std::iter::once(&blocker));

        // Seek alone would land at x=3; separation pushes back left
        assert!(mover.pos.x < 3.0);
        assert_eq!(mover.pos.y, 0.0);
    }

    #[test]
    fn test_separation_is_mass_weighted() {
        let blocker = Enemy::new(EnemyKind::Tank, Vec2::new(10.0, 0.0));
        let mut light = Enemy::new(EnemyKind::Fast, Vec2::new(0.0, 0.0));
        let mut heavy = Enemy::new(EnemyKind::Tank, Vec2::new(0.0, 0.0));

        light.advance(Vec2::new(200.0, 0.0), std::iter::once(&blocker));
        heavy.advance(Vec2::new(200.0, 0.0), std::iter::once(&blocker));

        // Fast seeks further (speed 4 vs 2) yet the lighter body also takes
        // a smaller share of the correction; both must remain left of their
        // uncorrected positions.
        assert!(light.pos.x < 4.0);
        assert!(heavy.pos.x < 2.0);
    }
}
