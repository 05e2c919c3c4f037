//! Threshold-gated, sticky achievement unlocks
//!
//! Names and descriptions are opaque localization keys; the core never
//! renders text itself.

use serde::{Deserialize, Serialize};

/// A kill-count achievement granting a permanent damage bonus while unlocked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    name_key: String,
    description_key: String,
    target_kills: i32,
    damage_bonus: i32,
    unlocked: bool,
}

impl Achievement {
    pub fn new(name_key: &str, description_key: &str, target_kills: i32, damage_bonus: i32) -> Self {
        Self {
            name_key: name_key.to_owned(),
            description_key: description_key.to_owned(),
            target_kills,
            damage_bonus,
            unlocked: false,
        }
    }

    /// Unlocks once the threshold is met. Sticky: a lower kill count on a
    /// later evaluation never re-locks it.
    pub fn update_status(&mut self, total_kills: i32) {
        if total_kills >= self.target_kills {
            self.unlocked = true;
        }
    }

    /// Explicit re-lock, used by profile reset flows only
    pub fn reset(&mut self) {
        self.unlocked = false;
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn damage_bonus(&self) -> i32 {
        self.damage_bonus
    }

    pub fn target_kills(&self) -> i32 {
        self.target_kills
    }

    pub fn name_key(&self) -> &str {
        &self.name_key
    }

    pub fn description_key(&self) -> &str {
        &self.description_key
    }
}

/// The standard achievement ladder
pub fn standard_set() -> Vec<Achievement> {
    vec![
        Achievement::new("achievementFirstKillName", "achievementFirstKillDesc", 1, 1),
        Achievement::new("achievementFiveKillsName", "achievementFiveKillsDesc", 5, 2),
        Achievement::new(
            "achievementFifteenKillsName",
            "achievementFifteenKillsDesc",
            15,
            3,
        ),
    ]
}
