//! Permanent cross-run upgrade economy
//!
//! The shop only tracks levels and pricing; affordability and coin movement
//! are coordinated by `Player::purchase_upgrade`, and the level feeds the
//! derived-stat formula rather than mutating stats directly.

use serde::{Deserialize, Serialize};

/// Cost curve and cap for one upgrade type
#[derive(Debug, Clone, Copy)]
pub struct Pricing {
    pub base_cost: i32,
    pub cost_increment: i32,
    pub max_level: u32,
}

/// Purchasable permanent upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopUpgrade {
    Damage,
    FireRate,
    Speed,
}

impl ShopUpgrade {
    pub const ALL: [ShopUpgrade; 3] = [
        ShopUpgrade::Damage,
        ShopUpgrade::FireRate,
        ShopUpgrade::Speed,
    ];

    pub fn pricing(self) -> Pricing {
        match self {
            ShopUpgrade::Damage => Pricing {
                base_cost: 10,
                cost_increment: 10,
                max_level: 5,
            },
            ShopUpgrade::FireRate => Pricing {
                base_cost: 15,
                cost_increment: 10,
                max_level: 5,
            },
            ShopUpgrade::Speed => Pricing {
                base_cost: 12,
                cost_increment: 10,
                max_level: 5,
            },
        }
    }

    /// Localization key resolved by the UI layer
    pub fn description_key(self) -> &'static str {
        match self {
            ShopUpgrade::Damage => "shopDamageUpgrade",
            ShopUpgrade::FireRate => "shopFireRateUpgrade",
            ShopUpgrade::Speed => "shopSpeedUpgrade",
        }
    }

    fn index(self) -> usize {
        match self {
            ShopUpgrade::Damage => 0,
            ShopUpgrade::FireRate => 1,
            ShopUpgrade::Speed => 2,
        }
    }
}

/// Upgrade-type → level mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shop {
    levels: [u32; 3],
}

impl Shop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, upgrade: ShopUpgrade) -> u32 {
        self.levels[upgrade.index()]
    }

    /// Cost of the next level
    pub fn cost(&self, upgrade: ShopUpgrade) -> i32 {
        let pricing = upgrade.pricing();
        pricing.base_cost + self.level(upgrade) as i32 * pricing.cost_increment
    }

    pub fn can_upgrade(&self, upgrade: ShopUpgrade) -> bool {
        self.level(upgrade) < upgrade.pricing().max_level
    }

    /// Bump the level if below the cap. Returns false at max level.
    /// Affordability is the caller's concern.
    pub fn advance(&mut self, upgrade: ShopUpgrade) -> bool {
        if !self.can_upgrade(upgrade) {
            return false;
        }
        self.levels[upgrade.index()] += 1;
        true
    }

    /// Zero all levels. New-profile/testing flows only, never the per-run
    /// reset.
    pub fn reset(&mut self) {
        self.levels = [0; 3];
    }
}
