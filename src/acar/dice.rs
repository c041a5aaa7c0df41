//! Dice and strength model
//!
//! Battle values become dice pools; every resolution roll is clamped to the
//! uniform 1-6 scale so morale thresholds and engagement targets compare
//! the same way regardless of force size.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::acar::constants::BV_PER_DIE;

/// Number of d6 rolled together for a given battle value
pub fn dice_pool_size(battle_value: u32) -> u32 {
    (battle_value / BV_PER_DIE).max(1)
}

/// Roll a single d6
pub fn roll_d6(rng: &mut impl Rng) -> i32 {
    rng.gen_range(1..=6)
}

/// Roll 2d6 (initiative, destruction classification)
pub fn roll_2d6(rng: &mut impl Rng) -> i32 {
    roll_d6(rng) + roll_d6(rng)
}

/// Resolve a pool roll: sum the pool (single die for pools under 2), add the
/// modifier, clamp to [1,6]. Total function - always in range.
pub fn pool_roll(pool: u32, modifier: i32, rng: &mut impl Rng) -> i32 {
    let raw: i32 = if pool < 2 {
        roll_d6(rng)
    } else {
        (0..pool).map(|_| roll_d6(rng)).sum()
    };
    (raw + modifier).clamp(1, 6)
}

/// Immutable per-unit combat-value snapshot used for abstract resolution
/// rolls and for the surviving/defeated lists in the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStrength {
    pub battle_value: u32,
    pub modifier: i32,
    pub dice_pool: u32,
}

impl UnitStrength {
    pub fn new(battle_value: u32, modifier: i32) -> Self {
        Self {
            battle_value,
            modifier,
            dice_pool: dice_pool_size(battle_value),
        }
    }

    /// Clamped resolution roll for this unit
    pub fn roll(&self, rng: &mut impl Rng) -> i32 {
        pool_roll(self.dice_pool, self.modifier, rng)
    }
}
