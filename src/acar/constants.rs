//! Resolver constants - all tunable values in one place

// Dice pools
pub const BV_PER_DIE: u32 = 1000;

// Termination guard. The rules guarantee every battle decides itself long
// before this; the cap turns a rules bug into an error instead of a hang.
pub const MAX_ROUNDS: u32 = 100;

// Target numbers on the uniform 1-6 scale
pub const BASE_TO_HIT: i32 = 4;
pub const MORALE_CHECK_TARGET: i32 = 4;
pub const NERVE_RECOVERY_TARGET: i32 = 5;

// Crippling thresholds
pub const LOW_ARMOR_FRACTION: f64 = 0.20;
pub const CRIPPLED_MOVEMENT_CURRENT: u32 = 1;
pub const CRIPPLED_MOVEMENT_NOMINAL: u32 = 3;
pub const CRIPPLING_TARGETING_CRITS: u32 = 2;

// A single hit stripping this fraction of a unit's armor counts as a high
// stress episode for the owning formation (quarter = divisor 4).
pub const HIGH_STRESS_DAMAGE_DIVISOR: u32 = 4;

// Terminal-phase residual damage
pub const MAX_COUNTED_CRITS: u32 = 9;
pub const CRIT_DAMAGE_DIVISOR: f64 = 11.0;
pub const RESIDUAL_DAMAGE_CAP: f64 = 0.95;
pub const DAMAGE_CLUSTER_SIZE: u32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_on_d6_scale() {
        assert!((1..=6).contains(&BASE_TO_HIT));
        assert!((1..=6).contains(&MORALE_CHECK_TARGET));
        assert!((1..=6).contains(&NERVE_RECOVERY_TARGET));
    }

    #[test]
    fn test_residual_cap_leaves_minimum_damage() {
        assert!(RESIDUAL_DAMAGE_CAP < 1.0);
        assert!(RESIDUAL_DAMAGE_CAP >= 0.9);
    }

    #[test]
    fn test_round_cap_positive() {
        assert!(MAX_ROUNDS > 0);
    }
}
