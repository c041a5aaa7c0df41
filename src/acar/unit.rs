//! Units aggregated inside a formation
//!
//! A unit here is already an abstraction: armor and crit counters stand in
//! for the full tactical state, and element entity refs map back to the
//! concrete campaign entities behind it.

use serde::{Deserialize, Serialize};

use crate::acar::dice::UnitStrength;
use crate::core::types::{EntityId, UnitId};

/// Crit counters accumulated through abstract resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritCounters {
    pub targeting: u32,
    pub movement: u32,
    pub weapon: u32,
}

impl CritCounters {
    pub fn total(&self) -> u32 {
        self.targeting + self.movement + self.weapon
    }
}

/// A combat unit tracked by the resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimUnit {
    pub id: UnitId,
    pub name: String,
    /// Campaign entities behind this unit (crew, machines)
    pub entities: Vec<EntityId>,
    pub battle_value: u32,
    pub current_armor: u32,
    pub max_armor: u32,
    pub max_internal: u32,
    pub nominal_movement: u32,
    /// Damage rating per successful abstract attack
    pub damage_rating: u32,
    pub crits: CritCounters,
}

impl SimUnit {
    pub fn new(
        name: impl Into<String>,
        battle_value: u32,
        armor: u32,
        internal: u32,
        movement: u32,
        damage: u32,
    ) -> Self {
        Self {
            id: UnitId::new(),
            name: name.into(),
            entities: Vec::new(),
            battle_value,
            current_armor: armor,
            max_armor: armor,
            max_internal: internal,
            nominal_movement: movement,
            damage_rating: damage,
            crits: CritCounters::default(),
        }
    }

    /// Derived combat-value snapshot; targeting crits degrade the roll
    pub fn strength(&self) -> UnitStrength {
        UnitStrength::new(self.battle_value, -(self.crits.targeting as i32))
    }

    /// Nominal movement minus movement crits, floored at 0
    pub fn current_movement(&self) -> u32 {
        self.nominal_movement.saturating_sub(self.crits.movement)
    }

    /// Damage rating minus weapon crits, floored at 0
    pub fn current_damage(&self) -> u32 {
        self.damage_rating.saturating_sub(self.crits.weapon)
    }

    pub fn deals_no_damage(&self) -> bool {
        self.current_damage() == 0
    }

    pub fn armor_fraction(&self) -> f64 {
        if self.max_armor == 0 {
            0.0
        } else {
            f64::from(self.current_armor) / f64::from(self.max_armor)
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.current_armor == 0
    }

    pub fn is_damaged(&self) -> bool {
        self.current_armor < self.max_armor
    }

    pub fn take_damage(&mut self, points: u32) {
        self.current_armor = self.current_armor.saturating_sub(points);
    }
}
