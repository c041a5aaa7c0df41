//! Tactical collaborators
//!
//! The resolver never computes weapon-level hit/damage itself; it delegates
//! to these seams. The defaults here resolve attacks with abstract dice
//! pools and log damage application, which is all a headless auto-resolve
//! needs. The campaign layer injects richer implementations.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::acar::constants::{BASE_TO_HIT, HIGH_STRESS_DAMAGE_DIVISOR};
use crate::acar::context::{RemovalClassification, SimulationContext};
use crate::acar::dice::UnitStrength;
use crate::acar::report::Reporter;
use crate::acar::unit::SimUnit;
use crate::core::types::FormationId;

/// Resolves one formation's attack against another
pub trait AttackResolver {
    fn resolve(
        &mut self,
        ctx: &mut SimulationContext,
        attacker: FormationId,
        target: FormationId,
        rng: &mut ChaCha8Rng,
        reporter: &mut dyn Reporter,
    );
}

/// Applies abstracted damage to the campaign entities behind a unit
pub trait DamageApplier {
    /// Proportional damage for a unit removed from play, scaled by its
    /// removal classification.
    fn apply_removal_damage(&mut self, unit: &SimUnit, classification: RemovalClassification);

    /// Terminal-phase residual damage, delivered in clusters and constrained
    /// so crew and hull survive.
    fn apply_residual_damage(&mut self, unit: &SimUnit, total_damage: u32, cluster_size: u32);
}

/// Default attack resolution: one clamped pool roll per firing unit against
/// a range-adjusted target number; hits land on a random defending unit and
/// a maximum roll inflicts a crit.
#[derive(Debug, Default)]
pub struct DicePoolAttackResolver;

impl AttackResolver for DicePoolAttackResolver {
    fn resolve(
        &mut self,
        ctx: &mut SimulationContext,
        attacker: FormationId,
        target: FormationId,
        rng: &mut ChaCha8Rng,
        reporter: &mut dyn Reporter,
    ) {
        let Some(att) = ctx.formation(attacker) else {
            return;
        };
        if ctx.formation(target).is_none() {
            return;
        }

        let range = att.range(target);
        let attacker_name = att.name.clone();
        let volley: Vec<(UnitStrength, u32)> = att
            .units
            .iter()
            .filter(|u| !u.deals_no_damage())
            .map(|u| (u.strength(), u.current_damage()))
            .collect();
        if volley.is_empty() {
            return;
        }

        let target_number = BASE_TO_HIT + range.to_hit_modifier();
        let mut total_damage = 0u32;
        let mut high_stress = false;
        let defender_name;
        {
            let Some(def) = ctx.formation_mut(target) else {
                return;
            };
            defender_name = def.name.clone();
            for (strength, damage) in volley {
                if def.units.is_empty() {
                    break;
                }
                let roll = strength.roll(rng);
                if roll < target_number {
                    continue;
                }
                let index = rng.gen_range(0..def.units.len());
                let max_armor = def.units[index].max_armor;
                def.units[index].take_damage(damage);
                total_damage += damage;
                // Heavy single hits shake the whole formation
                if damage.saturating_mul(HIGH_STRESS_DAMAGE_DIVISOR) >= max_armor {
                    high_stress = true;
                }
                // A maximum roll lands a crit as well
                if roll == 6 {
                    match rng.gen_range(0..3) {
                        0 => def.units[index].crits.targeting += 1,
                        1 => def.units[index].crits.movement += 1,
                        _ => def.units[index].crits.weapon += 1,
                    }
                }
            }
            if high_stress {
                def.set_high_stress_episode();
            }
        }

        if total_damage > 0 {
            reporter.report(format!(
                "{attacker_name} hits {defender_name} for {total_damage} damage at {range} range"
            ));
        } else {
            reporter.report(format!(
                "{attacker_name} fires on {defender_name} at {range} range without effect"
            ));
        }
    }
}

/// Default damage applier: traces what the campaign layer would apply
#[derive(Debug, Default)]
pub struct NullDamageApplier;

impl DamageApplier for NullDamageApplier {
    fn apply_removal_damage(&mut self, unit: &SimUnit, classification: RemovalClassification) {
        tracing::debug!(
            unit = %unit.name,
            %classification,
            "removal damage delegated to campaign layer"
        );
    }

    fn apply_residual_damage(&mut self, unit: &SimUnit, total_damage: u32, cluster_size: u32) {
        tracing::debug!(
            unit = %unit.name,
            total_damage,
            cluster_size,
            "residual damage delegated to campaign layer"
        );
    }
}
