//! End phase - destruction, withdrawal, morale, round cleanup
//!
//! Runs strictly in order: destroy units at zero armor and classify their
//! remains, then (unless the battle is already decided) queue forced
//! withdrawals, morale checks and nerve recovery, process the queue, and
//! finally reset every surviving formation for the next round.

use rand_chacha::ChaCha8Rng;

use crate::acar::actions::{self, Action};
use crate::acar::context::{GraveyardEntry, RemovalClassification, SimulationContext};
use crate::acar::dice;
use crate::acar::formation::MoraleStatus;
use crate::acar::report::Reporter;
use crate::acar::tactical::{AttackResolver, DamageApplier};

pub fn execute(
    ctx: &mut SimulationContext,
    rng: &mut ChaCha8Rng,
    attacks: &mut dyn AttackResolver,
    damage: &mut dyn DamageApplier,
    reporter: &mut dyn Reporter,
) {
    resolve_destruction(ctx, rng, damage, reporter);

    if !ctx.is_decided() {
        queue_forced_withdrawals(ctx);
        queue_morale_checks(ctx);
        queue_nerve_recovery(ctx);
    }

    actions::process_queue(ctx, rng, attacks, reporter);
}

/// Round cleanup, run as this phase's end-of-phase step after victory
/// detection: every surviving formation's scratch memory and flags reset.
pub fn cleanup(ctx: &mut SimulationContext) {
    for formation in &mut ctx.formations {
        formation.reset();
    }
}

/// Units at zero armor are destroyed: roll 2d6 per unit for its removal
/// classification, delegate the proportional entity damage, and move it to
/// the graveyard. Formations left empty are removed outright.
fn resolve_destruction(
    ctx: &mut SimulationContext,
    rng: &mut ChaCha8Rng,
    damage: &mut dyn DamageApplier,
    reporter: &mut dyn Reporter,
) {
    let mut formations = std::mem::take(&mut ctx.formations);
    formations.retain_mut(|formation| {
        let units = std::mem::take(&mut formation.units);
        for unit in units {
            if unit.is_destroyed() {
                let roll = dice::roll_2d6(rng);
                let classification = RemovalClassification::from_destruction_roll(roll);
                damage.apply_removal_damage(&unit, classification);
                reporter.report(format!("{} is destroyed ({classification})", unit.name));
                tracing::debug!(unit = %unit.name, roll, %classification, "unit destroyed");
                ctx.graveyard.push(GraveyardEntry {
                    team: formation.team,
                    formation: formation.id,
                    classification,
                    unit,
                });
            } else {
                formation.units.push(unit);
            }
        }
        if formation.units.is_empty() {
            reporter.report(format!("{} has been wiped out", formation.name));
            false
        } else {
            true
        }
    });
    ctx.formations = formations;
}

fn queue_forced_withdrawals(ctx: &mut SimulationContext) {
    let withdrawing: Vec<_> = ctx
        .formations
        .iter_mut()
        .filter_map(|f| (f.morale == MoraleStatus::Routed || f.is_crippled()).then_some(f.id))
        .collect();
    for formation in withdrawing {
        ctx.pending_actions.push_back(Action::Withdraw { formation });
    }
}

fn queue_morale_checks(ctx: &mut SimulationContext) {
    let stressed: Vec<_> = ctx
        .formations
        .iter()
        .filter(|f| f.had_high_stress_episode())
        .map(|f| f.id)
        .collect();
    for formation in stressed {
        ctx.pending_actions
            .push_back(Action::MoraleCheck { formation });
    }
}

fn queue_nerve_recovery(ctx: &mut SimulationContext) {
    let rattled: Vec<_> = ctx
        .formations
        .iter()
        .filter(|f| f.morale > MoraleStatus::Normal)
        .map(|f| f.id)
        .collect();
    for formation in rattled {
        ctx.pending_actions
            .push_back(Action::RecoveringNerve { formation });
    }
}
