//! Round actions and the FIFO actions processor
//!
//! Actions are immutable intents queued during a phase and applied strictly
//! in enqueue order. Queuing against a formation that has already been
//! destroyed is a tolerated no-op: destruction and queuing interleave
//! freely inside a round.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::acar::constants::{MORALE_CHECK_TARGET, NERVE_RECOVERY_TARGET};
use crate::acar::context::{GraveyardEntry, RemovalClassification, SimulationContext};
use crate::acar::dice;
use crate::acar::formation::{EngagementOutcome, EngagementRange};
use crate::acar::report::Reporter;
use crate::acar::tactical::AttackResolver;
use crate::core::types::FormationId;

/// An intent queued for the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Attack {
        formation: FormationId,
        target: FormationId,
    },
    MoraleCheck {
        formation: FormationId,
    },
    RecoveringNerve {
        formation: FormationId,
    },
    Withdraw {
        formation: FormationId,
    },
    EngagementControl {
        formation: FormationId,
        target: FormationId,
        outcome: EngagementOutcome,
    },
}

impl Action {
    /// The formation this action originates from
    pub fn formation(&self) -> FormationId {
        match *self {
            Action::Attack { formation, .. }
            | Action::MoraleCheck { formation }
            | Action::RecoveringNerve { formation }
            | Action::Withdraw { formation }
            | Action::EngagementControl { formation, .. } => formation,
        }
    }
}

/// Drain the context's queue and apply each action in FIFO order.
///
/// Attack, MoraleCheck and EngagementControl mark the acting formation done;
/// RecoveringNerve and Withdraw deliberately do not.
pub fn process_queue(
    ctx: &mut SimulationContext,
    rng: &mut ChaCha8Rng,
    attacks: &mut dyn AttackResolver,
    reporter: &mut dyn Reporter,
) {
    let queue = std::mem::take(&mut ctx.pending_actions);
    for action in queue {
        match action {
            Action::Attack { formation, target } => {
                if ctx.formation(formation).is_none() {
                    continue;
                }
                attacks.resolve(ctx, formation, target, rng, reporter);
                if let Some(f) = ctx.formation_mut(formation) {
                    f.done = true;
                }
            }
            Action::MoraleCheck { formation } => {
                let Some(f) = ctx.formation_mut(formation) else {
                    continue;
                };
                // Clan formations hold themselves to a harder standard
                let target_number = if f.clan {
                    MORALE_CHECK_TARGET + 1
                } else {
                    MORALE_CHECK_TARGET
                };
                let modifier = if f.is_crippled() { -1 } else { 0 };
                let pool = dice::dice_pool_size(f.total_battle_value());
                let roll = dice::pool_roll(pool, modifier, rng);
                if roll < target_number {
                    f.morale = f.morale.worsen();
                    reporter.report(format!(
                        "{} fails its morale check and is now {}",
                        f.name, f.morale
                    ));
                } else {
                    reporter.report(format!("{} holds steady under fire", f.name));
                }
                f.done = true;
            }
            Action::RecoveringNerve { formation } => {
                let Some(f) = ctx.formation_mut(formation) else {
                    continue;
                };
                let pool = dice::dice_pool_size(f.total_battle_value());
                let roll = dice::pool_roll(pool, 0, rng);
                if roll >= NERVE_RECOVERY_TARGET {
                    f.morale = f.morale.improve();
                    reporter.report(format!("{} recovers its nerve ({})", f.name, f.morale));
                }
            }
            Action::Withdraw { formation } => {
                let Some(mut f) = ctx.remove_formation(formation) else {
                    continue;
                };
                reporter.report(format!("{} withdraws from the field", f.name));
                for unit in f.units.drain(..) {
                    // Immobile units cannot disengage and are overrun
                    let classification = if unit.current_movement() == 0 {
                        RemovalClassification::Captured
                    } else {
                        RemovalClassification::Retreated
                    };
                    ctx.graveyard.push(GraveyardEntry {
                        team: f.team,
                        formation: f.id,
                        classification,
                        unit,
                    });
                }
            }
            Action::EngagementControl {
                formation,
                target,
                outcome,
            } => {
                let Some(f) = ctx.formation_mut(formation) else {
                    continue;
                };
                f.target = Some(target);
                f.engagement_control = Some(outcome);
                match outcome {
                    EngagementOutcome::Forced => {
                        let closer = f.range(target).tighten();
                        f.set_range(target, closer);
                    }
                    EngagementOutcome::Evaded => {
                        f.set_range(target, EngagementRange::Long);
                    }
                }
                f.done = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acar::formation::{Formation, MoraleStatus};
    use crate::acar::report::BattleReport;
    use crate::acar::tactical::DicePoolAttackResolver;
    use crate::acar::unit::SimUnit;
    use crate::core::types::TeamId;
    use rand::SeedableRng;

    fn context_with_formation() -> (SimulationContext, FormationId) {
        let mut formation = Formation::new(TeamId(1), "Alpha");
        formation
            .units
            .push(SimUnit::new("Alpha 1", 1000, 10, 5, 4, 2));
        let id = formation.id;
        let ctx = SimulationContext::new(vec![TeamId(1), TeamId(2)], vec![formation]);
        (ctx, id)
    }

    fn run_queue(ctx: &mut SimulationContext, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut attacks = DicePoolAttackResolver;
        let mut reporter = BattleReport::new();
        process_queue(ctx, &mut rng, &mut attacks, &mut reporter);
    }

    #[test]
    fn test_stale_formation_is_noop() {
        let (mut ctx, id) = context_with_formation();
        ctx.remove_formation(id);
        ctx.pending_actions.push_back(Action::MoraleCheck { formation: id });
        ctx.pending_actions.push_back(Action::Withdraw { formation: id });
        run_queue(&mut ctx, 1);
        assert!(ctx.pending_actions.is_empty());
        assert!(ctx.graveyard.is_empty());
    }

    #[test]
    fn test_morale_check_marks_done() {
        let (mut ctx, id) = context_with_formation();
        ctx.pending_actions.push_back(Action::MoraleCheck { formation: id });
        run_queue(&mut ctx, 1);
        assert!(ctx.formation(id).is_some_and(|f| f.done));
    }

    #[test]
    fn test_recovering_nerve_does_not_mark_done() {
        let (mut ctx, id) = context_with_formation();
        if let Some(f) = ctx.formation_mut(id) {
            f.morale = MoraleStatus::Broken;
        }
        ctx.pending_actions
            .push_back(Action::RecoveringNerve { formation: id });
        run_queue(&mut ctx, 1);
        assert!(ctx.formation(id).is_some_and(|f| !f.done));
    }

    #[test]
    fn test_withdraw_moves_units_to_graveyard() {
        let (mut ctx, id) = context_with_formation();
        ctx.pending_actions.push_back(Action::Withdraw { formation: id });
        run_queue(&mut ctx, 1);

        assert!(ctx.formation(id).is_none());
        assert_eq!(ctx.graveyard.len(), 1);
        assert_eq!(
            ctx.graveyard[0].classification,
            RemovalClassification::Retreated
        );
    }

    #[test]
    fn test_withdraw_captures_immobile_units() {
        let (mut ctx, id) = context_with_formation();
        if let Some(f) = ctx.formation_mut(id) {
            f.units[0].crits.movement = 10;
        }
        ctx.pending_actions.push_back(Action::Withdraw { formation: id });
        run_queue(&mut ctx, 1);

        assert_eq!(
            ctx.graveyard[0].classification,
            RemovalClassification::Captured
        );
    }

    #[test]
    fn test_engagement_control_forced_tightens_range() {
        let (mut ctx, id) = context_with_formation();
        let target = FormationId::new();
        ctx.pending_actions.push_back(Action::EngagementControl {
            formation: id,
            target,
            outcome: EngagementOutcome::Forced,
        });
        run_queue(&mut ctx, 1);

        let f = ctx.formation(id).expect("formation survives");
        assert_eq!(f.target, Some(target));
        assert_eq!(f.engagement_control, Some(EngagementOutcome::Forced));
        assert_eq!(f.range(target), EngagementRange::Medium);
        assert!(f.done);
    }

    #[test]
    fn test_actions_apply_in_fifo_order() {
        let (mut ctx, id) = context_with_formation();
        // Withdraw first; the later morale check must hit a stale id
        ctx.pending_actions.push_back(Action::Withdraw { formation: id });
        ctx.pending_actions.push_back(Action::MoraleCheck { formation: id });
        run_queue(&mut ctx, 1);

        assert!(ctx.formation(id).is_none());
        assert_eq!(ctx.graveyard.len(), 1);
    }

    #[test]
    fn test_action_formation_accessor() {
        let id = FormationId::new();
        let target = FormationId::new();
        assert_eq!(Action::Attack { formation: id, target }.formation(), id);
        assert_eq!(Action::Withdraw { formation: id }.formation(), id);
    }
}
