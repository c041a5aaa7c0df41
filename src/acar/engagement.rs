//! Movement/engagement phase
//!
//! The tactical maneuver game is abstracted to an engagement-control
//! contest: each formation picks a hostile target and both sides make
//! opposed clamped pool rolls. Winning forces the engagement (range
//! tightens); losing leaves the opponent at long range.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::acar::actions::{self, Action};
use crate::acar::context::SimulationContext;
use crate::acar::dice;
use crate::acar::formation::EngagementOutcome;
use crate::acar::report::Reporter;
use crate::acar::tactical::AttackResolver;

/// Run the engagement contests in initiative order and apply the queued
/// outcomes through the actions processor.
pub fn execute(
    ctx: &mut SimulationContext,
    rng: &mut ChaCha8Rng,
    attacks: &mut dyn AttackResolver,
    reporter: &mut dyn Reporter,
) {
    for id in ctx.formation_order() {
        let Some(formation) = ctx.formation(id) else {
            continue;
        };
        let team = formation.team;
        let pool = dice::dice_pool_size(formation.total_battle_value());

        let hostiles = ctx.hostile_formations(team);
        if hostiles.is_empty() {
            continue;
        }
        let target = hostiles[rng.gen_range(0..hostiles.len())];
        let Some(opponent) = ctx.formation(target) else {
            continue;
        };
        let opposing_pool = dice::dice_pool_size(opponent.total_battle_value());

        let own_roll = dice::pool_roll(pool, 0, rng);
        let opposing_roll = dice::pool_roll(opposing_pool, 0, rng);
        let outcome = if own_roll >= opposing_roll {
            EngagementOutcome::Forced
        } else {
            EngagementOutcome::Evaded
        };
        ctx.pending_actions.push_back(Action::EngagementControl {
            formation: id,
            target,
            outcome,
        });
    }

    actions::process_queue(ctx, rng, attacks, reporter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acar::formation::Formation;
    use crate::acar::report::BattleReport;
    use crate::acar::tactical::DicePoolAttackResolver;
    use crate::acar::unit::SimUnit;
    use crate::core::types::TeamId;
    use rand::SeedableRng;

    #[test]
    fn test_every_formation_gains_a_target() {
        let mut alpha = Formation::new(TeamId(1), "Alpha");
        alpha.units.push(SimUnit::new("A1", 2000, 10, 5, 4, 2));
        let mut bravo = Formation::new(TeamId(2), "Bravo");
        bravo.units.push(SimUnit::new("B1", 1000, 10, 5, 4, 2));
        let mut ctx = SimulationContext::new(vec![TeamId(1), TeamId(2)], vec![alpha, bravo]);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut attacks = DicePoolAttackResolver;
        let mut reporter = BattleReport::new();
        execute(&mut ctx, &mut rng, &mut attacks, &mut reporter);

        for formation in &ctx.formations {
            assert!(formation.target.is_some());
            assert!(formation.engagement_control.is_some());
            assert!(formation.done);
        }
        assert!(ctx.pending_actions.is_empty());
    }

    #[test]
    fn test_lonely_side_skips_engagement() {
        let mut alpha = Formation::new(TeamId(1), "Alpha");
        alpha.units.push(SimUnit::new("A1", 2000, 10, 5, 4, 2));
        let mut ctx = SimulationContext::new(vec![TeamId(1), TeamId(2)], vec![alpha]);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut attacks = DicePoolAttackResolver;
        let mut reporter = BattleReport::new();
        execute(&mut ctx, &mut rng, &mut attacks, &mut reporter);

        assert!(ctx.formations[0].target.is_none());
    }
}
