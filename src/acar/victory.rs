//! Victory detection and the terminal victory phase
//!
//! Detection is idempotent: once a verdict is latched the battle is decided
//! and re-evaluation short-circuits. The terminal phase reconciles residual
//! damage on every survivor - nobody leaves a battlefield unscathed - and
//! reports the outcome.

use crate::acar::constants::{
    CRIT_DAMAGE_DIVISOR, DAMAGE_CLUSTER_SIZE, MAX_COUNTED_CRITS, RESIDUAL_DAMAGE_CAP,
};
use crate::acar::context::{BattleVerdict, SimulationContext};
use crate::acar::report::Reporter;
use crate::acar::tactical::DamageApplier;

/// Decides whether the battle is over. The default rules decide when at
/// most one team still fields formations.
pub trait VictoryEvaluator {
    fn evaluate(&mut self, ctx: &SimulationContext) -> Option<BattleVerdict>;
}

/// Default victory condition: last team standing wins; nobody standing is a
/// draw; two or more teams alive is no decision yet.
#[derive(Debug, Default)]
pub struct LastTeamStanding;

impl VictoryEvaluator for LastTeamStanding {
    fn evaluate(&mut self, ctx: &SimulationContext) -> Option<BattleVerdict> {
        let alive = ctx.surviving_teams();
        match alive.as_slice() {
            [] => Some(BattleVerdict { victor: None }),
            [only] => Some(BattleVerdict {
                victor: Some(*only),
            }),
            _ => None,
        }
    }
}

/// Idempotent victory check: short-circuits once decided, otherwise asks
/// the evaluator and latches any verdict it reports.
pub fn check(ctx: &mut SimulationContext, evaluator: &mut dyn VictoryEvaluator) -> bool {
    if ctx.is_decided() {
        return true;
    }
    if let Some(verdict) = evaluator.evaluate(ctx) {
        tracing::info!(victor = ?verdict.victor, round = ctx.round, "battle decided");
        ctx.latch_verdict(verdict);
        return true;
    }
    false
}

/// Terminal phase: residual damage, victor report
pub fn execute(
    ctx: &mut SimulationContext,
    evaluator: &mut dyn VictoryEvaluator,
    damage: &mut dyn DamageApplier,
    reporter: &mut dyn Reporter,
) {
    check(ctx, evaluator);
    apply_residual_damage(ctx, damage);

    match ctx.verdict().and_then(|v| v.victor) {
        Some(team) => {
            let contested = ctx.formations.iter().any(|f| f.team != team);
            if contested {
                reporter.report(format!("{team} is victorious; the battlefield is contested"));
            } else {
                reporter.report(format!("{team} is victorious and controls the battlefield"));
            }
        }
        None => reporter.report("The battle ends with no side left standing".to_string()),
    }
}

/// Every surviving unit that took any armor damage receives residual damage
/// at the terminal phase: its remaining-health fraction is degraded by its
/// crit count and capped at 0.95, so at least 5% of (max armor + max
/// internal) always lands. Delivery is clustered and crew/hull protected.
fn apply_residual_damage(ctx: &SimulationContext, damage: &mut dyn DamageApplier) {
    for formation in &ctx.formations {
        for unit in &formation.units {
            if !unit.is_damaged() || unit.max_armor == 0 {
                continue;
            }
            let mut percent = unit.armor_fraction();
            let crits = f64::from(unit.crits.total().min(MAX_COUNTED_CRITS));
            percent -= percent * (crits / CRIT_DAMAGE_DIVISOR);
            percent = percent.min(RESIDUAL_DAMAGE_CAP);
            let pool = f64::from(unit.max_armor + unit.max_internal);
            let total = (pool * (1.0 - percent)).round() as u32;
            damage.apply_residual_damage(unit, total, DAMAGE_CLUSTER_SIZE);
        }
    }
}
