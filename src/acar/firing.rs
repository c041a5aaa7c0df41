//! Firing phase
//!
//! Every formation with a live target queues an Attack; resolution is
//! delegated through the attack-resolver seam by the actions processor.

use rand_chacha::ChaCha8Rng;

use crate::acar::actions::{self, Action};
use crate::acar::context::SimulationContext;
use crate::acar::report::Reporter;
use crate::acar::tactical::AttackResolver;

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
        if formation.done {
            continue;
        }
        let Some(target) = formation.target else {
            continue;
        };
        if ctx.formation(target).is_none() {
            continue;
        }
        ctx.pending_actions.push_back(Action::Attack {
            formation: id,
            target,
        });
    }

    actions::process_queue(ctx, rng, attacks, reporter);
}
