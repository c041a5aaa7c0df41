//! Phase state machine
//!
//! A closed set of phase variants driven by the manager: every phase runs
//! the same prepare/execute/end triple, only the execute body differs.
//! Initiative is re-entered each round until the terminal Victory phase.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::acar::context::SimulationContext;

/// Battle phases in nominal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    StartingScenario,
    Initiative,
    Movement,
    Firing,
    End,
    Victory,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Victory)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::StartingScenario => "starting scenario",
            Phase::Initiative => "initiative",
            Phase::Movement => "movement",
            Phase::Firing => "firing",
            Phase::End => "end",
            Phase::Victory => "victory",
        };
        write!(f, "{label}")
    }
}

/// Uniform phase preparation: record the phase and reset the per-phase done
/// gate. Entering Initiative starts a new round and clears all per-round
/// formation state.
pub fn prepare(ctx: &mut SimulationContext, phase: Phase) {
    ctx.phase = phase;
    if phase == Phase::Initiative {
        ctx.round += 1;
        for formation in &mut ctx.formations {
            formation.reset();
        }
    } else {
        for formation in &mut ctx.formations {
            formation.done = false;
        }
    }
    tracing::debug!(round = ctx.round, %phase, "phase prepared");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acar::formation::Formation;
    use crate::core::types::TeamId;

    #[test]
    fn test_initiative_prepare_starts_new_round() {
        let mut formation = Formation::new(TeamId(1), "Alpha");
        formation.done = true;
        formation.set_high_stress_episode();
        let mut ctx = SimulationContext::new(vec![TeamId(1)], vec![formation]);

        prepare(&mut ctx, Phase::Initiative);

        assert_eq!(ctx.round, 1);
        assert_eq!(ctx.phase, Phase::Initiative);
        assert!(!ctx.formations[0].done);
        assert!(!ctx.formations[0].had_high_stress_episode());
    }

    #[test]
    fn test_mid_round_prepare_keeps_scratch() {
        let mut formation = Formation::new(TeamId(1), "Alpha");
        formation.done = true;
        formation.set_high_stress_episode();
        let mut ctx = SimulationContext::new(vec![TeamId(1)], vec![formation]);

        prepare(&mut ctx, Phase::Firing);

        assert!(!ctx.formations[0].done);
        // Scratch survives until the round actually ends
        assert!(ctx.formations[0].had_high_stress_episode());
    }

    #[test]
    fn test_only_victory_is_terminal() {
        assert!(Phase::Victory.is_terminal());
        assert!(!Phase::End.is_terminal());
        assert!(!Phase::Initiative.is_terminal());
    }
}
