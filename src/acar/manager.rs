//! Simulation manager - drives the phase state machine to completion
//!
//! One call to `resolve()` runs the whole battle synchronously: the context
//! and the seeded generator are exclusively owned, every roll draws in a
//! fixed order, and a fixed seed yields a fixed outcome. Collaborators are
//! injected through the constructor and the `with_*` builders rather than
//! discovered through any global registry.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::acar::context::SimulationContext;
use crate::acar::initiative;
use crate::acar::phase::{self, Phase};
use crate::acar::report::{BattleReport, Reporter};
use crate::acar::result::{self, AutoResolveResult, PostBattleEvent, ResultSink};
use crate::acar::scenario::ScenarioConfig;
use crate::acar::tactical::{
    AttackResolver, DamageApplier, DicePoolAttackResolver, NullDamageApplier,
};
use crate::acar::victory::{self, LastTeamStanding, VictoryEvaluator};
use crate::acar::{end_phase, engagement, firing};
use crate::core::error::{AcarError, Result};
use crate::core::types::{FormationId, TeamId};

pub struct SimulationManager {
    context: SimulationContext,
    rng: ChaCha8Rng,
    max_rounds: u32,
    reporter: Box<dyn Reporter>,
    damage: Box<dyn DamageApplier>,
    victory: Box<dyn VictoryEvaluator>,
    attacks: Box<dyn AttackResolver>,
    sink: Option<Box<dyn ResultSink>>,
}

impl SimulationManager {
    pub fn new(context: SimulationContext, config: &ScenarioConfig) -> Self {
        Self {
            context,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            max_rounds: config.max_rounds,
            reporter: Box::new(BattleReport::new()),
            damage: Box::new(NullDamageApplier),
            victory: Box::new(LastTeamStanding),
            attacks: Box::new(DicePoolAttackResolver),
            sink: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_damage_applier(mut self, damage: Box<dyn DamageApplier>) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_victory_evaluator(mut self, victory: Box<dyn VictoryEvaluator>) -> Self {
        self.victory = victory;
        self
    }

    pub fn with_attack_resolver(mut self, attacks: Box<dyn AttackResolver>) -> Self {
        self.attacks = attacks;
        self
    }

    pub fn with_result_sink(mut self, sink: Box<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    /// Run the full resolution: starting scenario once, then one
    /// initiative-to-end cycle per round until a verdict latches, then the
    /// terminal victory phase. Consumes the manager; the resolution is one
    /// non-reentrant operation.
    pub fn resolve(mut self) -> Result<AutoResolveResult> {
        self.run_phase(Phase::StartingScenario);
        victory::check(&mut self.context, self.victory.as_mut());

        while !self.context.is_decided() {
            if self.context.round >= self.max_rounds {
                return Err(AcarError::RoundLimitExceeded {
                    rounds: self.context.round,
                });
            }
            self.run_phase(Phase::Initiative);
            self.run_phase(Phase::Movement);
            self.run_phase(Phase::Firing);
            self.run_phase(Phase::End);
        }

        self.run_phase(Phase::Victory);

        let result = result::assemble(&self.context);
        let report = self.reporter.finalize();
        if let Some(sink) = self.sink.as_mut() {
            let event = PostBattleEvent::new(&self.context, result.clone(), report);
            sink.deliver(event);
        }
        Ok(result)
    }

    /// Headless auto-resolve has no players to disconnect. Rejected loudly
    /// so a mis-wired integration layer cannot mask the bug.
    pub fn handle_player_disconnect(&mut self) -> Result<()> {
        Err(AcarError::UnsupportedInAutoResolve("player disconnect"))
    }

    /// GM takeover requires an interactive session
    pub fn request_gm_takeover(&mut self) -> Result<()> {
        Err(AcarError::UnsupportedInAutoResolve("gm takeover"))
    }

    /// Team composition is fixed once a resolution is in flight
    pub fn reassign_formation_team(&mut self, _: FormationId, _: TeamId) -> Result<()> {
        Err(AcarError::UnsupportedInAutoResolve(
            "mid-battle team reassignment",
        ))
    }

    /// Uniform prepare/execute/end triple; only the execute body differs
    fn run_phase(&mut self, current: Phase) {
        phase::prepare(&mut self.context, current);
        match current {
            Phase::StartingScenario => self.execute_starting_scenario(),
            Phase::Initiative => {
                let previous = self.context.initiative_order.clone();
                let order =
                    initiative::roll_initiative(&self.context.teams, &previous, &mut self.rng);
                self.reporter.report(format!(
                    "Round {}: initiative {}",
                    self.context.round,
                    order
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
                self.context.initiative_order = order;
            }
            Phase::Movement => engagement::execute(
                &mut self.context,
                &mut self.rng,
                self.attacks.as_mut(),
                self.reporter.as_mut(),
            ),
            Phase::Firing => {
                firing::execute(
                    &mut self.context,
                    &mut self.rng,
                    self.attacks.as_mut(),
                    self.reporter.as_mut(),
                );
                // End-of-phase victory probe; idempotent
                victory::check(&mut self.context, self.victory.as_mut());
            }
            Phase::End => {
                end_phase::execute(
                    &mut self.context,
                    &mut self.rng,
                    self.attacks.as_mut(),
                    self.damage.as_mut(),
                    self.reporter.as_mut(),
                );
                victory::check(&mut self.context, self.victory.as_mut());
                end_phase::cleanup(&mut self.context);
            }
            Phase::Victory => victory::execute(
                &mut self.context,
                self.victory.as_mut(),
                self.damage.as_mut(),
                self.reporter.as_mut(),
            ),
        }
    }

    fn execute_starting_scenario(&mut self) {
        self.reporter
            .report("Abstract combat auto-resolution begins".to_string());
        for formation in &self.context.formations {
            self.reporter.report(format!(
                "{}: {} fields {} units ({} BV)",
                formation.team,
                formation.name,
                formation.units.len(),
                formation.total_battle_value(),
            ));
        }
    }
}
