//! Final result assembly
//!
//! Packages the decided context into an immutable result plus a post-battle
//! event that campaign collaborators consume. Partitioning is done by
//! matching on the removal classification assigned at destruction time,
//! never by re-deriving it from unit state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::acar::context::{GraveyardEntry, RemovalClassification, SimulationContext};
use crate::acar::dice::UnitStrength;
use crate::acar::unit::SimUnit;
use crate::core::types::{EntityId, TeamId};

/// Final, immutable outcome of one auto-resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoResolveResult {
    pub team1_victory: bool,
    pub controls_battlefield: bool,
    pub surviving_units: HashMap<TeamId, Vec<UnitStrength>>,
    pub defeated_units: HashMap<TeamId, Vec<UnitStrength>>,
}

/// Build the result from a decided context
pub fn assemble(ctx: &SimulationContext) -> AutoResolveResult {
    let mut surviving: HashMap<TeamId, Vec<UnitStrength>> = HashMap::new();
    let mut defeated: HashMap<TeamId, Vec<UnitStrength>> = HashMap::new();
    for &team in &ctx.teams {
        surviving.entry(team).or_default();
        defeated.entry(team).or_default();
    }
    for formation in &ctx.formations {
        let entry = surviving.entry(formation.team).or_default();
        entry.extend(formation.units.iter().map(SimUnit::strength));
    }
    for entry in &ctx.graveyard {
        defeated
            .entry(entry.team)
            .or_default()
            .push(entry.unit.strength());
    }

    let victor = ctx.verdict().and_then(|v| v.victor);
    let team1 = ctx.teams.first().copied();
    AutoResolveResult {
        team1_victory: victor.is_some() && victor == team1,
        controls_battlefield: victor
            .map_or(false, |team| ctx.formations.iter().all(|f| f.team == team)),
        surviving_units: surviving,
        defeated_units: defeated,
    }
}

/// Post-battle event delivered to campaign collaborators once the terminal
/// phase completes. Exposes the removed entities partitioned by the
/// classification latched at destruction time, plus the finished report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostBattleEvent {
    pub result: AutoResolveResult,
    survivors: Vec<SimUnit>,
    graveyard: Vec<GraveyardEntry>,
    pub report: Vec<String>,
}

impl PostBattleEvent {
    pub fn new(ctx: &SimulationContext, result: AutoResolveResult, report: Vec<String>) -> Self {
        Self {
            result,
            survivors: ctx
                .formations
                .iter()
                .flat_map(|f| f.units.iter().cloned())
                .collect(),
            graveyard: ctx.graveyard.clone(),
            report,
        }
    }

    /// Entities behind all units that survived to the terminal phase
    pub fn surviving_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.survivors.iter().flat_map(|u| u.entities.iter().copied())
    }

    /// Entities with exactly the given classification
    pub fn entities_with(
        &self,
        classification: RemovalClassification,
    ) -> impl Iterator<Item = EntityId> + '_ {
        self.graveyard
            .iter()
            .filter(move |e| e.classification == classification)
            .flat_map(|e| e.unit.entities.iter().copied())
    }

    /// Graveyard entities recoverable after the battle (salvageable or
    /// crew-ejected wrecks)
    pub fn graveyard_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.graveyard
            .iter()
            .filter(|e| {
                matches!(
                    e.classification,
                    RemovalClassification::Salvageable | RemovalClassification::Ejected
                )
            })
            .flat_map(|e| e.unit.entities.iter().copied())
    }

    /// Entities of units wrecked in the fighting, whatever their crew's fate
    pub fn wrecked_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.graveyard
            .iter()
            .filter(|e| {
                matches!(
                    e.classification,
                    RemovalClassification::Salvageable
                        | RemovalClassification::Ejected
                        | RemovalClassification::Devastated
                )
            })
            .flat_map(|e| e.unit.entities.iter().copied())
    }

    pub fn retreated_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities_with(RemovalClassification::Retreated)
    }

    pub fn devastated_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities_with(RemovalClassification::Devastated)
    }

    pub fn graveyard_entries(&self) -> &[GraveyardEntry] {
        &self.graveyard
    }
}

/// Typed delivery seam for the post-battle event; replaces event-bus
/// reflection with an explicit callback.
pub trait ResultSink {
    fn deliver(&mut self, event: PostBattleEvent);
}

impl<F: FnMut(PostBattleEvent)> ResultSink for F {
    fn deliver(&mut self, event: PostBattleEvent) {
        self(event)
    }
}
