//! Scenario setup from the campaign layer's roster
//!
//! The roster is treated as already validated; the resolver does not check
//! for duplicate teams or formations. Units flagged as absent go straight
//! to the graveyard as never-joined.

use serde::{Deserialize, Serialize};

use crate::acar::constants::MAX_ROUNDS;
use crate::acar::context::{GraveyardEntry, RemovalClassification, SimulationContext};
use crate::acar::formation::Formation;
use crate::acar::unit::SimUnit;
use crate::core::types::{EntityId, TeamId};

/// Opaque, already-validated option flags for one resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// RNG seed; a fixed seed yields a fixed outcome
    pub seed: u64,
    /// Defensive cap on the round count
    pub max_rounds: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_rounds: MAX_ROUNDS,
        }
    }
}

/// One unit as supplied by the scenario layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSetup {
    pub name: String,
    pub battle_value: u32,
    pub armor: u32,
    pub internal: u32,
    pub movement: u32,
    pub damage: u32,
    pub entities: Vec<EntityId>,
    /// Units that never made it to the field are classified immediately
    pub joined: bool,
}

impl UnitSetup {
    pub fn new(name: impl Into<String>, battle_value: u32) -> Self {
        Self {
            name: name.into(),
            battle_value,
            armor: 10,
            internal: 5,
            movement: 4,
            damage: 2,
            entities: Vec::new(),
            joined: true,
        }
    }

    fn build(&self) -> SimUnit {
        let mut unit = SimUnit::new(
            self.name.clone(),
            self.battle_value,
            self.armor,
            self.internal,
            self.movement,
            self.damage,
        );
        unit.entities = self.entities.clone();
        unit
    }
}

/// One deployable force as supplied by the scenario layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceEntry {
    pub team: TeamId,
    pub force_name: String,
    pub units: Vec<UnitSetup>,
    pub clan: bool,
}

impl ForceEntry {
    pub fn new(team: TeamId, force_name: impl Into<String>) -> Self {
        Self {
            team,
            force_name: force_name.into(),
            units: Vec::new(),
            clan: false,
        }
    }
}

/// Build the simulation context from the roster. Teams keep roster order;
/// the first roster team is "team 1" for the result's victory flag.
pub fn build_context(forces: &[ForceEntry]) -> SimulationContext {
    let mut teams: Vec<TeamId> = Vec::new();
    for force in forces {
        if !teams.contains(&force.team) {
            teams.push(force.team);
        }
    }

    let mut formations = Vec::with_capacity(forces.len());
    let mut never_joined = Vec::new();
    for force in forces {
        let mut formation = Formation::new(force.team, force.force_name.clone());
        formation.clan = force.clan;
        for setup in &force.units {
            let unit = setup.build();
            if setup.joined {
                formation.units.push(unit);
            } else {
                never_joined.push(GraveyardEntry {
                    team: force.team,
                    formation: formation.id,
                    classification: RemovalClassification::NeverJoined,
                    unit,
                });
            }
        }
        if !formation.units.is_empty() {
            formations.push(formation);
        }
    }

    let mut ctx = SimulationContext::new(teams, formations);
    ctx.graveyard = never_joined;
    ctx
}
