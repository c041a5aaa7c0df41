//! Simulation context - the mutable battle state
//!
//! Exclusively owned by the simulation manager for the lifetime of one
//! resolution. No external actor observes or mutates it mid-run.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::acar::actions::Action;
use crate::acar::formation::Formation;
use crate::acar::phase::Phase;
use crate::acar::unit::SimUnit;
use crate::core::types::{FormationId, Round, TeamId};

/// Disposition of a destroyed/removed unit, assigned once and never changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalClassification {
    Salvageable,
    Ejected,
    Devastated,
    Captured,
    Retreated,
    NeverJoined,
}

impl RemovalClassification {
    /// 2d6 destruction table: {2,12} devastated, {3,4,10,11} ejected,
    /// everything else (5-9) salvageable.
    pub fn from_destruction_roll(roll: i32) -> Self {
        match roll {
            2 | 12 => RemovalClassification::Devastated,
            3 | 4 | 10 | 11 => RemovalClassification::Ejected,
            _ => RemovalClassification::Salvageable,
        }
    }
}

impl fmt::Display for RemovalClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RemovalClassification::Salvageable => "salvageable",
            RemovalClassification::Ejected => "crew ejected",
            RemovalClassification::Devastated => "devastated",
            RemovalClassification::Captured => "captured",
            RemovalClassification::Retreated => "retreated",
            RemovalClassification::NeverJoined => "never joined",
        };
        write!(f, "{label}")
    }
}

/// A removed unit, frozen at the moment of its removal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraveyardEntry {
    pub team: TeamId,
    pub formation: FormationId,
    pub classification: RemovalClassification,
    pub unit: SimUnit,
}

/// Latched battle decision. A `None` victor is a draw (mutual destruction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleVerdict {
    pub victor: Option<TeamId>,
}

/// Mutable state of one auto-resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationContext {
    pub phase: Phase,
    pub round: Round,
    pub teams: Vec<TeamId>,
    pub formations: Vec<Formation>,
    pub graveyard: Vec<GraveyardEntry>,
    pub initiative_order: Vec<TeamId>,
    pub pending_actions: VecDeque<Action>,
    verdict: Option<BattleVerdict>,
}

impl SimulationContext {
    pub fn new(teams: Vec<TeamId>, formations: Vec<Formation>) -> Self {
        Self {
            phase: Phase::StartingScenario,
            round: 0,
            teams,
            formations,
            graveyard: Vec::new(),
            initiative_order: Vec::new(),
            pending_actions: VecDeque::new(),
            verdict: None,
        }
    }

    pub fn formation(&self, id: FormationId) -> Option<&Formation> {
        self.formations.iter().find(|f| f.id == id)
    }

    pub fn formation_mut(&mut self, id: FormationId) -> Option<&mut Formation> {
        self.formations.iter_mut().find(|f| f.id == id)
    }

    /// Detach a formation from the active list, if it still exists
    pub fn remove_formation(&mut self, id: FormationId) -> Option<Formation> {
        let index = self.formations.iter().position(|f| f.id == id)?;
        Some(self.formations.remove(index))
    }

    /// Formation ids of everyone hostile to the given team
    pub fn hostile_formations(&self, team: TeamId) -> Vec<FormationId> {
        self.formations
            .iter()
            .filter(|f| f.team != team)
            .map(|f| f.id)
            .collect()
    }

    /// Formation ids in this round's acting order: initiative order by team,
    /// context order within a team. Falls back to roster order before the
    /// first initiative roll.
    pub fn formation_order(&self) -> Vec<FormationId> {
        let teams: &[TeamId] = if self.initiative_order.is_empty() {
            &self.teams
        } else {
            &self.initiative_order
        };
        let mut order = Vec::with_capacity(self.formations.len());
        for &team in teams {
            order.extend(
                self.formations
                    .iter()
                    .filter(|f| f.team == team)
                    .map(|f| f.id),
            );
        }
        order
    }

    /// Teams that still field at least one formation
    pub fn surviving_teams(&self) -> Vec<TeamId> {
        self.teams
            .iter()
            .copied()
            .filter(|&team| self.formations.iter().any(|f| f.team == team))
            .collect()
    }

    pub fn is_decided(&self) -> bool {
        self.verdict.is_some()
    }

    pub fn verdict(&self) -> Option<BattleVerdict> {
        self.verdict
    }

    /// Latch the verdict. The first decision wins; later calls are ignored.
    pub fn latch_verdict(&mut self, verdict: BattleVerdict) {
        if self.verdict.is_none() {
            self.verdict = Some(verdict);
        }
    }
}
