//! Formations - a team's deployable combat group
//!
//! The formation is the resolution granularity: morale, crippling and
//! engagement state live here, units only carry damage bookkeeping.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::acar::constants::{
    CRIPPLED_MOVEMENT_CURRENT, CRIPPLED_MOVEMENT_NOMINAL, CRIPPLING_TARGETING_CRITS,
    LOW_ARMOR_FRACTION,
};
use crate::acar::unit::SimUnit;
use crate::core::types::{FormationId, TeamId};

/// Morale status, ordered by severity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum MoraleStatus {
    #[default]
    Normal,
    Shaken,
    Broken,
    Routed,
}

impl MoraleStatus {
    /// One step worse, saturating at Routed
    pub fn worsen(self) -> Self {
        match self {
            MoraleStatus::Normal => MoraleStatus::Shaken,
            MoraleStatus::Shaken => MoraleStatus::Broken,
            _ => MoraleStatus::Routed,
        }
    }

    /// One step better, saturating at Normal
    pub fn improve(self) -> Self {
        match self {
            MoraleStatus::Routed => MoraleStatus::Broken,
            MoraleStatus::Broken => MoraleStatus::Shaken,
            _ => MoraleStatus::Normal,
        }
    }
}

impl fmt::Display for MoraleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MoraleStatus::Normal => "normal",
            MoraleStatus::Shaken => "shaken",
            MoraleStatus::Broken => "broken",
            MoraleStatus::Routed => "routed",
        };
        write!(f, "{label}")
    }
}

/// Engagement range against one opposing formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngagementRange {
    #[default]
    Long,
    Medium,
    Short,
}

impl EngagementRange {
    /// One step closer, saturating at Short
    pub fn tighten(self) -> Self {
        match self {
            EngagementRange::Long => EngagementRange::Medium,
            _ => EngagementRange::Short,
        }
    }

    /// To-hit adjustment on the 1-6 scale
    pub fn to_hit_modifier(self) -> i32 {
        match self {
            EngagementRange::Long => 1,
            EngagementRange::Medium => 0,
            EngagementRange::Short => -1,
        }
    }
}

impl fmt::Display for EngagementRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EngagementRange::Long => "long",
            EngagementRange::Medium => "medium",
            EngagementRange::Short => "short",
        };
        write!(f, "{label}")
    }
}

/// Outcome of an engagement-control contest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementOutcome {
    /// Won the contest and dictates the engagement
    Forced,
    /// Lost the contest; the opponent keeps its distance
    Evaded,
}

/// Per-round scratch state, cleared by `reset()`.
///
/// Typed fields rather than a string-keyed bag: every consumer names the
/// field it reads, so a typo is a compile error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RoundScratch {
    high_stress_episode: bool,
    ranges: HashMap<FormationId, EngagementRange>,
}

/// A named, team-owned group of units resolved as one tactical entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub team: TeamId,
    pub id: FormationId,
    pub name: String,
    pub units: Vec<SimUnit>,
    /// Gates phase progression; reset by phase preparation
    pub done: bool,
    pub morale: MoraleStatus,
    /// Latched once true, never recomputed
    crippled: bool,
    pub target: Option<FormationId>,
    pub engagement_control: Option<EngagementOutcome>,
    scratch: RoundScratch,
    /// Clan formations fight under stricter honor rules
    pub clan: bool,
}

impl Formation {
    pub fn new(team: TeamId, name: impl Into<String>) -> Self {
        Self {
            team,
            id: FormationId::new(),
            name: name.into(),
            units: Vec::new(),
            done: false,
            morale: MoraleStatus::Normal,
            crippled: false,
            target: None,
            engagement_control: None,
            scratch: RoundScratch::default(),
            clan: false,
        }
    }

    /// Crippling check: once any criterion holds, the flag latches and is
    /// never re-evaluated. A formation cannot become un-crippled.
    pub fn is_crippled(&mut self) -> bool {
        if self.crippled {
            return true;
        }
        if self.units.is_empty() {
            return false;
        }

        let half = (self.units.len() + 1) / 2;
        let toothless = self.units.iter().filter(|u| u.deals_no_damage()).count() >= half;
        let immobilized = self.current_movement() <= CRIPPLED_MOVEMENT_CURRENT
            && self.nominal_movement() >= CRIPPLED_MOVEMENT_NOMINAL;
        let shredded = self
            .units
            .iter()
            .filter(|u| u.armor_fraction() <= LOW_ARMOR_FRACTION)
            .count()
            >= half;
        let blinded = self
            .units
            .iter()
            .filter(|u| u.crits.targeting >= CRIPPLING_TARGETING_CRITS)
            .count()
            >= half;

        if toothless || immobilized || shredded || blinded {
            self.crippled = true;
        }
        self.crippled
    }

    /// Slowest member's current movement
    pub fn current_movement(&self) -> u32 {
        self.units
            .iter()
            .map(SimUnit::current_movement)
            .min()
            .unwrap_or(0)
    }

    /// Slowest member's undamaged movement
    pub fn nominal_movement(&self) -> u32 {
        self.units
            .iter()
            .map(|u| u.nominal_movement)
            .min()
            .unwrap_or(0)
    }

    pub fn total_battle_value(&self) -> u32 {
        self.units.iter().map(|u| u.battle_value).sum()
    }

    pub fn had_high_stress_episode(&self) -> bool {
        self.scratch.high_stress_episode
    }

    pub fn set_high_stress_episode(&mut self) {
        self.scratch.high_stress_episode = true;
    }

    pub fn is_range_set(&self, opponent: FormationId) -> bool {
        self.scratch.ranges.contains_key(&opponent)
    }

    /// Engagement range against an opponent; long when unset
    pub fn range(&self, opponent: FormationId) -> EngagementRange {
        self.scratch
            .ranges
            .get(&opponent)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_range(&mut self, opponent: FormationId, range: EngagementRange) {
        self.scratch.ranges.insert(opponent, range);
    }

    /// Per-round cleanup: target, engagement control, scratch memory and the
    /// done flag are cleared. Morale and the crippled latch persist.
    pub fn reset(&mut self) {
        self.target = None;
        self.engagement_control = None;
        self.scratch = RoundScratch::default();
        self.done = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formation_with_units(count: usize) -> Formation {
        let mut formation = Formation::new(TeamId(1), "First Assault");
        for i in 0..count {
            formation
                .units
                .push(SimUnit::new(format!("Unit {i}"), 1000, 10, 5, 4, 2));
        }
        formation
    }

    #[test]
    fn test_fresh_formation_not_crippled() {
        let mut formation = formation_with_units(4);
        assert!(!formation.is_crippled());
    }

    #[test]
    fn test_crippled_by_armor_loss() {
        let mut formation = formation_with_units(4);
        // Half the units down to 20% armor
        formation.units[0].take_damage(8);
        formation.units[1].take_damage(8);
        assert!(formation.is_crippled());
    }

    #[test]
    fn test_crippled_by_toothless_units() {
        let mut formation = formation_with_units(3);
        formation.units[0].crits.weapon = 2;
        formation.units[1].crits.weapon = 2;
        assert!(formation.is_crippled());
    }

    #[test]
    fn test_crippled_by_immobilization() {
        let mut formation = formation_with_units(2);
        formation.units[0].crits.movement = 3; // 4 -> 1
        assert!(formation.is_crippled());
    }

    #[test]
    fn test_crippled_by_targeting_crits() {
        let mut formation = formation_with_units(2);
        formation.units[0].crits.targeting = 2;
        assert!(formation.is_crippled());
    }

    #[test]
    fn test_crippled_latch_is_monotonic() {
        let mut formation = formation_with_units(2);
        formation.units[0].take_damage(8);
        formation.units[1].take_damage(8);
        assert!(formation.is_crippled());

        // Repairing the damage must not clear the latch
        formation.units[0].current_armor = formation.units[0].max_armor;
        formation.units[1].current_armor = formation.units[1].max_armor;
        assert!(formation.is_crippled());
        assert!(formation.is_crippled());
    }

    #[test]
    fn test_range_defaults_to_long() {
        let mut formation = formation_with_units(1);
        let opponent = FormationId::new();
        assert!(!formation.is_range_set(opponent));
        assert_eq!(formation.range(opponent), EngagementRange::Long);

        formation.set_range(opponent, EngagementRange::Short);
        assert!(formation.is_range_set(opponent));
        assert_eq!(formation.range(opponent), EngagementRange::Short);
    }

    #[test]
    fn test_reset_clears_round_state() {
        let mut formation = formation_with_units(2);
        let opponent = FormationId::new();
        formation.target = Some(opponent);
        formation.engagement_control = Some(EngagementOutcome::Forced);
        formation.set_high_stress_episode();
        formation.set_range(opponent, EngagementRange::Short);
        formation.done = true;
        formation.morale = MoraleStatus::Shaken;

        formation.reset();

        assert!(formation.target.is_none());
        assert!(formation.engagement_control.is_none());
        assert!(!formation.had_high_stress_episode());
        assert!(!formation.is_range_set(opponent));
        assert!(!formation.done);
        // Morale persists across rounds
        assert_eq!(formation.morale, MoraleStatus::Shaken);
    }

    #[test]
    fn test_morale_ordering_and_steps() {
        assert!(MoraleStatus::Routed > MoraleStatus::Normal);
        assert!(MoraleStatus::Broken > MoraleStatus::Shaken);
        assert_eq!(MoraleStatus::Normal.worsen(), MoraleStatus::Shaken);
        assert_eq!(MoraleStatus::Routed.worsen(), MoraleStatus::Routed);
        assert_eq!(MoraleStatus::Routed.improve(), MoraleStatus::Broken);
        assert_eq!(MoraleStatus::Normal.improve(), MoraleStatus::Normal);
    }

    #[test]
    fn test_range_tightens_toward_short() {
        assert_eq!(EngagementRange::Long.tighten(), EngagementRange::Medium);
        assert_eq!(EngagementRange::Medium.tighten(), EngagementRange::Short);
        assert_eq!(EngagementRange::Short.tighten(), EngagementRange::Short);
    }

    #[test]
    fn test_formation_movement_is_slowest_member() {
        let mut formation = formation_with_units(2);
        formation.units[1].crits.movement = 2;
        assert_eq!(formation.current_movement(), 2);
        assert_eq!(formation.nominal_movement(), 4);
    }
}
