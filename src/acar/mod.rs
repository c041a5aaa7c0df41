//! Abstract combat auto-resolver (ACAR)
//!
//! Formation-level battle resolution: battle values size dice pools, phases
//! run a fixed prepare/execute/end cycle, and the end phase settles
//! destruction, withdrawal and morale each round until one side carries the
//! field. Fully synchronous and seedable - same roster, same seed, same
//! outcome.

pub mod actions;
pub mod constants;
pub mod context;
pub mod dice;
pub mod end_phase;
pub mod engagement;
pub mod firing;
pub mod formation;
pub mod initiative;
pub mod manager;
pub mod phase;
pub mod report;
pub mod result;
pub mod scenario;
pub mod tactical;
pub mod unit;
pub mod victory;

// Re-exports for convenient access
pub use actions::{process_queue, Action};
pub use constants::*;
pub use context::{
    BattleVerdict, GraveyardEntry, RemovalClassification, SimulationContext,
};
pub use dice::{dice_pool_size, pool_roll, roll_2d6, roll_d6, UnitStrength};
pub use formation::{EngagementOutcome, EngagementRange, Formation, MoraleStatus};
pub use initiative::roll_initiative;
pub use manager::SimulationManager;
pub use phase::Phase;
pub use report::{BattleReport, Reporter, CLOSING_MARKER};
pub use result::{AutoResolveResult, PostBattleEvent, ResultSink};
pub use scenario::{build_context, ForceEntry, ScenarioConfig, UnitSetup};
pub use tactical::{
    AttackResolver, DamageApplier, DicePoolAttackResolver, NullDamageApplier,
};
pub use unit::{CritCounters, SimUnit};
pub use victory::{LastTeamStanding, VictoryEvaluator};
