//! Identifier types used throughout the resolver

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for campaign-layer entities behind a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for a side in the battle, supplied by the scenario layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team {}", self.0)
    }
}

/// Unique identifier for formations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormationId(pub Uuid);

impl FormationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FormationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Round counter (one full initiative-to-end cycle)
pub type Round = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_id_equality() {
        assert_eq!(TeamId(1), TeamId(1));
        assert_ne!(TeamId(1), TeamId(2));
    }

    #[test]
    fn test_team_id_display() {
        assert_eq!(TeamId(3).to_string(), "Team 3");
    }

    #[test]
    fn test_formation_ids_unique() {
        assert_ne!(FormationId::new(), FormationId::new());
    }

    #[test]
    fn test_unit_id_hash() {
        use std::collections::HashMap;
        let id = UnitId::new();
        let mut map: HashMap<UnitId, &str> = HashMap::new();
        map.insert(id, "lance");
        assert_eq!(map.get(&id), Some(&"lance"));
    }
}
