//! Core types and error handling shared across the crate

pub mod error;
pub mod types;

pub use error::{AcarError, Result};
pub use types::{EntityId, FormationId, Round, TeamId, UnitId};
