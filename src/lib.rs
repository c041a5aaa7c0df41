//! Autoresolve - formation-level abstract combat auto-resolver
//!
//! Takes two or more opposing groups of combat units and rapidly computes a
//! battle outcome (casualties, battlefield control, victor) without simulating
//! every tactical action. The abstraction works at formation level: battle
//! values become dice pools, damage and morale accumulate per round, and a
//! phase state machine drives the battle to a guaranteed termination.

pub mod acar;
pub mod core;
