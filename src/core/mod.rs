//! Core state machine types.
//!
//! This module contains the data contracts the machine is generic over:
//! - State definitions via the `State` trait
//! - Action definitions via the `Action` trait
//! - Policy predicates for admission and cancellation rules
//! - Immutable history of published states
//!
//! Nothing in this module performs I/O or spawns tasks.

mod action;
mod history;
mod policy;
mod state;

pub use action::Action;
pub use history::{Stage, StateHistory, StateTransition};
pub use policy::Policy;
pub use state::State;
