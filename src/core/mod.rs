//! Core state machine types.
//!
//! This module contains the vocabulary shared by the builder and the engine:
//! - State and trigger identities via the `State` and `Trigger` traits
//! - Typed trigger handles and type-erased payloads
//! - The `Transition` record passed to hooks and observers
//! - The `StateCell` capability holding the current state

mod cell;
mod state;
mod transition;
mod trigger;

pub use cell::{ExternalState, OwnedState, StateCell};
pub use state::State;
pub use transition::Transition;
pub use trigger::{Parameter, Trigger, TypedTrigger};

pub(crate) use trigger::ParameterType;
