//! Hsm: a hierarchical state machine engine
//!
//! States may be nested under a parent state and inherit its transitions.
//! Triggers may carry typed payloads. Entry, exit and internal-transition
//! hooks run in a fixed order on every `fire`, and observers are told about
//! each completed transition.
//!
//! # Core Concepts
//!
//! - **State** / **Trigger**: closed sets of identities, usually declared with
//!   [`state_enum!`] and [`trigger_enum!`]
//! - **Builder**: configuration happens once, on a [`StateMachineBuilder`];
//!   contradictory rules are rejected when the machine is built
//! - **Engine**: [`StateMachine::fire`] resolves the trigger along the current
//!   state's ancestry and runs exit hooks, assigns the new state, then runs
//!   entry hooks and observers
//! - **Graph**: [`StateMachine::info`] returns a serializable snapshot of the
//!   configuration for external rendering
//!
//! # Example
//!
//! ```rust
//! use hsm::{state_enum, trigger_enum, StateMachineBuilder, Transition};
//!
//! state_enum! {
//!     enum Call { OffHook, Ringing, Connected, OnHold }
//! }
//!
//! trigger_enum! {
//!     enum Event { CallDialed, CallConnected, PlacedOnHold, LeftMessage }
//! }
//!
//! let mut builder = StateMachineBuilder::new(Call::OffHook);
//! let dialed = builder.set_trigger_parameters::<String>(Event::CallDialed);
//!
//! builder.configure(Call::OffHook).permit(Event::CallDialed, Call::Ringing);
//! builder
//!     .configure(Call::Ringing)
//!     .on_entry_from_typed(&dialed, |callee: &String, _t: &Transition<_, _>| {
//!         assert_eq!(callee, "555-1234");
//!     })
//!     .permit(Event::CallConnected, Call::Connected);
//! builder
//!     .configure(Call::Connected)
//!     .permit(Event::PlacedOnHold, Call::OnHold)
//!     .permit(Event::LeftMessage, Call::OffHook);
//! builder.configure(Call::OnHold).substate_of(Call::Connected);
//!
//! let mut machine = builder.build().unwrap();
//! machine.fire_with(&dialed, "555-1234".to_string()).unwrap();
//! machine.fire(Event::CallConnected).unwrap();
//! machine.fire(Event::PlacedOnHold).unwrap();
//! assert!(machine.is_in_state(&Call::Connected));
//!
//! // Inherited from Connected
//! machine.fire(Event::LeftMessage).unwrap();
//! assert_eq!(machine.current_state(), Call::OffHook);
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod graph;

// Re-export commonly used types
pub use builder::{BuildError, ConfigurationError, StateConfiguration, StateMachineBuilder};
pub use core::{State, Transition, Trigger, TypedTrigger};
pub use engine::{FireError, HookError, StateMachine};
pub use graph::GraphDescription;
