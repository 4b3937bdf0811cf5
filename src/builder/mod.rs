//! Builder API for configuring state machines.
//!
//! Configuration happens on a [`StateMachineBuilder`]: states are configured
//! through [`StateConfiguration`] and parameterized triggers are declared
//! with [`StateMachineBuilder::set_trigger_parameters`]. `build()` validates
//! the whole graph and hands back a [`StateMachine`](crate::engine::StateMachine)
//! whose configuration can no longer change.

mod configuration;
pub mod error;
mod machine;
pub mod macros;
mod validation;

pub use configuration::StateConfiguration;
pub use error::{BuildError, ConfigurationError};
pub use machine::StateMachineBuilder;
