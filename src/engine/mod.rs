//! Runtime side of the state machine: firing triggers, running hooks and
//! notifying observers.

mod error;
pub(crate) mod hooks;
mod machine;
pub(crate) mod representation;

pub use error::{FireError, HookError, HookPhase};
pub use hooks::HookOutput;
pub use machine::StateMachine;
