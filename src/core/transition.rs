//! The record describing one fired trigger.

use super::state::State;
use super::trigger::{Parameter, Trigger};
use chrono::{DateTime, Utc};

/// Record of a single transition, handed to every hook and observer.
///
/// For an internal transition `source` and `destination` are the same state
/// and [`is_internal`](Self::is_internal) returns `true`.
#[derive(Debug)]
pub struct Transition<S: State, T: Trigger> {
    /// The state the machine was in when the trigger fired
    pub source: S,
    /// The state the machine is in after the transition
    pub destination: S,
    /// The trigger that caused the transition
    pub trigger: T,
    /// Payload of a parameterized trigger
    pub parameters: Option<Box<dyn Parameter>>,
    /// When the trigger was fired
    pub timestamp: DateTime<Utc>,
    pub(crate) internal: bool,
}

impl<S: State, T: Trigger> Transition<S, T> {
    pub(crate) fn new(
        source: S,
        destination: S,
        trigger: T,
        parameters: Option<Box<dyn Parameter>>,
        internal: bool,
    ) -> Self {
        Self {
            source,
            destination,
            trigger,
            parameters,
            timestamp: Utc::now(),
            internal,
        }
    }

    /// True when the transition leaves and re-enters the same state.
    pub fn is_reentry(&self) -> bool {
        !self.internal && self.source == self.destination
    }

    /// True when the trigger was handled without leaving the state.
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    /// Borrow the payload as `A`, if the trigger carried one of that type.
    pub fn parameter<A: 'static>(&self) -> Option<&A> {
        self.parameters
            .as_deref()
            .and_then(|p| p.as_any().downcast_ref::<A>())
    }
}
