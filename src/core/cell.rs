//! Storage for the machine's current state.
//!
//! The machine reads and writes its current state through a [`StateCell`].
//! By default it owns the value ([`OwnedState`]); [`ExternalState`] lets the
//! state live inside some larger object reached through closures.

use super::state::State;

/// Get/set capability for the current-state value.
pub trait StateCell<S: State>: Send {
    fn get(&self) -> S;
    fn set(&mut self, state: S);
}

/// Current state held directly by the machine.
#[derive(Clone, Debug)]
pub struct OwnedState<S>(S);

impl<S: State> OwnedState<S> {
    pub fn new(initial: S) -> Self {
        Self(initial)
    }
}

impl<S: State> StateCell<S> for OwnedState<S> {
    fn get(&self) -> S {
        self.0.clone()
    }

    fn set(&mut self, state: S) {
        self.0 = state;
    }
}

/// Current state held elsewhere, accessed through an accessor and a mutator.
///
/// # Example
///
/// ```rust
/// use hsm::core::{ExternalState, StateCell};
/// use hsm::state_enum;
/// use std::sync::{Arc, Mutex};
///
/// state_enum! {
///     enum Door { Open, Closed }
/// }
///
/// let slot = Arc::new(Mutex::new(Door::Closed));
/// let (read, write) = (Arc::clone(&slot), Arc::clone(&slot));
/// let mut cell = ExternalState::new(
///     move || read.lock().unwrap().clone(),
///     move |s| *write.lock().unwrap() = s,
/// );
///
/// cell.set(Door::Open);
/// assert_eq!(*slot.lock().unwrap(), Door::Open);
/// ```
pub struct ExternalState<G, M> {
    accessor: G,
    mutator: M,
}

impl<G, M> ExternalState<G, M> {
    pub fn new(accessor: G, mutator: M) -> Self {
        Self { accessor, mutator }
    }
}

impl<S, G, M> StateCell<S> for ExternalState<G, M>
where
    S: State,
    G: Fn() -> S + Send,
    M: FnMut(S) + Send,
{
    fn get(&self) -> S {
        (self.accessor)()
    }

    fn set(&mut self, state: S) {
        (self.mutator)(state)
    }
}
