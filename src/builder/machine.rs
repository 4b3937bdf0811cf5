//! Builder for constructing state machines.

use crate::builder::configuration::StateConfiguration;
use crate::builder::error::BuildError;
use crate::builder::validation::validate;
use crate::core::{
    ExternalState, OwnedState, Parameter, ParameterType, State, StateCell, Transition, Trigger,
    TypedTrigger,
};
use crate::engine::hooks::Observer;
use crate::engine::StateMachine;
use stillwater::validation::Validation;
use tracing::trace;

/// Builder holding the configuration graph until the machine is built.
///
/// # Example
///
/// ```rust
/// use hsm::builder::StateMachineBuilder;
/// use hsm::{state_enum, trigger_enum};
///
/// state_enum! {
///     enum Light { Off, On }
/// }
///
/// trigger_enum! {
///     enum Switch { Flip }
/// }
///
/// let mut builder = StateMachineBuilder::new(Light::Off);
/// builder.configure(Light::Off).permit(Switch::Flip, Light::On);
/// builder.configure(Light::On).permit(Switch::Flip, Light::Off);
///
/// let mut machine = builder.build().unwrap();
/// machine.fire(Switch::Flip).unwrap();
/// assert_eq!(machine.current_state(), Light::On);
/// ```
pub struct StateMachineBuilder<S: State, T: Trigger> {
    cell: Box<dyn StateCell<S>>,
    states: Vec<StateConfiguration<S, T>>,
    parameters: Vec<(T, ParameterType)>,
    observers: Vec<Observer<S, T>>,
}

impl<S: State, T: Trigger> StateMachineBuilder<S, T> {
    /// Create a builder for a machine that owns its current state.
    pub fn new(initial: S) -> Self {
        Self::with_state_cell(OwnedState::new(initial))
    }

    /// Create a builder for a machine whose current state lives elsewhere,
    /// read through `accessor` and written through `mutator`.
    pub fn with_accessors<G, M>(accessor: G, mutator: M) -> Self
    where
        G: Fn() -> S + Send + 'static,
        M: FnMut(S) + Send + 'static,
    {
        Self::with_state_cell(ExternalState::new(accessor, mutator))
    }

    /// Create a builder backed by a custom state cell.
    pub fn with_state_cell<C>(cell: C) -> Self
    where
        C: StateCell<S> + 'static,
    {
        Self {
            cell: Box::new(cell),
            states: Vec::new(),
            parameters: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Begin or continue configuring `state`.
    pub fn configure(&mut self, state: S) -> &mut StateConfiguration<S, T> {
        let index = match self.states.iter().position(|c| c.state == state) {
            Some(index) => index,
            None => {
                self.states.push(StateConfiguration::new(state));
                self.states.len() - 1
            }
        };
        &mut self.states[index]
    }

    /// Declare that firing `trigger` requires exactly one payload of type `A`.
    pub fn set_trigger_parameters<A: Parameter>(&mut self, trigger: T) -> TypedTrigger<T, A> {
        self.parameters
            .push((trigger.clone(), ParameterType::of::<A>()));
        TypedTrigger::new(trigger)
    }

    /// Register a callback invoked after every completed transition.
    pub fn on_transitioned<F>(&mut self, observer: F) -> &mut Self
    where
        F: FnMut(&Transition<S, T>) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// Validate the configuration and build the machine.
    /// Returns every configuration error found if the graph is invalid.
    pub fn build(self) -> Result<StateMachine<S, T>, BuildError> {
        if let Validation::Failure(errors) = validate(&self.states, &self.parameters) {
            return Err(BuildError::InvalidConfiguration(
                errors.iter().cloned().collect(),
            ));
        }

        trace!(
            states = self.states.len(),
            parameterized_triggers = self.parameters.len(),
            "Built state machine"
        );

        let representations = self
            .states
            .into_iter()
            .map(StateConfiguration::into_representation)
            .collect();

        Ok(StateMachine::new(
            self.cell,
            representations,
            self.parameters,
            self.observers,
        ))
    }
}
