//! Hierarchical state machine that fires triggers against a validated
//! configuration graph.
//!
//! A `fire` call runs to completion before returning: rule resolution, exit
//! hooks, state assignment, entry hooks and observers all happen in-line.
//! The machine does no locking of its own. Callers sharing one machine across
//! threads must serialize access, for example by wrapping it in a `Mutex`.

use crate::core::{Parameter, ParameterType, State, StateCell, Transition, Trigger, TypedTrigger};
use crate::engine::error::{FireError, HookError, HookPhase};
use crate::engine::hooks::Observer;
use crate::engine::representation::{Behaviour, StateRepresentation};
use crate::graph::GraphDescription;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Outcome of looking a trigger up along the current state's ancestry.
#[derive(Debug, PartialEq)]
enum Resolution<S> {
    Transition { destination: S },
    /// Handled internally by `owner`, the current state or one of its ancestors.
    Internal { owner: S },
}

/// A configured state machine.
///
/// Built with [`StateMachineBuilder`](crate::builder::StateMachineBuilder);
/// the configuration graph cannot change once the machine exists.
pub struct StateMachine<S: State, T: Trigger> {
    cell: Box<dyn StateCell<S>>,
    states: HashMap<S, StateRepresentation<S, T>>,
    order: Vec<S>,
    parameters: Vec<(T, ParameterType)>,
    observers: Vec<Observer<S, T>>,
}

impl<S: State, T: Trigger> StateMachine<S, T> {
    pub(crate) fn new(
        cell: Box<dyn StateCell<S>>,
        representations: Vec<StateRepresentation<S, T>>,
        parameters: Vec<(T, ParameterType)>,
        observers: Vec<Observer<S, T>>,
    ) -> Self {
        let order = representations.iter().map(|r| r.state.clone()).collect();
        let states = representations
            .into_iter()
            .map(|r| (r.state.clone(), r))
            .collect();

        Self {
            cell,
            states,
            order,
            parameters,
            observers,
        }
    }

    /// Get current state
    pub fn current_state(&self) -> S {
        self.cell.get()
    }

    /// True if the current state is `state` or one of its substates.
    pub fn is_in_state(&self, state: &S) -> bool {
        self.ancestry(&self.cell.get()).contains(state)
    }

    /// True if `trigger` is handled by the current state or an ancestor.
    ///
    /// Payload requirements are not considered.
    pub fn can_fire(&self, trigger: &T) -> bool {
        self.resolve(&self.cell.get(), trigger).is_some()
    }

    /// Triggers handled by the current state or its ancestors, innermost first.
    pub fn permitted_triggers(&self) -> Vec<T> {
        let mut triggers: Vec<T> = Vec::new();
        for state in self.ancestry(&self.cell.get()) {
            let Some(representation) = self.states.get(&state) else {
                continue;
            };
            for behaviour in &representation.behaviours {
                if !triggers.contains(&behaviour.trigger) {
                    triggers.push(behaviour.trigger.clone());
                }
            }
        }
        triggers
    }

    /// Register a callback invoked after every completed transition,
    /// internal transitions included. Callbacks run in registration order,
    /// after all entry hooks.
    pub fn on_transitioned<F>(&mut self, observer: F) -> &mut Self
    where
        F: FnMut(&Transition<S, T>) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// Snapshot of the configuration graph, for external rendering.
    pub fn info(&self) -> GraphDescription<S, T> {
        GraphDescription::describe(
            self.cell.get(),
            self.order.iter().filter_map(|s| self.states.get(s)),
            &self.parameters,
        )
    }

    /// Fire a trigger that carries no payload.
    ///
    /// Fails with [`FireError::TriggerPayloadMismatch`] if the trigger was
    /// parameterized, and with [`FireError::InvalidTransition`] if neither the
    /// current state nor any ancestor handles it. Neither failure changes the
    /// state or runs any hook.
    pub fn fire(&mut self, trigger: T) -> Result<(), FireError> {
        self.check_payload(&trigger, None)?;
        self.dispatch(trigger, None)
    }

    /// Fire a parameterized trigger with its payload.
    pub fn fire_with<A: Parameter>(
        &mut self,
        trigger: &TypedTrigger<T, A>,
        payload: A,
    ) -> Result<(), FireError> {
        self.check_payload(trigger.trigger(), Some(trigger.parameter_type()))?;
        self.dispatch(trigger.trigger().clone(), Some(Box::new(payload)))
    }

    fn check_payload(&self, trigger: &T, supplied: Option<ParameterType>) -> Result<(), FireError> {
        let expected = self
            .parameters
            .iter()
            .find(|(t, _)| t == trigger)
            .map(|(_, p)| *p);

        if expected == supplied {
            return Ok(());
        }

        Err(FireError::TriggerPayloadMismatch {
            trigger: trigger.name().to_string(),
            expected: describe_payload(expected),
            found: describe_payload(supplied),
        })
    }

    fn dispatch(
        &mut self,
        trigger: T,
        parameters: Option<Box<dyn Parameter>>,
    ) -> Result<(), FireError> {
        let source = self.cell.get();
        let Some(resolution) = self.resolve(&source, &trigger) else {
            return Err(FireError::InvalidTransition {
                state: source.name().to_string(),
                trigger: trigger.name().to_string(),
            });
        };

        match resolution {
            Resolution::Internal { owner } => {
                let transition = Transition::new(source.clone(), source, trigger, parameters, true);
                self.run_internal(&owner, &transition)?;
                debug!(
                    state = transition.source.name(),
                    trigger = transition.trigger.name(),
                    "Handled internal transition"
                );
                self.notify(&transition);
            }
            Resolution::Transition { destination } => {
                let (exits, entries) =
                    transition_path(&self.ancestry(&source), &self.ancestry(&destination));
                let transition = Transition::new(source, destination, trigger, parameters, false);

                for state in &exits {
                    self.run_exit(state, &transition)?;
                }
                self.cell.set(transition.destination.clone());
                for state in &entries {
                    self.run_entry(state, &transition)?;
                }

                debug!(
                    source = transition.source.name(),
                    destination = transition.destination.name(),
                    trigger = transition.trigger.name(),
                    "Transitioned"
                );
                self.notify(&transition);
            }
        }

        Ok(())
    }

    /// Walk from `source` up through its ancestors until one handles `trigger`.
    fn resolve(&self, source: &S, trigger: &T) -> Option<Resolution<S>> {
        self.ancestry(source).into_iter().find_map(|state| {
            let behaviour = self.states.get(&state)?.behaviour(trigger)?;
            Some(match behaviour {
                Behaviour::Transition { destination } => Resolution::Transition {
                    destination: destination.clone(),
                },
                Behaviour::Internal { .. } => Resolution::Internal { owner: state },
            })
        })
    }

    /// `state` followed by its ancestors, innermost first.
    fn ancestry(&self, state: &S) -> Vec<S> {
        let mut chain = vec![state.clone()];
        let mut parent = self.parent_of(state);
        while let Some(next) = parent {
            parent = self.parent_of(&next);
            chain.push(next);
        }
        chain
    }

    fn parent_of(&self, state: &S) -> Option<S> {
        self.states.get(state).and_then(|r| r.parent.clone())
    }

    fn run_internal(&mut self, owner: &S, transition: &Transition<S, T>) -> Result<(), FireError> {
        let behaviour = self
            .states
            .get_mut(owner)
            .and_then(|r| r.behaviour_mut(&transition.trigger));

        if let Some(Behaviour::Internal { action, .. }) = behaviour {
            trace!(
                state = owner.name(),
                trigger = transition.trigger.name(),
                "Running internal transition"
            );
            let failed = |err| hook_failure(HookPhase::Internal, owner, transition, err);
            action(transition).map_err(failed)?;
        }
        Ok(())
    }

    fn run_exit(&mut self, state: &S, transition: &Transition<S, T>) -> Result<(), FireError> {
        let Some(representation) = self.states.get_mut(state) else {
            return Ok(());
        };

        for exit in representation.exit.iter_mut() {
            trace!(
                state = state.name(),
                trigger = transition.trigger.name(),
                "Running exit hook"
            );
            (exit.action)(transition)
                .map_err(|err| hook_failure(HookPhase::Exit, state, transition, err))?;
        }
        Ok(())
    }

    fn run_entry(&mut self, state: &S, transition: &Transition<S, T>) -> Result<(), FireError> {
        let Some(representation) = self.states.get_mut(state) else {
            return Ok(());
        };

        for entry in representation
            .entry
            .iter_mut()
            .filter(|e| e.applies_to(&transition.trigger))
        {
            trace!(
                state = state.name(),
                trigger = transition.trigger.name(),
                "Running entry hook"
            );
            (entry.action)(transition)
                .map_err(|err| hook_failure(HookPhase::Entry, state, transition, err))?;
        }
        Ok(())
    }

    fn notify(&mut self, transition: &Transition<S, T>) {
        for observer in self.observers.iter_mut() {
            observer(transition);
        }
    }
}

/// States to exit (innermost first) and enter (outermost first) when moving
/// between two ancestry chains.
///
/// States shared by both chains are neither exited nor entered, except on
/// re-entry, where the state itself is exited and entered again.
fn transition_path<S: State>(source: &[S], destination: &[S]) -> (Vec<S>, Vec<S>) {
    if source.first() == destination.first() {
        let own = source.first().cloned().into_iter().collect::<Vec<_>>();
        return (own.clone(), own);
    }

    let common = source.iter().find(|s| destination.contains(s));
    let exits = source
        .iter()
        .take_while(|s| Some(*s) != common)
        .cloned()
        .collect();
    let mut entries: Vec<S> = destination
        .iter()
        .take_while(|s| Some(*s) != common)
        .cloned()
        .collect();
    entries.reverse();

    (exits, entries)
}

fn hook_failure<S: State, T: Trigger>(
    phase: HookPhase,
    state: &S,
    transition: &Transition<S, T>,
    source: HookError,
) -> FireError {
    FireError::Hook {
        phase,
        state: state.name().to_string(),
        trigger: transition.trigger.name().to_string(),
        source,
    }
}

fn describe_payload(parameter: Option<ParameterType>) -> String {
    match parameter {
        Some(p) => format!("a payload of type {}", p.name),
        None => "no payload".to_string(),
    }
}
