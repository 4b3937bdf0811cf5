//! Read-only snapshot of a machine's configuration graph.
//!
//! The snapshot lists states, triggers, transitions and substate edges so
//! that an external renderer can draw the machine. It is serializable but
//! prescribes no diagram format.

use crate::core::{ParameterType, State, Trigger};
use crate::engine::representation::{Behaviour, StateRepresentation};
use serde::{Deserialize, Serialize};

/// How a transition treats the states involved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Leaves the source for a different destination
    External,
    /// Leaves the source and enters it again
    Reentry,
    /// Handled without leaving the source
    Internal,
}

/// An entry hook as configured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EntryHookInfo<T: Trigger> {
    /// Trigger the hook is restricted to, if any
    pub from: Option<T>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateInfo<S: State, T: Trigger> {
    pub state: S,
    pub parent: Option<S>,
    pub substates: Vec<S>,
    pub entry_hooks: Vec<EntryHookInfo<T>>,
    /// One description slot per exit hook
    pub exit_hooks: Vec<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TriggerInfo<T: Trigger> {
    pub trigger: T,
    /// Type name of the payload for parameterized triggers
    pub parameter_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionInfo<S: State, T: Trigger> {
    pub source: S,
    pub trigger: T,
    pub destination: S,
    pub kind: TransitionKind,
    /// Description of the handler, for internal transitions
    pub description: Option<String>,
}

/// Snapshot of the full configuration graph.
///
/// States appear in configuration order, followed by states that are only
/// referenced as destinations or parents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct GraphDescription<S: State, T: Trigger> {
    pub current_state: S,
    pub states: Vec<StateInfo<S, T>>,
    pub triggers: Vec<TriggerInfo<T>>,
    pub transitions: Vec<TransitionInfo<S, T>>,
}

impl<S: State, T: Trigger> GraphDescription<S, T> {
    pub(crate) fn describe<'a>(
        current_state: S,
        representations: impl Iterator<Item = &'a StateRepresentation<S, T>>,
        parameters: &[(T, ParameterType)],
    ) -> Self {
        let representations: Vec<_> = representations.collect();

        let mut transitions = Vec::new();
        let mut trigger_order: Vec<T> = Vec::new();
        let mut remember = |trigger: &T| {
            if !trigger_order.contains(trigger) {
                trigger_order.push(trigger.clone());
            }
        };

        for representation in &representations {
            for behaviour in &representation.behaviours {
                remember(&behaviour.trigger);
                let source = &representation.state;
                let (destination, kind, description) = match &behaviour.behaviour {
                    Behaviour::Transition { destination } if destination == source => {
                        (destination.clone(), TransitionKind::Reentry, None)
                    }
                    Behaviour::Transition { destination } => {
                        (destination.clone(), TransitionKind::External, None)
                    }
                    Behaviour::Internal { description, .. } => (
                        source.clone(),
                        TransitionKind::Internal,
                        description.clone(),
                    ),
                };
                transitions.push(TransitionInfo {
                    source: source.clone(),
                    trigger: behaviour.trigger.clone(),
                    destination,
                    kind,
                    description,
                });
            }
            for entry in &representation.entry {
                if let Some(trigger) = &entry.from {
                    remember(trigger);
                }
            }
        }
        for (trigger, _) in parameters {
            remember(trigger);
        }

        let mut state_order: Vec<S> = representations.iter().map(|r| r.state.clone()).collect();
        let referenced = representations
            .iter()
            .filter_map(|r| r.parent.clone())
            .chain(transitions.iter().map(|t| t.destination.clone()));
        for state in referenced {
            if !state_order.contains(&state) {
                state_order.push(state);
            }
        }

        let states = state_order
            .into_iter()
            .map(|state| {
                let representation = representations.iter().find(|r| r.state == state);
                StateInfo {
                    parent: representation.and_then(|r| r.parent.clone()),
                    substates: representations
                        .iter()
                        .filter(|r| r.parent.as_ref() == Some(&state))
                        .map(|r| r.state.clone())
                        .collect(),
                    entry_hooks: representation
                        .map(|r| {
                            r.entry
                                .iter()
                                .map(|e| EntryHookInfo {
                                    from: e.from.clone(),
                                    description: e.description.clone(),
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                    exit_hooks: representation
                        .map(|r| r.exit.iter().map(|e| e.description.clone()).collect())
                        .unwrap_or_default(),
                    state,
                }
            })
            .collect();

        let triggers = trigger_order
            .into_iter()
            .map(|trigger| TriggerInfo {
                parameter_type: parameters
                    .iter()
                    .find(|(t, _)| t == &trigger)
                    .map(|(_, p)| p.name.to_string()),
                trigger,
            })
            .collect();

        Self {
            current_state,
            states,
            triggers,
            transitions,
        }
    }

    /// Substate edges as `(child, parent)` pairs.
    pub fn substate_edges(&self) -> Vec<(S, S)> {
        self.states
            .iter()
            .filter_map(|s| s.parent.clone().map(|p| (s.state.clone(), p)))
            .collect()
    }
}
