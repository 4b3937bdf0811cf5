//! Validated, per-state configuration used by the engine at fire time.

use crate::core::{State, Trigger};
use crate::engine::hooks::Action;

/// What a state does when a trigger reaches it.
pub(crate) enum Behaviour<S: State, T: Trigger> {
    /// Leave for `destination` (possibly the same state).
    Transition { destination: S },
    /// Run the handler without changing state.
    Internal {
        action: Action<S, T>,
        description: Option<String>,
    },
}

pub(crate) struct TriggerBehaviour<S: State, T: Trigger> {
    pub(crate) trigger: T,
    pub(crate) behaviour: Behaviour<S, T>,
}

/// Entry hook, optionally restricted to entries caused by one trigger.
pub(crate) struct EntryAction<S: State, T: Trigger> {
    pub(crate) from: Option<T>,
    pub(crate) action: Action<S, T>,
    pub(crate) description: Option<String>,
}

impl<S: State, T: Trigger> EntryAction<S, T> {
    pub(crate) fn applies_to(&self, trigger: &T) -> bool {
        self.from.as_ref().is_none_or(|from| from == trigger)
    }
}

pub(crate) struct ExitAction<S: State, T: Trigger> {
    pub(crate) action: Action<S, T>,
    pub(crate) description: Option<String>,
}

pub(crate) struct StateRepresentation<S: State, T: Trigger> {
    pub(crate) state: S,
    pub(crate) parent: Option<S>,
    pub(crate) behaviours: Vec<TriggerBehaviour<S, T>>,
    pub(crate) entry: Vec<EntryAction<S, T>>,
    pub(crate) exit: Vec<ExitAction<S, T>>,
}

impl<S: State, T: Trigger> StateRepresentation<S, T> {
    /// The behaviour this state itself declares for `trigger`.
    pub(crate) fn behaviour(&self, trigger: &T) -> Option<&Behaviour<S, T>> {
        self.behaviours
            .iter()
            .find(|b| &b.trigger == trigger)
            .map(|b| &b.behaviour)
    }

    pub(crate) fn behaviour_mut(&mut self, trigger: &T) -> Option<&mut Behaviour<S, T>> {
        self.behaviours
            .iter_mut()
            .find(|b| &b.trigger == trigger)
            .map(|b| &mut b.behaviour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transition;
    use crate::engine::hooks::action;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Connected,
        OffHook,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Connected => "Connected",
                Self::OffHook => "OffHook",
            }
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestTrigger {
        Mute,
        LeftMessage,
        Dialed,
    }

    impl Trigger for TestTrigger {
        fn name(&self) -> &str {
            match self {
                Self::Mute => "Mute",
                Self::LeftMessage => "LeftMessage",
                Self::Dialed => "Dialed",
            }
        }
    }

    fn noop() -> Action<TestState, TestTrigger> {
        action(|_t: &Transition<TestState, TestTrigger>| ())
    }

    #[test]
    fn behaviour_looks_up_own_rules_only() {
        let representation = StateRepresentation {
            state: TestState::Connected,
            parent: None,
            behaviours: vec![
                TriggerBehaviour {
                    trigger: TestTrigger::LeftMessage,
                    behaviour: Behaviour::Transition {
                        destination: TestState::OffHook,
                    },
                },
                TriggerBehaviour {
                    trigger: TestTrigger::Mute,
                    behaviour: Behaviour::Internal {
                        action: noop(),
                        description: None,
                    },
                },
            ],
            entry: Vec::new(),
            exit: Vec::new(),
        };

        assert!(matches!(
            representation.behaviour(&TestTrigger::LeftMessage),
            Some(Behaviour::Transition {
                destination: TestState::OffHook,
            })
        ));
        assert!(matches!(
            representation.behaviour(&TestTrigger::Mute),
            Some(Behaviour::Internal { .. })
        ));
        assert!(representation.behaviour(&TestTrigger::Dialed).is_none());
    }

    #[test]
    fn entry_action_filters_by_trigger() {
        let any = EntryAction {
            from: None,
            action: noop(),
            description: None,
        };
        let dialed = EntryAction {
            from: Some(TestTrigger::Dialed),
            action: noop(),
            description: Some("Caller number to call".to_string()),
        };

        assert!(any.applies_to(&TestTrigger::Mute));
        assert!(dialed.applies_to(&TestTrigger::Dialed));
        assert!(!dialed.applies_to(&TestTrigger::Mute));
    }
}
