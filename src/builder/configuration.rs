//! Fluent, per-state configuration.

use crate::core::{Parameter, ParameterType, State, Transition, Trigger, TypedTrigger};
use crate::engine::hooks::{action, typed_action, Action, HookOutput};
use crate::engine::representation::{
    Behaviour, EntryAction, ExitAction, StateRepresentation, TriggerBehaviour,
};

/// A trigger rule as declared, before validation.
pub(crate) enum Rule<S: State, T: Trigger> {
    Permit { trigger: T, destination: S },
    Internal {
        trigger: T,
        action: Action<S, T>,
        description: Option<String>,
    },
}

impl<S: State, T: Trigger> Rule<S, T> {
    pub(crate) fn trigger(&self) -> &T {
        match self {
            Self::Permit { trigger, .. } | Self::Internal { trigger, .. } => trigger,
        }
    }

    pub(crate) fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// The hook most recently registered, target of [`StateConfiguration::described`].
#[derive(Clone, Copy)]
enum HookSlot {
    Entry(usize),
    Exit(usize),
    Internal(usize),
}

/// Builder scoped to one state, returned by
/// [`StateMachineBuilder::configure`](crate::builder::StateMachineBuilder::configure).
///
/// Every method records a rule or hook and returns the builder for chaining.
/// Contradictory declarations are reported when the machine is built.
pub struct StateConfiguration<S: State, T: Trigger> {
    pub(crate) state: S,
    pub(crate) parents: Vec<S>,
    pub(crate) rules: Vec<Rule<S, T>>,
    pub(crate) entry: Vec<EntryAction<S, T>>,
    pub(crate) exit: Vec<ExitAction<S, T>>,
    /// Payload types assumed by typed hooks, checked against the registry.
    pub(crate) typed_bindings: Vec<(T, ParameterType)>,
    /// Descriptions given when no hook preceded them.
    pub(crate) unattached_descriptions: Vec<String>,
    last_hook: Option<HookSlot>,
}

impl<S: State, T: Trigger> StateConfiguration<S, T> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            state,
            parents: Vec::new(),
            rules: Vec::new(),
            entry: Vec::new(),
            exit: Vec::new(),
            typed_bindings: Vec::new(),
            unattached_descriptions: Vec::new(),
            last_hook: None,
        }
    }

    /// Leave for `destination` when `trigger` fires.
    pub fn permit(&mut self, trigger: T, destination: S) -> &mut Self {
        self.last_hook = None;
        self.rules.push(Rule::Permit {
            trigger,
            destination,
        });
        self
    }

    /// Exit and re-enter this state when `trigger` fires.
    pub fn permit_reentry(&mut self, trigger: T) -> &mut Self {
        let destination = self.state.clone();
        self.permit(trigger, destination)
    }

    /// Declare this state a substate of `parent`; it inherits every rule of
    /// `parent` it does not override.
    pub fn substate_of(&mut self, parent: S) -> &mut Self {
        self.last_hook = None;
        if !self.parents.contains(&parent) {
            self.parents.push(parent);
        }
        self
    }

    /// Run `hook` whenever this state is entered.
    pub fn on_entry<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut(&Transition<S, T>) -> R + Send + 'static,
        R: HookOutput,
    {
        self.push_entry(None, action(hook))
    }

    /// Run `hook` when this state is entered because `trigger` fired.
    pub fn on_entry_from<F, R>(&mut self, trigger: T, hook: F) -> &mut Self
    where
        F: FnMut(&Transition<S, T>) -> R + Send + 'static,
        R: HookOutput,
    {
        self.push_entry(Some(trigger), action(hook))
    }

    /// Run `hook` with the payload when this state is entered because the
    /// parameterized `trigger` fired.
    pub fn on_entry_from_typed<A, F, R>(
        &mut self,
        trigger: &TypedTrigger<T, A>,
        hook: F,
    ) -> &mut Self
    where
        A: Parameter,
        F: FnMut(&A, &Transition<S, T>) -> R + Send + 'static,
        R: HookOutput,
    {
        self.typed_bindings
            .push((trigger.trigger().clone(), trigger.parameter_type()));
        self.push_entry(Some(trigger.trigger().clone()), typed_action(hook))
    }

    /// Run `hook` whenever this state is left.
    pub fn on_exit<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut(&Transition<S, T>) -> R + Send + 'static,
        R: HookOutput,
    {
        self.last_hook = Some(HookSlot::Exit(self.exit.len()));
        self.exit.push(ExitAction {
            action: action(hook),
            description: None,
        });
        self
    }

    /// Handle `trigger` without leaving the state; no entry or exit hooks run.
    pub fn internal_transition<F, R>(&mut self, trigger: T, hook: F) -> &mut Self
    where
        F: FnMut(&Transition<S, T>) -> R + Send + 'static,
        R: HookOutput,
    {
        self.push_internal(trigger, action(hook))
    }

    /// Handle the parameterized `trigger` without leaving the state.
    pub fn internal_transition_typed<A, F, R>(
        &mut self,
        trigger: &TypedTrigger<T, A>,
        hook: F,
    ) -> &mut Self
    where
        A: Parameter,
        F: FnMut(&A, &Transition<S, T>) -> R + Send + 'static,
        R: HookOutput,
    {
        self.typed_bindings
            .push((trigger.trigger().clone(), trigger.parameter_type()));
        self.push_internal(trigger.trigger().clone(), typed_action(hook))
    }

    /// Label the hook or internal transition registered just before this
    /// call. The label shows up in [`info`](crate::StateMachine::info)
    /// snapshots for diagram rendering.
    ///
    /// A description that follows no hook is reported when the machine is
    /// built.
    pub fn described(&mut self, description: impl Into<String>) -> &mut Self {
        let description = description.into();
        let slot = match self.last_hook {
            Some(HookSlot::Entry(index)) => self.entry.get_mut(index).map(|e| &mut e.description),
            Some(HookSlot::Exit(index)) => self.exit.get_mut(index).map(|e| &mut e.description),
            Some(HookSlot::Internal(index)) => match self.rules.get_mut(index) {
                Some(Rule::Internal { description, .. }) => Some(description),
                _ => None,
            },
            None => None,
        };

        match slot {
            Some(slot) => *slot = Some(description),
            None => self.unattached_descriptions.push(description),
        }
        self
    }

    fn push_entry(&mut self, from: Option<T>, action: Action<S, T>) -> &mut Self {
        self.last_hook = Some(HookSlot::Entry(self.entry.len()));
        self.entry.push(EntryAction {
            from,
            action,
            description: None,
        });
        self
    }

    fn push_internal(&mut self, trigger: T, action: Action<S, T>) -> &mut Self {
        self.last_hook = Some(HookSlot::Internal(self.rules.len()));
        self.rules.push(Rule::Internal {
            trigger,
            action,
            description: None,
        });
        self
    }

    /// Convert into the engine's representation. Only called after
    /// validation, so there is at most one parent and one rule per trigger.
    pub(crate) fn into_representation(self) -> StateRepresentation<S, T> {
        let behaviours = self
            .rules
            .into_iter()
            .map(|rule| match rule {
                Rule::Permit {
                    trigger,
                    destination,
                } => TriggerBehaviour {
                    trigger,
                    behaviour: Behaviour::Transition { destination },
                },
                Rule::Internal {
                    trigger,
                    action,
                    description,
                } => TriggerBehaviour {
                    trigger,
                    behaviour: Behaviour::Internal {
                        action,
                        description,
                    },
                },
            })
            .collect();

        StateRepresentation {
            state: self.state,
            parent: self.parents.into_iter().next(),
            behaviours,
            entry: self.entry,
            exit: self.exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state_enum, trigger_enum};

    state_enum! {
        enum TestState {
            Connected,
            OnHold,
            OffHook,
        }
    }

    trigger_enum! {
        enum TestTrigger {
            Mute,
            LeftMessage,
            Redial,
            SetVolume,
        }
    }

    #[test]
    fn permit_records_rules_in_order() {
        let mut config = StateConfiguration::<TestState, TestTrigger>::new(TestState::Connected);
        config
            .permit(TestTrigger::LeftMessage, TestState::OffHook)
            .permit_reentry(TestTrigger::Redial)
            .internal_transition(TestTrigger::Mute, |_t: &Transition<_, _>| ());

        let triggers: Vec<_> = config.rules.iter().map(|r| r.trigger().clone()).collect();
        assert_eq!(
            triggers,
            vec![
                TestTrigger::LeftMessage,
                TestTrigger::Redial,
                TestTrigger::Mute
            ]
        );
        assert!(matches!(
            &config.rules[1],
            Rule::Permit {
                destination: TestState::Connected,
                ..
            }
        ));
        assert!(config.rules[2].is_internal());
    }

    #[test]
    fn substate_of_ignores_repeated_parent() {
        let mut config = StateConfiguration::<TestState, TestTrigger>::new(TestState::OnHold);
        config
            .substate_of(TestState::Connected)
            .substate_of(TestState::Connected);

        assert_eq!(config.parents, vec![TestState::Connected]);
    }

    #[test]
    fn typed_hooks_record_their_binding() {
        let volume: TypedTrigger<TestTrigger, i32> = TypedTrigger::new(TestTrigger::SetVolume);
        let mut config = StateConfiguration::<TestState, TestTrigger>::new(TestState::Connected);
        config
            .internal_transition_typed(&volume, |_v: &i32, _t: &Transition<_, _>| ())
            .on_entry_from_typed(&volume, |_v: &i32, _t: &Transition<_, _>| ());

        assert_eq!(config.typed_bindings.len(), 2);
        assert_eq!(config.typed_bindings[0].1, ParameterType::of::<i32>());
        assert_eq!(config.entry[0].from, Some(TestTrigger::SetVolume));
    }

    #[test]
    fn described_labels_the_preceding_hook() {
        let mut config = StateConfiguration::<TestState, TestTrigger>::new(TestState::Connected);
        config
            .on_entry(|_t: &Transition<_, _>| ())
            .described("Start call timer")
            .on_exit(|_t: &Transition<_, _>| ())
            .internal_transition(TestTrigger::Mute, |_t: &Transition<_, _>| ())
            .described("Mute microphone")
            .on_entry_from(TestTrigger::Redial, |_t: &Transition<_, _>| ());

        assert_eq!(
            config.entry[0].description.as_deref(),
            Some("Start call timer")
        );
        assert_eq!(config.entry[1].description, None);
        assert_eq!(config.exit[0].description, None);
        assert!(matches!(
            &config.rules[0],
            Rule::Internal {
                description: Some(d),
                ..
            } if d == "Mute microphone"
        ));
        assert!(config.unattached_descriptions.is_empty());
    }

    #[test]
    fn described_after_a_permit_is_unattached() {
        let mut config = StateConfiguration::<TestState, TestTrigger>::new(TestState::OnHold);
        config
            .described("Nothing to describe")
            .on_exit(|_t: &Transition<_, _>| ())
            .permit(TestTrigger::LeftMessage, TestState::OffHook)
            .described("Hang up");

        assert_eq!(config.exit[0].description, None);
        assert_eq!(
            config.unattached_descriptions,
            vec!["Nothing to describe".to_string(), "Hang up".to_string()]
        );
    }

    #[test]
    fn into_representation_keeps_hooks_and_parent() {
        let mut config = StateConfiguration::<TestState, TestTrigger>::new(TestState::OnHold);
        config
            .substate_of(TestState::Connected)
            .on_entry(|_t: &Transition<_, _>| ())
            .on_exit(|_t: &Transition<_, _>| ())
            .described("Stop call timer")
            .permit(TestTrigger::LeftMessage, TestState::OffHook);

        let representation = config.into_representation();

        assert_eq!(representation.parent, Some(TestState::Connected));
        assert_eq!(representation.entry.len(), 1);
        assert_eq!(
            representation.exit[0].description.as_deref(),
            Some("Stop call timer")
        );
        assert!(representation
            .behaviour(&TestTrigger::LeftMessage)
            .is_some());
    }
}
