//! Build-time validation of the configuration graph.
//!
//! Uses Stillwater's `Validation` so that every problem in the graph is
//! reported in one pass instead of stopping at the first.

use crate::builder::configuration::StateConfiguration;
use crate::builder::error::ConfigurationError;
use crate::core::{ParameterType, State, Trigger};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub(crate) type Check = Validation<(), NonEmptyVec<ConfigurationError>>;

fn ensure(ok: bool, error: impl FnOnce() -> ConfigurationError) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(error())
    }
}

/// Validate the whole graph, accumulating ALL configuration errors.
pub(crate) fn validate<S: State, T: Trigger>(
    states: &[StateConfiguration<S, T>],
    parameters: &[(T, ParameterType)],
) -> Check {
    let mut checks = check_parameters(parameters);

    for config in states {
        checks.extend(check_rules(config));
        checks.extend(check_parents(config));
        checks.extend(check_typed_bindings(config, parameters));
        checks.extend(check_descriptions(config));
    }
    checks.extend(check_cycles(states));

    Validation::all_vec(checks).map(|_| ())
}

/// One payload type per trigger.
fn check_parameters<T: Trigger>(parameters: &[(T, ParameterType)]) -> Vec<Check> {
    parameters
        .iter()
        .enumerate()
        .map(|(i, (trigger, _))| {
            let first = parameters.iter().position(|(t, _)| t == trigger) == Some(i);
            ensure(first, || ConfigurationError::DuplicateTriggerParameters {
                trigger: trigger.name().to_string(),
            })
        })
        .collect()
}

/// At most one rule per (state, trigger), and never both a transition and an
/// internal transition.
fn check_rules<S: State, T: Trigger>(config: &StateConfiguration<S, T>) -> Vec<Check> {
    config
        .rules
        .iter()
        .enumerate()
        .filter_map(|(i, rule)| {
            let earlier = config.rules[..i]
                .iter()
                .find(|r| r.trigger() == rule.trigger())?;
            let state = config.state.name().to_string();
            let trigger = rule.trigger().name().to_string();
            Some(ensure(false, || {
                if earlier.is_internal() == rule.is_internal() {
                    ConfigurationError::DuplicateTransition { state, trigger }
                } else {
                    ConfigurationError::ConflictingTransition { state, trigger }
                }
            }))
        })
        .collect()
}

fn check_parents<S: State, T: Trigger>(config: &StateConfiguration<S, T>) -> Vec<Check> {
    let error = || ConfigurationError::MultipleParents {
        state: config.state.name().to_string(),
        parents: config
            .parents
            .iter()
            .map(|p| p.name().to_string())
            .collect(),
    };
    vec![ensure(config.parents.len() <= 1, error)]
}

/// Typed hooks must agree with the payload type registered for their trigger.
fn check_typed_bindings<S: State, T: Trigger>(
    config: &StateConfiguration<S, T>,
    parameters: &[(T, ParameterType)],
) -> Vec<Check> {
    config
        .typed_bindings
        .iter()
        .map(|(trigger, bound)| {
            let registered = parameters
                .iter()
                .find(|(t, _)| t == trigger)
                .map(|(_, p)| *p);
            ensure(registered == Some(*bound), || {
                ConfigurationError::ParameterTypeMismatch {
                    state: config.state.name().to_string(),
                    trigger: trigger.name().to_string(),
                    registered: registered.map(|p| p.name.to_string()),
                    bound: bound.name.to_string(),
                }
            })
        })
        .collect()
}

/// Every description must label a hook.
fn check_descriptions<S: State, T: Trigger>(config: &StateConfiguration<S, T>) -> Vec<Check> {
    config
        .unattached_descriptions
        .iter()
        .map(|description| {
            Validation::fail(ConfigurationError::UnattachedDescription {
                state: config.state.name().to_string(),
                description: description.clone(),
            })
        })
        .collect()
}

/// Following parent links from any state must terminate.
///
/// Each cycle is reported once, from its earliest-configured member.
fn check_cycles<S: State, T: Trigger>(states: &[StateConfiguration<S, T>]) -> Vec<Check> {
    let parent_of = |state: &S| {
        states
            .iter()
            .find(|c| &c.state == state)
            .and_then(|c| c.parents.first())
    };
    let position = |state: &S| states.iter().position(|c| &c.state == state);

    states
        .iter()
        .enumerate()
        .filter_map(|(index, config)| {
            let mut path = vec![config.state.clone()];
            let mut current = parent_of(&config.state);
            while let Some(parent) = current {
                if parent == &config.state {
                    let reported_here = path.iter().filter_map(position).all(|p| p >= index);
                    return reported_here.then(|| {
                        ensure(false, || ConfigurationError::SubstateCycle {
                            states: path.iter().map(|s| s.name().to_string()).collect(),
                        })
                    });
                }
                if path.contains(parent) {
                    // Leads into a cycle that does not include this state.
                    return None;
                }
                path.push(parent.clone());
                current = parent_of(parent);
            }
            None
        })
        .collect()
}
