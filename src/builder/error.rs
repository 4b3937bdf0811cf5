//! Configuration errors reported when building a state machine.

use thiserror::Error;

/// A contradiction found in the configuration graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("State '{state}' declares more than one transition for trigger '{trigger}'")]
    DuplicateTransition { state: String, trigger: String },

    #[error(
        "State '{state}' declares trigger '{trigger}' both as a transition and as an internal transition"
    )]
    ConflictingTransition { state: String, trigger: String },

    #[error("State '{state}' is declared a substate of more than one parent: {parents:?}")]
    MultipleParents { state: String, parents: Vec<String> },

    #[error("Substate relationship forms a cycle: {states:?}")]
    SubstateCycle { states: Vec<String> },

    #[error("Trigger '{trigger}' has its parameters set more than once")]
    DuplicateTriggerParameters { trigger: String },

    #[error(
        "State '{state}' binds trigger '{trigger}' with payload {bound}, but the trigger is registered with {}",
        .registered.as_deref().unwrap_or("no payload")
    )]
    ParameterTypeMismatch {
        state: String,
        trigger: String,
        registered: Option<String>,
        bound: String,
    },

    #[error("State '{state}' has a description that follows no hook: '{description}'")]
    UnattachedDescription { state: String, description: String },
}

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid state machine configuration: {}", join(.0))]
    InvalidConfiguration(Vec<ConfigurationError>),
}

impl BuildError {
    /// Every configuration error found.
    pub fn errors(&self) -> &[ConfigurationError] {
        match self {
            Self::InvalidConfiguration(errors) => errors,
        }
    }
}

fn join(errors: &[ConfigurationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_error_lists_every_problem() {
        let err = BuildError::InvalidConfiguration(vec![
            ConfigurationError::DuplicateTransition {
                state: "Connected".to_string(),
                trigger: "LeftMessage".to_string(),
            },
            ConfigurationError::SubstateCycle {
                states: vec!["OnHold".to_string()],
            },
        ]);

        assert_eq!(err.errors().len(), 2);
        assert_eq!(
            err.to_string(),
            "Invalid state machine configuration: State 'Connected' declares more than one \
             transition for trigger 'LeftMessage'; Substate relationship forms a cycle: [\"OnHold\"]"
        );
    }

    #[test]
    fn parameter_mismatch_names_missing_registration() {
        let err = ConfigurationError::ParameterTypeMismatch {
            state: "Ringing".to_string(),
            trigger: "CallDialed".to_string(),
            registered: None,
            bound: "alloc::string::String".to_string(),
        };

        assert!(err.to_string().ends_with("registered with no payload"));
    }
}
