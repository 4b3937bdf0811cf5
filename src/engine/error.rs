//! Errors raised while firing triggers.

use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Failure reported by an entry, exit or internal-transition hook.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HookError(Box<dyn Error + Send + Sync>);

impl HookError {
    pub fn new(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self(error.into())
    }

    /// Recover the error returned by the hook.
    pub fn into_inner(self) -> Box<dyn Error + Send + Sync> {
        self.0
    }
}

/// Which kind of hook failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Exit,
    Entry,
    Internal,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exit => f.write_str("Exit"),
            Self::Entry => f.write_str("Entry"),
            Self::Internal => f.write_str("Internal transition"),
        }
    }
}

/// Errors that can occur when firing a trigger
#[derive(Debug, Error)]
pub enum FireError {
    #[error("Trigger '{trigger}' is not permitted in state '{state}'")]
    InvalidTransition { state: String, trigger: String },

    #[error("Trigger '{trigger}' expects {expected}, but was fired with {found}")]
    TriggerPayloadMismatch {
        trigger: String,
        expected: String,
        found: String,
    },

    /// A hook failed. The current state is whatever the engine had assigned
    /// before the failing hook ran.
    #[error("{phase} hook of state '{state}' failed on trigger '{trigger}': {source}")]
    Hook {
        phase: HookPhase,
        state: String,
        trigger: String,
        #[source]
        source: HookError,
    },
}

impl FireError {
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    pub fn is_payload_mismatch(&self) -> bool {
        matches!(self, Self::TriggerPayloadMismatch { .. })
    }
}
