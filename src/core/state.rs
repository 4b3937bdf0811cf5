//! Core State trait for state machine states.
//!
//! States are opaque, comparable identities drawn from a closed set,
//! usually a fieldless enum.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: States are copied into transition records and snapshots
/// - `Eq` + `Hash`: States key the configuration graph
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States appear in serializable snapshots
///
/// # Example
///
/// ```rust
/// use hsm::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum CallState {
///     OffHook,
///     Ringing,
///     Connected,
/// }
///
/// impl State for CallState {
///     fn name(&self) -> &str {
///         match self {
///             Self::OffHook => "OffHook",
///             Self::Ringing => "Ringing",
///             Self::Connected => "Connected",
///         }
///     }
/// }
///
/// assert_eq!(CallState::Ringing.name(), "Ringing");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Busy,
        Done,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Busy => "Busy",
                Self::Done => "Done",
            }
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Busy.name(), "Busy");
        assert_eq!(TestState::Done.name(), "Done");
    }

    #[test]
    fn states_can_key_hash_collections() {
        let set: HashSet<TestState> = [TestState::Idle, TestState::Busy, TestState::Idle]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Busy;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
