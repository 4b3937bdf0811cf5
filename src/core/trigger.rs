//! Triggers and typed trigger parameters.
//!
//! A trigger is an event identity. Some triggers carry a payload; the payload
//! type is declared once through
//! [`StateMachineBuilder::set_trigger_parameters`](crate::builder::StateMachineBuilder::set_trigger_parameters),
//! which hands back a [`TypedTrigger`] used both to fire the trigger and to
//! bind hooks that read the payload.

use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::marker::PhantomData;

/// Trait for state machine triggers.
///
/// # Example
///
/// ```rust
/// use hsm::core::Trigger;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum CallTrigger {
///     CallDialed,
///     HungUp,
/// }
///
/// impl Trigger for CallTrigger {
///     fn name(&self) -> &str {
///         match self {
///             Self::CallDialed => "CallDialed",
///             Self::HungUp => "HungUp",
///         }
///     }
/// }
/// ```
pub trait Trigger:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the trigger's name for display/logging.
    fn name(&self) -> &str;
}

/// A trigger payload, type-erased for transport through the engine.
///
/// Implemented for every `'static + Debug + Send + Sync` type, so any such
/// value can be used as a trigger parameter.
pub trait Parameter: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<A: Any + Debug + Send + Sync> Parameter for A {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Payload type registered for a trigger.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ParameterType {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
}

impl ParameterType {
    pub(crate) fn of<A: 'static>() -> Self {
        Self {
            id: TypeId::of::<A>(),
            name: std::any::type_name::<A>(),
        }
    }
}

impl PartialEq for ParameterType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Handle to a trigger whose firing requires exactly one payload of type `A`.
///
/// Obtained from
/// [`StateMachineBuilder::set_trigger_parameters`](crate::builder::StateMachineBuilder::set_trigger_parameters).
pub struct TypedTrigger<T, A> {
    trigger: T,
    _payload: PhantomData<fn(A)>,
}

impl<T: Trigger, A: Parameter> TypedTrigger<T, A> {
    pub(crate) fn new(trigger: T) -> Self {
        Self {
            trigger,
            _payload: PhantomData,
        }
    }

    /// The underlying trigger identity.
    pub fn trigger(&self) -> &T {
        &self.trigger
    }

    pub(crate) fn parameter_type(&self) -> ParameterType {
        ParameterType::of::<A>()
    }
}

impl<T: Clone, A> Clone for TypedTrigger<T, A> {
    fn clone(&self) -> Self {
        Self {
            trigger: self.trigger.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T: Debug, A> Debug for TypedTrigger<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedTrigger")
            .field("trigger", &self.trigger)
            .field("payload", &std::any::type_name::<A>())
            .finish()
    }
}
