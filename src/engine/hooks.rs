//! Boxed hook callables stored in the configuration graph.

use crate::core::{Parameter, State, Transition, Trigger};
use crate::engine::error::HookError;
use std::error::Error;

/// Return types accepted from entry, exit and internal-transition hooks.
///
/// A hook may return `()` when it cannot fail, or `Result<(), E>` to abort the
/// rest of the `fire` call with [`FireError::Hook`](crate::engine::FireError::Hook).
pub trait HookOutput {
    fn into_result(self) -> Result<(), HookError>;
}

impl HookOutput for () {
    fn into_result(self) -> Result<(), HookError> {
        Ok(())
    }
}

impl<E> HookOutput for Result<(), E>
where
    E: Into<Box<dyn Error + Send + Sync>>,
{
    fn into_result(self) -> Result<(), HookError> {
        self.map_err(HookError::new)
    }
}

pub(crate) type Action<S, T> = Box<dyn FnMut(&Transition<S, T>) -> Result<(), HookError> + Send>;

pub(crate) type Observer<S, T> = Box<dyn FnMut(&Transition<S, T>) + Send>;

pub(crate) fn action<S, T, F, R>(mut hook: F) -> Action<S, T>
where
    S: State,
    T: Trigger,
    F: FnMut(&Transition<S, T>) -> R + Send + 'static,
    R: HookOutput,
{
    Box::new(move |transition: &Transition<S, T>| {
        hook(transition).into_result()
    })
}

/// Wrap a hook that reads the trigger payload as `A`.
pub(crate) fn typed_action<S, T, A, F, R>(mut hook: F) -> Action<S, T>
where
    S: State,
    T: Trigger,
    A: Parameter,
    F: FnMut(&A, &Transition<S, T>) -> R + Send + 'static,
    R: HookOutput,
{
    Box::new(move |transition: &Transition<S, T>| {
        match transition.parameter::<A>() {
            Some(payload) => hook(payload, transition).into_result(),
            None => Err(HookError::new(format!(
                "trigger '{}' carried no payload of type {}",
                transition.trigger.name(),
                std::any::type_name::<A>()
            ))),
        }
    })
}
