use crate::errors::{RedDeerError, RedDeerResult};
use tracing::trace;

/// A boolean-valued probe of UI state, polled by [`WaitUntil`](super::WaitUntil)
/// and [`WaitWhile`](super::WaitWhile).
///
/// `test` takes `&mut self` so a condition may keep state between polls,
/// such as the widget it found or a count it observed last time.
pub trait WaitCondition {
    fn test(&mut self) -> bool;

    fn description(&self) -> String;

    /// Diagnostic attached to a timeout of a wait-until.
    fn error_message_until(&self) -> String {
        format!("{} is not fulfilled", self.description())
    }

    /// Diagnostic attached to a timeout of a wait-while.
    fn error_message_while(&self) -> String {
        format!("{} is still fulfilled", self.description())
    }

    /// A fatal error hit by the last `test`, which ends the wait at once
    /// instead of polling until the timeout.
    fn take_fatal_error(&mut self) -> Option<RedDeerError> {
        None
    }
}

macro_rules! forward_condition {
    ($ty:ty) => {
        impl<C: WaitCondition + ?Sized> WaitCondition for $ty {
            fn test(&mut self) -> bool {
                (**self).test()
            }

            fn description(&self) -> String {
                (**self).description()
            }

            fn error_message_until(&self) -> String {
                (**self).error_message_until()
            }

            fn error_message_while(&self) -> String {
                (**self).error_message_while()
            }

            fn take_fatal_error(&mut self) -> Option<RedDeerError> {
                (**self).take_fatal_error()
            }
        }
    };
}

forward_condition!(&mut C);
forward_condition!(Box<C>);

/// Turns the outcome of a UI probe into a poll result. Non-fatal errors
/// count as "not yet"; fatal ones and malformed matcher input are parked in
/// `fatal` for the wait loop.
pub(crate) fn probe(outcome: RedDeerResult<bool>, fatal: &mut Option<RedDeerError>) -> bool {
    match outcome {
        Ok(value) => value,
        Err(e) if e.is_fatal() || matches!(e, RedDeerError::UnmatchedFormat(_)) => {
            *fatal = Some(e);
            false
        }
        Err(e) => {
            trace!("condition probe failed: {}", e);
            false
        }
    }
}
