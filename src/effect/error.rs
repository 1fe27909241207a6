//! Error types for the effect system.
//!
//! [`Failure`] is the alternate-channel payload of the exception-carrying
//! paths (`TryPath` and `TaskPath`). It can hold any error type, so code that
//! crosses from a fallible API into the path algebra does not need to pick a
//! common error enum up front.
//!
//! [`EffectError`] enumerates the failures this crate synthesises itself:
//! timeouts, captured panics, cancellation and so on.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Represents an attempt to block on the runtime where blocking is impossible.
///
/// # Examples
///
/// ```rust
/// use railpath::effect::BlockingError;
///
/// let error = BlockingError::CurrentThreadRuntime;
/// assert!(error.to_string().contains("current-thread runtime"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockingError {
    /// Called from within a current-thread tokio runtime.
    #[error(
        "cannot execute blocking operation in current-thread runtime: \
         block_in_place is only supported in multi-thread runtimes"
    )]
    CurrentThreadRuntime,

    /// Called from within a runtime flavor that is not known to support blocking.
    #[error(
        "cannot execute blocking operation: \
         the runtime flavor is not supported for blocking execution"
    )]
    UnsupportedRuntimeFlavor,
}

/// Represents errors produced by the effect runtime itself.
///
/// # Examples
///
/// ```rust
/// use railpath::effect::EffectError;
/// use std::time::Duration;
///
/// let error = EffectError::Timeout(Duration::from_millis(50));
/// assert_eq!(error.to_string(), "operation timed out after 50ms");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    /// A deferred task did not finish within its time budget.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// User code panicked; the panic was captured with its message.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The task observed a cancellation request before it finished.
    #[error("task was cancelled")]
    Cancelled,

    /// `race` was asked to pick a winner among zero tasks.
    #[error("race requires at least one task")]
    EmptyRace,

    /// A blocking execution was attempted where the runtime forbids it.
    #[error(transparent)]
    Blocking(#[from] BlockingError),

    /// A plain message failure.
    #[error("{0}")]
    Message(String),
}

/// A captured failure: the alternate payload of `TryPath` and `TaskPath`.
///
/// `Failure` is cheap to clone (it shares the underlying error) and is
/// `Send + Sync`, so it can travel between the worker threads that execute
/// deferred tasks.
///
/// Two failures are equal when they share the same underlying error or when
/// their rendered messages are equal.
///
/// # Examples
///
/// ```rust
/// use railpath::effect::{EffectError, Failure};
///
/// let failure = Failure::msg("disk full");
/// assert_eq!(failure.to_string(), "disk full");
///
/// let parse = "x".parse::<i32>().unwrap_err();
/// let failure = Failure::new(parse);
/// assert!(failure.downcast_ref::<std::num::ParseIntError>().is_some());
///
/// assert!(Failure::from(EffectError::Cancelled).is_cancelled());
/// ```
#[derive(Clone)]
pub struct Failure {
    error: Arc<dyn Error + Send + Sync + 'static>,
}

impl Failure {
    /// Wraps an arbitrary error.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            error: Arc::new(error),
        }
    }

    /// Creates a failure carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(EffectError::Message(message.into()))
    }

    /// Creates a failure from a caught panic payload.
    ///
    /// `&str` and `String` payloads keep their message; anything else is
    /// reported as `"Unknown panic"`.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "Unknown panic".to_string()
        };
        Self::new(EffectError::Panicked(message))
    }

    /// Creates a timeout failure.
    pub fn timeout(duration: Duration) -> Self {
        Self::new(EffectError::Timeout(duration))
    }

    /// Creates a cancellation failure.
    pub fn cancelled() -> Self {
        Self::new(EffectError::Cancelled)
    }

    /// Returns the wrapped error.
    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    /// Attempts to view the wrapped error as a concrete type.
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: Error + 'static,
    {
        self.error.downcast_ref::<T>()
    }

    /// Returns the wrapped error if it is one of the runtime's own errors.
    pub fn effect_error(&self) -> Option<&EffectError> {
        self.downcast_ref::<EffectError>()
    }

    /// Returns `true` if this failure is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.effect_error(), Some(EffectError::Timeout(_)))
    }

    /// Returns `true` if this failure is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.effect_error(), Some(EffectError::Cancelled))
    }

    /// Returns `true` if this failure was captured from a panic.
    pub fn is_panic(&self) -> bool {
        matches!(self.effect_error(), Some(EffectError::Panicked(_)))
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, formatter)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Failure").field(&self.error).finish()
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.error, &other.error) || self.to_string() == other.to_string()
    }
}

impl From<EffectError> for Failure {
    fn from(error: EffectError) -> Self {
        Self::new(error)
    }
}

impl From<BlockingError> for Failure {
    fn from(error: BlockingError) -> Self {
        Self::new(EffectError::Blocking(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Error)]
    #[error("inventory lookup failed")]
    struct LookupError {
        #[source]
        cause: std::io::Error,
    }

    #[rstest]
    fn failure_displays_inner_message() {
        assert_eq!(Failure::msg("boom").to_string(), "boom");
    }

    #[rstest]
    fn failure_equality_by_message() {
        assert_eq!(Failure::msg("boom"), Failure::msg("boom"));
        assert_ne!(Failure::msg("boom"), Failure::msg("bang"));
    }

    #[rstest]
    fn failure_clone_shares_error() {
        let failure = Failure::new(std::io::Error::other("io"));
        let cloned = failure.clone();
        assert_eq!(failure, cloned);
        assert!(cloned.downcast_ref::<std::io::Error>().is_some());
    }

    #[rstest]
    fn failure_source_delegates_to_inner() {
        let failure = Failure::new(LookupError {
            cause: std::io::Error::other("socket closed"),
        });
        let source = failure.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("socket closed"));
    }

    #[rstest]
    #[case(Box::new("static message") as Box<dyn Any + Send>, "task panicked: static message")]
    #[case(
        Box::new(String::from("owned message")) as Box<dyn Any + Send>,
        "task panicked: owned message"
    )]
    #[case(Box::new(42_u8) as Box<dyn Any + Send>, "task panicked: Unknown panic")]
    fn failure_from_panic_payload(#[case] payload: Box<dyn Any + Send>, #[case] expected: &str) {
        let failure = Failure::from_panic(payload.as_ref());
        assert!(failure.is_panic());
        assert_eq!(failure.to_string(), expected);
    }

    #[rstest]
    fn effect_error_kinds_are_detected() {
        assert!(Failure::timeout(Duration::from_secs(1)).is_timeout());
        assert!(Failure::cancelled().is_cancelled());
        assert!(!Failure::msg("plain").is_timeout());
    }

    #[rstest]
    fn blocking_error_converts_into_failure() {
        let failure = Failure::from(BlockingError::CurrentThreadRuntime);
        assert_eq!(
            failure.effect_error(),
            Some(&EffectError::Blocking(BlockingError::CurrentThreadRuntime))
        );
    }
}
