//! Try type - the outcome of code that may fail or panic.
//!
//! `Try<A>` is either `Success(A)` or `Failure(Failure)`. It sits at the
//! boundary between the path algebra and code that reports problems by
//! returning `Err` or by panicking: both are captured into the failure
//! channel instead of propagating.
//!
//! # Examples
//!
//! ```rust
//! use railpath::control::Try;
//!
//! let parsed = Try::of(|| "42".parse::<i32>());
//! assert_eq!(parsed.get_or_else(0), 42);
//!
//! let broken = Try::of(|| "forty-two".parse::<i32>());
//! assert!(broken.is_failure());
//!
//! let panicked = Try::catching(|| -> i32 { panic!("boom") });
//! assert!(panicked.failure_ref().is_some_and(|failure| failure.is_panic()));
//! ```

use std::error::Error;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::effect::Failure;

/// The result of a computation at a thrown-code boundary.
///
/// # Type Parameters
///
/// * `A` - The type of the success value
///
/// # Monad Laws
///
/// 1. **Left Identity**: `Try::success(a).flat_map(f) == f(a)`
/// 2. **Right Identity**: `m.flat_map(Try::success) == m`
/// 3. **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
#[derive(Debug, Clone, PartialEq)]
pub enum Try<A> {
    /// The computation produced a value.
    Success(A),
    /// The computation returned an error or panicked.
    Failure(Failure),
}

impl<A> Try<A> {
    /// Creates a successful `Try`.
    #[inline]
    pub const fn success(value: A) -> Self {
        Self::Success(value)
    }

    /// Creates a failed `Try`.
    #[inline]
    pub const fn failure(failure: Failure) -> Self {
        Self::Failure(failure)
    }

    /// Runs a fallible closure, capturing its `Err` as a failure.
    ///
    /// Panics raised by the closure are captured as well.
    pub fn of<F, E>(action: F) -> Self
    where
        F: FnOnce() -> Result<A, E>,
        E: Error + Send + Sync + 'static,
    {
        match catch_unwind(AssertUnwindSafe(action)) {
            Ok(Ok(value)) => Self::Success(value),
            Ok(Err(error)) => Self::Failure(Failure::new(error)),
            Err(payload) => Self::Failure(Failure::from_panic(payload.as_ref())),
        }
    }

    /// Runs an infallible closure, capturing a panic as a failure.
    pub fn catching<F>(action: F) -> Self
    where
        F: FnOnce() -> A,
    {
        match catch_unwind(AssertUnwindSafe(action)) {
            Ok(value) => Self::Success(value),
            Err(payload) => Self::Failure(Failure::from_panic(payload.as_ref())),
        }
    }

    /// Returns `true` if this is a `Success`.
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` if this is a `Failure`.
    #[inline]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns a reference to the success value, if any.
    pub const fn get(&self) -> Option<&A> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Returns a reference to the failure, if any.
    pub const fn failure_ref(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Transforms the success value.
    ///
    /// A panic inside `function` is captured as a failure.
    pub fn map<B, F>(self, function: F) -> Try<B>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Self::Success(value) => Try::catching(move || function(value)),
            Self::Failure(failure) => Try::Failure(failure),
        }
    }

    /// Chains a computation that itself produces a `Try`.
    ///
    /// A panic inside `function` is captured as a failure.
    pub fn flat_map<B, F>(self, function: F) -> Try<B>
    where
        F: FnOnce(A) -> Try<B>,
    {
        match self {
            Self::Success(value) => match catch_unwind(AssertUnwindSafe(move || function(value))) {
                Ok(next) => next,
                Err(payload) => Try::Failure(Failure::from_panic(payload.as_ref())),
            },
            Self::Failure(failure) => Try::Failure(failure),
        }
    }

    /// Replaces a failure with a value computed from it.
    pub fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> A,
    {
        match self {
            Self::Success(value) => Self::Success(value),
            Self::Failure(failure) => Self::Success(function(failure)),
        }
    }

    /// Transforms the failure, leaving a success untouched.
    pub fn map_failure<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> Failure,
    {
        match self {
            Self::Success(value) => Self::Success(value),
            Self::Failure(failure) => Self::Failure(function(failure)),
        }
    }

    /// Collapses both channels into a single value.
    pub fn fold<B, OnFailure, OnSuccess>(self, on_failure: OnFailure, on_success: OnSuccess) -> B
    where
        OnFailure: FnOnce(Failure) -> B,
        OnSuccess: FnOnce(A) -> B,
    {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(failure) => on_failure(failure),
        }
    }

    /// Returns the success value or `default`.
    pub fn get_or_else(self, default: A) -> A {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => default,
        }
    }

    /// Converts into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the captured `Failure` if this is a `Failure`.
    pub fn into_result(self) -> Result<A, Failure> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(failure) => Err(failure),
        }
    }

    /// Converts into an `Option`, discarding the failure.
    pub fn ok(self) -> Option<A> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }
}

impl<A> From<Result<A, Failure>> for Try<A> {
    fn from(result: Result<A, Failure>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(failure) => Self::Failure(failure),
        }
    }
}

impl<A> From<Try<A>> for Result<A, Failure> {
    fn from(value: Try<A>) -> Self {
        value.into_result()
    }
}
