//! Validated type for independent error accumulation.
//!
//! Unlike `Result`, `Validated` accumulates every error when two values are
//! combined with [`Validated::zip_with`]. The error type decides how errors
//! merge through its [`Semigroup`] instance; `Vec<E>` keeps them all in
//! insertion order.
//!
//! # Examples
//!
//! ```rust
//! use railpath::control::Validated;
//!
//! let name: Validated<Vec<&str>, &str> = Validated::invalid(vec!["name is empty"]);
//! let age: Validated<Vec<&str>, u32> = Validated::invalid(vec!["age is negative"]);
//!
//! let person = name.zip_with(age, |name, age| (name, age));
//! assert_eq!(
//!     person,
//!     Validated::invalid(vec!["name is empty", "age is negative"])
//! );
//! ```

use crate::typeclass::Semigroup;

/// A validation result that accumulates errors.
///
/// `Validated<E, A>` is either:
/// - `Valid(A)` - a successful validation with a value
/// - `Invalid(E)` - a failed validation with accumulated errors
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Validated<E, A> {
    /// A successful validation result.
    Valid(A),
    /// A failed validation with accumulated errors.
    Invalid(E),
}

impl<E, A> Validated<E, A> {
    /// Creates a valid result.
    #[inline]
    pub const fn valid(value: A) -> Self {
        Self::Valid(value)
    }

    /// Creates an invalid result.
    #[inline]
    pub const fn invalid(error: E) -> Self {
        Self::Invalid(error)
    }

    /// Returns true if this is a valid result.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns true if this is an invalid result.
    #[inline]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Returns a reference to the valid value, if any.
    pub const fn get(&self) -> Option<&A> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    /// Returns a reference to the accumulated errors, if any.
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(error) => Some(error),
        }
    }

    /// Transforms the valid value.
    pub fn map<B, F>(self, function: F) -> Validated<E, B>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Self::Valid(value) => Validated::Valid(function(value)),
            Self::Invalid(error) => Validated::Invalid(error),
        }
    }

    /// Transforms the accumulated errors.
    pub fn map_error<E2, F>(self, function: F) -> Validated<E2, A>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Self::Valid(value) => Validated::Valid(value),
            Self::Invalid(error) => Validated::Invalid(function(error)),
        }
    }

    /// Chains a dependent validation. Short-circuits on the first error.
    pub fn and_then<B, F>(self, function: F) -> Validated<E, B>
    where
        F: FnOnce(A) -> Validated<E, B>,
    {
        match self {
            Self::Valid(value) => function(value),
            Self::Invalid(error) => Validated::Invalid(error),
        }
    }

    /// Combines two independent validations, accumulating both errors.
    pub fn zip_with<B, C, F>(self, other: Validated<E, B>, function: F) -> Validated<E, C>
    where
        E: Semigroup,
        F: FnOnce(A, B) -> C,
    {
        match (self, other) {
            (Self::Valid(left), Validated::Valid(right)) => Validated::Valid(function(left, right)),
            (Self::Invalid(left), Validated::Invalid(right)) => {
                Validated::Invalid(left.combine(right))
            }
            (Self::Invalid(error), Validated::Valid(_))
            | (Self::Valid(_), Validated::Invalid(error)) => Validated::Invalid(error),
        }
    }

    /// Collapses both channels into a single value.
    pub fn fold<B, OnInvalid, OnValid>(self, on_invalid: OnInvalid, on_valid: OnValid) -> B
    where
        OnInvalid: FnOnce(E) -> B,
        OnValid: FnOnce(A) -> B,
    {
        match self {
            Self::Valid(value) => on_valid(value),
            Self::Invalid(error) => on_invalid(error),
        }
    }

    /// Converts to a `Result`.
    ///
    /// # Errors
    ///
    /// Returns `Err(E)` if this is an invalid result.
    pub fn into_result(self) -> Result<A, E> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(error) => Err(error),
        }
    }

    /// Lifts a `Result`, keeping its error as a single invalid entry.
    pub fn from_result(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => Self::Valid(value),
            Err(error) => Self::Invalid(error),
        }
    }

    /// Converts to an `Option`, discarding errors.
    pub fn ok(self) -> Option<A> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }
}

impl<E, A> From<Result<A, E>> for Validated<E, A> {
    fn from(result: Result<A, E>) -> Self {
        Self::from_result(result)
    }
}
