//! The accumulating-result path.

use super::capability::{Accumulating, Chainable, Combinable, Mappable, Recoverable};
use crate::control::Validated;
use crate::typeclass::Semigroup;

/// A path over [`Validated`]: independent failures are collected.
///
/// `via` short-circuits like every other path because the next step
/// depends on the current value. Combining independent validations with
/// `zip_with` and friends inspects both sides and merges errors with
/// `E`'s [`Semigroup`].
///
/// # Examples
///
/// ```rust
/// use railpath::path::{Combinable, Path, ValidationPath};
///
/// fn name(input: &str) -> ValidationPath<Vec<String>, String> {
///     if input.is_empty() {
///         Path::invalid(vec!["name is empty".to_string()])
///     } else {
///         Path::valid(input.to_string())
///     }
/// }
///
/// fn age(input: u32) -> ValidationPath<Vec<String>, u32> {
///     if input < 18 {
///         Path::invalid(vec!["too young".to_string()])
///     } else {
///         Path::valid(input)
///     }
/// }
///
/// let rejected = name("").zip_with(age(12), |name, age| (name, age));
/// assert_eq!(
///     rejected.run().error(),
///     Some(&vec!["name is empty".to_string(), "too young".to_string()])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ValidationPath<E, A> {
    value: Validated<E, A>,
}

impl<E, A> ValidationPath<E, A> {
    /// Wraps a `Validated`.
    #[inline]
    pub const fn new(value: Validated<E, A>) -> Self {
        Self { value }
    }

    /// Returns the underlying `Validated`.
    #[inline]
    pub fn run(self) -> Validated<E, A> {
        self.value
    }

    /// Borrows the underlying `Validated`.
    #[inline]
    pub const fn as_validated(&self) -> &Validated<E, A> {
        &self.value
    }

    /// Returns `true` when the value is valid.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.value.is_valid()
    }

    /// Returns `true` when errors were collected.
    #[inline]
    pub const fn is_invalid(&self) -> bool {
        self.value.is_invalid()
    }

    /// Returns the value or `default`.
    pub fn get_or_else(self, default: A) -> A {
        self.value.fold(|_| default, |value| value)
    }

    /// Returns the value or computes one.
    pub fn get_or_else_with<F>(self, supplier: F) -> A
    where
        F: FnOnce() -> A,
    {
        self.value.fold(|_| supplier(), |value| value)
    }

    /// Collapses both channels into a single value.
    pub fn fold<B, OnInvalid, OnValid>(self, on_invalid: OnInvalid, on_valid: OnValid) -> B
    where
        OnInvalid: FnOnce(E) -> B,
        OnValid: FnOnce(A) -> B,
    {
        self.value.fold(on_invalid, on_valid)
    }

    /// Transforms the accumulated errors.
    pub fn map_error<E2, F>(self, function: F) -> ValidationPath<E2, A>
    where
        F: FnOnce(E) -> E2,
    {
        ValidationPath::new(self.value.map_error(function))
    }

    /// Observes the accumulated errors without changing the path.
    #[must_use]
    pub fn peek_invalid<F>(self, observer: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Some(error) = self.value.error() {
            observer(error);
        }
        self
    }
}

impl<E: Semigroup, A> ValidationPath<E, A> {
    /// Combines three validations, accumulating every error.
    pub fn zip_with3<B, C, D, F>(
        self,
        second: ValidationPath<E, B>,
        third: ValidationPath<E, C>,
        function: F,
    ) -> ValidationPath<E, D>
    where
        F: FnOnce(A, B, C) -> D,
    {
        self.zip_with3_accum(second, third, function)
    }

    /// Combines four validations, accumulating every error.
    pub fn zip_with4<B, C, D, R, F>(
        self,
        second: ValidationPath<E, B>,
        third: ValidationPath<E, C>,
        fourth: ValidationPath<E, D>,
        function: F,
    ) -> ValidationPath<E, R>
    where
        F: FnOnce(A, B, C, D) -> R,
    {
        self.zip_with4_accum(second, third, fourth, function)
    }

    /// Combines three validations, accumulating every error in argument order.
    pub fn zip_with3_accum<B, C, D, F>(
        self,
        second: ValidationPath<E, B>,
        third: ValidationPath<E, C>,
        function: F,
    ) -> ValidationPath<E, D>
    where
        F: FnOnce(A, B, C) -> D,
    {
        self.zip_with_accum(second, |a, b| (a, b))
            .zip_with_accum(third, |(a, b), c| function(a, b, c))
    }

    /// Combines four validations, accumulating every error in argument order.
    pub fn zip_with4_accum<B, C, D, R, F>(
        self,
        second: ValidationPath<E, B>,
        third: ValidationPath<E, C>,
        fourth: ValidationPath<E, D>,
        function: F,
    ) -> ValidationPath<E, R>
    where
        F: FnOnce(A, B, C, D) -> R,
    {
        self.zip_with3_accum(second, third, |a, b, c| (a, b, c))
            .zip_with_accum(fourth, |(a, b, c), d| function(a, b, c, d))
    }

    /// Validates a whole collection, collecting every value or every error.
    ///
    /// ```rust
    /// use railpath::path::{Path, ValidationPath};
    ///
    /// let checks: Vec<ValidationPath<Vec<&str>, i32>> =
    ///     vec![Path::valid(1), Path::invalid(vec!["two"]), Path::invalid(vec!["three"])];
    /// assert_eq!(ValidationPath::sequence(checks).run().error(), Some(&vec!["two", "three"]));
    /// ```
    pub fn sequence<I>(paths: I) -> ValidationPath<E, Vec<A>>
    where
        I: IntoIterator<Item = Self>,
    {
        paths
            .into_iter()
            .fold(ValidationPath::new(Validated::valid(Vec::new())), |collected, path| {
                collected.zip_with_accum(path, |mut values, value| {
                    values.push(value);
                    values
                })
            })
    }
}

impl<E, A> Mappable for ValidationPath<E, A> {
    type Value = A;
    type Mapped<B> = ValidationPath<E, B>;

    fn map<B, F>(self, function: F) -> ValidationPath<E, B>
    where
        F: FnOnce(A) -> B,
    {
        ValidationPath::new(self.value.map(function))
    }

    fn peek<F>(self, observer: F) -> Self
    where
        F: FnOnce(&A),
    {
        if let Some(value) = self.value.get() {
            observer(value);
        }
        self
    }
}

impl<E, A> Chainable for ValidationPath<E, A> {
    fn via<B, F>(self, function: F) -> ValidationPath<E, B>
    where
        F: FnOnce(A) -> ValidationPath<E, B>,
    {
        ValidationPath::new(self.value.and_then(|value| function(value).run()))
    }
}

impl<E: Semigroup, A> Combinable for ValidationPath<E, A> {
    fn zip_with<B, C, F>(self, other: ValidationPath<E, B>, function: F) -> ValidationPath<E, C>
    where
        F: FnOnce(A, B) -> C,
    {
        self.zip_with_accum(other, function)
    }
}

impl<E, A> Recoverable for ValidationPath<E, A> {
    type Alternate = E;

    fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(E) -> A,
    {
        Self::new(Validated::valid(self.value.fold(function, |value| value)))
    }

    fn recover_with<F>(self, function: F) -> Self
    where
        F: FnOnce(E) -> Self,
    {
        match self.value {
            Validated::Valid(value) => Self::new(Validated::Valid(value)),
            Validated::Invalid(error) => function(error),
        }
    }
}

impl<E: Semigroup, A> Accumulating for ValidationPath<E, A> {
    type Error = E;

    fn zip_with_accum<B, C, F>(
        self,
        other: ValidationPath<E, B>,
        function: F,
    ) -> ValidationPath<E, C>
    where
        F: FnOnce(A, B) -> C,
    {
        ValidationPath::new(self.value.zip_with(other.value, function))
    }

    fn and_also<B>(self, other: ValidationPath<E, B>) -> Self {
        self.zip_with_accum(other, |kept, _| kept)
    }

    fn and_then_keep<B>(self, other: ValidationPath<E, B>) -> ValidationPath<E, B> {
        self.zip_with_accum(other, |_, kept| kept)
    }
}

impl<E, A> From<Validated<E, A>> for ValidationPath<E, A> {
    fn from(value: Validated<E, A>) -> Self {
        Self::new(value)
    }
}

impl<E, A> From<ValidationPath<E, A>> for Validated<E, A> {
    fn from(path: ValidationPath<E, A>) -> Self {
        path.run()
    }
}
