//! The exception-result path.

use super::capability::{Chainable, Combinable, Mappable, Recoverable};
use super::either::EitherPath;
use crate::control::Try;
use crate::effect::Failure;

/// A path over [`Try`]: a captured error or panic.
///
/// `map` and `via` capture panics raised by their functions; `peek` does
/// not, so a broken observer is never mistaken for a failed computation.
///
/// # Examples
///
/// ```rust
/// use railpath::path::{Mappable, Path};
///
/// let parsed = Path::try_of(|| "7".parse::<i32>()).map(|n| n * 6);
/// assert_eq!(parsed.get_or_else(0), 42);
///
/// let broken = Path::try_of(|| "seven".parse::<i32>());
/// assert!(broken.is_failure());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TryPath<A> {
    value: Try<A>,
}

impl<A> TryPath<A> {
    /// Wraps a `Try`.
    #[inline]
    pub const fn new(value: Try<A>) -> Self {
        Self { value }
    }

    /// Returns the underlying `Try`.
    #[inline]
    pub fn run(self) -> Try<A> {
        self.value
    }

    /// Borrows the underlying `Try`.
    #[inline]
    pub const fn as_try(&self) -> &Try<A> {
        &self.value
    }

    /// Returns `true` on the success channel.
    #[inline]
    pub const fn is_success(&self) -> bool {
        self.value.is_success()
    }

    /// Returns `true` on the failure channel.
    #[inline]
    pub const fn is_failure(&self) -> bool {
        self.value.is_failure()
    }

    /// Returns the value or `default`.
    pub fn get_or_else(self, default: A) -> A {
        self.value.get_or_else(default)
    }

    /// Returns the value or computes one.
    pub fn get_or_else_with<F>(self, supplier: F) -> A
    where
        F: FnOnce() -> A,
    {
        self.value.fold(|_| supplier(), |value| value)
    }

    /// Collapses both channels into a single value.
    pub fn fold<B, OnFailure, OnSuccess>(self, on_failure: OnFailure, on_success: OnSuccess) -> B
    where
        OnFailure: FnOnce(Failure) -> B,
        OnSuccess: FnOnce(A) -> B,
    {
        self.value.fold(on_failure, on_success)
    }

    /// Observes the failure without changing the path.
    #[must_use]
    pub fn peek_failure<F>(self, observer: F) -> Self
    where
        F: FnOnce(&Failure),
    {
        if let Some(failure) = self.value.failure_ref() {
            observer(failure);
        }
        self
    }

    /// Rewrites the failure, staying on this path.
    #[must_use]
    pub fn map_failure<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> Failure,
    {
        Self::new(self.value.map_failure(function))
    }

    /// Turns the failure into a typed error, producing an [`EitherPath`].
    pub fn map_error<E, F>(self, function: F) -> EitherPath<E, A>
    where
        F: FnOnce(Failure) -> E,
    {
        EitherPath::new(self.value.into_result().map_err(function))
    }

    /// Combines three paths, stopping at the first failure.
    pub fn zip_with3<B, C, D, F>(
        self,
        second: TryPath<B>,
        third: TryPath<C>,
        function: F,
    ) -> TryPath<D>
    where
        F: FnOnce(A, B, C) -> D,
    {
        self.zip_with(second, |a, b| (a, b))
            .zip_with(third, |(a, b), c| function(a, b, c))
    }

    /// Combines four paths, stopping at the first failure.
    pub fn zip_with4<B, C, D, R, F>(
        self,
        second: TryPath<B>,
        third: TryPath<C>,
        fourth: TryPath<D>,
        function: F,
    ) -> TryPath<R>
    where
        F: FnOnce(A, B, C, D) -> R,
    {
        self.zip_with3(second, third, |a, b, c| (a, b, c))
            .zip_with(fourth, |(a, b, c), d| function(a, b, c, d))
    }
}

impl<A> Mappable for TryPath<A> {
    type Value = A;
    type Mapped<B> = TryPath<B>;

    fn map<B, F>(self, function: F) -> TryPath<B>
    where
        F: FnOnce(A) -> B,
    {
        TryPath::new(self.value.map(function))
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

impl<A> Chainable for TryPath<A> {
    fn via<B, F>(self, function: F) -> TryPath<B>
    where
        F: FnOnce(A) -> TryPath<B>,
    {
        TryPath::new(self.value.flat_map(|value| function(value).run()))
    }
}

impl<A> Combinable for TryPath<A> {
    fn zip_with<B, C, F>(self, other: TryPath<B>, function: F) -> TryPath<C>
    where
        F: FnOnce(A, B) -> C,
    {
        self.via(|left| other.map(|right| function(left, right)))
    }
}

impl<A> Recoverable for TryPath<A> {
    type Alternate = Failure;

    fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> A,
    {
        Self::new(self.value.recover(function))
    }

    fn recover_with<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> Self,
    {
        match self.value {
            Try::Success(value) => Self::new(Try::Success(value)),
            Try::Failure(failure) => function(failure),
        }
    }
}

impl<A> From<Try<A>> for TryPath<A> {
    fn from(value: Try<A>) -> Self {
        Self::new(value)
    }
}

impl<A> From<TryPath<A>> for Try<A> {
    fn from(path: TryPath<A>) -> Self {
        path.run()
    }
}
