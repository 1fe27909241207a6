//! The typed-result path.

use super::capability::{Chainable, Combinable, Mappable, Recoverable};

/// A path over `Result<A, E>`: a typed, recoverable error.
///
/// # Examples
///
/// ```rust
/// use railpath::path::{Chainable, Mappable, Path, Recoverable};
///
/// fn parse(input: &str) -> railpath::path::EitherPath<String, i32> {
///     Path::either(input.parse::<i32>().map_err(|error| error.to_string()))
/// }
///
/// let total = parse("40").via(|n| parse("2").map(|m| n + m));
/// assert_eq!(total.run(), Ok(42));
///
/// let fallback = parse("x").recover(|_| 0);
/// assert_eq!(fallback.run(), Ok(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EitherPath<E, A> {
    value: Result<A, E>,
}

impl<E, A> EitherPath<E, A> {
    /// Wraps a `Result`.
    #[inline]
    pub const fn new(value: Result<A, E>) -> Self {
        Self { value }
    }

    /// Returns the underlying `Result`.
    ///
    /// # Errors
    ///
    /// Returns `Err(E)` when the path is on the error channel.
    #[inline]
    pub fn run(self) -> Result<A, E> {
        self.value
    }

    /// Borrows the underlying `Result`.
    #[inline]
    pub const fn as_result(&self) -> Result<&A, &E> {
        self.value.as_ref()
    }

    /// Returns `true` on the success channel.
    #[inline]
    pub const fn is_right(&self) -> bool {
        self.value.is_ok()
    }

    /// Returns `true` on the error channel.
    #[inline]
    pub const fn is_left(&self) -> bool {
        self.value.is_err()
    }

    /// Returns the value or `default`.
    pub fn get_or_else(self, default: A) -> A {
        self.value.unwrap_or(default)
    }

    /// Returns the value or computes one.
    pub fn get_or_else_with<F>(self, supplier: F) -> A
    where
        F: FnOnce() -> A,
    {
        self.value.unwrap_or_else(|_| supplier())
    }

    /// Collapses both channels into a single value.
    pub fn fold<B, OnLeft, OnRight>(self, on_left: OnLeft, on_right: OnRight) -> B
    where
        OnLeft: FnOnce(E) -> B,
        OnRight: FnOnce(A) -> B,
    {
        self.value.map_or_else(on_left, on_right)
    }

    /// Exchanges the two channels.
    pub fn swap(self) -> EitherPath<A, E> {
        EitherPath::new(match self.value {
            Ok(value) => Err(value),
            Err(error) => Ok(error),
        })
    }

    /// Transforms the error, leaving a success untouched.
    pub fn map_error<E2, F>(self, function: F) -> EitherPath<E2, A>
    where
        F: FnOnce(E) -> E2,
    {
        EitherPath::new(self.value.map_err(function))
    }

    /// Observes the error without changing the path.
    #[must_use]
    pub fn peek_error<F>(self, observer: F) -> Self
    where
        F: FnOnce(&E),
    {
        Self::new(self.value.inspect_err(observer))
    }

    /// Combines three paths, stopping at the first error.
    pub fn zip_with3<B, C, D, F>(
        self,
        second: EitherPath<E, B>,
        third: EitherPath<E, C>,
        function: F,
    ) -> EitherPath<E, D>
    where
        F: FnOnce(A, B, C) -> D,
    {
        self.zip_with(second, |a, b| (a, b))
            .zip_with(third, |(a, b), c| function(a, b, c))
    }

    /// Combines four paths, stopping at the first error.
    pub fn zip_with4<B, C, D, R, F>(
        self,
        second: EitherPath<E, B>,
        third: EitherPath<E, C>,
        fourth: EitherPath<E, D>,
        function: F,
    ) -> EitherPath<E, R>
    where
        F: FnOnce(A, B, C, D) -> R,
    {
        self.zip_with3(second, third, |a, b, c| (a, b, c))
            .zip_with(fourth, |(a, b, c), d| function(a, b, c, d))
    }
}

impl<E, A> Mappable for EitherPath<E, A> {
    type Value = A;
    type Mapped<B> = EitherPath<E, B>;

    fn map<B, F>(self, function: F) -> EitherPath<E, B>
    where
        F: FnOnce(A) -> B,
    {
        EitherPath::new(self.value.map(function))
    }

    fn peek<F>(self, observer: F) -> Self
    where
        F: FnOnce(&A),
    {
        Self::new(self.value.inspect(observer))
    }
}

impl<E, A> Chainable for EitherPath<E, A> {
    fn via<B, F>(self, function: F) -> EitherPath<E, B>
    where
        F: FnOnce(A) -> EitherPath<E, B>,
    {
        match self.value {
            Ok(value) => function(value),
            Err(error) => EitherPath::new(Err(error)),
        }
    }
}

impl<E, A> Combinable for EitherPath<E, A> {
    fn zip_with<B, C, F>(self, other: EitherPath<E, B>, function: F) -> EitherPath<E, C>
    where
        F: FnOnce(A, B) -> C,
    {
        let left = match self.value {
            Ok(value) => value,
            Err(error) => return EitherPath::new(Err(error)),
        };
        EitherPath::new(other.value.map(|right| function(left, right)))
    }
}

impl<E, A> Recoverable for EitherPath<E, A> {
    type Alternate = E;

    fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(E) -> A,
    {
        Self::new(Ok(self.value.unwrap_or_else(function)))
    }

    fn recover_with<F>(self, function: F) -> Self
    where
        F: FnOnce(E) -> Self,
    {
        match self.value {
            Ok(value) => Self::new(Ok(value)),
            Err(error) => function(error),
        }
    }
}

impl<E, A> From<Result<A, E>> for EitherPath<E, A> {
    fn from(value: Result<A, E>) -> Self {
        Self::new(value)
    }
}

impl<E, A> From<EitherPath<E, A>> for Result<A, E> {
    fn from(path: EitherPath<E, A>) -> Self {
        path.run()
    }
}
