//! The optional-value path.

use super::capability::{Chainable, Combinable, Mappable, Recoverable};
use super::either::EitherPath;

/// A path over `Option<A>`: absence is not an error.
///
/// # Examples
///
/// ```rust
/// use railpath::path::{Chainable, Mappable, Path};
///
/// let doubled = Path::just(5)
///     .map(|x| x * 2)
///     .via(|x| if x > 8 { Path::just(x) } else { Path::nothing() });
/// assert_eq!(doubled.run(), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MaybePath<A> {
    value: Option<A>,
}

impl<A> MaybePath<A> {
    /// Wraps an `Option`.
    #[inline]
    pub const fn new(value: Option<A>) -> Self {
        Self { value }
    }

    /// Returns the underlying `Option`.
    #[inline]
    pub fn run(self) -> Option<A> {
        self.value
    }

    /// Borrows the value, if present.
    #[inline]
    pub const fn as_option(&self) -> Option<&A> {
        self.value.as_ref()
    }

    /// Returns `true` when a value is present.
    #[inline]
    pub const fn is_just(&self) -> bool {
        self.value.is_some()
    }

    /// Returns `true` when no value is present.
    #[inline]
    pub const fn is_nothing(&self) -> bool {
        self.value.is_none()
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
        self.value.unwrap_or_else(supplier)
    }

    /// Collapses both channels into a single value.
    pub fn fold<B, OnNothing, OnJust>(self, on_nothing: OnNothing, on_just: OnJust) -> B
    where
        OnNothing: FnOnce() -> B,
        OnJust: FnOnce(A) -> B,
    {
        self.value.map_or_else(on_nothing, on_just)
    }

    /// Keeps the value only if it satisfies `predicate`.
    #[must_use]
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&A) -> bool,
    {
        Self::new(self.value.filter(predicate))
    }

    /// Gives absence a typed payload, producing an [`EitherPath`].
    ///
    /// ```rust
    /// use railpath::path::Path;
    ///
    /// let missing = Path::nothing::<u8>().map_error(|()| "no value");
    /// assert_eq!(missing.run(), Err("no value"));
    /// ```
    pub fn map_error<E, F>(self, function: F) -> EitherPath<E, A>
    where
        F: FnOnce(()) -> E,
    {
        EitherPath::new(self.value.ok_or_else(|| function(())))
    }

    /// Combines three paths, stopping at the first absence.
    pub fn zip_with3<B, C, D, F>(
        self,
        second: MaybePath<B>,
        third: MaybePath<C>,
        function: F,
    ) -> MaybePath<D>
    where
        F: FnOnce(A, B, C) -> D,
    {
        self.zip_with(second, |a, b| (a, b))
            .zip_with(third, |(a, b), c| function(a, b, c))
    }

    /// Combines four paths, stopping at the first absence.
    pub fn zip_with4<B, C, D, R, F>(
        self,
        second: MaybePath<B>,
        third: MaybePath<C>,
        fourth: MaybePath<D>,
        function: F,
    ) -> MaybePath<R>
    where
        F: FnOnce(A, B, C, D) -> R,
    {
        self.zip_with3(second, third, |a, b, c| (a, b, c))
            .zip_with(fourth, |(a, b, c), d| function(a, b, c, d))
    }
}

impl<A> Mappable for MaybePath<A> {
    type Value = A;
    type Mapped<B> = MaybePath<B>;

    fn map<B, F>(self, function: F) -> MaybePath<B>
    where
        F: FnOnce(A) -> B,
    {
        MaybePath::new(self.value.map(function))
    }

    fn peek<F>(self, observer: F) -> Self
    where
        F: FnOnce(&A),
    {
        if let Some(value) = &self.value {
            observer(value);
        }
        self
    }
}

impl<A> Chainable for MaybePath<A> {
    fn via<B, F>(self, function: F) -> MaybePath<B>
    where
        F: FnOnce(A) -> MaybePath<B>,
    {
        match self.value {
            Some(value) => function(value),
            None => MaybePath::new(None),
        }
    }
}

impl<A> Combinable for MaybePath<A> {
    fn zip_with<B, C, F>(self, other: MaybePath<B>, function: F) -> MaybePath<C>
    where
        F: FnOnce(A, B) -> C,
    {
        MaybePath::new(self.value.zip(other.value).map(|(a, b)| function(a, b)))
    }
}

impl<A> Recoverable for MaybePath<A> {
    type Alternate = ();

    fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(()) -> A,
    {
        Self::new(Some(self.value.unwrap_or_else(|| function(()))))
    }

    fn recover_with<F>(self, function: F) -> Self
    where
        F: FnOnce(()) -> Self,
    {
        match self.value {
            Some(_) => self,
            None => function(()),
        }
    }
}

impl<A> From<Option<A>> for MaybePath<A> {
    fn from(value: Option<A>) -> Self {
        Self::new(value)
    }
}

impl<A> From<MaybePath<A>> for Option<A> {
    fn from(path: MaybePath<A>) -> Self {
        path.run()
    }
}
