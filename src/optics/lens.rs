//! Total optics: a lens always finds its focus.
//!
//! A [`Lens`] reads a field out of a larger value by reference and writes
//! it back by rebuilding the whole value. Paths use lenses through
//! `focus`, which clones the focused field out of the success value.
//!
//! # Laws
//!
//! 1. **GetPut**: `lens.set(source, lens.get(&source).clone()) == source`
//! 2. **PutGet**: `lens.get(&lens.set(source, value)) == &value`
//! 3. **PutPut**: `lens.set(lens.set(source, v1), v2) == lens.set(source, v2)`
//!
//! # Examples
//!
//! ```
//! use railpath::lens;
//! use railpath::optics::Lens;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Account { owner: String, balance: i64 }
//!
//! let balance = lens!(Account, balance);
//! let account = Account { owner: "kim".to_string(), balance: 10 };
//!
//! assert_eq!(*balance.get(&account), 10);
//! let credited = balance.modify(account, |amount| amount + 5);
//! assert_eq!(credited.balance, 15);
//! ```

use std::fmt;
use std::marker::PhantomData;

use super::affine::{LensAsAffine, LensPrismAffine};
use super::prism::Prism;

/// Focuses on exactly one `A` inside an `S`.
pub trait Lens<S, A> {
    /// Borrows the focused value.
    fn get<'a>(&self, source: &'a S) -> &'a A;

    /// Replaces the focused value, returning the rebuilt source.
    fn set(&self, source: S, value: A) -> S;

    /// Applies `function` to a clone of the focus and writes the result back.
    fn modify<F>(&self, source: S, function: F) -> S
    where
        F: FnOnce(A) -> A,
        A: Clone,
    {
        let current = self.get(&source).clone();
        self.set(source, function(current))
    }

    /// Like [`Lens::modify`], but hands `function` a reference instead of a clone.
    fn modify_ref<F>(&self, source: S, function: F) -> S
    where
        F: FnOnce(&A) -> A,
    {
        let replacement = function(self.get(&source));
        self.set(source, replacement)
    }

    /// Chains a lens on the focused value.
    ///
    /// ```
    /// use railpath::lens;
    /// use railpath::optics::Lens;
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Street { name: String }
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Address { street: Street }
    ///
    /// let street_name = lens!(Address, street).compose(lens!(Street, name));
    /// let address = Address { street: Street { name: "Elm".to_string() } };
    /// assert_eq!(street_name.get(&address), "Elm");
    /// ```
    fn compose<B, L>(self, other: L) -> ComposedLens<Self, L, A>
    where
        Self: Sized,
        L: Lens<A, B>,
    {
        ComposedLens::new(self, other)
    }

    /// Chains a prism on the focused value, producing an affine.
    fn compose_prism<B, P>(self, prism: P) -> LensPrismAffine<Self, P, A>
    where
        Self: Sized,
        P: Prism<A, B>,
    {
        LensPrismAffine::new(self, prism)
    }

    /// Views this lens as an affine that is always present.
    fn to_affine(self) -> LensAsAffine<Self, S, A>
    where
        Self: Sized,
    {
        LensAsAffine::new(self)
    }
}

impl<S, A, L> Lens<S, A> for &L
where
    L: Lens<S, A> + ?Sized,
{
    fn get<'a>(&self, source: &'a S) -> &'a A {
        (**self).get(source)
    }

    fn set(&self, source: S, value: A) -> S {
        (**self).set(source, value)
    }
}

/// A lens built from a getter and a setter closure.
///
/// The `lens!` macro expands to one of these.
///
/// ```
/// use railpath::optics::{FunctionLens, Lens};
///
/// let first = FunctionLens::new(
///     |pair: &(i32, &str)| &pair.0,
///     |pair: (i32, &str), value: i32| (value, pair.1),
/// );
/// assert_eq!(first.set((1, "a"), 2), (2, "a"));
/// ```
pub struct FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A,
    St: Fn(S, A) -> S,
{
    getter: G,
    setter: St,
    _marker: PhantomData<fn(S) -> A>,
}

impl<S, A, G, St> FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A,
    St: Fn(S, A) -> S,
{
    /// Creates a lens from a getter and a setter.
    #[must_use]
    pub const fn new(getter: G, setter: St) -> Self {
        Self {
            getter,
            setter,
            _marker: PhantomData,
        }
    }
}

impl<S, A, G, St> Lens<S, A> for FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A,
    St: Fn(S, A) -> S,
{
    fn get<'a>(&self, source: &'a S) -> &'a A {
        (self.getter)(source)
    }

    fn set(&self, source: S, value: A) -> S {
        (self.setter)(source, value)
    }
}

impl<S, A, G, St> Clone for FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A + Clone,
    St: Fn(S, A) -> S + Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.getter.clone(), self.setter.clone())
    }
}

impl<S, A, G, St> fmt::Debug for FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A,
    St: Fn(S, A) -> S,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FunctionLens").finish_non_exhaustive()
    }
}

/// Two lenses chained through an intermediate `A`.
pub struct ComposedLens<L1, L2, A> {
    outer: L1,
    inner: L2,
    _marker: PhantomData<fn() -> A>,
}

impl<L1, L2, A> ComposedLens<L1, L2, A> {
    /// Chains `inner` after `outer`.
    #[must_use]
    pub const fn new(outer: L1, inner: L2) -> Self {
        Self {
            outer,
            inner,
            _marker: PhantomData,
        }
    }
}

impl<S, A, B, L1, L2> Lens<S, B> for ComposedLens<L1, L2, A>
where
    L1: Lens<S, A>,
    L2: Lens<A, B>,
    A: Clone + 'static,
{
    fn get<'a>(&self, source: &'a S) -> &'a B {
        self.inner.get(self.outer.get(source))
    }

    fn set(&self, source: S, value: B) -> S {
        let intermediate = self.outer.get(&source).clone();
        let rebuilt = self.inner.set(intermediate, value);
        self.outer.set(source, rebuilt)
    }
}

impl<L1: Clone, L2: Clone, A> Clone for ComposedLens<L1, L2, A> {
    fn clone(&self) -> Self {
        Self::new(self.outer.clone(), self.inner.clone())
    }
}

impl<L1: fmt::Debug, L2: fmt::Debug, A> fmt::Debug for ComposedLens<L1, L2, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ComposedLens")
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .finish()
    }
}

/// Builds a [`FunctionLens`] for a named struct field.
///
/// ```
/// use railpath::lens;
/// use railpath::optics::Lens;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Wrapper<T> { inner: T }
///
/// let inner = lens!(Wrapper<u8>, inner);
/// assert_eq!(inner.set(Wrapper { inner: 1 }, 2), Wrapper { inner: 2 });
/// ```
#[macro_export]
macro_rules! lens {
    ($struct_type:ident, $field:ident) => {
        $crate::optics::FunctionLens::new(
            |source: &$struct_type| &source.$field,
            |mut source: $struct_type, value| {
                source.$field = value;
                source
            },
        )
    };
    ($struct_type:ident < $($generic:tt),+ >, $field:ident) => {
        $crate::optics::FunctionLens::new(
            |source: &$struct_type<$($generic),+>| &source.$field,
            |mut source: $struct_type<$($generic),+>, value| {
                source.$field = value;
                source
            },
        )
    };
    ($struct_type:path, $field:ident) => {
        $crate::optics::FunctionLens::new(
            |source: &$struct_type| &source.$field,
            |mut source: $struct_type, value| {
                source.$field = value;
                source
            },
        )
    };
}
