//! Affine optics: a focus that may be absent.
//!
//! An [`Affine`] sits between a lens and a prism. Like a prism its getter
//! can come back empty; like a lens it writes into an existing whole. The
//! usual ways to obtain one are:
//!
//! - a lens followed by a prism ([`Lens::compose_prism`])
//! - any lens, viewed as always present ([`Lens::to_affine`])
//! - an affine followed by a lens, prism or another affine
//! - [`FunctionAffine::new`] from a pair of closures
//!
//! # Laws
//!
//! 1. **GetOptionSet**: if `affine.get_option(&source) == Some(a)` then
//!    `affine.set(source.clone(), a.clone()) == source`
//! 2. **SetGetOption**: if the focus is present, then
//!    `affine.get_option(&affine.set(source, value)) == Some(&value)`
//!
//! # Examples
//!
//! ```
//! use railpath::optics::{Affine, Lens};
//! use railpath::{lens, prism};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Contact { Email(String), Phone(u64) }
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct User { name: String, contact: Contact }
//!
//! let email = lens!(User, contact).compose_prism(prism!(Contact, Email));
//!
//! let mail_user = User { name: "ana".into(), contact: Contact::Email("a@x.io".into()) };
//! assert_eq!(email.get_option(&mail_user).map(String::as_str), Some("a@x.io"));
//!
//! let phone_user = User { name: "bo".into(), contact: Contact::Phone(5551234) };
//! assert_eq!(email.get_option(&phone_user), None);
//! ```

use std::fmt;
use std::marker::PhantomData;

use super::lens::Lens;
use super::prism::Prism;

/// Focuses on zero or one `A` inside an `S`.
pub trait Affine<S, A> {
    /// Borrows the focus if it is present.
    fn get_option<'a>(&self, source: &'a S) -> Option<&'a A>;

    /// Writes `value` into the focus position, returning the rebuilt source.
    fn set(&self, source: S, value: A) -> S;

    /// Rewrites a present focus, or returns `None` when it is absent.
    fn modify_option<F>(&self, source: S, function: F) -> Option<S>
    where
        F: FnOnce(A) -> A,
        A: Clone,
    {
        let current = self.get_option(&source).cloned()?;
        Some(self.set(source, function(current)))
    }

    /// Rewrites a present focus, returning the source unchanged otherwise.
    fn modify<F>(&self, source: S, function: F) -> S
    where
        F: FnOnce(A) -> A,
        A: Clone,
    {
        match self.get_option(&source).cloned() {
            Some(current) => self.set(source, function(current)),
            None => source,
        }
    }

    /// Returns `true` when the focus exists in `source`.
    fn is_present(&self, source: &S) -> bool {
        self.get_option(source).is_some()
    }

    /// Chains another affine on the focus.
    fn compose<B, O>(self, other: O) -> ComposedAffine<Self, O, A>
    where
        Self: Sized,
        O: Affine<A, B>,
    {
        ComposedAffine::new(self, other)
    }

    /// Chains a lens on the focus.
    fn compose_lens<B, L>(self, lens: L) -> ComposedAffine<Self, LensAsAffine<L, A, B>, A>
    where
        Self: Sized,
        L: Lens<A, B>,
    {
        ComposedAffine::new(self, LensAsAffine::new(lens))
    }

    /// Chains a prism on the focus.
    fn compose_prism<B, P>(self, prism: P) -> AffinePrism<Self, P, A>
    where
        Self: Sized,
        P: Prism<A, B>,
    {
        AffinePrism::new(self, prism)
    }
}

impl<S, A, O> Affine<S, A> for &O
where
    O: Affine<S, A> + ?Sized,
{
    fn get_option<'a>(&self, source: &'a S) -> Option<&'a A> {
        (**self).get_option(source)
    }

    fn set(&self, source: S, value: A) -> S {
        (**self).set(source, value)
    }
}

// =============================================================================
// FunctionAffine
// =============================================================================

/// An affine built from a partial getter and a setter.
///
/// ```
/// use railpath::optics::{Affine, FunctionAffine};
///
/// let head = FunctionAffine::new(
///     |items: &Vec<i32>| items.first(),
///     |mut items: Vec<i32>, value: i32| {
///         if let Some(first) = items.first_mut() {
///             *first = value;
///         }
///         items
///     },
/// );
///
/// assert_eq!(head.get_option(&vec![4, 5]), Some(&4));
/// assert_eq!(head.get_option(&Vec::new()), None);
/// assert_eq!(head.set(vec![4, 5], 9), vec![9, 5]);
/// ```
pub struct FunctionAffine<S, A, G, St>
where
    G: Fn(&S) -> Option<&A>,
    St: Fn(S, A) -> S,
{
    getter: G,
    setter: St,
    _marker: PhantomData<fn(S) -> A>,
}

impl<S, A, G, St> FunctionAffine<S, A, G, St>
where
    G: Fn(&S) -> Option<&A>,
    St: Fn(S, A) -> S,
{
    /// Creates an affine from closures.
    #[must_use]
    pub const fn new(getter: G, setter: St) -> Self {
        Self {
            getter,
            setter,
            _marker: PhantomData,
        }
    }
}

impl<S, A, G, St> Affine<S, A> for FunctionAffine<S, A, G, St>
where
    G: Fn(&S) -> Option<&A>,
    St: Fn(S, A) -> S,
{
    fn get_option<'a>(&self, source: &'a S) -> Option<&'a A> {
        (self.getter)(source)
    }

    fn set(&self, source: S, value: A) -> S {
        (self.setter)(source, value)
    }
}

impl<S, A, G, St> Clone for FunctionAffine<S, A, G, St>
where
    G: Fn(&S) -> Option<&A> + Clone,
    St: Fn(S, A) -> S + Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.getter.clone(), self.setter.clone())
    }
}

impl<S, A, G, St> fmt::Debug for FunctionAffine<S, A, G, St>
where
    G: Fn(&S) -> Option<&A>,
    St: Fn(S, A) -> S,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FunctionAffine").finish_non_exhaustive()
    }
}

// =============================================================================
// LensAsAffine
// =============================================================================

/// A lens seen as an affine whose focus is always present.
pub struct LensAsAffine<L, S, A> {
    lens: L,
    _marker: PhantomData<fn(S) -> A>,
}

impl<L, S, A> LensAsAffine<L, S, A> {
    /// Wraps `lens`.
    #[must_use]
    pub const fn new(lens: L) -> Self {
        Self {
            lens,
            _marker: PhantomData,
        }
    }
}

impl<L, S, A> Affine<S, A> for LensAsAffine<L, S, A>
where
    L: Lens<S, A>,
{
    fn get_option<'a>(&self, source: &'a S) -> Option<&'a A> {
        Some(self.lens.get(source))
    }

    fn set(&self, source: S, value: A) -> S {
        self.lens.set(source, value)
    }
}

impl<L: Clone, S, A> Clone for LensAsAffine<L, S, A> {
    fn clone(&self) -> Self {
        Self::new(self.lens.clone())
    }
}

impl<L: fmt::Debug, S, A> fmt::Debug for LensAsAffine<L, S, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LensAsAffine")
            .field("lens", &self.lens)
            .finish()
    }
}

// =============================================================================
// Compositions
// =============================================================================

/// A lens followed by a prism.
///
/// Setting always writes the prism's case through the lens, so a focus
/// that was absent becomes present.
pub struct LensPrismAffine<L, P, A> {
    lens: L,
    prism: P,
    _marker: PhantomData<fn() -> A>,
}

impl<L, P, A> LensPrismAffine<L, P, A> {
    /// Chains `prism` after `lens`.
    #[must_use]
    pub const fn new(lens: L, prism: P) -> Self {
        Self {
            lens,
            prism,
            _marker: PhantomData,
        }
    }
}

impl<S, A, B, L, P> Affine<S, B> for LensPrismAffine<L, P, A>
where
    L: Lens<S, A>,
    P: Prism<A, B>,
    A: 'static,
{
    fn get_option<'a>(&self, source: &'a S) -> Option<&'a B> {
        self.prism.preview(self.lens.get(source))
    }

    fn set(&self, source: S, value: B) -> S {
        self.lens.set(source, self.prism.review(value))
    }
}

impl<L: Clone, P: Clone, A> Clone for LensPrismAffine<L, P, A> {
    fn clone(&self) -> Self {
        Self::new(self.lens.clone(), self.prism.clone())
    }
}

impl<L: fmt::Debug, P: fmt::Debug, A> fmt::Debug for LensPrismAffine<L, P, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LensPrismAffine")
            .field("lens", &self.lens)
            .field("prism", &self.prism)
            .finish()
    }
}

/// Two affines chained through an intermediate `A`.
///
/// Setting through an absent outer focus leaves the source unchanged.
pub struct ComposedAffine<O1, O2, A> {
    outer: O1,
    inner: O2,
    _marker: PhantomData<fn() -> A>,
}

impl<O1, O2, A> ComposedAffine<O1, O2, A> {
    /// Chains `inner` after `outer`.
    #[must_use]
    pub const fn new(outer: O1, inner: O2) -> Self {
        Self {
            outer,
            inner,
            _marker: PhantomData,
        }
    }
}

impl<S, A, B, O1, O2> Affine<S, B> for ComposedAffine<O1, O2, A>
where
    O1: Affine<S, A>,
    O2: Affine<A, B>,
    A: Clone + 'static,
{
    fn get_option<'a>(&self, source: &'a S) -> Option<&'a B> {
        self.outer
            .get_option(source)
            .and_then(|intermediate| self.inner.get_option(intermediate))
    }

    fn set(&self, source: S, value: B) -> S {
        match self.outer.get_option(&source).cloned() {
            Some(intermediate) => {
                let rebuilt = self.inner.set(intermediate, value);
                self.outer.set(source, rebuilt)
            }
            None => source,
        }
    }
}

impl<O1: Clone, O2: Clone, A> Clone for ComposedAffine<O1, O2, A> {
    fn clone(&self) -> Self {
        Self::new(self.outer.clone(), self.inner.clone())
    }
}

impl<O1: fmt::Debug, O2: fmt::Debug, A> fmt::Debug for ComposedAffine<O1, O2, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ComposedAffine")
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .finish()
    }
}

/// An affine followed by a prism.
///
/// Setting writes the prism's case into a present outer focus and leaves
/// the source unchanged when the outer focus is absent.
pub struct AffinePrism<O, P, A> {
    affine: O,
    prism: P,
    _marker: PhantomData<fn() -> A>,
}

impl<O, P, A> AffinePrism<O, P, A> {
    /// Chains `prism` after `affine`.
    #[must_use]
    pub const fn new(affine: O, prism: P) -> Self {
        Self {
            affine,
            prism,
            _marker: PhantomData,
        }
    }
}

impl<S, A, B, O, P> Affine<S, B> for AffinePrism<O, P, A>
where
    O: Affine<S, A>,
    P: Prism<A, B>,
    A: 'static,
{
    fn get_option<'a>(&self, source: &'a S) -> Option<&'a B> {
        self.affine
            .get_option(source)
            .and_then(|intermediate| self.prism.preview(intermediate))
    }

    fn set(&self, source: S, value: B) -> S {
        if self.affine.is_present(&source) {
            self.affine.set(source, self.prism.review(value))
        } else {
            source
        }
    }
}

impl<O: Clone, P: Clone, A> Clone for AffinePrism<O, P, A> {
    fn clone(&self) -> Self {
        Self::new(self.affine.clone(), self.prism.clone())
    }
}

impl<O: fmt::Debug, P: fmt::Debug, A> fmt::Debug for AffinePrism<O, P, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AffinePrism")
            .field("affine", &self.affine)
            .field("prism", &self.prism)
            .finish()
    }
}
