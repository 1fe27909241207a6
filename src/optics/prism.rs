//! Prisms: optics for one case of an enum.
//!
//! A [`Prism`] may fail to find its focus (`preview` returns `None` when the
//! value is a different case) but can always build the whole from a part
//! (`review`). Composing a lens with a prism yields an
//! [`Affine`](super::Affine), which is what `focus_optional` consumes.
//!
//! # Laws
//!
//! 1. **PreviewReview**: `prism.preview(&prism.review(value)) == Some(&value)`
//! 2. **ReviewPreview**: if `prism.preview(&source) == Some(a)` then
//!    `prism.review(a.clone()) == source`
//!
//! # Examples
//!
//! ```
//! use railpath::prism;
//! use railpath::optics::Prism;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Payment { Card(String), Cash(u32) }
//!
//! let cash = prism!(Payment, Cash);
//! assert_eq!(cash.preview(&Payment::Cash(20)), Some(&20));
//! assert_eq!(cash.preview(&Payment::Card("visa".into())), None);
//! assert_eq!(cash.review(5), Payment::Cash(5));
//! ```

use std::fmt;
use std::marker::PhantomData;

/// Focuses on the `A` carried by one case of `S`.
pub trait Prism<S, A> {
    /// Borrows the focus if `source` is the right case.
    fn preview<'a>(&self, source: &'a S) -> Option<&'a A>;

    /// Builds the whole from the focus.
    fn review(&self, value: A) -> S;

    /// Extracts the focus by value if `source` is the right case.
    fn preview_owned(&self, source: S) -> Option<A>;

    /// Rewrites the focus, or returns `None` for a different case.
    fn modify_option<F>(&self, source: S, function: F) -> Option<S>
    where
        F: FnOnce(A) -> A,
    {
        self.preview_owned(source)
            .map(|value| self.review(function(value)))
    }

    /// Rewrites the focus, leaving other cases unchanged.
    fn modify_or_identity<F>(&self, source: S, function: F) -> S
    where
        F: FnOnce(A) -> A,
        S: Clone,
    {
        self.modify_option(source.clone(), function)
            .unwrap_or(source)
    }

    /// Chains a prism on the focus.
    fn compose<B, P>(self, other: P) -> ComposedPrism<Self, P, A>
    where
        Self: Sized,
        P: Prism<A, B>,
    {
        ComposedPrism::new(self, other)
    }
}

/// A prism built from closures.
///
/// The `prism!` macro expands to one of these.
pub struct FunctionPrism<S, A, Pr, Re, PrOwned>
where
    Pr: Fn(&S) -> Option<&A>,
    Re: Fn(A) -> S,
    PrOwned: Fn(S) -> Option<A>,
{
    preview_function: Pr,
    review_function: Re,
    preview_owned_function: PrOwned,
    _marker: PhantomData<fn(S) -> A>,
}

impl<S, A, Pr, Re, PrOwned> FunctionPrism<S, A, Pr, Re, PrOwned>
where
    Pr: Fn(&S) -> Option<&A>,
    Re: Fn(A) -> S,
    PrOwned: Fn(S) -> Option<A>,
{
    /// Creates a prism from a borrowing preview, a review and an owning preview.
    #[must_use]
    pub const fn new(
        preview_function: Pr,
        review_function: Re,
        preview_owned_function: PrOwned,
    ) -> Self {
        Self {
            preview_function,
            review_function,
            preview_owned_function,
            _marker: PhantomData,
        }
    }
}

impl<S, A, Pr, Re, PrOwned> Prism<S, A> for FunctionPrism<S, A, Pr, Re, PrOwned>
where
    Pr: Fn(&S) -> Option<&A>,
    Re: Fn(A) -> S,
    PrOwned: Fn(S) -> Option<A>,
{
    fn preview<'a>(&self, source: &'a S) -> Option<&'a A> {
        (self.preview_function)(source)
    }

    fn review(&self, value: A) -> S {
        (self.review_function)(value)
    }

    fn preview_owned(&self, source: S) -> Option<A> {
        (self.preview_owned_function)(source)
    }
}

impl<S, A, Pr, Re, PrOwned> Clone for FunctionPrism<S, A, Pr, Re, PrOwned>
where
    Pr: Fn(&S) -> Option<&A> + Clone,
    Re: Fn(A) -> S + Clone,
    PrOwned: Fn(S) -> Option<A> + Clone,
{
    fn clone(&self) -> Self {
        Self::new(
            self.preview_function.clone(),
            self.review_function.clone(),
            self.preview_owned_function.clone(),
        )
    }
}

impl<S, A, Pr, Re, PrOwned> fmt::Debug for FunctionPrism<S, A, Pr, Re, PrOwned>
where
    Pr: Fn(&S) -> Option<&A>,
    Re: Fn(A) -> S,
    PrOwned: Fn(S) -> Option<A>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FunctionPrism").finish_non_exhaustive()
    }
}

/// Two prisms chained through an intermediate `A`.
pub struct ComposedPrism<P1, P2, A> {
    outer: P1,
    inner: P2,
    _marker: PhantomData<fn() -> A>,
}

impl<P1, P2, A> ComposedPrism<P1, P2, A> {
    /// Chains `inner` after `outer`.
    #[must_use]
    pub const fn new(outer: P1, inner: P2) -> Self {
        Self {
            outer,
            inner,
            _marker: PhantomData,
        }
    }
}

impl<S, A, B, P1, P2> Prism<S, B> for ComposedPrism<P1, P2, A>
where
    P1: Prism<S, A>,
    P2: Prism<A, B>,
    A: 'static,
{
    fn preview<'a>(&self, source: &'a S) -> Option<&'a B> {
        self.outer
            .preview(source)
            .and_then(|intermediate| self.inner.preview(intermediate))
    }

    fn review(&self, value: B) -> S {
        self.outer.review(self.inner.review(value))
    }

    fn preview_owned(&self, source: S) -> Option<B> {
        self.outer
            .preview_owned(source)
            .and_then(|intermediate| self.inner.preview_owned(intermediate))
    }
}

impl<P1: Clone, P2: Clone, A> Clone for ComposedPrism<P1, P2, A> {
    fn clone(&self) -> Self {
        Self::new(self.outer.clone(), self.inner.clone())
    }
}

impl<P1: fmt::Debug, P2: fmt::Debug, A> fmt::Debug for ComposedPrism<P1, P2, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ComposedPrism")
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .finish()
    }
}

/// Builds a [`FunctionPrism`] for a single-field tuple variant.
///
/// ```
/// use railpath::prism;
/// use railpath::optics::Prism;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Slot<T> { Filled(T), Empty }
///
/// let filled = prism!(Slot<i32>, Filled);
/// assert_eq!(filled.preview(&Slot::Filled(3)), Some(&3));
/// assert_eq!(filled.preview(&Slot::Empty), None);
/// ```
#[macro_export]
macro_rules! prism {
    ($enum_type:ident, $variant:ident) => {
        $crate::optics::FunctionPrism::new(
            |source: &$enum_type| match *source {
                $enum_type::$variant(ref value) => Some(value),
                #[allow(unreachable_patterns)]
                _ => None,
            },
            |value| $enum_type::$variant(value),
            |source: $enum_type| match source {
                $enum_type::$variant(value) => Some(value),
                #[allow(unreachable_patterns)]
                _ => None,
            },
        )
    };
    ($enum_type:ident < $($generic:tt),+ >, $variant:ident) => {
        $crate::optics::FunctionPrism::new(
            |source: &$enum_type<$($generic),+>| match *source {
                $enum_type::$variant(ref value) => Some(value),
                #[allow(unreachable_patterns)]
                _ => None,
            },
            |value| $enum_type::$variant(value),
            |source: $enum_type<$($generic),+>| match source {
                $enum_type::$variant(value) => Some(value),
                #[allow(unreachable_patterns)]
                _ => None,
            },
        )
    };
    ($enum_type:path, $variant:ident) => {
        $crate::optics::FunctionPrism::new(
            |source: &$enum_type| match *source {
                <$enum_type>::$variant(ref value) => Some(value),
                #[allow(unreachable_patterns)]
                _ => None,
            },
            |value| <$enum_type>::$variant(value),
            |source: $enum_type| match source {
                <$enum_type>::$variant(value) => Some(value),
                #[allow(unreachable_patterns)]
                _ => None,
            },
        )
    };
}
