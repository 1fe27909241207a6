//! Order-policy wrappers for error accumulation.
//!
//! `Vec<E>` accumulates every error in insertion order. Sometimes only one
//! error is worth keeping; these wrappers give an existing type a semigroup
//! that explicitly discards the others.
//!
//! # Available Wrappers
//!
//! - [`First`]: keeps the leftmost value
//! - [`Last`]: keeps the rightmost value

// =============================================================================
// First Wrapper
// =============================================================================

/// A wrapper whose semigroup keeps the first (leftmost) value.
///
/// # Examples
///
/// ```rust
/// use railpath::typeclass::{First, Semigroup};
///
/// let kept = First::new("a").combine(First::new("b"));
/// assert_eq!(kept.into_inner(), "a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct First<A>(pub A);

impl<A> First<A> {
    /// Creates a new `First` wrapper.
    #[inline]
    pub const fn new(value: A) -> Self {
        Self(value)
    }

    /// Unwraps the inner value.
    #[inline]
    pub fn into_inner(self) -> A {
        self.0
    }

    /// Returns a reference to the inner value.
    #[inline]
    pub const fn as_inner(&self) -> &A {
        &self.0
    }
}

impl<A> From<A> for First<A> {
    fn from(value: A) -> Self {
        Self::new(value)
    }
}

// =============================================================================
// Last Wrapper
// =============================================================================

/// A wrapper whose semigroup keeps the last (rightmost) value.
///
/// # Examples
///
/// ```rust
/// use railpath::typeclass::{Last, Semigroup};
///
/// let kept = Last::new("a").combine(Last::new("b"));
/// assert_eq!(kept.into_inner(), "b");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Last<A>(pub A);

impl<A> Last<A> {
    /// Creates a new `Last` wrapper.
    #[inline]
    pub const fn new(value: A) -> Self {
        Self(value)
    }

    /// Unwraps the inner value.
    #[inline]
    pub fn into_inner(self) -> A {
        self.0
    }

    /// Returns a reference to the inner value.
    #[inline]
    pub const fn as_inner(&self) -> &A {
        &self.0
    }
}

impl<A> From<A> for Last<A> {
    fn from(value: A) -> Self {
        Self::new(value)
    }
}
