//! Semigroup type class - types with an associative binary operation.
//!
//! A semigroup is the combining policy used by accumulating paths: when two
//! invalid `ValidationPath`s meet in `zip_with`, their errors are merged with
//! `combine`.
//!
//! # Laws
//!
//! For all `a`, `b`, `c` of type `T`:
//!
//! ## Associativity
//!
//! ```text
//! (a.combine(b)).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! Collection instances also preserve insertion order: the left operand's
//! elements come first. Wrappers such as [`First`] and [`Last`] are the
//! explicit way to discard order.
//!
//! # Examples
//!
//! ```rust
//! use railpath::typeclass::Semigroup;
//!
//! let errors = vec!["name is empty"].combine(vec!["age is negative"]);
//! assert_eq!(errors, vec!["name is empty", "age is negative"]);
//! ```

use super::wrappers::{First, Last};

/// A type class for types with an associative binary operation.
///
/// # Laws
///
/// All implementations must satisfy:
///
/// ## Associativity
///
/// For all `a`, `b`, `c`:
/// ```text
/// (a.combine(b)).combine(c) == a.combine(b.combine(c))
/// ```
///
/// # Examples
///
/// ```rust
/// use railpath::typeclass::Semigroup;
///
/// let a = String::from("foo");
/// let b = String::from("bar");
/// assert_eq!(a.combine(b), "foobar");
/// ```
pub trait Semigroup {
    /// Combines two values into one.
    ///
    /// This operation must be associative.
    #[must_use]
    fn combine(self, other: Self) -> Self;

    /// Combines two values by reference, returning a new value.
    ///
    /// The default implementation clones both values and calls `combine`.
    #[must_use]
    fn combine_ref(&self, other: &Self) -> Self
    where
        Self: Clone,
    {
        self.clone().combine(other.clone())
    }

    /// Reduces all elements in an iterator using the semigroup operation.
    ///
    /// Returns `None` if the iterator is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railpath::typeclass::Semigroup;
    ///
    /// let batches = vec![vec![1], vec![2, 3], vec![4]];
    /// assert_eq!(Vec::reduce_all(batches), Some(vec![1, 2, 3, 4]));
    ///
    /// let empty: Vec<Vec<i32>> = vec![];
    /// assert_eq!(Vec::reduce_all(empty), None);
    /// ```
    fn reduce_all<I>(iterator: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .reduce(|accumulator, element| accumulator.combine(element))
    }
}

// =============================================================================
// String Implementation
// =============================================================================

impl Semigroup for String {
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }

    fn combine_ref(&self, other: &Self) -> Self {
        let mut result = Self::with_capacity(self.len() + other.len());
        result.push_str(self);
        result.push_str(other);
        result
    }
}

// =============================================================================
// Vec Implementation
// =============================================================================

impl<T: Clone> Semigroup for Vec<T> {
    fn combine(mut self, mut other: Self) -> Self {
        self.append(&mut other);
        self
    }

    fn combine_ref(&self, other: &Self) -> Self {
        let mut result = Self::with_capacity(self.len() + other.len());
        result.extend(self.iter().cloned());
        result.extend(other.iter().cloned());
        result
    }
}

// =============================================================================
// Option Implementation
// =============================================================================

/// `None` acts as an empty accumulation: `Some` values are combined, and a
/// single `Some` survives a `None` on either side.
impl<T: Semigroup> Semigroup for Option<T> {
    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Some(left), Some(right)) => Some(left.combine(right)),
            (Some(value), None) | (None, Some(value)) => Some(value),
            (None, None) => None,
        }
    }
}

// =============================================================================
// Unit and Tuple Implementations
// =============================================================================

/// The unit type forms a trivial semigroup.
impl Semigroup for () {
    fn combine(self, _other: Self) -> Self {}
}

impl<A: Semigroup, B: Semigroup> Semigroup for (A, B) {
    fn combine(self, other: Self) -> Self {
        (self.0.combine(other.0), self.1.combine(other.1))
    }
}

impl<A: Semigroup, B: Semigroup, C: Semigroup> Semigroup for (A, B, C) {
    fn combine(self, other: Self) -> Self {
        (
            self.0.combine(other.0),
            self.1.combine(other.1),
            self.2.combine(other.2),
        )
    }
}

// =============================================================================
// Order-Policy Wrappers
// =============================================================================

impl<A> Semigroup for First<A> {
    fn combine(self, _other: Self) -> Self {
        self
    }
}

impl<A> Semigroup for Last<A> {
    fn combine(self, other: Self) -> Self {
        other
    }
}
