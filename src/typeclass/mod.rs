//! Type class traits used by the path algebra.
//!
//! Only one algebraic structure is needed by the paths themselves:
//!
//! - [`Semigroup`]: associative binary operation, the combining policy of
//!   accumulating validations
//!
//! plus the order-policy wrappers [`First`] and [`Last`].
//!
//! # Examples
//!
//! ```rust
//! use railpath::typeclass::{First, Semigroup};
//!
//! // Vec concatenation keeps every error
//! assert_eq!(vec![1, 2].combine(vec![3]), vec![1, 2, 3]);
//!
//! // First keeps only the leftmost one
//! assert_eq!(First(1).combine(First(2)), First(1));
//! ```

mod semigroup;
mod wrappers;

pub use semigroup::Semigroup;
pub use wrappers::{First, Last};
