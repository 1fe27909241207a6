//! Capability traits shared by the pure paths.
//!
//! Each path implements the capabilities its variant supports:
//!
//! | Trait | Maybe | Either | Try | Validation |
//! |---|---|---|---|---|
//! | [`Mappable`] | yes | yes | yes | yes |
//! | [`Chainable`] | yes | yes | yes | yes |
//! | [`Combinable`] | yes | yes | yes | yes |
//! | [`Recoverable`] | yes | yes | yes | yes |
//! | [`Accumulating`] | | | | yes |
//!
//! `TaskPath` offers the same operations as inherent methods, because its
//! closures must also be `Send + 'static`.
//!
//! The `Mapped<B>` associated type pins a path to its own variant, so
//! chaining a `MaybePath` into an `EitherPath` is rejected at compile time:
//!
//! ```compile_fail
//! use railpath::path::{Chainable, Path};
//!
//! let mixed = Path::just(1).via(|n| Path::right::<String, i32>(n));
//! ```
//!
//! # Laws
//!
//! ```text
//! p.map(|x| x) == p
//! p.map(f).map(g) == p.map(|x| g(f(x)))
//! pure(a).via(f) == f(a)
//! p.via(pure) == p
//! ```

use crate::typeclass::Semigroup;

/// Transforms the success value without leaving the variant.
pub trait Mappable: Sized {
    /// The success payload.
    type Value;

    /// The same variant over another success type.
    type Mapped<B>: Mappable<Value = B>;

    /// Applies `function` to the success value; alternates pass through.
    fn map<B, F>(self, function: F) -> Self::Mapped<B>
    where
        F: FnOnce(Self::Value) -> B;

    /// Observes the success value without changing the path.
    ///
    /// A panic in `observer` is not captured.
    #[must_use]
    fn peek<F>(self, observer: F) -> Self
    where
        F: FnOnce(&Self::Value);
}

/// Sequences dependent computations of the same variant.
pub trait Chainable: Mappable {
    /// Feeds the success value into `function`; alternates short-circuit.
    fn via<B, F>(self, function: F) -> Self::Mapped<B>
    where
        F: FnOnce(Self::Value) -> Self::Mapped<B>;

    /// Like [`Chainable::via`], discarding the success value.
    fn then<B, F>(self, function: F) -> Self::Mapped<B>
    where
        F: FnOnce() -> Self::Mapped<B>,
    {
        self.via(|_| function())
    }
}

/// Combines two independent paths of the same variant.
pub trait Combinable: Mappable {
    /// Combines both success values with `function`.
    ///
    /// Every variant except validation stops at the first alternate, reading
    /// left to right.
    fn zip_with<B, C, F>(self, other: Self::Mapped<B>, function: F) -> Self::Mapped<C>
    where
        F: FnOnce(Self::Value, B) -> C;
}

/// Leaves the alternate channel.
pub trait Recoverable: Mappable {
    /// The alternate payload handed to recovery functions.
    type Alternate;

    /// Replaces an alternate with a success value.
    #[must_use]
    fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(Self::Alternate) -> Self::Value;

    /// Replaces an alternate with another path of the same type.
    #[must_use]
    fn recover_with<F>(self, function: F) -> Self
    where
        F: FnOnce(Self::Alternate) -> Self;

    /// Replaces an alternate with a path that ignores the payload.
    #[must_use]
    fn or_else<F>(self, alternative: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        self.recover_with(|_| alternative())
    }
}

/// Combines independent paths while keeping every error.
pub trait Accumulating: Combinable {
    /// The accumulated error.
    type Error: Semigroup;

    /// Combines both values, or both errors when both sides are invalid.
    fn zip_with_accum<B, C, F>(self, other: Self::Mapped<B>, function: F) -> Self::Mapped<C>
    where
        F: FnOnce(Self::Value, B) -> C;

    /// Keeps this value, accumulating the errors of `other`.
    #[must_use]
    fn and_also<B>(self, other: Self::Mapped<B>) -> Self;

    /// Keeps the value of `other`, accumulating the errors of both.
    fn and_then_keep<B>(self, other: Self::Mapped<B>) -> Self::Mapped<B>;
}
