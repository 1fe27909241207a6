//! Railway-style paths over the five result containers.
//!
//! A path wraps one container and exposes the same vocabulary on all of
//! them:
//!
//! | Path | Container | Alternate channel |
//! |---|---|---|
//! | [`MaybePath<A>`] | `Option<A>` | `()` (absence) |
//! | [`EitherPath<E, A>`] | `Result<A, E>` | `E` |
//! | [`TryPath<A>`] | [`Try<A>`] | [`Failure`] |
//! | [`ValidationPath<E, A>`] | [`Validated<E, A>`] | `E: Semigroup`, accumulated |
//! | `TaskPath<A>` | `Task<A>` | [`Failure`], once run |
//!
//! Build a path with [`Path`], thread it through `map`, `via`, `zip_with`,
//! `recover` and friends, then leave with `run`, `fold` or `get_or_else`.
//! Values on the alternate channel pass through every success-side
//! operation untouched; only `recover`, `recover_with` and `or_else` leave
//! it.
//!
//! The pure paths implement the [capability traits](capability); bring them
//! into scope with `use railpath::prelude::*`.
//!
//! # Examples
//!
//! ```rust
//! use railpath::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! struct Signup { name: String, age: u32 }
//!
//! fn name(raw: &str) -> ValidationPath<Vec<String>, String> {
//!     Path::maybe(Some(raw.trim().to_string()).filter(|name| !name.is_empty()))
//!         .to_validation_path(vec!["name is required".to_string()])
//! }
//!
//! fn age(raw: &str) -> ValidationPath<Vec<String>, u32> {
//!     Path::either(raw.parse::<u32>().map_err(|_| vec![format!("{raw:?} is not an age")]))
//!         .to_validation_path()
//! }
//!
//! let signup = name("").zip_with(age("old"), |name, age| Signup { name, age });
//! assert_eq!(
//!     signup.run().error(),
//!     Some(&vec!["name is required".to_string(), "\"old\" is not an age".to_string()])
//! );
//! ```
//!
//! [`Try<A>`]: crate::control::Try
//! [`Validated<E, A>`]: crate::control::Validated
//! [`Failure`]: crate::effect::Failure

pub mod capability;
mod convert;
mod either;
mod focus;
mod maybe;
#[cfg(feature = "task")]
mod task;
mod try_path;
mod validation;

use std::error::Error;

pub use capability::{Accumulating, Chainable, Combinable, Mappable, Recoverable};
pub use either::EitherPath;
pub use maybe::MaybePath;
#[cfg(feature = "task")]
pub use task::TaskPath;
pub use try_path::TryPath;
pub use validation::ValidationPath;

use crate::control::{Try, Validated};
use crate::effect::Failure;
#[cfg(feature = "task")]
use crate::effect::Task;

/// Factory functions for every path variant.
///
/// # Examples
///
/// ```rust
/// use railpath::prelude::*;
///
/// assert_eq!(Path::just(1).map(|x| x + 1).run(), Some(2));
/// assert_eq!(Path::left::<&str, i32>("e").map(|x| x + 1).run(), Err("e"));
/// assert!(Path::try_catching(|| -> i32 { panic!("boom") }).is_failure());
/// assert!(Path::invalid::<Vec<&str>, i32>(vec!["bad"]).is_invalid());
/// ```
#[derive(Debug)]
pub struct Path {
    _private: (),
}

impl Path {
    // =========================================================================
    // MaybePath
    // =========================================================================

    /// A present value.
    pub const fn just<A>(value: A) -> MaybePath<A> {
        MaybePath::new(Some(value))
    }

    /// An absent value.
    pub const fn nothing<A>() -> MaybePath<A> {
        MaybePath::new(None)
    }

    /// Wraps an `Option`.
    pub const fn maybe<A>(value: Option<A>) -> MaybePath<A> {
        MaybePath::new(value)
    }

    // =========================================================================
    // EitherPath
    // =========================================================================

    /// A success.
    pub const fn right<E, A>(value: A) -> EitherPath<E, A> {
        EitherPath::new(Ok(value))
    }

    /// A typed error.
    pub const fn left<E, A>(error: E) -> EitherPath<E, A> {
        EitherPath::new(Err(error))
    }

    /// Wraps a `Result`.
    pub const fn either<E, A>(value: Result<A, E>) -> EitherPath<E, A> {
        EitherPath::new(value)
    }

    // =========================================================================
    // TryPath
    // =========================================================================

    /// Runs a fallible closure, capturing its error or panic.
    pub fn try_of<A, E, F>(action: F) -> TryPath<A>
    where
        F: FnOnce() -> Result<A, E>,
        E: Error + Send + Sync + 'static,
    {
        TryPath::new(Try::of(action))
    }

    /// Runs a closure, capturing a panic.
    pub fn try_catching<A, F>(action: F) -> TryPath<A>
    where
        F: FnOnce() -> A,
    {
        TryPath::new(Try::catching(action))
    }

    /// A success.
    pub const fn success<A>(value: A) -> TryPath<A> {
        TryPath::new(Try::success(value))
    }

    /// A failure.
    pub const fn failure<A>(failure: Failure) -> TryPath<A> {
        TryPath::new(Try::failure(failure))
    }

    /// Wraps a `Try`.
    pub const fn try_path<A>(value: Try<A>) -> TryPath<A> {
        TryPath::new(value)
    }

    // =========================================================================
    // ValidationPath
    // =========================================================================

    /// A valid value.
    pub const fn valid<E, A>(value: A) -> ValidationPath<E, A> {
        ValidationPath::new(Validated::valid(value))
    }

    /// Collected errors.
    pub const fn invalid<E, A>(error: E) -> ValidationPath<E, A> {
        ValidationPath::new(Validated::invalid(error))
    }

    /// Wraps a `Validated`.
    pub const fn validated<E, A>(value: Validated<E, A>) -> ValidationPath<E, A> {
        ValidationPath::new(value)
    }
}

#[cfg(feature = "task")]
impl Path {
    // =========================================================================
    // TaskPath
    // =========================================================================

    /// Defers an infallible closure.
    pub fn task<A, F>(body: F) -> TaskPath<A>
    where
        A: Send + 'static,
        F: FnOnce() -> A + Send + 'static,
    {
        TaskPath::new(Task::delay(body))
    }

    /// Defers a fallible closure, capturing its error.
    pub fn task_attempt<A, E, F>(body: F) -> TaskPath<A>
    where
        A: Send + 'static,
        F: FnOnce() -> Result<A, E> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        TaskPath::new(Task::attempt(body))
    }

    /// A task that yields `value`.
    pub fn task_pure<A: Send + 'static>(value: A) -> TaskPath<A> {
        TaskPath::new(Task::pure(value))
    }

    /// A task that fails with `failure`.
    pub fn task_fail<A: Send + 'static>(failure: Failure) -> TaskPath<A> {
        TaskPath::new(Task::fail(failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn maybe_scenario_doubles_then_filters() {
        let result = Path::just(5)
            .map(|x| x * 2)
            .via(|x| if x > 8 { Path::just(x) } else { Path::nothing() });
        assert_eq!(result, Path::just(10));
    }

    #[rstest]
    fn three_validations_collect_errors_in_order() {
        let first = Path::invalid::<Vec<&str>, i32>(vec!["A"]);
        let second = Path::valid(2);
        let third = Path::invalid(vec!["C"]);
        let combined = first.zip_with3(second, third, |a, b, c: i32| (a, b, c));
        assert_eq!(combined.run(), Validated::invalid(vec!["A", "C"]));
    }

    #[rstest]
    fn either_survives_a_trip_through_maybe() {
        let original = Path::right::<&str, _>(7);
        assert_eq!(original.clone().to_maybe_path().to_either_path("lost"), original);
    }

    #[rstest]
    fn try_of_captures_errors() {
        let parsed = Path::try_of(|| "x".parse::<i32>());
        assert!(parsed.is_failure());
        assert!(
            parsed
                .as_try()
                .failure_ref()
                .is_some_and(|f| f.downcast_ref::<std::num::ParseIntError>().is_some())
        );
    }

    #[cfg(feature = "task")]
    #[rstest]
    fn task_factories_are_lazy() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let path = Path::task(move || flag.store(true, Ordering::SeqCst));
        assert!(!ran.load(Ordering::SeqCst));
        path.run_unsafe();
        assert!(ran.load(Ordering::SeqCst));
        assert!(Path::task_fail::<i32>(Failure::msg("x")).run_safe().is_failure());
        assert_eq!(Path::task_pure(1).run_unsafe(), 1);
    }
}
