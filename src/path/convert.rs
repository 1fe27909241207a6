//! Conversions between path variants.
//!
//! Every ordered pair of variants has exactly one conversion:
//!
//! ```text
//! from \ to    Maybe          Either            Try            Task            Validation
//! Maybe        -              to_either(e)      to_try(f)      to_task(f)      to_validation(e)
//! Either       to_maybe()     -                 to_try(f)      to_task(f)      to_validation()
//! Try          to_maybe()     to_either(f)      -              to_task()       to_validation(f)
//! Task         to_maybe()     to_either(f)      to_try()       -               to_validation(f)
//! Validation   to_maybe()     to_either()       to_try(f)      to_task(f)      -
//! ```
//!
//! (each method is spelled `to_<variant>_path`). Conversions that drop
//! information take no argument; conversions that must invent an error take
//! it explicitly. Conversions out of a `TaskPath` run the task.
//!
//! The lossless directions also exist as `From` impls.

use super::either::EitherPath;
use super::maybe::MaybePath;
use super::try_path::TryPath;
use super::validation::ValidationPath;
use crate::control::{Try, Validated};
use crate::effect::Failure;

impl<A> MaybePath<A> {
    /// Converts to an [`EitherPath`], using `if_nothing` for absence.
    pub fn to_either_path<E>(self, if_nothing: E) -> EitherPath<E, A> {
        EitherPath::new(self.run().ok_or(if_nothing))
    }

    /// Converts to a [`TryPath`], building a failure for absence.
    pub fn to_try_path<F>(self, make_failure: F) -> TryPath<A>
    where
        F: FnOnce() -> Failure,
    {
        TryPath::new(self.run().map_or_else(|| Try::failure(make_failure()), Try::success))
    }

    /// Converts to a [`ValidationPath`], using `if_nothing` for absence.
    pub fn to_validation_path<E>(self, if_nothing: E) -> ValidationPath<E, A> {
        ValidationPath::new(self.run().map_or(Validated::invalid(if_nothing), Validated::valid))
    }
}

impl<E, A> EitherPath<E, A> {
    /// Converts to a [`MaybePath`], dropping the error.
    pub fn to_maybe_path(self) -> MaybePath<A> {
        MaybePath::new(self.run().ok())
    }

    /// Converts to a [`TryPath`], turning the error into a failure.
    pub fn to_try_path<F>(self, to_failure: F) -> TryPath<A>
    where
        F: FnOnce(E) -> Failure,
    {
        TryPath::new(Try::from(self.run().map_err(to_failure)))
    }

    /// Converts to a [`ValidationPath`] with the same error.
    pub fn to_validation_path(self) -> ValidationPath<E, A> {
        ValidationPath::new(Validated::from(self.run()))
    }
}

impl<A> TryPath<A> {
    /// Converts to a [`MaybePath`], dropping the failure.
    pub fn to_maybe_path(self) -> MaybePath<A> {
        MaybePath::new(self.run().ok())
    }

    /// Converts to an [`EitherPath`], turning the failure into a typed error.
    pub fn to_either_path<E, F>(self, to_error: F) -> EitherPath<E, A>
    where
        F: FnOnce(Failure) -> E,
    {
        self.map_error(to_error)
    }

    /// Converts to a [`ValidationPath`], turning the failure into errors.
    pub fn to_validation_path<E, F>(self, to_error: F) -> ValidationPath<E, A>
    where
        F: FnOnce(Failure) -> E,
    {
        ValidationPath::new(Validated::from(self.run().into_result().map_err(to_error)))
    }
}

impl<E, A> ValidationPath<E, A> {
    /// Converts to a [`MaybePath`], dropping the errors.
    pub fn to_maybe_path(self) -> MaybePath<A> {
        MaybePath::new(self.run().ok())
    }

    /// Converts to an [`EitherPath`] with the same error.
    pub fn to_either_path(self) -> EitherPath<E, A> {
        EitherPath::new(self.run().into_result())
    }

    /// Converts to a [`TryPath`], turning the errors into a failure.
    pub fn to_try_path<F>(self, to_failure: F) -> TryPath<A>
    where
        F: FnOnce(E) -> Failure,
    {
        TryPath::new(Try::from(self.run().into_result().map_err(to_failure)))
    }
}

impl<A> From<MaybePath<A>> for EitherPath<(), A> {
    fn from(path: MaybePath<A>) -> Self {
        path.to_either_path(())
    }
}

impl<E, A> From<EitherPath<E, A>> for ValidationPath<E, A> {
    fn from(path: EitherPath<E, A>) -> Self {
        path.to_validation_path()
    }
}

impl<E, A> From<ValidationPath<E, A>> for EitherPath<E, A> {
    fn from(path: ValidationPath<E, A>) -> Self {
        path.to_either_path()
    }
}

#[cfg(feature = "task")]
mod deferred {
    use super::super::either::EitherPath;
    use super::super::maybe::MaybePath;
    use super::super::task::TaskPath;
    use super::super::try_path::TryPath;
    use super::super::validation::ValidationPath;
    use crate::effect::{Failure, Task};

    impl<A: Send + 'static> MaybePath<A> {
        /// Converts to a [`TaskPath`], failing with `make_failure` on absence.
        pub fn to_task_path<F>(self, make_failure: F) -> TaskPath<A>
        where
            F: FnOnce() -> Failure,
        {
            TaskPath::new(match self.run() {
                Some(value) => Task::pure(value),
                None => Task::fail(make_failure()),
            })
        }
    }

    impl<E, A: Send + 'static> EitherPath<E, A> {
        /// Converts to a [`TaskPath`], turning the error into a failure.
        pub fn to_task_path<F>(self, to_failure: F) -> TaskPath<A>
        where
            F: FnOnce(E) -> Failure,
        {
            TaskPath::new(match self.run() {
                Ok(value) => Task::pure(value),
                Err(error) => Task::fail(to_failure(error)),
            })
        }
    }

    impl<A: Send + 'static> TryPath<A> {
        /// Converts to a [`TaskPath`] that replays this outcome.
        pub fn to_task_path(self) -> TaskPath<A> {
            TaskPath::new(Task::from_try(self.run()))
        }
    }

    impl<E, A: Send + 'static> ValidationPath<E, A> {
        /// Converts to a [`TaskPath`], turning the errors into a failure.
        pub fn to_task_path<F>(self, to_failure: F) -> TaskPath<A>
        where
            F: FnOnce(E) -> Failure,
        {
            self.to_try_path(to_failure).to_task_path()
        }
    }

    impl<A: Send + 'static> TaskPath<A> {
        /// Runs the task and keeps the value, dropping any failure.
        pub fn to_maybe_path(self) -> MaybePath<A> {
            self.to_try_path().to_maybe_path()
        }

        /// Runs the task, turning a failure into a typed error.
        pub fn to_either_path<E, F>(self, to_error: F) -> EitherPath<E, A>
        where
            F: FnOnce(Failure) -> E,
        {
            self.to_try_path().to_either_path(to_error)
        }

        /// Runs the task and captures its outcome.
        pub fn to_try_path(self) -> TryPath<A> {
            TryPath::new(self.run_safe())
        }

        /// Runs the task, turning a failure into errors.
        pub fn to_validation_path<E, F>(self, to_error: F) -> ValidationPath<E, A>
        where
            F: FnOnce(Failure) -> E,
        {
            self.to_try_path().to_validation_path(to_error)
        }
    }

    impl<A: Send + 'static> From<TryPath<A>> for TaskPath<A> {
        fn from(path: TryPath<A>) -> Self {
            path.to_task_path()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(4), Ok(4))]
    #[case(None, Err("absent"))]
    fn maybe_to_either(#[case] input: Option<i32>, #[case] expected: Result<i32, &str>) {
        assert_eq!(MaybePath::new(input).to_either_path("absent").run(), expected);
    }

    #[rstest]
    fn maybe_to_try_builds_failure_only_when_absent() {
        let present = MaybePath::new(Some(1)).to_try_path(|| panic!("must not build"));
        assert_eq!(present.run(), Try::success(1));
        let absent = MaybePath::<i32>::new(None).to_try_path(|| Failure::msg("absent"));
        assert_eq!(absent.run(), Try::failure(Failure::msg("absent")));
    }

    #[rstest]
    fn either_round_trips_through_maybe_when_right() {
        let original = EitherPath::<&str, _>::new(Ok(5));
        assert_eq!(original.clone().to_maybe_path().to_either_path("e"), original);
    }

    #[rstest]
    #[case(Ok(1))]
    #[case(Err(vec!["bad"]))]
    fn either_and_validation_round_trip(#[case] input: Result<i32, Vec<&'static str>>) {
        let either = EitherPath::new(input);
        let back: EitherPath<Vec<&str>, i32> = ValidationPath::from(either.clone()).into();
        assert_eq!(back, either);
    }

    #[rstest]
    fn try_to_either_and_validation_map_the_failure() {
        let failed = || TryPath::<i32>::new(Try::failure(Failure::msg("io")));
        assert_eq!(failed().to_either_path(|f| f.to_string()).run(), Err("io".to_string()));
        assert_eq!(
            failed().to_validation_path(|f| vec![f.to_string()]).run(),
            Validated::invalid(vec!["io".to_string()])
        );
        assert_eq!(failed().to_maybe_path().run(), None);
    }

    #[rstest]
    fn validation_to_try_wraps_errors() {
        let invalid = ValidationPath::<Vec<&str>, i32>::new(Validated::invalid(vec!["a", "b"]));
        let converted = invalid.to_try_path(|errors| Failure::msg(errors.join(", ")));
        assert_eq!(converted.run(), Try::failure(Failure::msg("a, b")));
    }

    #[rstest]
    fn maybe_into_either_with_unit_error() {
        let either: EitherPath<(), i32> = MaybePath::new(None).into();
        assert_eq!(either.run(), Err(()));
    }

    #[cfg(feature = "task")]
    #[rstest]
    fn task_conversions_run_the_task() {
        use crate::effect::Task;
        use crate::path::TaskPath;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let path = TaskPath::new(Task::delay(move || counter.fetch_add(1, Ordering::SeqCst)));
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(path.to_maybe_path().run(), Some(0));
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        let failed = TaskPath::<i32>::new(Task::fail(Failure::msg("down")));
        assert_eq!(failed.to_either_path(|f| f.to_string()).run(), Err("down".to_string()));

        let replayed: TaskPath<i32> = TryPath::new(Try::success(3)).into();
        assert_eq!(replayed.run_unsafe(), 3);
    }
}
