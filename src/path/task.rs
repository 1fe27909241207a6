//! The deferred-effect path.

use std::fmt;
use std::time::Duration;

use crate::control::Try;
use crate::effect::{Failure, Par, RetryPolicy, Task, TaskHandle};

/// A path over a [`Task`]: nothing runs until a terminal method is called.
///
/// `TaskPath` mirrors the capability traits with inherent methods whose
/// closures are `Send + 'static`, so stages can move to worker threads.
/// `zip_with` runs the two paths one after the other, left first;
/// [`TaskPath::par_zip_with`] runs them concurrently.
///
/// # Examples
///
/// ```rust
/// use railpath::path::Path;
///
/// let pipeline = Path::task(|| 20)
///     .map(|n| n + 1)
///     .via(|n| Path::task_pure(n * 2));
///
/// assert_eq!(pipeline.run_unsafe(), 42);
/// ```
pub struct TaskPath<A> {
    task: Task<A>,
}

impl<A> fmt::Debug for TaskPath<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("TaskPath").field("task", &self.task).finish()
    }
}

impl<A: Send + 'static> TaskPath<A> {
    /// Wraps a `Task`.
    #[inline]
    pub const fn new(task: Task<A>) -> Self {
        Self { task }
    }

    /// Returns the underlying `Task` without running it.
    #[inline]
    pub fn run(self) -> Task<A> {
        self.task
    }

    // =========================================================================
    // Capability operations
    // =========================================================================

    /// Transforms the success value.
    #[must_use]
    pub fn map<B, F>(self, function: F) -> TaskPath<B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> B + Send + 'static,
    {
        TaskPath::new(self.task.map(function))
    }

    /// Observes the success value when the task runs.
    #[must_use]
    pub fn peek<F>(self, observer: F) -> Self
    where
        F: FnOnce(&A) + Send + 'static,
    {
        Self::new(self.task.peek(observer))
    }

    /// Sequences a dependent path.
    #[must_use]
    pub fn via<B, F>(self, function: F) -> TaskPath<B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> TaskPath<B> + Send + 'static,
    {
        TaskPath::new(self.task.flat_map(move |value| function(value).run()))
    }

    /// Sequences a path that ignores this one's value.
    #[must_use]
    pub fn then<B, F>(self, function: F) -> TaskPath<B>
    where
        B: Send + 'static,
        F: FnOnce() -> TaskPath<B> + Send + 'static,
    {
        self.via(move |_| function())
    }

    /// Runs both paths in order and combines their values.
    #[must_use]
    pub fn zip_with<B, C, F>(self, other: TaskPath<B>, function: F) -> TaskPath<C>
    where
        B: Send + 'static,
        C: Send + 'static,
        F: FnOnce(A, B) -> C + Send + 'static,
    {
        TaskPath::new(self.task.zip_with(other.task, function))
    }

    /// Runs three paths in order and combines their values.
    #[must_use]
    pub fn zip_with3<B, C, D, F>(
        self,
        second: TaskPath<B>,
        third: TaskPath<C>,
        function: F,
    ) -> TaskPath<D>
    where
        B: Send + 'static,
        C: Send + 'static,
        D: Send + 'static,
        F: FnOnce(A, B, C) -> D + Send + 'static,
    {
        self.zip_with(second, |a, b| (a, b))
            .zip_with(third, move |(a, b), c| function(a, b, c))
    }

    /// Runs four paths in order and combines their values.
    #[must_use]
    pub fn zip_with4<B, C, D, R, F>(
        self,
        second: TaskPath<B>,
        third: TaskPath<C>,
        fourth: TaskPath<D>,
        function: F,
    ) -> TaskPath<R>
    where
        B: Send + 'static,
        C: Send + 'static,
        D: Send + 'static,
        R: Send + 'static,
        F: FnOnce(A, B, C, D) -> R + Send + 'static,
    {
        self.zip_with3(second, third, |a, b, c| (a, b, c))
            .zip_with(fourth, move |(a, b, c), d| function(a, b, c, d))
    }

    /// Replaces a failure with a value.
    #[must_use]
    pub fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> A + Send + 'static,
    {
        Self::new(self.task.recover(function))
    }

    /// Replaces a failure with another path.
    #[must_use]
    pub fn recover_with<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> Self + Send + 'static,
    {
        Self::new(self.task.recover_with(move |failure| function(failure).run()))
    }

    /// Replaces a failure with a path that ignores it.
    #[must_use]
    pub fn or_else<F>(self, alternative: F) -> Self
    where
        F: FnOnce() -> Self + Send + 'static,
    {
        self.recover_with(move |_| alternative())
    }

    /// Rewrites the failure.
    #[must_use]
    pub fn map_error<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> Failure + Send + 'static,
    {
        Self::new(self.task.map_failure(function))
    }

    /// Observes the failure when the task runs.
    #[must_use]
    pub fn peek_failure<F>(self, observer: F) -> Self
    where
        F: FnOnce(&Failure) + Send + 'static,
    {
        Self::new(self.task.peek_failure(observer))
    }

    // =========================================================================
    // Effects
    // =========================================================================

    /// Discards the success value.
    #[must_use]
    pub fn as_unit(self) -> TaskPath<()> {
        TaskPath::new(self.task.as_unit())
    }

    /// Fails with `EffectError::Timeout` if the path does not finish in time.
    #[must_use]
    pub fn timeout(self, duration: Duration) -> Self {
        Self::new(self.task.timeout(duration))
    }

    /// Runs `finalizer` after the path, whatever its outcome.
    #[must_use]
    pub fn guarantee<F>(self, finalizer: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::new(self.task.guarantee(finalizer))
    }

    /// Acquires a resource, uses it and always releases it.
    ///
    /// See [`Task::bracket`].
    pub fn bracket<R, Use, Release>(
        acquire: TaskPath<R>,
        use_resource: Use,
        release: Release,
    ) -> Self
    where
        R: Clone + Send + 'static,
        Use: FnOnce(R) -> Self + Send + 'static,
        Release: FnOnce(R) + Send + 'static,
    {
        Self::new(Task::bracket(
            acquire.task,
            move |resource| use_resource(resource).run(),
            release,
        ))
    }

    /// Rebuilds the path with `factory` until it succeeds or `policy` gives up.
    ///
    /// ```rust
    /// use railpath::effect::RetryPolicy;
    /// use railpath::path::{Path, TaskPath};
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::time::Duration;
    ///
    /// let calls = Arc::new(AtomicU32::new(0));
    /// let counter = Arc::clone(&calls);
    /// let policy = RetryPolicy::fixed(3, Duration::from_millis(1))?;
    ///
    /// let flaky = TaskPath::retry(
    ///     move || {
    ///         let counter = Arc::clone(&counter);
    ///         Path::task_attempt(move || {
    ///             if counter.fetch_add(1, Ordering::SeqCst) < 2 {
    ///                 Err(std::fmt::Error)
    ///             } else {
    ///                 Ok("connected")
    ///             }
    ///         })
    ///     },
    ///     policy,
    /// );
    ///
    /// assert_eq!(flaky.run_unsafe(), "connected");
    /// assert_eq!(calls.load(Ordering::SeqCst), 3);
    /// # Ok::<(), railpath::effect::RetryPolicyError>(())
    /// ```
    pub fn retry<F>(factory: F, policy: RetryPolicy) -> Self
    where
        F: Fn() -> Self + Send + 'static,
    {
        Self::new(Task::retry(move || factory().run(), policy))
    }

    /// Runs both paths concurrently and combines their values.
    ///
    /// If either fails, the other is cancelled and awaited before the
    /// failure is reported.
    #[must_use]
    pub fn par_zip_with<B, C, F>(self, other: TaskPath<B>, function: F) -> TaskPath<C>
    where
        B: Send + 'static,
        C: Send + 'static,
        F: FnOnce(A, B) -> C + Send + 'static,
    {
        TaskPath::new(Par::map2(self.task, other.task, function))
    }

    /// Runs both paths concurrently and keeps the first success.
    #[must_use]
    pub fn race(self, other: Self) -> Self {
        Self::new(Par::race([self.task, other.task]))
    }

    // =========================================================================
    // Terminal operations
    // =========================================================================

    /// Executes the path on the calling thread, capturing failures and panics.
    pub fn run_safe(self) -> Try<A> {
        self.task.run_safe()
    }

    /// Executes the path on the calling thread.
    ///
    /// # Panics
    ///
    /// Panics if the path failed.
    pub fn run_unsafe(self) -> A {
        self.task.run_unsafe()
    }

    /// Executes the path on the runtime's blocking pool.
    pub fn run_async(self) -> TaskHandle<A> {
        self.task.run_async()
    }

    /// Executes the path and collapses both channels into a single value.
    pub fn fold<B, OnFailure, OnSuccess>(self, on_failure: OnFailure, on_success: OnSuccess) -> B
    where
        OnFailure: FnOnce(Failure) -> B,
        OnSuccess: FnOnce(A) -> B,
    {
        self.run_safe().fold(on_failure, on_success)
    }

    /// Executes the path, returning `default` on failure.
    pub fn get_or_else(self, default: A) -> A {
        self.run_safe().get_or_else(default)
    }

    /// Executes the path, computing a value on failure.
    pub fn get_or_else_with<F>(self, supplier: F) -> A
    where
        F: FnOnce() -> A,
    {
        self.run_safe().fold(|_| supplier(), |value| value)
    }
}

impl<A: Send + 'static> From<Task<A>> for TaskPath<A> {
    fn from(task: Task<A>) -> Self {
        Self::new(task)
    }
}

impl<A: Send + 'static> From<TaskPath<A>> for Task<A> {
    fn from(path: TaskPath<A>) -> Self {
        path.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn counted(calls: &Arc<AtomicUsize>, value: i32) -> TaskPath<i32> {
        let counter = Arc::clone(calls);
        TaskPath::new(Task::delay(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            value
        }))
    }

    #[rstest]
    fn building_a_pipeline_runs_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let path = counted(&calls, 1).map(|x| x + 1).via(|x| TaskPath::new(Task::pure(x)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(path.run_unsafe(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn zip_with_runs_left_before_right() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let left_order = Arc::clone(&order);
        let right_order = Arc::clone(&order);
        let left = TaskPath::new(Task::delay(move || left_order.lock().unwrap().push("left")));
        let right = TaskPath::new(Task::delay(move || right_order.lock().unwrap().push("right")));
        left.zip_with(right, |(), ()| ()).run_unsafe();
        assert_eq!(*order.lock().unwrap(), vec!["left", "right"]);
    }

    #[rstest]
    fn via_on_failure_never_calls_function() {
        let failed: TaskPath<i32> = TaskPath::new(Task::fail(Failure::msg("down")));
        let result = failed.via(|_| -> TaskPath<i32> { panic!("must not run") }).run_safe();
        assert_eq!(result, Try::failure(Failure::msg("down")));
    }

    #[rstest]
    fn recover_and_or_else() {
        let failed = || TaskPath::<i32>::new(Task::fail(Failure::msg("x")));
        assert_eq!(failed().recover(|_| 1).run_unsafe(), 1);
        assert_eq!(failed().or_else(|| TaskPath::new(Task::pure(2))).run_unsafe(), 2);
    }

    #[rstest]
    fn map_error_rewrites_failure() {
        let failed = TaskPath::<i32>::new(Task::fail(Failure::msg("inner")));
        let result = failed
            .map_error(|failure| Failure::msg(format!("outer: {failure}")))
            .run_safe();
        assert_eq!(result, Try::failure(Failure::msg("outer: inner")));
    }

    #[rstest]
    fn run_safe_captures_panics() {
        let result = TaskPath::new(Task::delay(|| -> i32 { panic!("kaboom") })).run_safe();
        assert!(result.failure_ref().is_some_and(Failure::is_panic));
    }

    #[rstest]
    #[should_panic(expected = "observer bug")]
    fn peek_panic_propagates_from_run_safe() {
        let _ = TaskPath::new(Task::pure(1)).peek(|_| panic!("observer bug")).run_safe();
    }

    #[rstest]
    fn par_zip_with_combines_values() {
        let left = TaskPath::new(Task::pure(2));
        let right = TaskPath::new(Task::pure(3));
        assert_eq!(left.par_zip_with(right, |a, b| a * b).run_unsafe(), 6);
    }

    #[rstest]
    fn race_prefers_the_success() {
        let failing = TaskPath::<i32>::new(Task::fail(Failure::msg("lost")));
        let winning = TaskPath::new(Task::pure(7));
        assert_eq!(failing.race(winning).run_unsafe(), 7);
    }

    #[rstest]
    fn fold_and_get_or_else_execute() {
        let failed = || TaskPath::<i32>::new(Task::fail(Failure::msg("x")));
        assert_eq!(failed().fold(|_| -1, |x| x), -1);
        assert_eq!(failed().get_or_else(5), 5);
        assert_eq!(TaskPath::new(Task::pure(3)).get_or_else_with(|| 0), 3);
    }

    #[rstest]
    fn bracket_releases_after_failure() {
        let released = Arc::new(AtomicUsize::new(0));
        let release_counter = Arc::clone(&released);
        let path: TaskPath<i32> = TaskPath::bracket(
            TaskPath::new(Task::pure("handle")),
            |_| TaskPath::new(Task::fail(Failure::msg("use failed"))),
            move |_| {
                release_counter.fetch_add(1, Ordering::SeqCst);
            },
        );
        assert!(path.run_safe().is_failure());
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
