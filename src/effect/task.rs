//! Deferred, cancellable computations.
//!
//! A [`Task`] is a description of work. Building one, or chaining stages
//! onto it, never runs anything; work happens only when a terminal method
//! is called:
//!
//! - [`Task::run_safe`] executes on the calling thread and returns a [`Try`]
//! - [`Task::run_unsafe`] executes and panics if the task failed
//! - [`Task::run_async`] executes on the blocking pool and returns a
//!   [`TaskHandle`] to await
//!
//! Every execution carries a [`CancelSignal`]. Stage boundaries check it,
//! and [`Task::interruptible`] hands it to user code so long-running work can
//! poll it. Cancellation is cooperative: nothing is forcibly interrupted.
//!
//! # Examples
//!
//! ```rust
//! use railpath::effect::Task;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&calls);
//! let task = Task::delay(move || counter.fetch_add(1, Ordering::SeqCst) + 10)
//!     .map(|value| value * 2);
//!
//! // nothing has run yet
//! assert_eq!(calls.load(Ordering::SeqCst), 0);
//! assert_eq!(task.run_unsafe(), 20);
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, trace};

use super::error::Failure;
use super::runtime;
use crate::control::Try;

// =============================================================================
// CancelSignal
// =============================================================================

/// A cooperative cancellation flag shared between a task and its owner.
///
/// Signals form a tree: a child signal reports cancelled when it or any of
/// its ancestors was cancelled, while cancelling a child leaves the parent
/// untouched.
///
/// # Examples
///
/// ```rust
/// use railpath::effect::CancelSignal;
///
/// let parent = CancelSignal::new();
/// let child = parent.child();
///
/// child.cancel();
/// assert!(child.is_cancelled());
/// assert!(!parent.is_cancelled());
///
/// let other = parent.child();
/// parent.cancel();
/// assert!(other.is_cancelled());
/// ```
#[derive(Clone, Default)]
pub struct CancelSignal {
    state: Arc<SignalState>,
}

#[derive(Default)]
struct SignalState {
    cancelled: AtomicBool,
    parent: Option<CancelSignal>,
}

impl CancelSignal {
    /// Creates a fresh, uncancelled root signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a signal that also observes this one.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            state: Arc::new(SignalState {
                cancelled: AtomicBool::new(false),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` if this signal or one of its ancestors was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
            || self
                .state
                .parent
                .as_ref()
                .is_some_and(Self::is_cancelled)
    }

    /// Fails with a cancellation failure once cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns a [`Failure`] wrapping `EffectError::Cancelled` if the signal
    /// is cancelled.
    pub fn check(&self) -> Result<(), Failure> {
        if self.is_cancelled() {
            Err(Failure::cancelled())
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for CancelSignal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CancelSignal")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// =============================================================================
// Task
// =============================================================================

type Thunk<A> = Box<dyn FnOnce(&CancelSignal) -> Result<A, Failure> + Send + 'static>;

/// A deferred computation that yields `A` or a [`Failure`] when run.
///
/// All closures given to a `Task` must be `Send + 'static` because
/// concurrent combinators move them onto worker threads.
pub struct Task<A> {
    thunk: Thunk<A>,
}

impl<A> fmt::Debug for Task<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Task(<deferred>)")
    }
}

impl<A: Send + 'static> Task<A> {
    /// Creates a task whose body can observe its cancel signal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railpath::effect::Task;
    ///
    /// let task = Task::interruptible(|signal| {
    ///     let mut total = 0;
    ///     for step in 0..10 {
    ///         signal.check()?;
    ///         total += step;
    ///     }
    ///     Ok(total)
    /// });
    /// assert_eq!(task.run_unsafe(), 45);
    /// ```
    pub fn interruptible<F>(body: F) -> Self
    where
        F: FnOnce(&CancelSignal) -> Result<A, Failure> + Send + 'static,
    {
        Self {
            thunk: Box::new(body),
        }
    }

    /// Creates a task from a closure that reports failures directly.
    pub fn from_fn<F>(body: F) -> Self
    where
        F: FnOnce() -> Result<A, Failure> + Send + 'static,
    {
        Self::interruptible(move |_| body())
    }

    /// Creates a task from an infallible closure.
    pub fn delay<F>(body: F) -> Self
    where
        F: FnOnce() -> A + Send + 'static,
    {
        Self::interruptible(move |_| Ok(body()))
    }

    /// Creates a task from a fallible closure, capturing its `Err`.
    pub fn attempt<F, E>(body: F) -> Self
    where
        F: FnOnce() -> Result<A, E> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        Self::interruptible(move |_| body().map_err(Failure::new))
    }

    /// Creates a task that yields `value`.
    pub fn pure(value: A) -> Self {
        Self::interruptible(move |_| Ok(value))
    }

    /// Creates a task that fails with `failure`.
    pub fn fail(failure: Failure) -> Self {
        Self::interruptible(move |_| Err(failure))
    }

    /// Lifts an already computed `Try`.
    pub fn from_try(result: Try<A>) -> Self {
        Self::interruptible(move |_| result.into_result())
    }

    /// Runs the task under `signal`, converting a panic into a failure.
    pub(crate) fn execute(self, signal: &CancelSignal) -> Result<A, Failure> {
        signal.check()?;
        let thunk = self.thunk;
        match catch_unwind(AssertUnwindSafe(|| thunk(signal))) {
            Ok(outcome) => outcome,
            Err(payload) if payload.is::<ObserverPanic>() => resume_unwind(payload),
            Err(payload) => Err(Failure::from_panic(payload.as_ref())),
        }
    }

    // =========================================================================
    // Stages
    // =========================================================================

    /// Transforms the result once the task succeeds.
    #[must_use]
    pub fn map<B, F>(self, function: F) -> Task<B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> B + Send + 'static,
    {
        Task::interruptible(move |signal| {
            let value = self.execute(signal)?;
            signal.check()?;
            Ok(function(value))
        })
    }

    /// Sequences a dependent task.
    #[must_use]
    pub fn flat_map<B, F>(self, function: F) -> Task<B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> Task<B> + Send + 'static,
    {
        Task::interruptible(move |signal| {
            let value = self.execute(signal)?;
            function(value).execute(signal)
        })
    }

    /// Sequences a task that ignores this one's result.
    #[must_use]
    pub fn then<B, F>(self, function: F) -> Task<B>
    where
        B: Send + 'static,
        F: FnOnce() -> Task<B> + Send + 'static,
    {
        self.flat_map(move |_| function())
    }

    /// Runs both tasks in order and combines their results.
    #[must_use]
    pub fn zip_with<B, C, F>(self, other: Task<B>, function: F) -> Task<C>
    where
        B: Send + 'static,
        C: Send + 'static,
        F: FnOnce(A, B) -> C + Send + 'static,
    {
        Task::interruptible(move |signal| {
            let left = self.execute(signal)?;
            let right = other.execute(signal)?;
            Ok(function(left, right))
        })
    }

    /// Observes the success value without changing it.
    ///
    /// A panic inside `observer` is not captured as a failure: it unwinds
    /// out of the terminal call that ran the task.
    #[must_use]
    pub fn peek<F>(self, observer: F) -> Self
    where
        F: FnOnce(&A) + Send + 'static,
    {
        Self::interruptible(move |signal| {
            let value = self.execute(signal)?;
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| observer(&value))) {
                resume_unwind(Box::new(ObserverPanic(payload)));
            }
            Ok(value)
        })
    }

    /// Observes the failure without changing it.
    #[must_use]
    pub fn peek_failure<F>(self, observer: F) -> Self
    where
        F: FnOnce(&Failure) + Send + 'static,
    {
        Self::interruptible(move |signal| self.execute(signal).inspect_err(observer))
    }

    /// Rewrites the failure.
    #[must_use]
    pub fn map_failure<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> Failure + Send + 'static,
    {
        Self::interruptible(move |signal| self.execute(signal).map_err(function))
    }

    /// Replaces a failure with a value.
    ///
    /// A cancellation requested by the owner is not recovered.
    #[must_use]
    pub fn recover<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> A + Send + 'static,
    {
        Self::interruptible(move |signal| match self.execute(signal) {
            Err(failure) if !signal.is_cancelled() => Ok(function(failure)),
            outcome => outcome,
        })
    }

    /// Replaces a failure with another task.
    ///
    /// A cancellation requested by the owner is not recovered.
    #[must_use]
    pub fn recover_with<F>(self, function: F) -> Self
    where
        F: FnOnce(Failure) -> Self + Send + 'static,
    {
        Self::interruptible(move |signal| match self.execute(signal) {
            Err(failure) if !signal.is_cancelled() => function(failure).execute(signal),
            outcome => outcome,
        })
    }

    /// Discards the success value.
    #[must_use]
    pub fn as_unit(self) -> Task<()> {
        self.map(|_| ())
    }

    // =========================================================================
    // Resource safety
    // =========================================================================

    /// Runs `finalizer` after the task, whatever its outcome.
    ///
    /// A panicking finalizer turns a success into a failure; an existing
    /// failure is kept.
    #[must_use]
    pub fn guarantee<F>(self, finalizer: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::interruptible(move |signal| {
            let outcome = catch_unwind(AssertUnwindSafe(|| self.execute(signal)));
            let finalized = catch_unwind(AssertUnwindSafe(finalizer));
            match outcome {
                Ok(outcome) => combine_cleanup(outcome, finalized),
                Err(observer_panic) => resume_unwind(observer_panic),
            }
        })
    }

    /// Acquires a resource, uses it and always releases it.
    ///
    /// `release` runs exactly once whenever `acquire` succeeded, even if the
    /// use stage fails or panics. If both the use stage and the release
    /// fail, the use failure is reported.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railpath::effect::{Failure, Task};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let log = Arc::new(Mutex::new(Vec::new()));
    /// let release_log = Arc::clone(&log);
    ///
    /// let task: Task<i32> = Task::bracket(
    ///     Task::pure("connection"),
    ///     |_| Task::fail(Failure::msg("query failed")),
    ///     move |resource| release_log.lock().unwrap().push(resource),
    /// );
    ///
    /// assert!(task.run_safe().is_failure());
    /// assert_eq!(*log.lock().unwrap(), vec!["connection"]);
    /// ```
    pub fn bracket<R, Use, Release>(acquire: Task<R>, use_resource: Use, release: Release) -> Self
    where
        R: Clone + Send + 'static,
        Use: FnOnce(R) -> Self + Send + 'static,
        Release: FnOnce(R) + Send + 'static,
    {
        Self::interruptible(move |signal| {
            let resource = acquire.execute(signal)?;
            let for_release = resource.clone();
            let outcome = match catch_unwind(AssertUnwindSafe(move || use_resource(resource))) {
                Ok(stage) => catch_unwind(AssertUnwindSafe(|| stage.execute(signal))),
                Err(payload) => Ok(Err(Failure::from_panic(payload.as_ref()))),
            };
            let released = catch_unwind(AssertUnwindSafe(move || release(for_release)));
            match outcome {
                Ok(outcome) => combine_cleanup(outcome, released),
                Err(observer_panic) => resume_unwind(observer_panic),
            }
        })
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Fails with `EffectError::Timeout` if the task does not finish in time.
    ///
    /// The task runs on the blocking pool while the caller waits on a timer.
    /// When the timer wins, the task's signal is cancelled and its result is
    /// discarded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railpath::effect::Task;
    /// use std::time::Duration;
    ///
    /// let slow = Task::delay(|| {
    ///     std::thread::sleep(Duration::from_millis(200));
    ///     1
    /// });
    /// let result = slow.timeout(Duration::from_millis(10)).run_safe();
    /// assert!(result.failure_ref().is_some_and(|failure| failure.is_timeout()));
    /// ```
    #[must_use]
    pub fn timeout(self, duration: Duration) -> Self {
        Self::interruptible(move |signal| {
            let worker_signal = signal.child();
            let watchdog = worker_signal.clone();
            runtime::try_run_blocking(async move {
                trace!(?duration, "spawning task under timeout");
                let worker = tokio::task::spawn_blocking(move || self.execute(&worker_signal));
                if let Ok(joined) = tokio::time::timeout(duration, worker).await {
                    flatten_join(joined)
                } else {
                    watchdog.cancel();
                    debug!(?duration, "task timed out, cancelling it");
                    Err(Failure::timeout(duration))
                }
            })?
        })
    }

    // =========================================================================
    // Terminal operations
    // =========================================================================

    /// Executes the task on the calling thread, capturing failures and panics.
    ///
    /// # Panics
    ///
    /// Re-raises a panic from an observer given to [`Task::peek`].
    pub fn run_safe(self) -> Try<A> {
        surface_observer_panic(|| Try::from(self.execute(&CancelSignal::new())))
    }

    /// Executes the task on the calling thread.
    ///
    /// # Panics
    ///
    /// Panics with the failure's message if the task failed.
    pub fn run_unsafe(self) -> A {
        match self.run_safe() {
            Try::Success(value) => value,
            Try::Failure(failure) => panic!("{failure}"),
        }
    }

    /// Executes the task on the runtime's blocking pool.
    ///
    /// Must be called from within a tokio runtime or from plain threads; the
    /// global runtime is used when no runtime is current.
    pub fn run_async(self) -> TaskHandle<A> {
        let signal = CancelSignal::new();
        let worker_signal = signal.clone();
        trace!("spawning task on the blocking pool");
        let join = runtime::handle().spawn_blocking(move || self.execute(&worker_signal));
        TaskHandle { join, signal }
    }
}

impl<A: Send + 'static> From<Try<A>> for Task<A> {
    fn from(result: Try<A>) -> Self {
        Self::from_try(result)
    }
}

fn combine_cleanup<A>(
    outcome: Result<A, Failure>,
    cleanup: std::thread::Result<()>,
) -> Result<A, Failure> {
    match (outcome, cleanup) {
        (outcome, Ok(())) => outcome,
        (Ok(_), Err(payload)) => Err(Failure::from_panic(payload.as_ref())),
        (Err(failure), Err(_)) => {
            debug!(%failure, "cleanup panicked after a failure, keeping the original failure");
            Err(failure)
        }
    }
}

/// Panic payload of a `peek` observer, carried unchanged across task stages
/// and worker threads until a terminal call re-raises the inner payload.
struct ObserverPanic(Box<dyn Any + Send>);

fn surface_observer_panic<T>(body: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(payload) => match payload.downcast::<ObserverPanic>() {
            Ok(observer_panic) => resume_unwind(observer_panic.0),
            Err(other) => resume_unwind(other),
        },
    }
}

pub(crate) fn flatten_join<A>(
    joined: Result<Result<A, Failure>, JoinError>,
) -> Result<A, Failure> {
    match joined {
        Ok(outcome) => outcome,
        Err(error) if error.is_panic() => {
            let payload = error.into_panic();
            if payload.is::<ObserverPanic>() {
                resume_unwind(payload);
            }
            Err(Failure::from_panic(payload.as_ref()))
        }
        Err(_) => Err(Failure::cancelled()),
    }
}

// =============================================================================
// TaskHandle
// =============================================================================

/// A running task started by [`Task::run_async`].
///
/// Awaiting the handle yields the task's [`Try`]. Dropping it does not stop
/// the task; call [`TaskHandle::cancel`] for that.
#[derive(Debug)]
pub struct TaskHandle<A> {
    join: JoinHandle<Result<A, Failure>>,
    signal: CancelSignal,
}

impl<A> TaskHandle<A> {
    /// Requests cooperative cancellation of the running task.
    pub fn cancel(&self) {
        self.signal.cancel();
    }

    /// Returns `true` once the task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl<A> Future for TaskHandle<A> {
    type Output = Try<A>;

    fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        surface_observer_panic(|| {
            Pin::new(&mut this.join)
                .poll(context)
                .map(|joined| Try::from(flatten_join(joined)))
        })
    }
}
