//! Structured parallel combinators for [`Task`].
//!
//! Every combinator runs its children in one scope backed by a
//! [`tokio::task::JoinSet`] on the blocking pool:
//!
//! - all children are spawned up front;
//! - the first failure cancels the siblings' shared signal, so children
//!   that have not started yet return immediately and interruptible ones
//!   stop at their next check;
//! - the scope waits for every child before it returns, so no child
//!   outlives the combinator that started it.
//!
//! Results are returned in argument order regardless of completion order.
//! [`Par::race`] is the exception to the waiting rule: it returns as soon as
//! one child succeeds and leaves the cancelled losers to wind down.
//!
//! # Examples
//!
//! ```rust
//! use railpath::effect::{Par, Task};
//!
//! let total = Par::map2(Task::pure(20), Task::delay(|| 22), |a, b| a + b);
//! assert_eq!(total.run_unsafe(), 42);
//!
//! let squares = Par::traverse(1..=4, |n| Task::delay(move || n * n));
//! assert_eq!(squares.run_unsafe(), vec![1, 4, 9, 16]);
//! ```

use tokio::task::JoinSet;
use tracing::{debug, trace};

use super::error::{EffectError, Failure};
use super::runtime;
use super::task::{CancelSignal, Task, flatten_join};

/// Namespace for the parallel task combinators.
#[derive(Debug, Clone, Copy)]
pub struct Par {
    _private: (),
}

enum Branch<A, B, C> {
    First(A),
    Second(B),
    Third(C),
}

impl Par {
    /// Runs two tasks in parallel and pairs their results.
    pub fn zip<A, B>(first: Task<A>, second: Task<B>) -> Task<(A, B)>
    where
        A: Send + 'static,
        B: Send + 'static,
    {
        let branches: Vec<Task<Branch<A, B, ()>>> =
            vec![first.map(Branch::First), second.map(Branch::Second)];
        Task::interruptible(move |signal| {
            let mut results = scope(branches, signal)?.into_iter();
            match (results.next(), results.next()) {
                (Some(Branch::First(a)), Some(Branch::Second(b))) => Ok((a, b)),
                _ => Err(lost_result()),
            }
        })
    }

    /// Runs three tasks in parallel and collects their results.
    pub fn zip3<A, B, C>(first: Task<A>, second: Task<B>, third: Task<C>) -> Task<(A, B, C)>
    where
        A: Send + 'static,
        B: Send + 'static,
        C: Send + 'static,
    {
        let branches = vec![
            first.map(Branch::First),
            second.map(Branch::Second),
            third.map(Branch::Third),
        ];
        Task::interruptible(move |signal| {
            let mut results = scope(branches, signal)?.into_iter();
            match (results.next(), results.next(), results.next()) {
                (Some(Branch::First(a)), Some(Branch::Second(b)), Some(Branch::Third(c))) => {
                    Ok((a, b, c))
                }
                _ => Err(lost_result()),
            }
        })
    }

    /// Runs two tasks in parallel and combines their results.
    pub fn map2<A, B, C, F>(first: Task<A>, second: Task<B>, function: F) -> Task<C>
    where
        A: Send + 'static,
        B: Send + 'static,
        C: Send + 'static,
        F: FnOnce(A, B) -> C + Send + 'static,
    {
        Self::zip(first, second).map(move |(a, b)| function(a, b))
    }

    /// Runs three tasks in parallel and combines their results.
    pub fn map3<A, B, C, D, F>(
        first: Task<A>,
        second: Task<B>,
        third: Task<C>,
        function: F,
    ) -> Task<D>
    where
        A: Send + 'static,
        B: Send + 'static,
        C: Send + 'static,
        D: Send + 'static,
        F: FnOnce(A, B, C) -> D + Send + 'static,
    {
        Self::zip3(first, second, third).map(move |(a, b, c)| function(a, b, c))
    }

    /// Runs every task in parallel and collects the results in order.
    ///
    /// An empty collection succeeds with an empty vector.
    pub fn all<A, I>(tasks: I) -> Task<Vec<A>>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Task<A>>,
    {
        let tasks: Vec<Task<A>> = tasks.into_iter().collect();
        Task::interruptible(move |signal| scope(tasks, signal))
    }

    /// Maps every item to a task and runs them all in parallel.
    pub fn traverse<T, A, I, F>(items: I, function: F) -> Task<Vec<A>>
    where
        A: Send + 'static,
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Task<A>,
    {
        Self::all(items.into_iter().map(function))
    }

    /// Runs every task in parallel and returns the first success.
    ///
    /// The remaining tasks are cancelled once a winner is known. If every
    /// task fails, the first observed failure is returned. An empty race
    /// fails with `EffectError::EmptyRace`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railpath::effect::{Failure, Par, Task};
    /// use std::time::Duration;
    ///
    /// let slow = Task::delay(|| {
    ///     std::thread::sleep(Duration::from_millis(200));
    ///     "slow"
    /// });
    /// let broken = Task::fail(Failure::msg("down"));
    /// let fast = Task::delay(|| "fast");
    ///
    /// assert_eq!(Par::race(vec![slow, broken, fast]).run_unsafe(), "fast");
    /// ```
    pub fn race<A, I>(tasks: I) -> Task<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Task<A>>,
    {
        let tasks: Vec<Task<A>> = tasks.into_iter().collect();
        Task::interruptible(move |signal| race_scope(tasks, signal))
    }
}

fn lost_result() -> Failure {
    Failure::msg("parallel scope finished without every branch result")
}

fn scope<A>(tasks: Vec<Task<A>>, parent: &CancelSignal) -> Result<Vec<A>, Failure>
where
    A: Send + 'static,
{
    if tasks.is_empty() {
        return Ok(Vec::new());
    }
    let siblings = parent.child();
    let size = tasks.len();
    runtime::try_run_blocking(async move {
        let mut children = JoinSet::new();
        for (index, task) in tasks.into_iter().enumerate() {
            let signal = siblings.clone();
            trace!(index, "spawning parallel child");
            children.spawn_blocking(move || (index, task.execute(&signal)));
        }

        let mut slots: Vec<Option<A>> = std::iter::repeat_with(|| None).take(size).collect();
        let mut first_failure: Option<Failure> = None;
        while let Some(joined) = children.join_next().await {
            let outcome = flatten_join(joined.map(|(index, outcome)| {
                outcome.map(|value| {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(value);
                    }
                })
            }));
            if let Err(failure) = outcome
                && first_failure.is_none()
            {
                debug!(%failure, "parallel child failed, cancelling siblings");
                siblings.cancel();
                first_failure = Some(failure);
            }
        }

        match first_failure {
            Some(failure) => Err(failure),
            None => slots
                .into_iter()
                .map(|slot| slot.ok_or_else(lost_result))
                .collect(),
        }
    })?
}

fn race_scope<A>(tasks: Vec<Task<A>>, parent: &CancelSignal) -> Result<A, Failure>
where
    A: Send + 'static,
{
    if tasks.is_empty() {
        return Err(EffectError::EmptyRace.into());
    }
    let contenders = parent.child();
    runtime::try_run_blocking(async move {
        let mut children = JoinSet::new();
        for (index, task) in tasks.into_iter().enumerate() {
            let signal = contenders.clone();
            trace!(index, "spawning race contender");
            children.spawn_blocking(move || task.execute(&signal));
        }

        let mut first_failure: Option<Failure> = None;
        while let Some(joined) = children.join_next().await {
            match flatten_join(joined) {
                Ok(value) => {
                    debug!(remaining = children.len(), "race won, cancelling the rest");
                    contenders.cancel();
                    children.detach_all();
                    return Ok(value);
                }
                Err(failure) => {
                    first_failure.get_or_insert(failure);
                }
            }
        }
        Err(first_failure.unwrap_or_else(lost_result))
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Try;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn sleepy<A: Send + 'static>(millis: u64, value: A) -> Task<A> {
        Task::delay(move || {
            std::thread::sleep(Duration::from_millis(millis));
            value
        })
    }

    #[rstest]
    fn zip_keeps_argument_order() {
        let result = Par::zip(sleepy(30, "slow"), sleepy(0, 1)).run_safe();
        assert_eq!(result, Try::Success(("slow", 1)));
    }

    #[rstest]
    fn zip3_and_map3() {
        let zipped = Par::zip3(Task::pure(1), Task::pure('b'), Task::pure("c")).run_unsafe();
        assert_eq!(zipped, (1, 'b', "c"));
        let summed = Par::map3(Task::pure(1), Task::pure(2), Task::pure(3), |a, b, c| a + b + c);
        assert_eq!(summed.run_unsafe(), 6);
    }

    #[rstest]
    fn all_on_empty_is_empty() {
        let result = Par::all(Vec::<Task<i32>>::new()).run_safe();
        assert_eq!(result, Try::Success(Vec::new()));
    }

    #[rstest]
    fn all_returns_results_in_order() {
        let tasks = vec![sleepy(20, 1), sleepy(0, 2), sleepy(10, 3)];
        assert_eq!(Par::all(tasks).run_unsafe(), vec![1, 2, 3]);
    }

    #[rstest]
    fn traverse_maps_then_runs() {
        let result = Par::traverse(vec!["a", "bb", "ccc"], |word| Task::delay(move || word.len()));
        assert_eq!(result.run_unsafe(), vec![1, 2, 3]);
    }

    #[rstest]
    fn failure_cancels_sibling_and_waits_for_it() {
        let finished = Arc::new(AtomicUsize::new(0));
        let sibling_finished = Arc::clone(&finished);
        let sibling = Task::interruptible(move |signal| {
            while !signal.is_cancelled() {
                std::thread::sleep(Duration::from_millis(2));
            }
            sibling_finished.fetch_add(1, Ordering::SeqCst);
            signal.check().map(|()| 0)
        });
        let failing = Task::<i32>::fail(Failure::msg("broken"));

        let result = Par::zip(sibling, failing).run_safe();

        assert_eq!(result, Try::failure(Failure::msg("broken")));
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn race_returns_fastest_success() {
        let result = Par::race(vec![sleepy(200, "slow"), sleepy(0, "fast")]).run_safe();
        assert_eq!(result, Try::Success("fast"));
    }

    #[rstest]
    fn race_skips_failures() {
        let tasks = vec![Task::fail(Failure::msg("down")), sleepy(20, 7)];
        assert_eq!(Par::race(tasks).run_unsafe(), 7);
    }

    #[rstest]
    fn race_of_failures_reports_a_failure() {
        let tasks: Vec<Task<i32>> = vec![Task::fail(Failure::msg("only"))];
        assert_eq!(Par::race(tasks).run_safe(), Try::failure(Failure::msg("only")));
    }

    #[rstest]
    fn empty_race_fails() {
        let result = Par::race(Vec::<Task<i32>>::new()).run_safe();
        assert_eq!(
            result.failure_ref().and_then(Failure::effect_error),
            Some(&EffectError::EmptyRace)
        );
    }
}
