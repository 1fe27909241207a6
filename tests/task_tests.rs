#![cfg(feature = "task")]
//! Integration tests for deferred task paths.
//!
//! Blocking terminals (`run_safe`, `run_unsafe`) are exercised from plain
//! test threads, where the crate's global runtime drives timers. Async
//! terminals are exercised from a multi-threaded tokio runtime.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use proptest::prelude::*;
use railpath::control::Try;
use railpath::effect::{EffectError, Failure, RetryPolicy, Task};
use railpath::path::{Path, TaskPath};
use rstest::rstest;

// =============================================================================
// Helpers
// =============================================================================

fn flaky(calls: &Arc<AtomicU32>, failures: u32) -> impl Fn() -> TaskPath<u32> + Send + 'static {
    let calls = Arc::clone(calls);
    move || {
        let calls = Arc::clone(&calls);
        TaskPath::new(Task::from_fn(move || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= failures {
                Err(Failure::msg(format!("attempt {attempt} failed")))
            } else {
                Ok(attempt)
            }
        }))
    }
}

fn sleeping<A: Send + 'static>(millis: u64, value: A) -> TaskPath<A> {
    Path::task(move || {
        std::thread::sleep(Duration::from_millis(millis));
        value
    })
}

// =============================================================================
// Laziness
// =============================================================================

#[rstest]
fn test_nothing_runs_until_a_terminal_is_called() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let path = Path::task(move || counter.fetch_add(1, Ordering::SeqCst))
        .map(|previous| previous + 10)
        .via(|value| Path::task_pure(value * 2));

    assert_eq!(runs.load(Ordering::SeqCst), 0);
    let task = path.run();
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    assert_eq!(task.run_unsafe(), 20);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[rstest]
fn test_each_run_of_a_rebuilt_task_executes_again() {
    let runs = Arc::new(AtomicUsize::new(0));
    let build = || {
        let counter = Arc::clone(&runs);
        Path::task(move || counter.fetch_add(1, Ordering::SeqCst))
    };
    build().run_unsafe();
    build().run_unsafe();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Failure capture
// =============================================================================

#[rstest]
fn test_panic_is_captured_as_failure() {
    let outcome = Path::task(|| -> i32 { panic!("exploded") }).map(|x| x + 1).run_safe();
    let failure = outcome.failure_ref().cloned();
    assert!(failure.as_ref().is_some_and(Failure::is_panic));
    assert!(failure.is_some_and(|failure| failure.to_string().contains("exploded")));
}

#[rstest]
fn test_attempt_keeps_the_typed_error() {
    let outcome = Path::task_attempt(|| "forty".parse::<u8>()).run_safe();
    assert!(
        outcome
            .failure_ref()
            .is_some_and(|failure| failure.downcast_ref::<std::num::ParseIntError>().is_some())
    );
}

#[rstest]
fn test_failure_skips_later_stages() {
    let touched = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&touched);
    let outcome = Path::task_fail::<i32>(Failure::msg("down"))
        .map(move |x| {
            counter.fetch_add(1, Ordering::SeqCst);
            x
        })
        .run_safe();
    assert_eq!(outcome, Try::failure(Failure::msg("down")));
    assert_eq!(touched.load(Ordering::SeqCst), 0);
}

#[rstest]
#[should_panic(expected = "down")]
fn test_run_unsafe_panics_with_the_failure() {
    Path::task_fail::<i32>(Failure::msg("down")).run_unsafe();
}

#[rstest]
fn test_recover_and_map_error() {
    let recovered = Path::task_fail::<String>(Failure::msg("missing"))
        .recover(|failure| format!("default after {failure}"));
    assert_eq!(recovered.run_unsafe(), "default after missing");

    let renamed = Path::task_fail::<i32>(Failure::msg("raw"))
        .map_error(|failure| Failure::msg(format!("wrapped: {failure}")));
    assert_eq!(renamed.run_safe(), Try::failure(Failure::msg("wrapped: raw")));
}

#[rstest]
fn test_fold_and_get_or_else_execute() {
    let size = Path::task(|| vec![1, 2, 3]).fold(|_| 0, |items| items.len());
    assert_eq!(size, 3);
    assert_eq!(Path::task_fail(Failure::msg("x")).get_or_else(7), 7);
}

#[rstest]
#[should_panic(expected = "observer bug")]
fn test_peek_observer_panic_reaches_the_caller() {
    let _ = Path::task_pure(1).peek(|_| panic!("observer bug")).run_safe();
}

#[rstest]
fn test_peek_observer_panic_is_not_a_failure() {
    let path = Path::task_pure(1)
        .peek(|_| panic!("observer bug"))
        .recover(|_| 0);
    let escaped = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| path.run_safe()));
    assert!(escaped.is_err());
}

// =============================================================================
// Laws
// =============================================================================

fn task_path(outcome: Result<i32, String>) -> TaskPath<i32> {
    match outcome {
        Ok(value) => Path::task_pure(value),
        Err(message) => Path::task_fail(Failure::msg(message)),
    }
}

fn task_outcome() -> impl Strategy<Value = Result<i32, String>> {
    prop_oneof![
        any::<i32>().prop_map(Ok::<i32, String>),
        "[a-z]{1,8}".prop_map(Err::<i32, String>),
    ]
}

fn task_halve(x: i32) -> TaskPath<i32> {
    if x % 2 == 0 {
        Path::task_pure(x / 2)
    } else {
        Path::task_fail(Failure::msg(format!("{x} is odd")))
    }
}

proptest! {
    #[test]
    fn prop_task_functor_identity(outcome in task_outcome()) {
        prop_assert_eq!(
            task_path(outcome.clone()).map(|x| x).run_safe(),
            task_path(outcome).run_safe()
        );
    }

    #[test]
    fn prop_task_functor_composition(outcome in task_outcome()) {
        let stepwise = task_path(outcome.clone())
            .map(|x| x.wrapping_mul(2))
            .map(|x| x.wrapping_add(1));
        let fused = task_path(outcome).map(|x| x.wrapping_mul(2).wrapping_add(1));
        prop_assert_eq!(stepwise.run_safe(), fused.run_safe());
    }

    #[test]
    fn prop_task_left_identity(value in any::<i32>()) {
        prop_assert_eq!(
            Path::task_pure(value).via(task_halve).run_safe(),
            task_halve(value).run_safe()
        );
    }

    #[test]
    fn prop_task_right_identity(outcome in task_outcome()) {
        prop_assert_eq!(
            task_path(outcome.clone()).via(Path::task_pure).run_safe(),
            task_path(outcome).run_safe()
        );
    }

    #[test]
    fn prop_task_associativity(outcome in task_outcome()) {
        let nested = task_path(outcome.clone()).via(task_halve).via(task_halve);
        let grouped = task_path(outcome).via(|x| task_halve(x).via(task_halve));
        prop_assert_eq!(nested.run_safe(), grouped.run_safe());
    }

    #[test]
    fn prop_task_failure_short_circuits(message in "[a-z]{1,8}") {
        let result = Path::task_fail::<i32>(Failure::msg(message.clone()))
            .via(|_| -> TaskPath<i32> { panic!("must not run") })
            .run_safe();
        prop_assert_eq!(result, Try::failure(Failure::msg(message)));
    }
}

// =============================================================================
// Timeout
// =============================================================================

#[rstest]
fn test_timeout_fails_with_timeout_error() {
    let outcome = sleeping(500, 1).timeout(Duration::from_millis(20)).run_safe();
    let failure = outcome.failure_ref();
    assert!(failure.is_some_and(Failure::is_timeout));
    assert_eq!(
        failure.and_then(Failure::effect_error),
        Some(&EffectError::Timeout(Duration::from_millis(20)))
    );
}

#[rstest]
fn test_timeout_passes_fast_tasks_through() {
    let outcome = sleeping(1, "done").timeout(Duration::from_secs(5)).run_safe();
    assert_eq!(outcome, Try::success("done"));
}

#[rstest]
fn test_timeout_stops_an_interruptible_task() {
    let steps = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&steps);
    let looping = TaskPath::new(Task::interruptible(move |signal| {
        loop {
            signal.check()?;
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(5));
        }
    }));

    let outcome: Try<()> = looping.timeout(Duration::from_millis(30)).run_safe();
    assert!(outcome.failure_ref().is_some_and(Failure::is_timeout));

    std::thread::sleep(Duration::from_millis(50));
    let settled = steps.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(steps.load(Ordering::SeqCst), settled);
}

// =============================================================================
// Retry
// =============================================================================

#[rstest]
#[case(0, 1)]
#[case(2, 3)]
fn test_retry_counts_attempts(#[case] failures: u32, #[case] expected_calls: u32) {
    let calls = Arc::new(AtomicU32::new(0));
    let policy = RetryPolicy::fixed(5, Duration::from_millis(1)).unwrap();
    let outcome = TaskPath::retry(flaky(&calls, failures), policy).run_unsafe();
    assert_eq!(outcome, expected_calls);
    assert_eq!(calls.load(Ordering::SeqCst), expected_calls);
}

#[rstest]
fn test_retry_gives_up_with_the_last_failure() {
    let calls = Arc::new(AtomicU32::new(0));
    let policy = RetryPolicy::fixed(3, Duration::ZERO).unwrap();
    let outcome = TaskPath::retry(flaky(&calls, 10), policy).run_safe();
    assert_eq!(outcome, Try::failure(Failure::msg("attempt 3 failed")));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[rstest]
fn test_retry_respects_the_predicate() {
    let calls = Arc::new(AtomicU32::new(0));
    let policy = RetryPolicy::fixed(5, Duration::ZERO)
        .unwrap()
        .retry_if(|failure| !failure.to_string().contains("attempt 1"));
    let outcome = TaskPath::retry(flaky(&calls, 3), policy).run_safe();
    assert!(outcome.is_failure());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn test_exponential_schedule_is_capped() {
    let policy = RetryPolicy::builder()
        .max_attempts(6)
        .initial_delay(Duration::from_millis(10))
        .backoff_multiplier(2.0)
        .max_delay(Duration::from_millis(50))
        .build()
        .unwrap();
    let schedule: Vec<u128> = (1..=5)
        .map(|attempt| policy.delay_for_attempt(attempt).as_millis())
        .collect();
    assert_eq!(schedule, vec![10, 20, 40, 50, 50]);
}

#[rstest]
fn test_retry_waits_between_attempts() {
    let calls = Arc::new(AtomicU32::new(0));
    let policy = RetryPolicy::fixed(3, Duration::from_millis(20)).unwrap();
    let started = Instant::now();
    TaskPath::retry(flaky(&calls, 2), policy).run_unsafe();
    assert!(started.elapsed() >= Duration::from_millis(40));
}

// =============================================================================
// Bracket and guarantee
// =============================================================================

#[rstest]
#[case(false)]
#[case(true)]
fn test_bracket_always_releases(#[case] use_fails: bool) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let use_log = Arc::clone(&log);
    let release_log = Arc::clone(&log);

    let outcome = TaskPath::bracket(
        Path::task_pure("conn"),
        move |resource| {
            use_log.lock().unwrap().push(format!("use {resource}"));
            if use_fails {
                Path::task(|| -> usize { panic!("query failed") })
            } else {
                Path::task_pure(resource.len())
            }
        },
        move |resource| release_log.lock().unwrap().push(format!("release {resource}")),
    )
    .run_safe();

    assert_eq!(outcome.is_failure(), use_fails);
    assert_eq!(*log.lock().unwrap(), vec!["use conn", "release conn"]);
}

#[rstest]
fn test_bracket_skips_release_when_acquire_fails() {
    let released = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&released);
    let outcome = TaskPath::bracket(
        Path::task_fail::<&str>(Failure::msg("no connection")),
        |_| Path::task_pure(1),
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    )
    .run_safe();
    assert_eq!(outcome, Try::failure(Failure::msg("no connection")));
    assert_eq!(released.load(Ordering::SeqCst), 0);
}

#[rstest]
fn test_guarantee_runs_on_failure() {
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);
    let outcome = Path::task_fail::<i32>(Failure::msg("boom"))
        .guarantee(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .run_safe();
    assert!(outcome.is_failure());
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Async execution
// =============================================================================

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_async_yields_the_result() {
    let handle = sleeping(10, 5).map(|x| x * 3).run_async();
    assert_eq!(handle.await, Try::success(15));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_async_handle_can_cancel() {
    let steps = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&steps);
    let handle = TaskPath::new(Task::<()>::interruptible(move |signal| {
        loop {
            signal.check()?;
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(2));
        }
    }))
    .run_async();

    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.cancel();
    let outcome = handle.await;
    assert!(outcome.failure_ref().is_some_and(Failure::is_cancelled));
}
