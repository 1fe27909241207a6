//! Retry policies for deferred tasks.
//!
//! A [`RetryPolicy`] decides how many attempts a task gets, how long to wait
//! between them, and which failures are worth retrying. [`Task::retry`]
//! applies a policy to a task factory, rebuilding the task for every
//! attempt.
//!
//! # Delay schedule
//!
//! The delay before retrying after attempt `n` is:
//!
//! ```text
//! n <= 1 : initial_delay
//! n > 1  : min(initial_delay * backoff_multiplier^(n - 1), max_delay)
//! ```
//!
//! With jitter enabled the delay is drawn uniformly from `0..=delay`.
//!
//! # Examples
//!
//! ```rust
//! use railpath::effect::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::exponential_backoff(5, Duration::from_millis(100))?;
//! assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
//! assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
//! # Ok::<(), railpath::effect::RetryPolicyError>(())
//! ```

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use super::error::Failure;
use super::task::Task;

const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5 * 60);

type RetryPredicate = Arc<dyn Fn(&Failure) -> bool + Send + Sync>;

/// Invalid retry policy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RetryPolicyError {
    /// A policy must allow at least one attempt.
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    /// Backoff may not shrink the delay.
    #[error("backoff_multiplier must be at least 1.0, got {0}")]
    MultiplierBelowOne(f64),

    /// The multiplier is infinite or NaN.
    #[error("backoff_multiplier must be finite, got {0}")]
    NonFiniteMultiplier(f64),
}

/// How a failing task is retried.
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Duration,
    use_jitter: bool,
    retry_predicate: RetryPredicate,
}

impl RetryPolicy {
    /// Retries up to `max_attempts` times with a constant delay.
    ///
    /// # Errors
    ///
    /// Returns [`RetryPolicyError::ZeroAttempts`] if `max_attempts` is zero.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Result<Self, RetryPolicyError> {
        validate_attempts(max_attempts)?;
        Ok(Self {
            max_attempts,
            initial_delay: delay,
            backoff_multiplier: 1.0,
            max_delay: delay,
            use_jitter: false,
            retry_predicate: Arc::new(|_| true),
        })
    }

    /// Retries with a delay that doubles after every attempt.
    ///
    /// # Errors
    ///
    /// Returns [`RetryPolicyError::ZeroAttempts`] if `max_attempts` is zero.
    pub fn exponential_backoff(
        max_attempts: u32,
        initial_delay: Duration,
    ) -> Result<Self, RetryPolicyError> {
        Self::builder()
            .max_attempts(max_attempts)
            .initial_delay(initial_delay)
            .build()
    }

    /// Like [`RetryPolicy::exponential_backoff`], with full jitter.
    ///
    /// # Errors
    ///
    /// Returns [`RetryPolicyError::ZeroAttempts`] if `max_attempts` is zero.
    pub fn exponential_backoff_with_jitter(
        max_attempts: u32,
        initial_delay: Duration,
    ) -> Result<Self, RetryPolicyError> {
        Self::builder()
            .max_attempts(max_attempts)
            .initial_delay(initial_delay)
            .use_jitter(true)
            .build()
    }

    /// A single attempt, never retried.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            max_delay: Duration::ZERO,
            use_jitter: false,
            retry_predicate: Arc::new(|_| false),
        }
    }

    /// Starts a builder with three attempts, 100ms initial delay and
    /// doubling backoff capped at five minutes.
    #[must_use]
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Returns a copy with a different attempt budget.
    ///
    /// # Errors
    ///
    /// Returns [`RetryPolicyError::ZeroAttempts`] if `max_attempts` is zero.
    pub fn with_max_attempts(&self, max_attempts: u32) -> Result<Self, RetryPolicyError> {
        validate_attempts(max_attempts)?;
        Ok(Self {
            max_attempts,
            ..self.clone()
        })
    }

    /// Returns a copy with a different initial delay.
    #[must_use]
    pub fn with_initial_delay(&self, initial_delay: Duration) -> Self {
        Self {
            initial_delay,
            ..self.clone()
        }
    }

    /// Returns a copy with a different backoff multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`RetryPolicyError::MultiplierBelowOne`] for multipliers
    /// below `1.0` and [`RetryPolicyError::NonFiniteMultiplier`] for infinite
    /// or NaN ones.
    pub fn with_backoff_multiplier(&self, multiplier: f64) -> Result<Self, RetryPolicyError> {
        validate_multiplier(multiplier)?;
        Ok(Self {
            backoff_multiplier: multiplier,
            ..self.clone()
        })
    }

    /// Returns a copy with a different delay cap.
    #[must_use]
    pub fn with_max_delay(&self, max_delay: Duration) -> Self {
        Self {
            max_delay,
            ..self.clone()
        }
    }

    /// Returns a copy that only retries failures accepted by `predicate`.
    #[must_use]
    pub fn retry_if<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Failure) -> bool + Send + Sync + 'static,
    {
        Self {
            retry_predicate: Arc::new(predicate),
            ..self.clone()
        }
    }

    /// Returns a copy that only retries failures wrapping an `E`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railpath::effect::{Failure, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::fixed(3, Duration::ZERO)?.retry_on::<std::io::Error>();
    /// assert!(policy.should_retry(&Failure::new(std::io::Error::other("reset"))));
    /// assert!(!policy.should_retry(&Failure::msg("bad request")));
    /// # Ok::<(), railpath::effect::RetryPolicyError>(())
    /// ```
    #[must_use]
    pub fn retry_on<E>(&self) -> Self
    where
        E: Error + 'static,
    {
        self.retry_if(|failure| failure.downcast_ref::<E>().is_some())
    }

    /// Total number of attempts, the first one included.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the first failed attempt.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Growth factor applied per attempt.
    #[must_use]
    pub const fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// Upper bound for any single delay.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Whether delays are randomised.
    #[must_use]
    pub const fn use_jitter(&self) -> bool {
        self.use_jitter
    }

    /// Whether `failure` may be retried.
    #[must_use]
    pub fn should_retry(&self, failure: &Failure) -> bool {
        (self.retry_predicate)(failure)
    }

    /// Delay to wait after attempt number `attempt` failed.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return self.initial_delay;
        }
        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        #[allow(clippy::cast_precision_loss)]
        let scaled =
            self.initial_delay.as_nanos() as f64 * self.backoff_multiplier.powi(exponent);
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let delay = if scaled.is_finite() && scaled < self.max_delay.as_nanos() as f64 {
            Duration::from_nanos(scaled.round() as u64).min(self.max_delay)
        } else {
            self.max_delay
        };
        if self.use_jitter && !delay.is_zero() {
            delay.mul_f64(rand::rng().random_range(0.0..=1.0))
        } else {
            delay
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("max_delay", &self.max_delay)
            .field("use_jitter", &self.use_jitter)
            .finish_non_exhaustive()
    }
}

fn validate_attempts(max_attempts: u32) -> Result<(), RetryPolicyError> {
    if max_attempts == 0 {
        Err(RetryPolicyError::ZeroAttempts)
    } else {
        Ok(())
    }
}

fn validate_multiplier(multiplier: f64) -> Result<(), RetryPolicyError> {
    if !multiplier.is_finite() {
        Err(RetryPolicyError::NonFiniteMultiplier(multiplier))
    } else if multiplier >= 1.0 {
        Ok(())
    } else {
        Err(RetryPolicyError::MultiplierBelowOne(multiplier))
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Step-by-step construction of a [`RetryPolicy`].
///
/// # Examples
///
/// ```rust
/// use railpath::effect::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(4)
///     .initial_delay(Duration::from_millis(10))
///     .backoff_multiplier(3.0)
///     .max_delay(Duration::from_millis(50))
///     .build()?;
///
/// assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(30));
/// assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(50));
/// # Ok::<(), railpath::effect::RetryPolicyError>(())
/// ```
#[derive(Clone)]
pub struct RetryPolicyBuilder {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Duration,
    use_jitter: bool,
    retry_predicate: RetryPredicate,
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            backoff_multiplier: 2.0,
            max_delay: DEFAULT_MAX_DELAY,
            use_jitter: false,
            retry_predicate: Arc::new(|_| true),
        }
    }
}

impl RetryPolicyBuilder {
    /// Sets the attempt budget.
    #[must_use]
    pub const fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the first delay.
    #[must_use]
    pub const fn initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Sets the backoff multiplier.
    #[must_use]
    pub const fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Sets the delay cap.
    #[must_use]
    pub const fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Enables or disables full jitter.
    #[must_use]
    pub const fn use_jitter(mut self, use_jitter: bool) -> Self {
        self.use_jitter = use_jitter;
        self
    }

    /// Restricts retries to failures accepted by `predicate`.
    #[must_use]
    pub fn retry_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Failure) -> bool + Send + Sync + 'static,
    {
        self.retry_predicate = Arc::new(predicate);
        self
    }

    /// Validates the configuration and builds the policy.
    ///
    /// # Errors
    ///
    /// Returns [`RetryPolicyError`] if the attempt budget is zero or the
    /// multiplier is below `1.0`.
    pub fn build(self) -> Result<RetryPolicy, RetryPolicyError> {
        validate_attempts(self.max_attempts)?;
        validate_multiplier(self.backoff_multiplier)?;
        Ok(RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: self.initial_delay,
            backoff_multiplier: self.backoff_multiplier,
            max_delay: self.max_delay,
            use_jitter: self.use_jitter,
            retry_predicate: self.retry_predicate,
        })
    }
}

impl fmt::Debug for RetryPolicyBuilder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RetryPolicyBuilder")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("max_delay", &self.max_delay)
            .field("use_jitter", &self.use_jitter)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Task integration
// =============================================================================

impl<A: Send + 'static> Task<A> {
    /// Runs a freshly built task until it succeeds or `policy` gives up.
    ///
    /// `factory` is called once per attempt. Between attempts the calling
    /// thread sleeps for `policy.delay_for_attempt(n)`. The last failure is
    /// returned when attempts run out or the policy declines to retry it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railpath::effect::{Failure, RetryPolicy, Task};
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::time::Duration;
    ///
    /// let calls = Arc::new(AtomicU32::new(0));
    /// let counter = Arc::clone(&calls);
    /// let flaky = Task::retry(
    ///     move || {
    ///         let counter = Arc::clone(&counter);
    ///         Task::from_fn(move || match counter.fetch_add(1, Ordering::SeqCst) {
    ///             0 | 1 => Err(Failure::msg("transient")),
    ///             n => Ok(n),
    ///         })
    ///     },
    ///     RetryPolicy::fixed(5, Duration::from_millis(1))?,
    /// );
    ///
    /// assert_eq!(flaky.run_unsafe(), 2);
    /// assert_eq!(calls.load(Ordering::SeqCst), 3);
    /// # Ok::<(), railpath::effect::RetryPolicyError>(())
    /// ```
    pub fn retry<F>(factory: F, policy: RetryPolicy) -> Self
    where
        F: Fn() -> Self + Send + 'static,
    {
        Self::interruptible(move |signal| {
            let mut attempt = 1;
            loop {
                let failure = match factory().execute(signal) {
                    Ok(value) => return Ok(value),
                    Err(failure) => failure,
                };
                if attempt >= policy.max_attempts()
                    || signal.is_cancelled()
                    || !policy.should_retry(&failure)
                {
                    return Err(failure);
                }
                let delay = policy.delay_for_attempt(attempt);
                debug!(attempt, ?delay, %failure, "attempt failed, scheduling retry");
                std::thread::sleep(delay);
                attempt += 1;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Try;
    use rstest::rstest;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn failing_then_ok(calls: Arc<AtomicU32>, failures: u32) -> impl Fn() -> Task<u32> + Send {
        move || {
            let calls = Arc::clone(&calls);
            Task::from_fn(move || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt <= failures {
                    Err(Failure::msg(format!("failure {attempt}")))
                } else {
                    Ok(attempt)
                }
            })
        }
    }

    // =========================================================================
    // Policy construction
    // =========================================================================

    #[rstest]
    fn fixed_policy_shape() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(100)).unwrap();
        assert_eq!(policy.max_attempts(), 3);
        assert!((policy.backoff_multiplier() - 1.0).abs() < f64::EPSILON);
        assert!(!policy.use_jitter());
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(100));
    }

    #[rstest]
    fn zero_attempts_rejected() {
        assert_eq!(
            RetryPolicy::fixed(0, Duration::ZERO).unwrap_err(),
            RetryPolicyError::ZeroAttempts
        );
        assert!(RetryPolicy::no_retry().with_max_attempts(0).is_err());
    }

    #[rstest]
    fn multiplier_below_one_rejected() {
        let result = RetryPolicy::builder().backoff_multiplier(0.5).build();
        assert_eq!(result.unwrap_err(), RetryPolicyError::MultiplierBelowOne(0.5));
    }

    #[rstest]
    fn non_finite_multiplier_rejected() {
        let infinite = RetryPolicy::builder().backoff_multiplier(f64::INFINITY).build();
        assert_eq!(
            infinite.unwrap_err(),
            RetryPolicyError::NonFiniteMultiplier(f64::INFINITY)
        );
        let nan = RetryPolicy::no_retry().with_backoff_multiplier(f64::NAN);
        assert!(matches!(nan, Err(RetryPolicyError::NonFiniteMultiplier(m)) if m.is_nan()));
    }

    #[rstest]
    fn no_retry_never_retries() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.should_retry(&Failure::msg("anything")));
    }

    #[rstest]
    fn with_methods_leave_original_untouched() {
        let original = RetryPolicy::fixed(3, Duration::from_millis(100)).unwrap();
        let updated = original.with_max_attempts(5).unwrap();
        assert_eq!(updated.max_attempts(), 5);
        assert_eq!(original.max_attempts(), 3);
    }

    // =========================================================================
    // Delay schedule
    // =========================================================================

    #[rstest]
    #[case(0, 100)]
    #[case(1, 100)]
    #[case(2, 200)]
    #[case(3, 400)]
    #[case(4, 800)]
    fn exponential_schedule(#[case] attempt: u32, #[case] expected_millis: u64) {
        let policy = RetryPolicy::exponential_backoff(5, Duration::from_millis(100)).unwrap();
        assert_eq!(
            policy.delay_for_attempt(attempt),
            Duration::from_millis(expected_millis)
        );
    }

    #[rstest]
    fn delay_is_capped() {
        let policy = RetryPolicy::exponential_backoff(10, Duration::from_millis(100))
            .unwrap()
            .with_max_delay(Duration::from_millis(250));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(250));
        assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_millis(250));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    fn sub_millisecond_fixed_delay_is_kept(#[case] attempt: u32) {
        let policy = RetryPolicy::fixed(5, Duration::from_micros(500)).unwrap();
        assert_eq!(policy.delay_for_attempt(attempt), Duration::from_micros(500));
    }

    #[rstest]
    fn sub_millisecond_backoff_grows() {
        let policy = RetryPolicy::exponential_backoff(5, Duration::from_micros(300)).unwrap();
        assert_eq!(policy.delay_for_attempt(2), Duration::from_micros(600));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_micros(1200));
    }

    #[rstest]
    fn jitter_stays_within_bounds() {
        let policy =
            RetryPolicy::exponential_backoff_with_jitter(5, Duration::from_millis(100)).unwrap();
        for _ in 0..50 {
            assert!(policy.delay_for_attempt(3) <= Duration::from_millis(400));
        }
    }

    // =========================================================================
    // Task::retry
    // =========================================================================

    #[rstest]
    fn retry_counts_attempts_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::fixed(5, Duration::from_millis(1)).unwrap();
        let result = Task::retry(failing_then_ok(Arc::clone(&calls), 2), policy).run_safe();
        assert_eq!(result, Try::Success(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[rstest]
    fn retry_gives_up_with_last_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::fixed(3, Duration::ZERO).unwrap();
        let result = Task::retry(failing_then_ok(Arc::clone(&calls), 10), policy).run_safe();
        assert_eq!(result, Try::failure(Failure::msg("failure 3")));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[rstest]
    fn retry_stops_when_predicate_declines() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::fixed(5, Duration::ZERO)
            .unwrap()
            .retry_on::<std::io::Error>();
        let result = Task::retry(failing_then_ok(Arc::clone(&calls), 10), policy).run_safe();
        assert!(result.is_failure());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
