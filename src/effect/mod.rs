//! Failures and the deferred-effect runtime.
//!
//! This module provides:
//!
//! - [`Failure`]: the dynamic error payload of `TryPath` and `TaskPath`
//! - [`EffectError`]: failures synthesised by the runtime itself
//! - [`Task`]: a lazy, cancellable computation (feature `task`)
//! - [`Par`]: structured parallel combinators over tasks (feature `task`)
//! - [`RetryPolicy`]: retry schedules for tasks (feature `task`)
//!
//! # Task Execution
//!
//! A [`Task`] is only a description. Nothing runs until a terminal method
//! is called, and failures (including panics) are captured rather than
//! propagated:
//!
//! ```rust
//! use railpath::effect::{Failure, Task};
//!
//! let task = Task::pure(10)
//!     .map(|x| x * 2)
//!     .flat_map(|x| if x > 15 { Task::pure(x + 1) } else { Task::fail(Failure::msg("small")) });
//!
//! assert_eq!(task.run_unsafe(), 21);
//! ```
//!
//! # Structured Concurrency
//!
//! ```rust
//! use railpath::effect::{Failure, Par, Task};
//!
//! let failed = Par::zip(Task::pure(1), Task::<i32>::fail(Failure::msg("down")));
//! assert!(failed.run_safe().is_failure());
//! ```

mod error;

#[cfg(feature = "task")]
mod par;
#[cfg(feature = "task")]
mod retry;
#[cfg(feature = "task")]
pub mod runtime;
#[cfg(feature = "task")]
mod task;

pub use error::{BlockingError, EffectError, Failure};

#[cfg(feature = "task")]
pub use par::Par;
#[cfg(feature = "task")]
pub use retry::{RetryPolicy, RetryPolicyBuilder, RetryPolicyError};
#[cfg(feature = "task")]
pub use task::{CancelSignal, Task, TaskHandle};
