//! Shared tokio runtime for deferred tasks.
//!
//! Tasks are synchronous descriptions, but `timeout` and the `Par` scope
//! need timers and a join set. Those pieces run on one lazily built
//! multi-thread runtime instead of creating a runtime per call.
//!
//! - Outside any runtime, [`try_run_blocking`] drives a future with the
//!   global runtime's `block_on`.
//! - Inside a multi-thread runtime it uses `block_in_place` on the current
//!   handle, which keeps the caller's tracing context.
//! - Inside a current-thread runtime it refuses with
//!   [`BlockingError::CurrentThreadRuntime`]; blocking there would deadlock.

use std::cell::RefCell;
use std::future::Future;
use std::sync::LazyLock;

use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};

use super::error::BlockingError;

static GLOBAL_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("railpath-worker")
        .enable_all()
        .build()
        .expect("failed to create the railpath runtime")
});

/// Returns the global runtime, building it on first use.
///
/// # Panics
///
/// Panics on first use if the operating system refuses to spawn the
/// runtime's worker threads.
#[inline]
#[must_use]
pub fn global() -> &'static Runtime {
    &GLOBAL_RUNTIME
}

thread_local! {
    static CACHED_HANDLE: RefCell<Option<Handle>> = const { RefCell::new(None) };
}

/// Returns the current runtime's handle, or the global one outside a runtime.
///
/// The global handle is cached per thread.
#[must_use]
pub fn handle() -> Handle {
    if let Ok(current) = Handle::try_current() {
        return current;
    }
    CACHED_HANDLE.with(|cached| {
        cached
            .borrow_mut()
            .get_or_insert_with(|| global().handle().clone())
            .clone()
    })
}

/// Drives `future` to completion on the calling thread.
///
/// # Errors
///
/// Returns [`BlockingError::CurrentThreadRuntime`] when called on a
/// current-thread runtime, and [`BlockingError::UnsupportedRuntimeFlavor`]
/// for runtime flavors this crate does not know how to block on.
///
/// # Examples
///
/// ```rust
/// use railpath::effect::runtime::try_run_blocking;
///
/// let value = try_run_blocking(async {
///     tokio::time::sleep(std::time::Duration::from_millis(1)).await;
///     42
/// });
/// assert_eq!(value, Ok(42));
/// ```
pub fn try_run_blocking<F, T>(future: F) -> Result<T, BlockingError>
where
    F: Future<Output = T>,
{
    match Handle::try_current() {
        Ok(current) => match current.runtime_flavor() {
            RuntimeFlavor::MultiThread => {
                Ok(tokio::task::block_in_place(|| current.block_on(future)))
            }
            RuntimeFlavor::CurrentThread => Err(BlockingError::CurrentThreadRuntime),
            _ => Err(BlockingError::UnsupportedRuntimeFlavor),
        },
        Err(_) => Ok(global().block_on(future)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    fn global_is_a_single_instance() {
        assert!(std::ptr::eq(global(), global()));
    }

    #[rstest]
    fn global_runs_spawned_work() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                global().spawn(async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();
        global().block_on(async {
            for handle in handles {
                handle.await.unwrap();
            }
        });
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[rstest]
    fn handle_outside_runtime_uses_global() {
        assert_eq!(handle().block_on(async { 7 }), 7);
    }

    #[rstest]
    fn try_run_blocking_outside_runtime() {
        assert_eq!(try_run_blocking(async { 1 + 1 }), Ok(2));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn try_run_blocking_inside_multi_thread_runtime() {
        let result = tokio::task::spawn_blocking(|| try_run_blocking(async { 42 }))
            .await
            .unwrap();
        assert_eq!(result, Ok(42));
    }

    #[rstest]
    #[tokio::test(flavor = "current_thread")]
    async fn try_run_blocking_refuses_current_thread_runtime() {
        assert_eq!(
            try_run_blocking(async { 42 }),
            Err(BlockingError::CurrentThreadRuntime)
        );
    }
}
