//! Async runtime helpers
//!
//! Thin wrappers over tokio so the view-model can spawn provider calls without
//! caring whether it runs under a multi-threaded or current-thread runtime.

use std::future::Future;
use std::time::Duration;

/// Spawn an async task on the current tokio runtime.
///
/// Callers must check [`in_runtime_context`] first; spawning outside a runtime panics.
pub fn spawn<F>(future: F) -> tokio::task::JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    #[cfg(feature = "profiling")]
    {
        use tracing::Instrument;
        // Tag the task type so search tasks can be filtered in traces. A span
        // guard cannot be held across the await, so the span instruments the future.
        let span = tracing::trace_span!("runtime::spawn", task_type = std::any::type_name::<F>());
        tokio::spawn(future.instrument(span))
    }
    #[cfg(not(feature = "profiling"))]
    {
        tokio::spawn(future)
    }
}

/// Check if we're running inside a tokio runtime context.
pub fn in_runtime_context() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}

/// Await `future`, giving up after `limit` when one is set.
///
/// Returns `None` when the limit elapsed first.
pub async fn with_optional_timeout<F: Future>(limit: Option<Duration>, future: F) -> Option<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, future).await.ok(),
        None => Some(future.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_in_runtime_outside_tokio() {
        assert!(!in_runtime_context());
    }

    #[tokio::test]
    async fn test_in_runtime_inside_tokio() {
        assert!(in_runtime_context());
        let value = spawn(async { 21 * 2 }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_optional_timeout() {
        assert_eq!(with_optional_timeout(None, async { 1 }).await, Some(1));
        assert_eq!(
            with_optional_timeout(Some(Duration::from_secs(5)), async { 2 }).await,
            Some(2)
        );
        let never = std::future::pending::<()>();
        assert_eq!(
            with_optional_timeout(Some(Duration::from_millis(10)), never).await,
            None
        );
    }
}
