//! Async runtime helpers
//!
//! Path queries and the location load are spawned onto the tokio runtime that the
//! application is running in. These helpers keep that in one place.

/// Spawn an async task on the current tokio runtime.
///
/// Must be called from within a runtime context.
pub fn spawn<F>(future: F) -> tokio::task::JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    // Wrap the provided future in a profiling scope so spawned tasks are easier
    // to identify in profiling traces. When profiling is disabled this is a no-op.
    #[cfg(feature = "profiling")]
    {
        tokio::spawn(async move {
            profiling::scope!(
                "runtime::spawn",
                format!("task_type={}", std::any::type_name::<F>()).as_str()
            );
            future.await
        })
    }
    #[cfg(not(feature = "profiling"))]
    {
        tokio::spawn(future)
    }
}
