//! Execution contexts for store, network and CPU work.

use std::future::Future;

use tokio::runtime::Handle;

use crate::error::{Error, Result};

/// Runtime handles that repositories and use cases spawn onto.
///
/// `io` runs store and network calls, `compute` runs aggregation and stream
/// combination. Both may point at the same runtime.
#[derive(Debug, Clone)]
pub struct Dispatchers {
    io: Handle,
    compute: Handle,
}

impl Dispatchers {
    pub fn new(io: Handle, compute: Handle) -> Self {
        Self { io, compute }
    }

    /// Uses the calling runtime for both contexts.
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| Error::Dispatch(e.to_string()))?;
        Ok(Self::new(handle.clone(), handle))
    }

    pub fn io_handle(&self) -> &Handle {
        &self.io
    }

    pub fn compute_handle(&self) -> &Handle {
        &self.compute
    }

    /// Runs `task` on the I/O context and waits for its result.
    pub async fn io<F, T, E>(&self, task: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Into<Error> + Send + 'static,
    {
        run_on(&self.io, task).await
    }

    /// Runs `task` on the compute context and waits for its result.
    pub async fn compute<F, T, E>(&self, task: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Into<Error> + Send + 'static,
    {
        run_on(&self.compute, task).await
    }
}

async fn run_on<F, T, E>(handle: &Handle, task: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Into<Error> + Send + 'static,
{
    match handle.spawn(task).await {
        Ok(result) => result.map_err(Into::into),
        Err(join_err) => {
            tracing::error!(error = %join_err, "Dispatched task failed");
            Err(Error::Dispatch(join_err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetsync_core::storage::StorageError;

    #[tokio::test]
    async fn test_io_returns_task_result() {
        let dispatchers = Dispatchers::current().unwrap();

        let value = dispatchers.io(async { Ok::<_, Error>(21 * 2) }).await;

        assert_eq!(value.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_task_error_is_converted() {
        let dispatchers = Dispatchers::current().unwrap();

        let result: Result<()> = dispatchers
            .compute(async { Err(StorageError::not_found("Budget", 1)) })
            .await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_panicking_task_maps_to_dispatch_error() {
        let dispatchers = Dispatchers::current().unwrap();

        let result: Result<()> = dispatchers
            .compute(async {
                if true {
                    panic!("boom");
                }
                Ok::<_, Error>(())
            })
            .await;

        assert!(matches!(result, Err(Error::Dispatch(_))));
    }

    #[test]
    fn test_current_outside_runtime_fails() {
        assert!(matches!(Dispatchers::current(), Err(Error::Dispatch(_))));
    }
}
