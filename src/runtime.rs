//! Runtime abstraction layer for async operations
//!
//! Event-loop hosts that cannot `.await` a session call directly hand the
//! work to a spawner instead. The spawner is runtime-agnostic so the crate
//! can sit under Tokio or under a host-provided executor.

use crate::Result;
use futures::future::{BoxFuture, Future, FutureExt};

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(&self, future: BoxFuture<'static, ()>) -> Result<Box<dyn AsyncHandle>>;
}

/// Handle to a spawned async task. Tasks always run to completion.
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;
}

/// Convenience function for spawning with type safety
pub fn spawn<F>(future: F) -> Result<Box<dyn AsyncHandle>>
where
    F: Future<Output = ()> + Send + 'static,
{
    log::trace!("runtime::spawn - spawning session task");
    runtime()?.spawn_boxed(future.boxed())
}

/// Default spawner implementations
pub mod spawners {
    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use crate::runtime::{AsyncHandle, AsyncSpawner};
        use crate::{MapError, Result};
        use ::tokio::task::JoinHandle;
        use futures::future::BoxFuture;

        /// Tokio-based async spawner; needs to be called from inside a runtime
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(&self, future: BoxFuture<'static, ()>) -> Result<Box<dyn AsyncHandle>> {
                let handle = ::tokio::runtime::Handle::try_current()
                    .map_err(|e| MapError::Runtime(e.to_string()))?;
                Ok(Box::new(TokioHandle(handle.spawn(future))))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }
        }
    }
}

/// Global runtime instance
static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Install a specific spawner. Only the first call takes effect; returns
/// false if a spawner was already installed.
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) -> bool {
    RUNTIME.set(spawner).is_ok()
}

/// Get the global runtime spawner
pub fn runtime() -> Result<&'static dyn AsyncSpawner> {
    if let Some(spawner) = RUNTIME.get() {
        return Ok(spawner.as_ref());
    }

    #[cfg(feature = "tokio-runtime")]
    {
        Ok(RUNTIME
            .get_or_init(|| Box::new(spawners::tokio_impl::TokioSpawner))
            .as_ref())
    }

    #[cfg(not(feature = "tokio-runtime"))]
    {
        Err(crate::MapError::Runtime(
            "no async runtime available; enable 'tokio-runtime' or call init_runtime".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;

    #[cfg(feature = "tokio-runtime")]
    #[::tokio::test]
    async fn test_tokio_spawner() {
        let (tx, rx) = ::tokio::sync::oneshot::channel();
        let handle = spawn(async move {
            let _ = tx.send(42);
        })
        .unwrap();

        assert_eq!(rx.await.unwrap(), 42);
        ::tokio::time::sleep(::tokio::time::Duration::from_millis(20)).await;
        assert!(handle.is_finished());
    }

    #[cfg(feature = "tokio-runtime")]
    #[test]
    fn test_spawn_outside_runtime_errors() {
        let result = spawn(async {});
        assert!(matches!(result, Err(MapError::Runtime(_))));
    }
}
