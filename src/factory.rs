//! Object factories

use std::future::Future;

use async_trait::async_trait;

use crate::errors::FactoryError;

/// Constructs new pooled objects on demand.
///
/// The pool calls `create` only after it has reserved capacity for the new
/// object, so a factory never has to worry about over-allocation. Errors are
/// handed back unchanged to the caller whose rent triggered the creation.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use esox_rentpool::{FactoryError, ObjectFactory};
///
/// struct BufferFactory(usize);
///
/// #[async_trait]
/// impl ObjectFactory<Vec<u8>> for BufferFactory {
///     async fn create(&self) -> Result<Vec<u8>, FactoryError> {
///         Ok(Vec::with_capacity(self.0))
///     }
/// }
/// ```
#[async_trait]
pub trait ObjectFactory<T: Send + 'static>: Send + Sync {
    /// Build one new object
    async fn create(&self) -> Result<T, FactoryError>;
}

/// Factory backed by a synchronous closure
pub struct FnFactory<F> {
    f: F,
}

impl<F> FnFactory<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<T, E, F> ObjectFactory<T> for FnFactory<F>
where
    T: Send + 'static,
    E: Into<FactoryError> + 'static,
    F: Fn() -> Result<T, E> + Send + Sync,
{
    async fn create(&self) -> Result<T, FactoryError> {
        (self.f)().map_err(Into::into)
    }
}

/// Factory backed by a closure returning a future
pub struct AsyncFnFactory<F> {
    f: F,
}

impl<F> AsyncFnFactory<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<T, E, F, Fut> ObjectFactory<T> for AsyncFnFactory<F>
where
    T: Send + 'static,
    E: Into<FactoryError> + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    async fn create(&self) -> Result<T, FactoryError> {
        (self.f)().await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fn_factory_calls_closure_each_time() {
        let counter = AtomicUsize::new(0);
        let factory = FnFactory::new(|| Ok::<_, FactoryError>(counter.fetch_add(1, Ordering::SeqCst)));

        assert_eq!(factory.create().await.unwrap(), 0);
        assert_eq!(factory.create().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fn_factory_converts_string_errors() {
        let factory = FnFactory::new(|| Err::<u8, _>("no route to host"));

        let err = factory.create().await.unwrap_err();
        assert_eq!(err.to_string(), "no route to host");
    }

    #[tokio::test]
    async fn test_async_fn_factory() {
        let factory = AsyncFnFactory::new(|| async {
            tokio::task::yield_now().await;
            Ok::<_, std::io::Error>(String::from("conn"))
        });

        let factory: &dyn ObjectFactory<String> = &factory;
        assert_eq!(factory.create().await.unwrap(), "conn");
    }
}
