//! Error types for the rent pool

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Error produced by an [`ObjectFactory`](crate::ObjectFactory) when it
/// fails to construct an object.
pub type FactoryError = Box<dyn StdError + Send + Sync>;

#[derive(Error, Debug, Clone)]
pub enum PoolError {
    /// The configuration was rejected at construction time.
    #[error("Invalid pool configuration: max_pool_size ({max_pool_size}) is smaller than min_pool_size ({min_pool_size})")]
    Configuration {
        max_pool_size: usize,
        min_pool_size: usize,
    },

    /// No object became available before the rent deadline.
    #[error("Pool exhausted - no object became available within {timeout:?} (max_pool_size = {max_pool_size})")]
    Exhausted {
        max_pool_size: usize,
        timeout: Duration,
    },

    /// The caller's cancellation token fired while waiting.
    #[error("Operation was cancelled")]
    Cancelled,

    /// The object factory failed; the original error is kept as the source.
    #[error("Object factory failed: {0}")]
    Factory(#[source] Arc<dyn StdError + Send + Sync>),
}

impl PoolError {
    /// True when the rent gave up because the pool stayed exhausted.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PoolError::Exhausted { .. })
    }

    /// True when the caller cancelled the rent.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PoolError::Cancelled)
    }

    /// The error raised by the factory, as it was raised.
    ///
    /// ```
    /// use esox_rentpool::PoolError;
    ///
    /// let err = PoolError::from_factory("connection refused".into());
    /// assert_eq!(err.factory_error().unwrap().to_string(), "connection refused");
    /// ```
    pub fn factory_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            PoolError::Factory(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }

    /// Wrap a factory failure.
    pub fn from_factory(err: FactoryError) -> Self {
        PoolError::Factory(Arc::from(err))
    }
}

pub type PoolResult<T> = Result<T, PoolError>;
