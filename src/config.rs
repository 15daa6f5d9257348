//! Pool configuration options

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{PoolError, PoolResult};

/// Configuration for rent pool behavior
///
/// # Examples
///
/// ```
/// use esox_rentpool::PoolConfiguration;
/// use std::time::Duration;
///
/// let config = PoolConfiguration::new()
///     .with_max_pool_size(16)
///     .with_min_pool_size(2)
///     .with_timeout(Duration::from_millis(500));
///
/// assert_eq!(config.max_pool_size, 16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolConfiguration {
    /// Hard cap on the number of objects the pool will ever create
    pub max_pool_size: usize,

    /// Lower bound, checked against `max_pool_size` only. The pool does not
    /// pre-create objects on its own; see `ObjectPool::warmup`.
    pub min_pool_size: usize,

    /// How long a single rent may wait for an object
    pub timeout: Duration,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            max_pool_size: 100,
            min_pool_size: 0,
            timeout: Duration::from_secs(30),
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum pool size
    pub fn with_max_pool_size(mut self, size: usize) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Set the minimum pool size
    pub fn with_min_pool_size(mut self, size: usize) -> Self {
        self.min_pool_size = size;
        self
    }

    /// Set the per-rent wait bound
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the configuration invariants.
    ///
    /// ```
    /// use esox_rentpool::{PoolConfiguration, PoolError};
    ///
    /// let config = PoolConfiguration::new()
    ///     .with_max_pool_size(1)
    ///     .with_min_pool_size(2);
    ///
    /// assert!(matches!(config.validate(), Err(PoolError::Configuration { .. })));
    /// ```
    pub fn validate(&self) -> PoolResult<()> {
        if self.max_pool_size < self.min_pool_size {
            return Err(PoolError::Configuration {
                max_pool_size: self.max_pool_size,
                min_pool_size: self.min_pool_size,
            });
        }
        Ok(())
    }
}
