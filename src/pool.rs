//! Core rent pool implementation

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::factory::{AsyncFnFactory, FnFactory, ObjectFactory};
use crate::handoff::{HandOff, IdleEntry, IdleQueue};
use crate::slots::SlotTable;
use crate::statistics::PoolStatistics;
use crate::FactoryError;

use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// A rented object that automatically returns to its pool when dropped
pub struct PooledObject<T: Send + 'static> {
    value: Option<T>,
    slot: usize,
    shared: Arc<Shared<T>>,
}

impl<T: Send + 'static> PooledObject<T> {
    /// Index of the slot that owns this object
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl<T: Send + std::fmt::Debug + 'static> std::fmt::Debug for PooledObject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledObject")
            .field("value", &self.value)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Deref for PooledObject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        match self.value.as_ref() {
            Some(value) => value,
            None => unreachable!("pooled object accessed after return"),
        }
    }
}

impl<T: Send + 'static> DerefMut for PooledObject<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self.value.as_mut() {
            Some(value) => value,
            None => unreachable!("pooled object accessed after return"),
        }
    }
}

impl<T: Send + 'static> Drop for PooledObject<T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            tracing::trace!(slot = self.slot, "object returned to pool");
            self.shared.idle.push(value, self.slot);
        }
    }
}

struct Shared<T: Send + 'static> {
    config: PoolConfiguration,
    slots: SlotTable,
    idle: IdleQueue<T>,
    factory: Arc<dyn ObjectFactory<T>>,
}

/// Bounded pool that creates objects lazily and lends them out exclusively
///
/// Up to `max_pool_size` objects are created on demand through the factory.
/// Once that many exist, renters wait (up to `timeout`) for another caller to
/// return one. No lock is taken on any path: creation is admitted through an
/// atomic counter and idle objects travel through a lock-free queue.
///
/// # Examples
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use esox_rentpool::{ObjectPool, PoolConfiguration};
///
/// let pool = ObjectPool::from_fn(
///     PoolConfiguration::new().with_max_pool_size(4),
///     || Ok::<_, std::io::Error>(Vec::<u8>::with_capacity(1024)),
/// )
/// .unwrap();
///
/// {
///     let mut buf = pool.rent().await.unwrap();
///     buf.extend_from_slice(b"hello");
///     // returned to the pool when `buf` goes out of scope
/// }
///
/// assert_eq!(pool.statistics().idle_count, 1);
/// # }
/// ```
pub struct ObjectPool<T: Send + 'static> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + 'static> Clone for ObjectPool<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> ObjectPool<T> {
    /// Create a new pool. No object is created until the first rent.
    pub fn new<F>(config: PoolConfiguration, factory: F) -> PoolResult<Self>
    where
        F: ObjectFactory<T> + 'static,
    {
        config.validate()?;

        tracing::debug!(
            max_pool_size = config.max_pool_size,
            min_pool_size = config.min_pool_size,
            timeout_ms = config.timeout.as_millis() as u64,
            "object pool created"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                slots: SlotTable::new(config.max_pool_size),
                idle: IdleQueue::new(),
                factory: Arc::new(factory),
                config,
            }),
        })
    }

    /// Create a pool whose factory is a synchronous closure
    pub fn from_fn<F, E>(config: PoolConfiguration, factory: F) -> PoolResult<Self>
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<FactoryError> + 'static,
    {
        Self::new(config, FnFactory::new(factory))
    }

    /// Create a pool whose factory is an async closure
    pub fn from_async_fn<F, Fut, E>(config: PoolConfiguration, factory: F) -> PoolResult<Self>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<FactoryError> + 'static,
    {
        Self::new(config, AsyncFnFactory::new(factory))
    }

    /// Rent an object, waiting at most the configured timeout
    pub async fn rent(&self) -> PoolResult<PooledObject<T>> {
        self.rent_inner(None).await
    }

    /// Rent an object, giving up early if `cancel` fires while waiting
    ///
    /// When the token fires at the same time as the timeout elapses, the
    /// cancellation wins.
    pub async fn rent_with_cancellation(
        &self,
        cancel: &CancellationToken,
    ) -> PoolResult<PooledObject<T>> {
        self.rent_inner(Some(cancel)).await
    }

    /// Rent without waiting
    ///
    /// Takes an idle object or creates a new one if capacity remains.
    /// Returns `Ok(None)` when the pool is fully allocated and nothing is idle.
    pub async fn try_rent(&self) -> PoolResult<Option<PooledObject<T>>> {
        if let Some(obj) = self.take_idle() {
            return Ok(Some(obj));
        }
        self.try_create().await
    }

    /// Give an object back to the pool. Same as dropping it.
    pub fn return_object(&self, obj: PooledObject<T>) {
        drop(obj);
    }

    /// Snapshot of the pool counters
    pub fn statistics(&self) -> PoolStatistics {
        PoolStatistics::new(
            self.shared.slots.created(),
            self.shared.idle.idle_count(),
            self.shared.slots.capacity(),
        )
    }

    /// Pre-create up to `count` objects and park them as idle.
    ///
    /// Stops early once capacity is reached. Returns how many objects were
    /// created. A factory failure aborts the warm-up and is returned.
    pub async fn warmup(&self, count: usize) -> PoolResult<usize> {
        let shared = &self.shared;
        let mut created = 0;

        while created < count {
            let Some(claim) = shared.slots.try_claim(&shared.idle) else {
                break;
            };
            let value = shared.factory.create().await.map_err(PoolError::from_factory)?;
            let slot = claim.commit();
            shared.idle.push(value, slot);
            created += 1;
        }

        tracing::debug!(requested = count, created, "object pool warmed up");
        Ok(created)
    }

    pub fn config(&self) -> &PoolConfiguration {
        &self.shared.config
    }

    pub fn capacity(&self) -> usize {
        self.shared.slots.capacity()
    }

    async fn rent_inner(&self, cancel: Option<&CancellationToken>) -> PoolResult<PooledObject<T>> {
        let shared = &self.shared;
        // the wait bound runs from the call itself, not from the first wait
        let started = Instant::now();

        loop {
            if let Some(obj) = self.take_idle() {
                return Ok(obj);
            }

            if let Some(obj) = self.try_create().await? {
                return Ok(obj);
            }

            // Fully allocated: wait for a return, or a poison from a failed
            // creation. Retries keep the deadline of this call.
            let remaining = shared.config.timeout.saturating_sub(started.elapsed());
            let wait = tokio::time::timeout(remaining, shared.idle.pop());

            let popped = match cancel {
                Some(token) => tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        tracing::debug!("rent cancelled while waiting for an idle object");
                        return Err(PoolError::Cancelled);
                    }
                    popped = wait => popped,
                },
                None => wait.await,
            };

            match popped {
                Ok(HandOff::Object(entry)) => return Ok(self.lease(entry)),
                Ok(HandOff::Poison) => continue,
                Err(_elapsed) => {
                    tracing::debug!(
                        max_pool_size = shared.config.max_pool_size,
                        timeout_ms = shared.config.timeout.as_millis() as u64,
                        "object pool exhausted"
                    );
                    return Err(PoolError::Exhausted {
                        max_pool_size: shared.config.max_pool_size,
                        timeout: shared.config.timeout,
                    });
                }
            }
        }
    }

    /// Fast path: take an idle object if one is queued. Poison markers in
    /// front of it are dropped; the caller tries creation next, which sees
    /// any capacity they announced.
    fn take_idle(&self) -> Option<PooledObject<T>> {
        loop {
            match self.shared.idle.try_pop()? {
                HandOff::Object(entry) => {
                    tracing::trace!(slot = entry.slot, "rented idle object");
                    return Some(self.lease(entry));
                }
                HandOff::Poison => continue,
            }
        }
    }

    /// Creation path: claim a slot and run the factory.
    ///
    /// `Ok(None)` means the pool is fully allocated. On factory failure the
    /// claim is dropped, which rolls the counter back and wakes one waiter.
    async fn try_create(&self) -> PoolResult<Option<PooledObject<T>>> {
        let shared = &self.shared;
        let Some(claim) = shared.slots.try_claim(&shared.idle) else {
            return Ok(None);
        };

        let value = match shared.factory.create().await {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "object factory failed, releasing claimed slot");
                return Err(PoolError::from_factory(err));
            }
        };

        let slot = claim.commit();
        tracing::debug!(slot, created = shared.slots.created(), "created pooled object");
        Ok(Some(self.lease(IdleEntry { value, slot })))
    }

    fn lease(&self, entry: IdleEntry<T>) -> PooledObject<T> {
        PooledObject {
            value: Some(entry.value),
            slot: entry.slot,
            shared: Arc::clone(&self.shared),
        }
    }
}
