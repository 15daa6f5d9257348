//! # EsoxSolutions.RentPool
//!
//! Bounded, lock-free async object pool for Rust. Expensive resources
//! (connections, buffers, parsers) are created lazily through a factory,
//! lent out exclusively, and recycled through an idle queue.
//!
//! ## Features
//!
//! - Hard cap on the number of objects ever created (`max_pool_size`)
//! - Lock-free creation admission and idle hand-off
//! - Per-rent timeout and external cancellation via `CancellationToken`
//! - Factory failures never strand capacity or leave waiters hanging
//! - Automatic return of objects via RAII (Drop trait)
//! - Opt-in warm-up and advisory statistics snapshots
//!
//! ## Quick Start
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use esox_rentpool::{ObjectPool, PoolConfiguration};
//! use std::time::Duration;
//!
//! let config = PoolConfiguration::new()
//!     .with_max_pool_size(2)
//!     .with_timeout(Duration::from_millis(100));
//!
//! let pool = ObjectPool::from_fn(config, || Ok::<_, std::io::Error>(String::new())).unwrap();
//! {
//!     let mut obj = pool.rent().await.unwrap();
//!     obj.push_str("scratch");
//!     // Object automatically returned when `obj` goes out of scope
//! }
//! assert_eq!(pool.statistics().number_objects, 1);
//! # }
//! ```

mod pool;
mod config;
mod factory;
mod handoff;
mod slots;
mod statistics;
mod errors;

pub use pool::{ObjectPool, PooledObject};
pub use config::PoolConfiguration;
pub use factory::{ObjectFactory, FnFactory, AsyncFnFactory};
pub use statistics::PoolStatistics;
pub use errors::{PoolError, PoolResult, FactoryError};

pub use tokio_util::sync::CancellationToken;
