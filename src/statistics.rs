//! Point-in-time pool statistics

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Snapshot of the pool counters
///
/// The two underlying counters are read independently, so under concurrent
/// rent/return traffic a snapshot can be slightly stale or internally
/// inconsistent. `busy_count` is signed for that reason. Treat the numbers as
/// advisory.
///
/// # Examples
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use esox_rentpool::{ObjectPool, PoolConfiguration};
///
/// let pool = ObjectPool::from_fn(PoolConfiguration::default(), || Ok::<_, std::io::Error>(0u32)).unwrap();
///
/// let obj = pool.rent().await.unwrap();
/// let stats = pool.statistics();
/// assert_eq!(stats.number_objects, 1);
/// assert_eq!(stats.busy_count, 1);
///
/// pool.return_object(obj);
/// assert_eq!(pool.statistics().idle_count, 1);
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PoolStatistics {
    /// Objects created by the pool so far
    pub number_objects: usize,

    /// Objects currently waiting in the idle queue
    pub idle_count: usize,

    /// Objects currently rented out (`number_objects - idle_count`)
    pub busy_count: i64,

    /// Configured capacity
    pub max_pool_size: usize,
}

impl PoolStatistics {
    pub(crate) fn new(number_objects: usize, idle_count: usize, max_pool_size: usize) -> Self {
        Self {
            number_objects,
            idle_count,
            busy_count: number_objects as i64 - idle_count as i64,
            max_pool_size,
        }
    }

    /// Busy objects relative to capacity, clamped to 0.0..=1.0
    pub fn utilization(&self) -> f64 {
        if self.max_pool_size == 0 {
            return 0.0;
        }
        (self.busy_count.max(0) as f64 / self.max_pool_size as f64).min(1.0)
    }

    /// Export the snapshot as a key/value map
    pub fn export(&self) -> HashMap<String, String> {
        let mut stats = HashMap::new();
        stats.insert("number_objects".to_string(), self.number_objects.to_string());
        stats.insert("idle_count".to_string(), self.idle_count.to_string());
        stats.insert("busy_count".to_string(), self.busy_count.to_string());
        stats.insert("max_pool_size".to_string(), self.max_pool_size.to_string());
        stats.insert("utilization".to_string(), format!("{:.2}", self.utilization()));
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_count_is_derived() {
        let stats = PoolStatistics::new(5, 2, 10);
        assert_eq!(stats.busy_count, 3);
        assert!((stats.utilization() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inconsistent_snapshot_stays_representable() {
        // idle read after a concurrent rollback of the created counter
        let stats = PoolStatistics::new(1, 2, 4);
        assert_eq!(stats.busy_count, -1);
        assert_eq!(stats.utilization(), 0.0);
    }

    #[test]
    fn test_zero_capacity_utilization() {
        assert_eq!(PoolStatistics::new(0, 0, 0).utilization(), 0.0);
    }

    #[test]
    fn test_export_keys() {
        let exported = PoolStatistics::new(4, 2, 8).export();
        assert_eq!(exported["number_objects"], "4");
        assert_eq!(exported["idle_count"], "2");
        assert_eq!(exported["busy_count"], "2");
        assert_eq!(exported["utilization"], "0.25");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(PoolStatistics::new(2, 1, 4)).unwrap();
        assert_eq!(json["number_objects"], 2);
        assert_eq!(json["busy_count"], 1);
    }
}
