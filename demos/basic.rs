//! Basic usage examples for ObjectPool

use esox_rentpool::{ObjectPool, PoolConfiguration};
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    println!("=== EsoxSolutions.RentPool - Basic Examples ===\n");

    // Example 1: Lazy creation and reuse
    lazy_creation().await;

    // Example 2: Try methods
    try_methods().await;

    // Example 3: Statistics
    statistics().await;
}

fn buffer_pool(max: usize) -> ObjectPool<Vec<u8>> {
    let config = PoolConfiguration::new()
        .with_max_pool_size(max)
        .with_timeout(Duration::from_millis(200));

    ObjectPool::from_fn(config, || {
        println!("   Allocating buffer...");
        Ok::<_, std::io::Error>(Vec::with_capacity(4096))
    })
    .unwrap()
}

async fn lazy_creation() {
    println!("1. Lazy Creation:");
    let pool = buffer_pool(3);

    {
        let mut buf = pool.rent().await.unwrap();
        buf.extend_from_slice(b"first use");
        println!("   Rented buffer from slot {}", buf.slot());
        // Object automatically returned when dropped
    }

    {
        let buf = pool.rent().await.unwrap();
        println!("   Reused buffer holding {} bytes", buf.len());
    }

    println!("   Objects created: {}\n", pool.statistics().number_objects);
}

async fn try_methods() {
    println!("2. Try Methods:");
    let pool = buffer_pool(1);

    let first = pool.try_rent().await.unwrap();
    assert!(first.is_some());
    println!("   First try: Success");

    let second = pool.try_rent().await.unwrap();
    assert!(second.is_none());
    println!("   Second try: None (pool fully allocated)");

    drop(first);

    let third = pool.try_rent().await.unwrap();
    assert!(third.is_some());
    println!("   Third try: Success\n");
}

async fn statistics() {
    println!("3. Statistics:");
    let pool = buffer_pool(5);

    let _a = pool.rent().await.unwrap();
    let b = pool.rent().await.unwrap();
    pool.return_object(b);

    let stats = pool.statistics();
    println!("   Created: {}, Idle: {}, Busy: {}", stats.number_objects, stats.idle_count, stats.busy_count);
    println!("   Utilization: {:.1}%", stats.utilization() * 100.0);

    println!("\n   Exported:");
    for (key, value) in stats.export() {
        println!("     {}: {}", key, value);
    }
}
