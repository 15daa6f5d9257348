//! Async usage examples: timeouts, cancellation, warm-up, concurrency

use esox_rentpool::{CancellationToken, ObjectPool, PoolConfiguration};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    println!("=== EsoxSolutions.RentPool - Async Examples ===\n");

    // Example 1: Rent with timeout
    rent_with_timeout().await;

    // Example 2: Cancellation
    rent_with_cancellation().await;

    // Example 3: Warm-up
    warmup().await;

    // Example 4: Concurrent access
    concurrent_access().await;
}

fn pool(max: usize, timeout: Duration) -> ObjectPool<u32> {
    let config = PoolConfiguration::new()
        .with_max_pool_size(max)
        .with_timeout(timeout);

    ObjectPool::from_async_fn(config, || async {
        sleep(Duration::from_millis(5)).await;
        Ok::<_, std::io::Error>(42)
    })
    .unwrap()
}

async fn rent_with_timeout() {
    println!("1. Rent with Timeout:");
    let pool = pool(1, Duration::from_millis(100));

    // Hold the only object
    let _obj = pool.rent().await.unwrap();

    // Try to get another (should time out)
    match pool.rent().await {
        Ok(_) => println!("   Got object"),
        Err(e) => println!("   Error: {}", e),
    }

    println!();
}

async fn rent_with_cancellation() {
    println!("2. Cancellation:");
    let pool = pool(1, Duration::from_secs(30));
    let _obj = pool.rent().await.unwrap();

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    match pool.rent_with_cancellation(&token).await {
        Ok(_) => println!("   Got object"),
        Err(e) => println!("   Error: {} (cancelled: {})", e, e.is_cancelled()),
    }

    println!();
}

async fn warmup() {
    println!("3. Warm-up:");
    let pool = pool(10, Duration::from_secs(1));

    println!("   Warming up pool with 5 objects...");
    let created = pool.warmup(5).await.unwrap();
    println!("   Created {}, idle {}", created, pool.statistics().idle_count);

    // Rent (should not create a new one)
    {
        let obj = pool.rent().await.unwrap();
        println!("   Got pre-created object: {}", *obj);
    }

    println!();
}

async fn concurrent_access() {
    println!("4. Concurrent Access:");
    let pool = pool(3, Duration::from_secs(1));

    let mut handles = vec![];

    for i in 0..10 {
        let pool = pool.clone();
        let handle = tokio::spawn(async move {
            match pool.rent().await {
                Ok(obj) => {
                    println!("   Task {} got object from slot {}", i, obj.slot());
                    sleep(Duration::from_millis(50)).await;
                }
                Err(e) => println!("   Task {} failed: {}", i, e),
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.unwrap();
    }

    println!("   Final statistics: {:?}", pool.statistics());
}
