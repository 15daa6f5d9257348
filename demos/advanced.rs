//! Advanced features: custom factories, failure recovery, serializable config

use async_trait::async_trait;
use esox_rentpool::{FactoryError, ObjectFactory, ObjectPool, PoolConfiguration, PoolError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug)]
struct Connection {
    id: usize,
    data: String,
}

/// Pretends to dial a backend; every third attempt fails.
struct ConnectionFactory {
    attempts: AtomicUsize,
}

#[async_trait]
impl ObjectFactory<Connection> for ConnectionFactory {
    async fn create(&self) -> Result<Connection, FactoryError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;

        if attempt % 3 == 2 {
            return Err(format!("connect attempt {} refused", attempt).into());
        }
        Ok(Connection {
            id: attempt,
            data: format!("Connection-{}", attempt),
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== EsoxSolutions.RentPool - Advanced Features ===\n");

    // Example 1: Custom factory with failures
    custom_factory().await;

    // Example 2: Configuration from JSON
    config_from_json();

    // Example 3: Invalid configuration
    invalid_config();
}

async fn custom_factory() {
    println!("1. Custom Factory:");

    let pool = ObjectPool::new(
        PoolConfiguration::new()
            .with_max_pool_size(2)
            .with_timeout(Duration::from_millis(500)),
        ConnectionFactory {
            attempts: AtomicUsize::new(0),
        },
    )
    .unwrap();

    let mut held = Vec::new();
    for _ in 0..4 {
        match pool.try_rent().await {
            Ok(Some(conn)) => {
                println!("   Rented {:?}", *conn);
                held.push(conn);
            }
            Ok(None) => println!("   Pool fully allocated"),
            Err(PoolError::Factory(e)) => println!("   Factory failed: {}", e),
            Err(e) => println!("   Error: {}", e),
        }
    }

    for conn in held {
        println!("   Returning connection {} ({})", conn.id, conn.data);
        pool.return_object(conn);
    }

    println!("   Statistics: {:?}\n", pool.statistics());
}

fn config_from_json() {
    println!("2. Configuration from JSON:");

    let json = r#"{"max_pool_size": 16, "min_pool_size": 4, "timeout": {"secs": 5, "nanos": 0}}"#;
    let config: PoolConfiguration = serde_json::from_str(json).unwrap();
    println!("   Parsed: {:?}", config);
    println!("   Valid: {}\n", config.validate().is_ok());
}

fn invalid_config() {
    println!("3. Invalid Configuration:");

    let config = PoolConfiguration::new()
        .with_max_pool_size(1)
        .with_min_pool_size(2);

    match ObjectPool::from_fn(config, || Ok::<_, std::io::Error>(0u8)) {
        Ok(_) => println!("   Unexpectedly accepted"),
        Err(e) => println!("   Rejected: {}", e),
    }
}
