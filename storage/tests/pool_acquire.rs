use std::time::Duration;

use journal_storage::db::connection::{acquire, create_pool_with_config, PoolConfig};
use journal_storage::StorageError;

mod support;

fn bounded(max_connections: u32, acquire_timeout: Duration) -> PoolConfig {
    PoolConfig {
        max_connections,
        acquire_timeout,
        ..PoolConfig::default()
    }
}

#[tokio::test]
async fn pool_hands_out_up_to_max_connections() {
    let url = support::database_url();
    let pool = create_pool_with_config(&url, bounded(2, Duration::from_secs(10)))
        .await
        .expect("create pool");

    let first = acquire(&pool).await.expect("first connection");
    let second = acquire(&pool).await.expect("second connection");

    drop(first);
    drop(second);
}

#[tokio::test]
async fn acquire_times_out_when_pool_is_exhausted() {
    let url = support::database_url();
    let pool = create_pool_with_config(&url, bounded(1, Duration::from_millis(500)))
        .await
        .expect("create pool");

    let _held = acquire(&pool).await.expect("hold the only connection");

    let err = acquire(&pool).await.expect_err("no connection available");
    assert!(matches!(err, StorageError::PoolExhausted));
}

#[tokio::test]
async fn dropping_a_handle_returns_it_to_the_pool() {
    let url = support::database_url();
    let pool = create_pool_with_config(&url, bounded(1, Duration::from_millis(500)))
        .await
        .expect("create pool");

    let held = acquire(&pool).await.expect("hold the only connection");
    drop(held);

    let reacquired = acquire(&pool).await.expect("connection after release");
    drop(reacquired);
}

#[tokio::test]
async fn cancelled_acquire_leaves_pool_availability_unchanged() {
    let url = support::database_url();
    let pool = create_pool_with_config(&url, bounded(1, Duration::from_secs(10)))
        .await
        .expect("create pool");

    let held = acquire(&pool).await.expect("hold the only connection");

    // Abandon a waiting acquire before the pool timeout elapses.
    let cancelled = tokio::time::timeout(Duration::from_millis(100), acquire(&pool)).await;
    assert!(cancelled.is_err(), "waiter should still be queued");

    // The abandoned wait must not have consumed the connection slot.
    drop(held);
    let reacquired = acquire(&pool).await.expect("connection after cancellation");
    drop(reacquired);
}
