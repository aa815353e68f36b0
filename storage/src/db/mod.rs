//! Database pool, schema bootstrap, and transaction plumbing.

pub mod connection;
pub mod schema;
pub mod transaction;

use crate::config::StorageConfig;
use crate::error::StorageError;
use connection::DbPool;

const SUPPORTED_DRIVERS: &[&str] = &["postgres", "postgresql"];

/// Create the connection pool and make sure the managed schema exists.
///
/// Called once by the host application at startup, before any unit of work
/// runs. The returned pool is the only shared database resource; pass it to
/// [`transaction::with_transaction`] for every unit of work.
pub async fn init(config: &StorageConfig) -> Result<DbPool, StorageError> {
    let driver = config.driver.trim();
    if driver.is_empty() {
        return Err(StorageError::Config(
            "storage driver must not be empty".to_string(),
        ));
    }
    if !SUPPORTED_DRIVERS.contains(&driver) {
        return Err(StorageError::Config(format!(
            "unsupported storage driver: {}",
            driver
        )));
    }

    let pool =
        connection::create_pool_with_config(&config.database_url, config.pool_config()).await?;
    schema::ensure_schema(&pool, &schema::ARTICLES).await?;
    Ok(pool)
}
