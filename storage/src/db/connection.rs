use serde::{Deserialize, Serialize};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Executor, Postgres};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::StorageError;

pub type DbPool = PgPool;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 3;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub fn as_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }

    // Applied once per physical connection; every transaction on the
    // connection then runs at this level.
    fn session_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => {
                "SET SESSION CHARACTERISTICS AS TRANSACTION ISOLATION LEVEL READ COMMITTED"
            }
            IsolationLevel::RepeatableRead => {
                "SET SESSION CHARACTERISTICS AS TRANSACTION ISOLATION LEVEL REPEATABLE READ"
            }
            IsolationLevel::Serializable => {
                "SET SESSION CHARACTERISTICS AS TRANSACTION ISOLATION LEVEL SERIALIZABLE"
            }
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for IsolationLevel {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read_committed" | "read committed" => Ok(IsolationLevel::ReadCommitted),
            "repeatable_read" | "repeatable read" => Ok(IsolationLevel::RepeatableRead),
            "serializable" => Ok(IsolationLevel::Serializable),
            other => Err(StorageError::Config(format!(
                "unknown isolation level: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Must stay `false`: every unit of work runs in an explicit transaction.
    pub auto_commit: bool,
    pub isolation: IsolationLevel,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            auto_commit: false,
            isolation: IsolationLevel::RepeatableRead,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.max_connections == 0 {
            return Err(StorageError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.auto_commit {
            return Err(StorageError::Config(
                "auto-commit pools are not supported; units of work run in explicit transactions"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

pub async fn create_pool(database_url: &str) -> Result<DbPool, StorageError> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

/// Build the bounded connection pool.
///
/// Connects eagerly so startup fails fast on an unreachable database. Broken
/// connections are detected on checkout and replaced with fresh ones; the
/// configured isolation level is pinned on every new physical connection.
pub async fn create_pool_with_config(
    database_url: &str,
    config: PoolConfig,
) -> Result<DbPool, StorageError> {
    config.validate()?;
    if database_url.is_empty() {
        return Err(StorageError::Config(
            "database URL must not be empty".to_string(),
        ));
    }

    let isolation = config.isolation;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .test_before_acquire(true)
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                conn.execute(isolation.session_sql()).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        isolation = %isolation,
        "database pool ready"
    );
    Ok(pool)
}

/// Check a connection out of the pool, waiting up to the configured
/// acquire timeout. The handle returns to the pool when dropped.
pub async fn acquire(pool: &DbPool) -> Result<PoolConnection<Postgres>, StorageError> {
    pool.acquire().await.map_err(StorageError::from)
}

pub async fn close_pool(pool: &DbPool) {
    pool.close().await;
    tracing::info!("database pool closed");
}
